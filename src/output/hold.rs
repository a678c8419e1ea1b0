//! # Background Key Holds
//!
//! A hold presses a key now and releases it after a fixed duration while the
//! tick loop keeps running. The release is tied to a [`HeldKey`] guard, so a
//! hold task that is aborted (or a runtime that shuts down) still lets go of
//! the key.
//!
//! Holds are fire-and-forget: nothing joins the spawned task, and overlapping
//! holds of the same key are allowed. The first release wins.

use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::bindings::Key;

/// Raw key down/up, shareable across tasks.
pub trait KeyEmitter: Send + Sync + 'static {
    fn key_down(&self, key: Key);
    fn key_up(&self, key: Key);
}

/// A key that stays pressed until the guard is dropped.
///
/// # Examples
///
/// ```
/// use padmouse::bindings::Key;
/// use padmouse::output::hold::{HeldKey, KeyEmitter};
/// use std::sync::{Arc, Mutex};
///
/// #[derive(Default)]
/// struct Recorder(Mutex<Vec<(Key, bool)>>);
///
/// impl KeyEmitter for Recorder {
///     fn key_down(&self, key: Key) { self.0.lock().unwrap().push((key, true)); }
///     fn key_up(&self, key: Key) { self.0.lock().unwrap().push((key, false)); }
/// }
///
/// let recorder = Arc::new(Recorder::default());
/// {
///     let _held = HeldKey::acquire(recorder.clone(), Key::LeftShift);
/// }
/// assert_eq!(
///     *recorder.0.lock().unwrap(),
///     vec![(Key::LeftShift, true), (Key::LeftShift, false)]
/// );
/// ```
pub struct HeldKey<E: KeyEmitter> {
    emitter: Arc<E>,
    key: Key,
}

impl<E: KeyEmitter> HeldKey<E> {
    /// Presses `key` and returns the guard that will release it.
    #[must_use]
    pub fn acquire(emitter: Arc<E>, key: Key) -> Self {
        emitter.key_down(key);
        Self { emitter, key }
    }

    #[must_use]
    pub fn key(&self) -> Key {
        self.key
    }
}

impl<E: KeyEmitter> Drop for HeldKey<E> {
    fn drop(&mut self) {
        self.emitter.key_up(self.key);
    }
}

/// Presses `key` immediately and releases it after `duration` on `runtime`.
///
/// The returned handle may be dropped; the hold completes either way.
pub fn spawn_hold<E: KeyEmitter>(
    runtime: &Handle,
    emitter: Arc<E>,
    key: Key,
    duration: Duration,
) -> JoinHandle<()> {
    let held = HeldKey::acquire(emitter, key);
    runtime.spawn(async move {
        tokio::time::sleep(duration).await;
        drop(held);
    })
}
