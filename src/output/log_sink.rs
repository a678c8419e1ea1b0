//! Dry-run output that logs every action instead of injecting it.

use std::time::Duration;
use tracing::info;

use super::OutputSink;
use crate::bindings::{Key, MouseButton};

/// Sink selected by `--dry-run`.
#[derive(Debug, Default)]
pub struct LogSink {
    actions_logged: usize,
}

impl LogSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of actions received so far.
    #[must_use]
    pub fn actions_logged(&self) -> usize {
        self.actions_logged
    }
}

impl OutputSink for LogSink {
    fn press(&mut self, key: Key) {
        self.actions_logged += 1;
        info!("press {:?}", key);
    }

    fn mouse_down(&mut self, button: MouseButton) {
        self.actions_logged += 1;
        info!("mouse down {:?}", button);
    }

    fn mouse_up(&mut self, button: MouseButton) {
        self.actions_logged += 1;
        info!("mouse up {:?}", button);
    }

    fn move_relative(&mut self, dx: i32, dy: i32) {
        self.actions_logged += 1;
        info!("move ({}, {})", dx, dy);
    }

    fn scroll(&mut self, amount: i32) {
        self.actions_logged += 1;
        info!("scroll {}", amount);
    }

    fn hold_key_for(&mut self, key: Key, duration: Duration) {
        self.actions_logged += 1;
        info!("hold {:?} for {:?}", key, duration);
    }
}
