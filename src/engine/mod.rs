//! # Tick Engine
//!
//! Runs the controller-to-output pipeline once per tick:
//!
//! 1. Poll the controller and capture a [`ControllerSnapshot`]
//! 2. Move the cursor from the left stick ([`MotionCurve`])
//! 3. Feed both triggers through their rapid-trigger [`TrendDetector`]s
//! 4. Emit mouse button down/up only when a trigger's state changed
//! 5. Scroll from the right stick ([`ScrollWheel`])
//! 6. Run every binding through its [`RepeatTimer`] and perform fired actions
//!
//! A tick never blocks. All state lives in the [`TickPipeline`] and is only
//! touched by the task that drives it.

pub mod clock;

use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, trace};

use crate::bindings::{KeyBinding, MouseButton};
use crate::config::{AxesConfig, Config};
use crate::controller::calibration::rescale_trigger;
use crate::controller::{ControllerSnapshot, InputSource};
use crate::motion::curve::{MotionCurve, ScrollWheel};
use crate::output::OutputSink;
use crate::signal::repeat::{KeyRepeatState, RepeatTimer};
use crate::signal::trend::{TrendDetector, TrendState};
use clock::FrameClock;

/// Number of ticks between periodic debug summaries.
pub const LOG_INTERVAL_TICKS: u64 = 5000;

/// Which emulated mouse buttons are currently held down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MouseButtonState {
    pub left: bool,
    pub right: bool,
}

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Cursor movement in pixels.
    pub movement: (i32, i32),
    /// Rapid-trigger state of the (left, right) triggers.
    pub clicks: (bool, bool),
    /// Scroll amount in wheel units.
    pub scroll: i32,
    /// Number of bindings that fired.
    pub fired: usize,
}

struct BindingSlot {
    binding: KeyBinding,
    timer: RepeatTimer,
}

/// The per-tick pipeline from an [`InputSource`] to an [`OutputSink`].
///
/// # Examples
///
/// ```
/// use padmouse::config::Config;
/// use padmouse::controller::InputSource;
/// use padmouse::engine::TickPipeline;
/// use padmouse::output::log_sink::LogSink;
/// use std::time::Duration;
///
/// struct Idle;
///
/// impl InputSource for Idle {
///     fn poll(&mut self) {}
///     fn hat(&self, _index: usize) -> (i32, i32) { (0, 0) }
///     fn button(&self, _index: usize) -> bool { false }
///     fn num_buttons(&self) -> usize { 11 }
///     fn axis(&self, index: usize) -> f64 { if index >= 4 { -1.0 } else { 0.0 } }
/// }
///
/// let mut pipeline = TickPipeline::new(&Config::default(), Idle, LogSink::new());
/// let report = pipeline.tick(Duration::ZERO, Duration::from_millis(1));
/// assert_eq!(report.movement, (0, 0));
/// assert_eq!(pipeline.output().actions_logged(), 0);
/// ```
pub struct TickPipeline<I: InputSource, O: OutputSink> {
    input: I,
    output: O,
    axes: AxesConfig,
    axis_count: usize,
    curve: MotionCurve,
    wheel: ScrollWheel,
    left_trigger: TrendDetector,
    right_trigger: TrendDetector,
    mouse: MouseButtonState,
    bindings: Vec<BindingSlot>,
}

impl<I: InputSource, O: OutputSink> TickPipeline<I, O> {
    /// Builds the pipeline from a validated configuration.
    #[must_use]
    pub fn new(config: &Config, input: I, output: O) -> Self {
        let bindings = config
            .bindings
            .iter()
            .map(|binding| BindingSlot {
                binding: binding.clone(),
                timer: RepeatTimer::new(binding.repeat_interval, config.repeat.delay),
            })
            .collect();

        Self {
            input,
            output,
            axes: config.axes.clone(),
            axis_count: config.axis_count(),
            curve: MotionCurve::from_config(&config.motion),
            wheel: ScrollWheel::from_config(&config.motion, &config.scroll),
            left_trigger: TrendDetector::new(config.triggers.left_movement),
            right_trigger: TrendDetector::new(config.triggers.right_movement),
            mouse: MouseButtonState::default(),
            bindings,
        }
    }

    /// Runs one tick.
    ///
    /// # Arguments
    ///
    /// * `now` - Time since the pipeline started
    /// * `dt` - Time since the previous tick (uncapped)
    pub fn tick(&mut self, now: Duration, dt: Duration) -> TickReport {
        self.input.poll();
        let snapshot = ControllerSnapshot::capture(&self.input, self.axis_count);
        let dt_secs = dt.as_secs_f64();

        let movement = self.curve.compute(
            snapshot.axis(self.axes.move_x),
            snapshot.axis(self.axes.move_y),
            dt_secs,
        );
        if movement != (0, 0) {
            self.output.move_relative(movement.0, movement.1);
        }

        let left = self
            .left_trigger
            .update(rescale_trigger(snapshot.axis(self.axes.left_trigger)));
        let right = self
            .right_trigger
            .update(rescale_trigger(snapshot.axis(self.axes.right_trigger)));
        self.apply_mouse_buttons(left, right);

        let scroll = self.wheel.compute(snapshot.axis(self.axes.scroll), dt_secs);
        if scroll != 0 {
            self.output.scroll(scroll);
        }

        let mut fired = 0;
        for slot in &mut self.bindings {
            let active = slot.binding.source.is_active(&snapshot);
            if slot.timer.evaluate(active, now) {
                trace!("Binding {} fired", slot.binding.name);
                slot.binding.action.perform(&mut self.output);
                fired += 1;
            }
        }

        TickReport {
            movement,
            clicks: (left, right),
            scroll,
            fired,
        }
    }

    /// Emits down/up for each side whose state changed.
    fn apply_mouse_buttons(&mut self, left: bool, right: bool) {
        for (held, pressed, button) in [
            (&mut self.mouse.left, left, MouseButton::Left),
            (&mut self.mouse.right, right, MouseButton::Right),
        ] {
            if *held == pressed {
                continue;
            }
            if pressed {
                self.output.mouse_down(button);
            } else {
                self.output.mouse_up(button);
            }
            *held = pressed;
        }
    }

    /// Releases any mouse buttons still held by the triggers.
    pub fn shutdown(&mut self) {
        self.apply_mouse_buttons(false, false);
    }

    #[must_use]
    pub fn mouse_buttons(&self) -> MouseButtonState {
        self.mouse
    }

    /// Rapid-trigger state of the (left, right) triggers.
    #[must_use]
    pub fn trigger_states(&self) -> (&TrendState, &TrendState) {
        (self.left_trigger.state(), self.right_trigger.state())
    }

    /// Repeat state of every binding, in table order.
    pub fn binding_states(&self) -> impl Iterator<Item = (&str, &KeyRepeatState)> {
        self.bindings
            .iter()
            .map(|slot| (slot.binding.name.as_str(), slot.timer.state()))
    }

    #[must_use]
    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut I {
        &mut self.input
    }

    #[must_use]
    pub fn output(&self) -> &O {
        &self.output
    }
}

/// Drives `pipeline` at `tick_rate_hz` until `shutdown` completes.
///
/// Held mouse buttons are released before returning.
///
/// # Returns
///
/// The number of ticks run.
pub async fn run<I, O, F>(pipeline: &mut TickPipeline<I, O>, tick_rate_hz: u32, shutdown: F) -> u64
where
    I: InputSource,
    O: OutputSink,
    F: Future<Output = ()>,
{
    let mut clock = FrameClock::new(tick_rate_hz);
    tokio::pin!(shutdown);

    info!("Starting tick loop at {}Hz", tick_rate_hz);

    let mut ticks: u64 = 0;
    let mut fired: u64 = 0;

    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => {
                info!("Shutting down after {} ticks", ticks);
                break;
            }

            frame = clock.tick() => {
                let report = pipeline.tick(frame.now, frame.dt);
                trace!(?report, dt = ?frame.dt, "tick");

                ticks += 1;
                fired += report.fired as u64;

                if ticks % LOG_INTERVAL_TICKS == 0 {
                    debug!(
                        "Ran {} ticks ({} bindings fired, mouse {:?})",
                        ticks,
                        fired,
                        pipeline.mouse_buttons()
                    );
                }
            }
        }
    }

    pipeline.shutdown();
    ticks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::{Action, HatDirection, Key, PhysicalSource};
    use crate::output::MockOutputSink;
    use mockall::predicate::eq;

    /// Input whose state the test sets directly.
    struct ScriptedInput {
        state: ControllerSnapshot,
        polls: usize,
    }

    impl ScriptedInput {
        fn neutral() -> Self {
            Self {
                state: ControllerSnapshot {
                    hat: (0, 0),
                    buttons: vec![false; 11],
                    axes: vec![0.0, 0.0, 0.0, 0.0, -1.0, -1.0],
                },
                polls: 0,
            }
        }
    }

    impl InputSource for ScriptedInput {
        fn poll(&mut self) {
            self.polls += 1;
        }

        fn hat(&self, index: usize) -> (i32, i32) {
            if index == 0 {
                self.state.hat
            } else {
                (0, 0)
            }
        }

        fn button(&self, index: usize) -> bool {
            self.state.button(index)
        }

        fn num_buttons(&self) -> usize {
            self.state.num_buttons()
        }

        fn axis(&self, index: usize) -> f64 {
            self.state.axis(index)
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Emitted {
        Press(Key),
        Down(MouseButton),
        Up(MouseButton),
        Move(i32, i32),
        Scroll(i32),
        Hold(Key, Duration),
    }

    #[derive(Default)]
    struct RecordingOutput {
        events: Vec<Emitted>,
    }

    impl RecordingOutput {
        fn presses(&self, key: Key) -> usize {
            self.events.iter().filter(|e| **e == Emitted::Press(key)).count()
        }
    }

    impl OutputSink for RecordingOutput {
        fn press(&mut self, key: Key) {
            self.events.push(Emitted::Press(key));
        }

        fn mouse_down(&mut self, button: MouseButton) {
            self.events.push(Emitted::Down(button));
        }

        fn mouse_up(&mut self, button: MouseButton) {
            self.events.push(Emitted::Up(button));
        }

        fn move_relative(&mut self, dx: i32, dy: i32) {
            self.events.push(Emitted::Move(dx, dy));
        }

        fn scroll(&mut self, amount: i32) {
            self.events.push(Emitted::Scroll(amount));
        }

        fn hold_key_for(&mut self, key: Key, duration: Duration) {
            self.events.push(Emitted::Hold(key, duration));
        }
    }

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn recording_pipeline(config: &Config) -> TickPipeline<ScriptedInput, RecordingOutput> {
        TickPipeline::new(config, ScriptedInput::neutral(), RecordingOutput::default())
    }

    // ==================== Idle Tests ====================

    #[test]
    fn test_idle_tick_emits_nothing() {
        // Mock with no expectations panics on any output call
        let mut pipeline =
            TickPipeline::new(&Config::default(), ScriptedInput::neutral(), MockOutputSink::new());
        for t in 0..100 {
            let report = pipeline.tick(ms(t), ms(1));
            assert_eq!(report, TickReport::default());
        }
        assert_eq!(pipeline.input().polls, 100);
    }

    // ==================== Movement Tests ====================

    #[test]
    fn test_full_deflection_moves_cursor() {
        let mut pipeline = recording_pipeline(&Config::default());
        pipeline.input_mut().state.axes[0] = 1.0;
        pipeline.input_mut().state.axes[1] = -1.0;

        let report = pipeline.tick(ms(0), ms(10));
        assert_eq!(report.movement, (10, -10));
        assert_eq!(pipeline.output().events, vec![Emitted::Move(10, -10)]);
    }

    #[test]
    fn test_slow_half_deflection_rounds_to_zero() {
        let mut config = Config::default();
        config.motion.sensitivity = 1.0;
        let mut pipeline = recording_pipeline(&config);
        pipeline.input_mut().state.axes[0] = 0.5;

        let report = pipeline.tick(ms(0), ms(20));
        assert_eq!(report.movement, (0, 0));
        assert!(pipeline.output().events.is_empty());
    }

    #[test]
    fn test_long_tick_is_not_capped() {
        let mut pipeline = recording_pipeline(&Config::default());
        pipeline.input_mut().state.axes[0] = 1.0;

        let report = pipeline.tick(ms(0), Duration::from_secs(2));
        assert_eq!(report.movement, (2000, 0));
    }

    // ==================== Trigger Tests ====================

    #[test]
    fn test_trigger_reversal_sequence() {
        let mut pipeline = recording_pipeline(&Config::default());

        let mut clicks = Vec::new();
        for (t, value) in [0.5, 0.9, 0.6].into_iter().enumerate() {
            pipeline.input_mut().state.axes[4] = value;
            clicks.push(pipeline.tick(ms(t as u64), ms(1)).clicks.0);
        }

        assert_eq!(clicks, vec![false, true, false]);
        assert_eq!(
            pipeline.output().events,
            vec![Emitted::Down(MouseButton::Left), Emitted::Up(MouseButton::Left)]
        );
    }

    #[test]
    fn test_mouse_events_only_on_change() {
        let mut pipeline = recording_pipeline(&Config::default());

        // Trigger squeezed steadily, then held
        for (t, value) in [-1.0, -0.6, -0.2, 0.2, 0.6, 0.6, 0.6].into_iter().enumerate() {
            pipeline.input_mut().state.axes[5] = value;
            pipeline.tick(ms(t as u64), ms(1));
        }

        assert_eq!(pipeline.output().events, vec![Emitted::Down(MouseButton::Right)]);
        assert_eq!(
            pipeline.mouse_buttons(),
            MouseButtonState {
                left: false,
                right: true
            }
        );
    }

    #[test]
    fn test_triggers_are_independent() {
        let mut pipeline = recording_pipeline(&Config::default());
        pipeline.tick(ms(0), ms(1));

        pipeline.input_mut().state.axes[4] = 1.0;
        let report = pipeline.tick(ms(1), ms(1));
        assert_eq!(report.clicks, (true, false));

        pipeline.input_mut().state.axes[5] = 1.0;
        let report = pipeline.tick(ms(2), ms(1));
        assert_eq!(report.clicks, (true, true));
    }

    #[test]
    fn test_shutdown_releases_held_buttons() {
        let mut pipeline = recording_pipeline(&Config::default());
        pipeline.tick(ms(0), ms(1));
        pipeline.input_mut().state.axes[4] = 1.0;
        pipeline.tick(ms(1), ms(1));

        pipeline.shutdown();
        assert_eq!(
            pipeline.output().events,
            vec![Emitted::Down(MouseButton::Left), Emitted::Up(MouseButton::Left)]
        );
        assert_eq!(pipeline.mouse_buttons(), MouseButtonState::default());

        // Nothing left to release
        pipeline.shutdown();
        assert_eq!(pipeline.output().events.len(), 2);
    }

    // ==================== Scroll Tests ====================

    #[test]
    fn test_stick_up_scrolls_up() {
        let mut pipeline = recording_pipeline(&Config::default());
        pipeline.input_mut().state.axes[3] = -1.0;

        let report = pipeline.tick(ms(0), ms(24));
        assert_eq!(report.scroll, 120);
        assert_eq!(pipeline.output().events, vec![Emitted::Scroll(120)]);
    }

    #[test]
    fn test_scroll_inside_deadzone_is_ignored() {
        let mut pipeline = recording_pipeline(&Config::default());
        pipeline.input_mut().state.axes[3] = 0.05;

        let report = pipeline.tick(ms(0), Duration::from_secs(1));
        assert_eq!(report.scroll, 0);
        assert!(pipeline.output().events.is_empty());
    }

    // ==================== Binding Tests ====================

    #[test]
    fn test_held_button_repeats_sixteen_times_in_one_second() {
        let mut pipeline = recording_pipeline(&Config::default());
        pipeline.input_mut().state.buttons[2] = true;

        for t in (0..=1_000).step_by(10) {
            pipeline.tick(ms(t), ms(10));
        }

        assert_eq!(pipeline.output().presses(Key::Space), 16);
    }

    #[test]
    fn test_non_repeating_button_fires_once() {
        let mut pipeline = recording_pipeline(&Config::default());
        pipeline.input_mut().state.buttons[0] = true;

        let fired: usize = (0..500).map(|t| pipeline.tick(ms(t), ms(1)).fired).sum();
        assert_eq!(fired, 1);
        assert_eq!(pipeline.output().events, vec![Emitted::Press(Key::Enter)]);
    }

    #[test]
    fn test_dpad_up_presses_up_arrow() {
        let mut pipeline = recording_pipeline(&Config::default());
        pipeline.input_mut().state.hat = (0, 1);

        let report = pipeline.tick(ms(0), ms(1));
        assert_eq!(report.fired, 1);
        assert_eq!(pipeline.output().events, vec![Emitted::Press(Key::Up)]);
    }

    #[test]
    fn test_dpad_diagonal_fires_nothing() {
        let mut pipeline = recording_pipeline(&Config::default());
        pipeline.input_mut().state.hat = (1, 1);

        let report = pipeline.tick(ms(0), ms(1));
        assert_eq!(report.fired, 0);
    }

    #[test]
    fn test_right_bumper_holds_grave() {
        let mut pipeline = recording_pipeline(&Config::default());
        pipeline.input_mut().state.buttons[5] = true;

        for t in 0..1_000 {
            pipeline.tick(ms(t), ms(1));
        }
        assert_eq!(
            pipeline.output().events,
            vec![Emitted::Hold(Key::Grave, ms(500))]
        );
    }

    #[test]
    fn test_left_bumper_middle_click() {
        let mut output = MockOutputSink::new();
        let mut seq = mockall::Sequence::new();
        output
            .expect_mouse_down()
            .with(eq(MouseButton::Middle))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());
        output
            .expect_mouse_up()
            .with(eq(MouseButton::Middle))
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let mut input = ScriptedInput::neutral();
        input.state.buttons[4] = true;
        let mut pipeline = TickPipeline::new(&Config::default(), input, output);
        pipeline.tick(ms(0), ms(1));
        pipeline.tick(ms(1), ms(1));
    }

    #[test]
    fn test_missing_button_is_inactive() {
        let mut config = Config::default();
        config.bindings = vec![KeyBinding::new(
            "extra",
            PhysicalSource::Button(20),
            None,
            Action::Press(Key::F1),
        )];
        let mut pipeline = recording_pipeline(&config);

        let report = pipeline.tick(ms(0), ms(1));
        assert_eq!(report.fired, 0);
    }

    #[test]
    fn test_release_resets_binding_state() {
        let mut pipeline = recording_pipeline(&Config::default());
        pipeline.input_mut().state.hat = (0, -1);
        for t in 0..400 {
            pipeline.tick(ms(t), ms(1));
        }
        pipeline.input_mut().state.hat = (0, 0);
        pipeline.tick(ms(400), ms(1));

        for (name, state) in pipeline.binding_states() {
            assert_eq!(*state, KeyRepeatState::default(), "binding {}", name);
        }
    }

    #[test]
    fn test_binding_order_follows_table() {
        let mut config = Config::default();
        config.bindings = vec![
            KeyBinding::new("second", PhysicalSource::Hat(HatDirection::Left), None, Action::Press(Key::Home)),
            KeyBinding::new("first", PhysicalSource::Hat(HatDirection::Left), None, Action::Press(Key::End)),
        ];
        let mut pipeline = recording_pipeline(&config);
        pipeline.input_mut().state.hat = (-1, 0);

        pipeline.tick(ms(0), ms(1));
        assert_eq!(
            pipeline.output().events,
            vec![Emitted::Press(Key::Home), Emitted::Press(Key::End)]
        );
    }

    // ==================== Run Loop Tests ====================

    #[tokio::test(start_paused = true)]
    async fn test_run_until_shutdown() {
        let mut pipeline = recording_pipeline(&Config::default());
        pipeline.input_mut().state.axes[0] = 1.0;

        let ticks = run(&mut pipeline, 100, tokio::time::sleep(ms(100))).await;

        assert!((10..=11).contains(&ticks), "ran {} ticks", ticks);
        assert_eq!(pipeline.input().polls as u64, ticks);
        // First tick has dt = 0, every later tick moves 10px
        let moved: i32 = pipeline
            .output()
            .events
            .iter()
            .map(|e| match e {
                Emitted::Move(dx, _) => *dx,
                _ => 0,
            })
            .sum();
        assert_eq!(moved as u64, (ticks - 1) * 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_releases_buttons_on_shutdown() {
        let mut pipeline = recording_pipeline(&Config::default());
        pipeline.tick(ms(0), ms(1));
        pipeline.input_mut().state.axes[5] = 1.0;

        run(&mut pipeline, 100, tokio::time::sleep(ms(50))).await;

        let events = &pipeline.output().events;
        assert_eq!(events.first(), Some(&Emitted::Down(MouseButton::Right)));
        assert_eq!(events.last(), Some(&Emitted::Up(MouseButton::Right)));
        assert_eq!(pipeline.mouse_buttons(), MouseButtonState::default());
    }
}
