//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every section and every field is optional; missing values fall back to
//! the defaults below, and a missing `[[bindings]]` list uses the built-in
//! binding table.

use serde::de::Error;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::bindings::{default_bindings, de_seconds, Action, KeyBinding, PhysicalSource};
use crate::error::{PadMouseError, Result};

/// Highest axis/button index (exclusive) accepted in a config file.
pub const MAX_INPUT_INDEX: usize = 64;

/// Highest supported tick rate in Hz.
pub const MAX_TICK_RATE_HZ: u32 = 10_000;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub controller: ControllerConfig,

    #[serde(default)]
    pub axes: AxesConfig,

    #[serde(default)]
    pub motion: MotionConfig,

    #[serde(default)]
    pub scroll: ScrollConfig,

    #[serde(default)]
    pub triggers: TriggerConfig,

    #[serde(default)]
    pub repeat: RepeatConfig,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default = "default_bindings")]
    pub bindings: Vec<KeyBinding>,
}

/// Controller configuration
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct ControllerConfig {
    /// `/dev/input/eventN` to open; empty picks the first gamepad.
    #[serde(default)]
    pub device_path: String,
}

impl ControllerConfig {
    /// Configured device path, or `None` for auto-detection.
    #[must_use]
    pub fn device_path(&self) -> Option<&str> {
        if self.device_path.is_empty() {
            None
        } else {
            Some(&self.device_path)
        }
    }
}

/// Which axis index drives which function
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AxesConfig {
    #[serde(default = "default_move_x_axis")]
    pub move_x: usize,

    #[serde(default = "default_move_y_axis")]
    pub move_y: usize,

    #[serde(default = "default_scroll_axis")]
    pub scroll: usize,

    #[serde(default = "default_left_trigger_axis")]
    pub left_trigger: usize,

    #[serde(default = "default_right_trigger_axis")]
    pub right_trigger: usize,
}

impl AxesConfig {
    /// Number of axes the pipeline needs to read each tick.
    #[must_use]
    pub fn count(&self) -> usize {
        [
            self.move_x,
            self.move_y,
            self.scroll,
            self.left_trigger,
            self.right_trigger,
        ]
        .into_iter()
        .max()
        .map_or(0, |max| max + 1)
    }
}

/// Cursor motion curve
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MotionConfig {
    /// Pixels per second at full deflection.
    #[serde(default = "default_sensitivity")]
    pub sensitivity: f64,

    #[serde(default = "default_deadzone")]
    pub deadzone: f64,

    #[serde(default = "default_exponent")]
    pub exponent: f64,

    /// Share of the linear term, 0.0 (pure curve) to 1.0 (pure linear).
    #[serde(default = "default_linear_mix")]
    pub linear_mix: f64,
}

/// Scroll wheel
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScrollConfig {
    /// Wheel units (120 per notch) per second at full deflection.
    #[serde(default = "default_scroll_sensitivity")]
    pub sensitivity: f64,
}

/// Rapid-trigger sensitivity
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TriggerConfig {
    #[serde(default = "default_trigger_movement")]
    pub left_movement: f64,

    #[serde(default = "default_trigger_movement")]
    pub right_movement: f64,
}

/// Key repeat
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct RepeatConfig {
    /// Seconds a binding must be held before it starts repeating.
    #[serde(default = "default_repeat_delay", deserialize_with = "de_seconds")]
    pub delay: Duration,
}

/// Tick loop
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EngineConfig {
    #[serde(default = "default_tick_rate_hz")]
    pub tick_rate_hz: u32,
}

/// Logging
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Filter directive, e.g. `"info"` or `"padmouse=debug"`.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Directory for daily log files; empty logs to stderr only.
    #[serde(default)]
    pub directory: String,
}

// Default value functions
fn default_move_x_axis() -> usize { 0 }
fn default_move_y_axis() -> usize { 1 }
fn default_scroll_axis() -> usize { 3 }
fn default_left_trigger_axis() -> usize { 4 }
fn default_right_trigger_axis() -> usize { 5 }

fn default_sensitivity() -> f64 { 1000.0 }
fn default_deadzone() -> f64 { 0.05 }
fn default_exponent() -> f64 { 2.5 }
fn default_linear_mix() -> f64 { 0.2 }

fn default_scroll_sensitivity() -> f64 { 5000.0 }

fn default_trigger_movement() -> f64 { 0.1 }

fn default_repeat_delay() -> Duration { Duration::from_millis(300) }

fn default_tick_rate_hz() -> u32 { 1000 }

fn default_log_level() -> String { "info".to_string() }

impl Default for Config {
    fn default() -> Self {
        Self {
            controller: ControllerConfig::default(),
            axes: AxesConfig::default(),
            motion: MotionConfig::default(),
            scroll: ScrollConfig::default(),
            triggers: TriggerConfig::default(),
            repeat: RepeatConfig::default(),
            engine: EngineConfig::default(),
            logging: LoggingConfig::default(),
            bindings: default_bindings(),
        }
    }
}

impl Default for AxesConfig {
    fn default() -> Self {
        Self {
            move_x: default_move_x_axis(),
            move_y: default_move_y_axis(),
            scroll: default_scroll_axis(),
            left_trigger: default_left_trigger_axis(),
            right_trigger: default_right_trigger_axis(),
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            sensitivity: default_sensitivity(),
            deadzone: default_deadzone(),
            exponent: default_exponent(),
            linear_mix: default_linear_mix(),
        }
    }
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            sensitivity: default_scroll_sensitivity(),
        }
    }
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            left_movement: default_trigger_movement(),
            right_movement: default_trigger_movement(),
        }
    }
}

impl Default for RepeatConfig {
    fn default() -> Self {
        Self {
            delay: default_repeat_delay(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: default_tick_rate_hz(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: String::new(),
        }
    }
}

fn invalid(message: impl std::fmt::Display) -> PadMouseError {
    PadMouseError::Config(toml::de::Error::custom(message))
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use padmouse::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from TOML text
    ///
    /// # Examples
    ///
    /// ```
    /// use padmouse::config::Config;
    ///
    /// let config = Config::from_toml_str("[motion]\nsensitivity = 1500.0\n")?;
    /// assert_eq!(config.motion.sensitivity, 1500.0);
    /// assert_eq!(config.motion.exponent, 2.5);
    /// assert_eq!(config.bindings.len(), 10);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns `Config` for the first value that is out of range.
    pub fn validate(&self) -> Result<()> {
        // Axes
        for (name, index) in [
            ("move_x", self.axes.move_x),
            ("move_y", self.axes.move_y),
            ("scroll", self.axes.scroll),
            ("left_trigger", self.axes.left_trigger),
            ("right_trigger", self.axes.right_trigger),
        ] {
            if index >= MAX_INPUT_INDEX {
                return Err(invalid(format!(
                    "axes.{} index {} is out of bounds (must be 0-{})",
                    name,
                    index,
                    MAX_INPUT_INDEX - 1
                )));
            }
        }

        // Motion curve
        if !self.motion.sensitivity.is_finite() || self.motion.sensitivity <= 0.0 {
            return Err(invalid("motion.sensitivity must be greater than 0"));
        }

        if !(0.0..1.0).contains(&self.motion.deadzone) {
            return Err(invalid("motion.deadzone must be between 0.0 and 1.0 (exclusive)"));
        }

        if !self.motion.exponent.is_finite() || self.motion.exponent <= 0.0 {
            return Err(invalid("motion.exponent must be greater than 0"));
        }

        if !(0.0..=1.0).contains(&self.motion.linear_mix) {
            return Err(invalid("motion.linear_mix must be between 0.0 and 1.0"));
        }

        if !self.scroll.sensitivity.is_finite() || self.scroll.sensitivity < 0.0 {
            return Err(invalid("scroll.sensitivity must not be negative"));
        }

        // Rapid trigger
        for (name, value) in [
            ("left_movement", self.triggers.left_movement),
            ("right_movement", self.triggers.right_movement),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(format!("triggers.{} must not be negative", name)));
            }
        }

        // Tick loop
        if self.engine.tick_rate_hz == 0 || self.engine.tick_rate_hz > MAX_TICK_RATE_HZ {
            return Err(invalid(format!(
                "engine.tick_rate_hz must be between 1 and {}",
                MAX_TICK_RATE_HZ
            )));
        }

        // Logging
        if let Err(e) = tracing_subscriber::EnvFilter::try_new(&self.logging.level) {
            return Err(invalid(format!(
                "logging.level '{}' is not a valid filter: {}",
                self.logging.level, e
            )));
        }

        self.validate_bindings()
    }

    fn validate_bindings(&self) -> Result<()> {
        let mut names = HashSet::new();

        for binding in &self.bindings {
            if binding.name.is_empty() {
                return Err(invalid("binding name cannot be empty"));
            }

            if !names.insert(binding.name.as_str()) {
                return Err(invalid(format!("duplicate binding name '{}'", binding.name)));
            }

            match binding.source {
                PhysicalSource::Button(index) if index >= MAX_INPUT_INDEX => {
                    return Err(invalid(format!(
                        "binding '{}': button index {} is out of bounds (must be 0-{})",
                        binding.name,
                        index,
                        MAX_INPUT_INDEX - 1
                    )));
                }
                PhysicalSource::Stick(stick) => {
                    if stick.x_axis.max(stick.y_axis) >= MAX_INPUT_INDEX {
                        return Err(invalid(format!(
                            "binding '{}': stick axis index is out of bounds (must be 0-{})",
                            binding.name,
                            MAX_INPUT_INDEX - 1
                        )));
                    }
                    if !(0.0..1.0).contains(&stick.threshold) {
                        return Err(invalid(format!(
                            "binding '{}': stick threshold must be between 0.0 and 1.0 (exclusive)",
                            binding.name
                        )));
                    }
                }
                _ => {}
            }

            if let Action::Hold { duration, .. } = binding.action {
                if duration.is_zero() {
                    return Err(invalid(format!(
                        "binding '{}': hold duration must be greater than 0",
                        binding.name
                    )));
                }
            }
        }

        Ok(())
    }

    /// Number of axes the pipeline reads each tick, including any read by
    /// stick bindings.
    #[must_use]
    pub fn axis_count(&self) -> usize {
        self.bindings
            .iter()
            .filter_map(|binding| binding.source.max_axis())
            .map(|max| max + 1)
            .fold(self.axes.count(), usize::max)
    }
}
