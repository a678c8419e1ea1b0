//! # Error Types
//!
//! Custom error types for Padmouse using `thiserror`.

use thiserror::Error;

/// Main error type for Padmouse
#[derive(Debug, Error)]
pub enum PadMouseError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Controller device errors
    #[error("Controller error: {0}")]
    Controller(String),

    /// No usable gamepad was found under /dev/input
    #[error("No gamepad found")]
    ControllerNotFound,

    /// Virtual keyboard/mouse errors
    #[error("Output device error: {0}")]
    Output(String),

    /// Scalar division by zero in vector math
    #[error("Division by zero")]
    DivisionByZero,
}

/// Result type alias for Padmouse
pub type Result<T> = std::result::Result<T, PadMouseError>;
