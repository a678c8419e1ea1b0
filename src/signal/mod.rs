//! # Signal Processing Module
//!
//! Stateful per-input processing run once per tick:
//! - [`trend`]: rapid-trigger edge detection for analog triggers
//! - [`repeat`]: press/repeat timing for bound keys

pub mod repeat;
pub mod trend;
