//! # Padmouse Library
//!
//! Use a gamepad as a mouse and keyboard.
//!
//! This library provides the pieces of the gamepad-to-desktop bridge: input
//! from an evdev gamepad, the rapid-trigger and key-repeat signal logic, the
//! cursor motion curve, and keyboard/mouse output through uinput.

pub mod bindings;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod motion;
pub mod output;
pub mod signal;
