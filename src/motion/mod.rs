//! # Motion Module
//!
//! Stick-to-pointer math: the [`Vector2`](vector::Vector2) primitive and
//! the cursor/wheel response curves.

pub mod curve;
pub mod vector;
