//! Configuration
//!
//! Grader settings, error types, and the fixed correctness presets.

pub mod presets;
pub mod types;
