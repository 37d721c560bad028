//! Observability
//!
//! Structured grading events on the `log` facade.

pub mod events;
