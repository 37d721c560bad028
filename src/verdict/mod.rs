//! Verdicts and scoring
//!
//! Verdicts are pure functions of a run outcome and the expected total;
//! the scorer turns them into points.

pub mod classify;
pub mod scorer;
