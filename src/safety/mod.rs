//! Safety
//!
//! Cross-process serialization of shared state files.

pub mod lock;
