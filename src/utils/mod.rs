//! Utilities
//!
//! Cross-cutting helpers for durable file writes and bounded output collection.

pub mod fs;
pub mod output;
