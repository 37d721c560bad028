//! Solver execution
//!
//! Command-line parsing and the stdin/stdout process protocol.

pub mod command;
pub mod runner;
