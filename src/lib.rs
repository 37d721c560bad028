//! wordmaze: grading harness for word-maze solvers
//! Runs an external solver against fixed grids and a large performance grid,
//! scores it, and keeps a persistent leaderboard.
//!
//! # Architecture
//!
//! ## Grid Model ([`grid`])
//! - [`grid`]: Rectangular ASCII grid parsing and solver input format
//! - [`grid::lines`]: Row, column and diagonal line enumeration
//! - [`grid::overlap`]: Overlap-aware occurrence counting
//! - [`grid::reference`]: Reference total used as ground truth
//!
//! ## Fixtures ([`fixtures`])
//! - [`fixtures::perf`]: Deterministic performance grid generation
//! - [`fixtures::store`]: On-disk fixture files (created once, reused)
//!
//! ## Execution ([`exec`])
//! - [`exec::command`]: Solver command parsing
//! - [`exec::runner`]: Spawning, stdin feeding, wall-clock timeout and kill
//!
//! ## Verdict & Scoring ([`verdict`])
//! - [`verdict::classify`]: Per-run verdict classification
//! - [`verdict::scorer`]: Correctness and performance points
//!
//! ## Persistence ([`leaderboard`], [`safety`])
//! - [`leaderboard`]: Ranked JSON leaderboard with corrupt-file recovery
//! - [`safety::lock`]: Advisory lock around leaderboard read-modify-write
//!
//! ## Observability ([`observability`])
//! - [`observability::events`]: Structured grading events
//!
//! ## Configuration ([`config`])
//! - [`config::types`]: Grader configuration and error types
//! - [`config::presets`]: Fixed correctness cases
//!
//! ## Utilities ([`utils`])
//! - [`utils::output`]: Bounded output collection
//! - [`utils::fs`]: Atomic file replacement
//!
//! # Principles
//!
//! 1. **Ground truth is computed** - Expected totals come from the reference counter, never from planting
//! 2. **Fixtures are stable** - Existing fixture files are never regenerated
//! 3. **No shell** - Solver commands are split into argv and executed directly
//! 4. **Bounded waits** - Every solver run ends by its timeout, and the whole process group is killed

// Grid Model
pub mod grid;

// Fixtures
pub mod fixtures;

// Execution
pub mod exec;

// Verdict & Scoring
pub mod verdict;

// Persistence
pub mod leaderboard;
pub mod safety;

// Observability
pub mod observability;

// Configuration
pub mod config;

// Utilities
pub mod utils;

// Report rendering
pub mod report;

// CLI entrypoint
pub mod cli;

pub use config::types::{GraderConfig, GraderError, Result};
pub use grid::reference::reference_total;
pub use grid::Grid;
