//! Grading fixtures
//!
//! Small correctness cases and the single large performance grid, persisted
//! once so that every grading run is compared against the same inputs.

pub mod perf;
pub mod store;

use crate::grid::Grid;
use serde::{Deserialize, Serialize};

/// A fixed correctness case
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestCase {
    pub name: String,
    pub grid: Grid,
    pub expected_total: u64,
    pub points: u32,
}

/// The large performance grid and its reconciled answer
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PerfFixture {
    pub grid: Grid,
    pub expected_total: u64,
    pub n: usize,
}

/// Persisted metadata for the performance grid
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PerfMeta {
    pub expected_total: u64,
    #[serde(rename = "N")]
    pub n: usize,
}

impl From<&PerfFixture> for PerfMeta {
    fn from(fixture: &PerfFixture) -> Self {
        Self {
            expected_total: fixture.expected_total,
            n: fixture.n,
        }
    }
}

/// Everything a grading run needs, loaded from stable storage
#[derive(Clone, Debug)]
pub struct FixtureSuite {
    pub cases: Vec<TestCase>,
    pub perf: PerfFixture,
}

impl FixtureSuite {
    pub fn max_correctness(&self) -> u32 {
        self.cases.iter().map(|c| c.points).sum()
    }
}
