/// Core types and configuration for the wordmaze grader
use crate::config::presets::CASE_PRESETS;
use crate::fixtures::perf::PerfParams;
use crate::grid::reference::reference_total;
use crate::utils::output::OutputLimits;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Environment variable that relocates the grader root directory
pub const ROOT_ENV_VAR: &str = "WORDMAZE_ROOT";

/// Leaderboard schema version written into every entry
pub const LEADERBOARD_SCHEMA_VERSION: u32 = 1;

/// Grader configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraderConfig {
    /// Root directory holding fixtures and the leaderboard
    pub root_dir: PathBuf,
    /// Directory for persisted fixtures (relative paths resolve against root)
    pub tests_dir: PathBuf,
    /// Leaderboard document (relative paths resolve against root)
    pub leaderboard_file: PathBuf,
    /// Target word counted by solvers; the fixed cases are checked against it
    pub word: String,
    /// Timeout for each correctness case
    pub case_timeout: Duration,
    /// Timeout for the performance run
    pub perf_timeout: Duration,
    /// Performance grid generation parameters
    pub perf: PerfParams,
    /// Command graded when no `--cmd` is given
    pub default_command: String,
    /// Output collection limits for solver processes
    #[serde(skip)]
    pub output_limits: OutputLimits,
}

impl GraderConfig {
    /// Root directory from `WORDMAZE_ROOT`, falling back to the current directory.
    pub fn default_root_dir() -> PathBuf {
        std::env::var_os(ROOT_ENV_VAR)
            .map(PathBuf::from)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Build a configuration rooted at `root`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root.into(),
            ..Self::default()
        }
    }

    pub fn tests_path(&self) -> PathBuf {
        self.root_dir.join(&self.tests_dir)
    }

    pub fn leaderboard_path(&self) -> PathBuf {
        self.root_dir.join(&self.leaderboard_file)
    }

    /// Validate settings that would otherwise surface as confusing runtime failures.
    pub fn validate(&self) -> Result<()> {
        if self.word.is_empty() {
            return Err(GraderError::Config("target word must not be empty".to_string()));
        }
        if self.case_timeout.is_zero() || self.perf_timeout.is_zero() {
            return Err(GraderError::Config("timeouts must be positive".to_string()));
        }
        if self.perf.word != self.word {
            return Err(GraderError::Config(format!(
                "performance word '{}' differs from target word '{}'",
                self.perf.word, self.word
            )));
        }
        for preset in CASE_PRESETS {
            let case = preset.to_test_case()?;
            let total = reference_total(&case.grid, &self.word);
            if total != case.expected_total {
                return Err(GraderError::Config(format!(
                    "case '{}' expects {} but '{}' occurs {} times in its grid",
                    case.name, case.expected_total, self.word, total
                )));
            }
        }
        self.perf.validate()
    }
}

impl Default for GraderConfig {
    fn default() -> Self {
        Self {
            root_dir: Self::default_root_dir(),
            tests_dir: PathBuf::from("tests"),
            leaderboard_file: PathBuf::from("leaderboard.json"),
            word: "rotator".to_string(),
            case_timeout: Duration::from_secs(10),
            perf_timeout: Duration::from_secs(60),
            perf: PerfParams::default(),
            default_command: "python3 private_solutions/rotator_finder.py".to_string(),
            output_limits: OutputLimits::default(),
        }
    }
}

/// Output integrity classification
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum OutputIntegrity {
    #[default]
    #[serde(rename = "complete")]
    Complete,
    #[serde(rename = "truncated_by_judge_limit")]
    TruncatedByJudgeLimit,
    #[serde(rename = "read_error")]
    ReadError,
}

impl std::fmt::Display for OutputIntegrity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputIntegrity::Complete => write!(f, "complete"),
            OutputIntegrity::TruncatedByJudgeLimit => write!(f, "truncated_by_judge_limit"),
            OutputIntegrity::ReadError => write!(f, "read_error"),
        }
    }
}

/// Custom error types for the grader
#[derive(Error, Debug)]
pub enum GraderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed grid: {0}")]
    MalformedGrid(String),

    #[error("Fixture error: {0}")]
    Fixture(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Process error: {0}")]
    Process(String),

    #[error("Lock error: {0}")]
    Lock(String),
}

pub type Result<T> = std::result::Result<T, GraderError>;
