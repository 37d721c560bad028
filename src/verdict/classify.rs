/// Verdict classification
///
/// A pure function over a run outcome: the same outcome and expected total
/// always yield the same verdict. Only [`CaseVerdict::Accepted`] passes.
use crate::exec::runner::{RunOutcome, RunStatus};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Verdict for one solver run against one fixture - closed set
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum CaseVerdict {
    /// Exit code 0 and the answer equals the expected total
    #[serde(rename = "OK")]
    Accepted,
    /// Exit code 0, integer answer, wrong value
    #[serde(rename = "WA")]
    WrongAnswer,
    /// Exit code 0 but the first non-blank line is missing or not an integer
    #[serde(rename = "NA")]
    NoAnswer,
    /// Non-zero exit or fatal signal
    #[serde(rename = "RE")]
    RuntimeError,
    /// Killed after the timeout
    #[serde(rename = "TLE")]
    TimeLimit,
    /// The command could not be started
    #[serde(rename = "SE")]
    SpawnError,
}

impl CaseVerdict {
    pub fn passed(self) -> bool {
        self == CaseVerdict::Accepted
    }

    pub fn code(self) -> &'static str {
        match self {
            CaseVerdict::Accepted => "OK",
            CaseVerdict::WrongAnswer => "WA",
            CaseVerdict::NoAnswer => "NA",
            CaseVerdict::RuntimeError => "RE",
            CaseVerdict::TimeLimit => "TLE",
            CaseVerdict::SpawnError => "SE",
        }
    }
}

impl fmt::Display for CaseVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Classify `outcome` against `expected`.
pub fn classify(outcome: &RunOutcome, expected: u64) -> CaseVerdict {
    match outcome.status {
        RunStatus::SpawnFailed => return CaseVerdict::SpawnError,
        RunStatus::TimedOut => return CaseVerdict::TimeLimit,
        RunStatus::Completed => {}
    }

    if outcome.exit_code != Some(0) {
        return CaseVerdict::RuntimeError;
    }

    match outcome.answer {
        None => CaseVerdict::NoAnswer,
        Some(answer) if u64::try_from(answer).ok() == Some(expected) => CaseVerdict::Accepted,
        Some(_) => CaseVerdict::WrongAnswer,
    }
}
