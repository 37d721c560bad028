/// Structured grading events
///
/// One JSON object per event on the `wordmaze::events` log target, correlated
/// by a per-run id. Enable with `RUST_LOG=wordmaze::events=info`.
use crate::verdict::classify::CaseVerdict;
use log::info;
use serde::Serialize;
use uuid::Uuid;

pub const EVENT_TARGET: &str = "wordmaze::events";

/// Grading lifecycle events
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GradingEvent {
    RunStarted {
        command: String,
        cases: usize,
        perf_n: usize,
    },
    CaseFinished {
        case: String,
        verdict: CaseVerdict,
        expected: u64,
        got: Option<i64>,
        elapsed_ms: u64,
        points: u32,
    },
    PerfFinished {
        verdict: CaseVerdict,
        expected: u64,
        got: Option<i64>,
        elapsed_ms: u64,
        points: u32,
    },
    RunFinished {
        correctness: u32,
        perf_score: u32,
        total_score: u32,
    },
}

/// Event sink for a single grading run
#[derive(Debug, Clone)]
pub struct RunEvents {
    run_id: String,
}

impl Default for RunEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl RunEvents {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// JSON record for `event`, stamped with run id and time
    pub fn record(&self, event: &GradingEvent) -> serde_json::Value {
        let mut entry = serde_json::to_value(event).unwrap_or_else(|_| serde_json::json!({}));
        entry["run_id"] = serde_json::json!(self.run_id);
        entry["timestamp"] = serde_json::json!(chrono::Utc::now().to_rfc3339());
        entry
    }

    pub fn emit(&self, event: GradingEvent) {
        info!(target: EVENT_TARGET, "{}", self.record(&event));
    }
}
