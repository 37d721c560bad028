/// Scoring: 60 correctness points across the fixed cases, 40 performance points
///
/// Cases run strictly in sequence, then the performance fixture runs once.
/// There are no retries; one failed run is the final outcome for that stage.
use crate::config::types::{GraderConfig, Result, LEADERBOARD_SCHEMA_VERSION};
use crate::exec::command::SolverCommand;
use crate::exec::runner::{RunOutcome, SolverRunner};
use crate::fixtures::FixtureSuite;
use crate::leaderboard::LeaderboardEntry;
use crate::observability::events::{GradingEvent, RunEvents};
use crate::verdict::classify::{classify, CaseVerdict};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::time::Duration;

/// Maximum performance score
pub const PERF_POINTS: u32 = 40;

/// Inclusive upper bounds in milliseconds and the points they earn
pub const PERF_TIERS: &[(u64, u32)] = &[(50, 40), (100, 35), (250, 28), (750, 18)];

const STDERR_EXCERPT_CHARS: usize = 200;

/// Map a passing performance run's elapsed time to points.
pub fn perf_points(elapsed_ms: u64) -> u32 {
    PERF_TIERS
        .iter()
        .find(|(limit, _)| elapsed_ms <= *limit)
        .map(|&(_, points)| points)
        .unwrap_or(0)
}

/// Result of one correctness case
#[derive(Clone, Debug, Serialize)]
pub struct CaseReport {
    pub name: String,
    pub verdict: CaseVerdict,
    pub expected: u64,
    pub got: Option<i64>,
    pub elapsed_ms: u64,
    pub stderr_excerpt: String,
    pub points_awarded: u32,
    pub points_possible: u32,
}

/// Result of the performance run
#[derive(Clone, Debug, Serialize)]
pub struct PerfReport {
    pub n: usize,
    pub verdict: CaseVerdict,
    pub expected: u64,
    pub got: Option<i64>,
    pub elapsed_ms: u64,
    pub points: u32,
}

impl PerfReport {
    pub fn passed(&self) -> bool {
        self.verdict.passed()
    }
}

/// Complete grading result
#[derive(Clone, Debug, Serialize)]
pub struct GradeReport {
    pub run_id: String,
    pub command: String,
    pub cases: Vec<CaseReport>,
    pub perf: PerfReport,
    pub correctness: u32,
    pub max_correctness: u32,
    pub perf_score: u32,
    pub total_score: u32,
}

impl GradeReport {
    pub fn to_entry(&self, name: &str, timestamp: DateTime<Utc>) -> LeaderboardEntry {
        LeaderboardEntry {
            timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
            name: name.to_string(),
            cmd: self.command.clone(),
            correctness: self.correctness,
            perf_score: self.perf_score,
            perf_ms: Some(self.perf.elapsed_ms),
            total_score: self.total_score,
            version: LEADERBOARD_SCHEMA_VERSION,
        }
    }
}

/// Drives the solver over every fixture and totals the points
#[derive(Clone, Debug)]
pub struct Scorer {
    runner: SolverRunner,
    case_timeout: Duration,
    perf_timeout: Duration,
}

impl Scorer {
    pub fn new(runner: SolverRunner, case_timeout: Duration, perf_timeout: Duration) -> Self {
        Self {
            runner,
            case_timeout,
            perf_timeout,
        }
    }

    pub fn from_config(config: &GraderConfig, runner: SolverRunner) -> Self {
        Self::new(runner, config.case_timeout, config.perf_timeout)
    }

    pub fn grade(&self, command: &SolverCommand, suite: &FixtureSuite) -> Result<GradeReport> {
        let events = RunEvents::new();
        events.emit(GradingEvent::RunStarted {
            command: command.to_string(),
            cases: suite.cases.len(),
            perf_n: suite.perf.n,
        });

        let mut cases = Vec::with_capacity(suite.cases.len());
        for case in &suite.cases {
            log::info!("running case {}", case.name);
            let outcome = self.runner.run(command, &case.grid, self.case_timeout)?;
            let verdict = classify(&outcome, case.expected_total);
            let points_awarded = if verdict.passed() { case.points } else { 0 };
            log::debug!(
                "case {}: {} (got {:?}, expected {}) in {} ms",
                case.name,
                verdict,
                outcome.answer,
                case.expected_total,
                outcome.elapsed_ms()
            );
            events.emit(GradingEvent::CaseFinished {
                case: case.name.clone(),
                verdict,
                expected: case.expected_total,
                got: outcome.answer,
                elapsed_ms: outcome.elapsed_ms(),
                points: points_awarded,
            });
            cases.push(CaseReport {
                name: case.name.clone(),
                verdict,
                expected: case.expected_total,
                got: outcome.answer,
                elapsed_ms: outcome.elapsed_ms(),
                stderr_excerpt: stderr_excerpt(&outcome),
                points_awarded,
                points_possible: case.points,
            });
        }
        let correctness: u32 = cases.iter().map(|c| c.points_awarded).sum();

        log::info!("running performance fixture (n={})", suite.perf.n);
        let outcome = self
            .runner
            .run(command, &suite.perf.grid, self.perf_timeout)?;
        let verdict = classify(&outcome, suite.perf.expected_total);
        let elapsed_ms = outcome.elapsed_ms();
        let points = if verdict.passed() {
            perf_points(elapsed_ms)
        } else {
            0
        };
        events.emit(GradingEvent::PerfFinished {
            verdict,
            expected: suite.perf.expected_total,
            got: outcome.answer,
            elapsed_ms,
            points,
        });
        let perf = PerfReport {
            n: suite.perf.n,
            verdict,
            expected: suite.perf.expected_total,
            got: outcome.answer,
            elapsed_ms,
            points,
        };

        let total_score = correctness + perf.points;
        events.emit(GradingEvent::RunFinished {
            correctness,
            perf_score: perf.points,
            total_score,
        });

        Ok(GradeReport {
            run_id: events.run_id().to_string(),
            command: command.to_string(),
            cases,
            max_correctness: suite.max_correctness(),
            correctness,
            perf_score: perf.points,
            perf,
            total_score,
        })
    }
}

fn stderr_excerpt(outcome: &RunOutcome) -> String {
    outcome
        .stderr
        .trim()
        .chars()
        .take(STDERR_EXCERPT_CHARS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{PerfFixture, TestCase};
    use crate::grid::Grid;

    #[test]
    fn perf_tiers_are_inclusive() {
        assert_eq!(perf_points(0), 40);
        assert_eq!(perf_points(50), 40);
        assert_eq!(perf_points(51), 35);
        assert_eq!(perf_points(100), 35);
        assert_eq!(perf_points(101), 28);
        assert_eq!(perf_points(250), 28);
        assert_eq!(perf_points(251), 18);
        assert_eq!(perf_points(750), 18);
        assert_eq!(perf_points(751), 0);
        assert_eq!(perf_points(u64::MAX), 0);
    }

    #[test]
    fn top_tier_is_max_perf_points() {
        assert_eq!(PERF_TIERS[0].1, PERF_POINTS);
    }

    fn suite() -> FixtureSuite {
        let grid = Grid::new(["rotatorxxx"]).unwrap();
        let case = |name: &str, expected, points| TestCase {
            name: name.to_string(),
            grid: grid.clone(),
            expected_total: expected,
            points,
        };
        FixtureSuite {
            cases: vec![case("right", 2, 20), case("wrong", 3, 10)],
            perf: PerfFixture {
                grid: grid.clone(),
                expected_total: 2,
                n: 1,
            },
        }
    }

    fn sh(script: &str) -> SolverCommand {
        SolverCommand::from_argv(vec!["/bin/sh".into(), "-c".into(), script.into()]).unwrap()
    }

    fn scorer(timeout: Duration) -> Scorer {
        Scorer::new(SolverRunner::default(), timeout, timeout)
    }

    #[test]
    fn awards_points_only_for_exact_answers() {
        let report = scorer(Duration::from_secs(10))
            .grade(&sh("cat >/dev/null; echo 2"), &suite())
            .unwrap();
        assert_eq!(report.cases[0].verdict, CaseVerdict::Accepted);
        assert_eq!(report.cases[1].verdict, CaseVerdict::WrongAnswer);
        assert_eq!(report.correctness, 20);
        assert_eq!(report.max_correctness, 30);
        assert!(report.perf.passed());
        assert_eq!(report.perf_score, perf_points(report.perf.elapsed_ms));
        assert_eq!(report.total_score, report.correctness + report.perf_score);
    }

    #[test]
    fn nonzero_exit_scores_nothing() {
        let report = scorer(Duration::from_secs(10))
            .grade(&sh("cat >/dev/null; echo 2; exit 1"), &suite())
            .unwrap();
        assert!(report
            .cases
            .iter()
            .all(|c| c.verdict == CaseVerdict::RuntimeError));
        assert_eq!(report.total_score, 0);
    }

    #[test]
    fn timeout_scores_zero() {
        let timeout = Duration::from_millis(100);
        let report = scorer(timeout).grade(&sh("sleep 5"), &suite()).unwrap();
        assert_eq!(report.perf.verdict, CaseVerdict::TimeLimit);
        assert_eq!(report.perf.elapsed_ms, 100);
        assert_eq!(report.perf_score, 0);
        assert_eq!(report.correctness, 0);
        assert!(report.cases[0].stderr_excerpt.contains("TIMEOUT"));
    }

    #[test]
    fn entry_mirrors_report() {
        let report = scorer(Duration::from_secs(10))
            .grade(&sh("cat >/dev/null; echo 2"), &suite())
            .unwrap();
        let ts = DateTime::parse_from_rfc3339("2026-01-02T03:04:05Z")
            .unwrap()
            .with_timezone(&Utc);
        let entry = report.to_entry("alice", ts);
        assert_eq!(entry.name, "alice");
        assert_eq!(entry.cmd, report.command);
        assert_eq!(entry.total_score, report.total_score);
        assert_eq!(entry.perf_ms, Some(report.perf.elapsed_ms));
        assert_eq!(entry.version, 1);
        assert_eq!(entry.timestamp, "2026-01-02T03:04:05.000000Z");
    }

    #[test]
    fn stderr_excerpt_is_bounded() {
        let report = scorer(Duration::from_secs(10))
            .grade(&sh("cat >/dev/null; printf 'e%.0s' $(seq 1 500) >&2; echo 2"), &suite())
            .unwrap();
        assert_eq!(report.cases[0].stderr_excerpt.chars().count(), 200);
    }
}
