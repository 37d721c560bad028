/// Solver process execution with wall-clock timeout
use crate::config::types::{GraderError, OutputIntegrity, Result};
use crate::exec::command::SolverCommand;
use crate::grid::Grid;
use crate::utils::output::{OutputCollector, OutputLimits};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

/// How a solver invocation ended
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq)]
pub enum RunStatus {
    /// Process exited on its own (any exit code)
    #[serde(rename = "completed")]
    Completed,
    /// Killed by the grader after the timeout elapsed
    #[serde(rename = "timeout")]
    TimedOut,
    /// The process could not be started
    #[serde(rename = "spawn_failed")]
    SpawnFailed,
}

/// Result of one solver invocation
#[derive(Clone, Debug)]
pub struct RunOutcome {
    pub status: RunStatus,
    pub exit_code: Option<i32>,
    pub signal: Option<i32>,
    /// First non-blank stdout line parsed as an integer
    pub answer: Option<i64>,
    /// Wall-clock time; equals the timeout for [`RunStatus::TimedOut`]
    pub elapsed: Duration,
    pub stdout: String,
    pub stderr: String,
    pub output_integrity: OutputIntegrity,
}

impl RunOutcome {
    fn spawn_failed(message: String, elapsed: Duration) -> Self {
        Self {
            status: RunStatus::SpawnFailed,
            exit_code: None,
            signal: None,
            answer: None,
            elapsed,
            stdout: String::new(),
            stderr: message,
            output_integrity: OutputIntegrity::Complete,
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }

    /// Completed with exit code 0
    pub fn exited_cleanly(&self) -> bool {
        self.status == RunStatus::Completed && self.exit_code == Some(0)
    }
}

/// Parse the solver's answer: the first non-blank line, as an integer.
/// Any other content on that line makes the answer absent.
pub fn parse_answer(stdout: &str) -> Option<i64> {
    stdout
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .and_then(|line| line.parse::<i64>().ok())
}

/// Executes solver commands against grids
#[derive(Clone, Debug)]
pub struct SolverRunner {
    limits: OutputLimits,
    workdir: Option<PathBuf>,
    poll_interval: Duration,
}

impl Default for SolverRunner {
    fn default() -> Self {
        Self::new(OutputLimits::default())
    }
}

impl SolverRunner {
    pub fn new(limits: OutputLimits) -> Self {
        Self {
            limits,
            workdir: None,
            // Fine-grained polling keeps measured time close to the real exit.
            poll_interval: Duration::from_millis(1),
        }
    }

    /// Run solvers from `dir` instead of the grader's working directory.
    pub fn with_workdir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    /// Feed `grid` to `command` and wait at most `timeout` for it to exit.
    pub fn run(&self, command: &SolverCommand, grid: &Grid, timeout: Duration) -> Result<RunOutcome> {
        self.run_input(command, grid.to_solver_input(), timeout)
    }

    pub fn run_input(
        &self,
        command: &SolverCommand,
        input: String,
        timeout: Duration,
    ) -> Result<RunOutcome> {
        let mut cmd = Command::new(command.program());
        cmd.args(command.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.workdir {
            cmd.current_dir(dir);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // Own process group so a timeout kill reaches helper processes too.
            cmd.process_group(0);
        }

        let started = Instant::now();
        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                log::warn!("failed to spawn '{}': {}", command, e);
                return Ok(RunOutcome::spawn_failed(
                    format!("failed to spawn '{}': {}", command.program(), e),
                    started.elapsed(),
                ));
            }
        };
        log::debug!("spawned '{}' as pid {}", command, child.id());

        let pending = OutputCollector::new(self.limits.clone())
            .start(child.stdout.take(), child.stderr.take());

        // The writer is detached: a solver that exits without reading its
        // input makes write_all fail with EPIPE, which is not an error here.
        if let Some(mut stdin) = child.stdin.take() {
            thread::spawn(move || {
                let _ = stdin.write_all(input.as_bytes());
            });
        }

        let pgid = child.id();
        let mut timed_out = false;
        let exit_status = loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    // Background helpers left in the group would hold the pipes open.
                    kill_group(pgid);
                    break Some(status);
                }
                Ok(None) => {
                    if started.elapsed() >= timeout {
                        timed_out = true;
                        terminate(&mut child);
                        break None;
                    }
                    thread::sleep(self.poll_interval);
                }
                Err(e) => {
                    terminate(&mut child);
                    return Err(GraderError::Process(format!("wait({}): {}", command, e)));
                }
            }
        };
        let measured = started.elapsed();
        let output = pending.finish();

        if timed_out {
            log::info!("'{}' timed out after {:?}", command, timeout);
            let mut stderr = output.stderr_lossy();
            if !stderr.is_empty() {
                stderr.push('\n');
            }
            stderr.push_str(&format!("TIMEOUT after {:?}", timeout));
            return Ok(RunOutcome {
                status: RunStatus::TimedOut,
                exit_code: None,
                signal: None,
                answer: None,
                elapsed: timeout,
                stdout: output.stdout_lossy(),
                stderr,
                output_integrity: output.combined_integrity(),
            });
        }

        let (exit_code, signal) = match exit_status {
            Some(status) => (status.code(), exit_signal(&status)),
            None => (None, None),
        };
        let stdout = output.stdout_lossy();
        Ok(RunOutcome {
            status: RunStatus::Completed,
            exit_code,
            signal,
            answer: parse_answer(&stdout),
            elapsed: measured,
            stdout,
            stderr: output.stderr_lossy(),
            output_integrity: output.combined_integrity(),
        })
    }
}

#[cfg(unix)]
fn exit_signal(status: &std::process::ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: &std::process::ExitStatus) -> Option<i32> {
    None
}

/// SIGKILL every process left in the solver's group.
#[cfg(unix)]
fn kill_group(pgid: u32) {
    let pgid = pgid as libc::pid_t;
    // SAFETY: plain kill(2) on the group we created at spawn time.
    let rc = unsafe { libc::kill(-pgid, libc::SIGKILL) };
    if rc != 0 {
        let err = std::io::Error::last_os_error();
        // ESRCH: the group is already empty.
        if err.raw_os_error() != Some(libc::ESRCH) {
            log::debug!("killpg({}) failed: {}", pgid, err);
        }
    }
}

#[cfg(not(unix))]
fn kill_group(_pgid: u32) {}

/// Kill the solver and its whole process group, then reap it.
fn terminate(child: &mut Child) {
    kill_group(child.id());
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> SolverCommand {
        SolverCommand::from_argv(vec!["/bin/sh".into(), "-c".into(), script.into()]).unwrap()
    }

    fn grid() -> Grid {
        Grid::new(["rotatorxxx", "xxxxxxxxxx"]).unwrap()
    }

    #[test]
    fn parse_answer_takes_first_non_blank_line() {
        assert_eq!(parse_answer("\n  \n 42 \nignored\n"), Some(42));
        assert_eq!(parse_answer("-3\n"), Some(-3));
        assert_eq!(parse_answer("forty-two\n8\n"), None);
        assert_eq!(parse_answer("42 matches\n"), None);
        assert_eq!(parse_answer(""), None);
        assert_eq!(parse_answer("\n\n"), None);
    }

    #[test]
    fn captures_answer_and_exit_code() {
        let runner = SolverRunner::default();
        let outcome = runner
            .run(&sh("cat > /dev/null; echo 2; echo extra"), &grid(), Duration::from_secs(10))
            .unwrap();
        assert_eq!(outcome.status, RunStatus::Completed);
        assert!(outcome.exited_cleanly());
        assert_eq!(outcome.answer, Some(2));
    }

    #[test]
    fn solver_receives_grid_on_stdin() {
        let runner = SolverRunner::default();
        let outcome = runner
            .run(&sh("wc -l"), &grid(), Duration::from_secs(10))
            .unwrap();
        assert_eq!(outcome.answer, Some(2));
    }

    #[test]
    fn nonzero_exit_is_reported_not_raised() {
        let runner = SolverRunner::default();
        let outcome = runner
            .run(&sh("echo 2; echo boom >&2; exit 3"), &grid(), Duration::from_secs(10))
            .unwrap();
        assert_eq!(outcome.exit_code, Some(3));
        assert!(!outcome.exited_cleanly());
        assert!(outcome.stderr.contains("boom"));
    }

    #[test]
    fn timeout_kills_and_reports_configured_duration() {
        let runner = SolverRunner::default();
        let timeout = Duration::from_millis(200);
        let started = Instant::now();
        let outcome = runner.run(&sh("sleep 5; echo 2"), &grid(), timeout).unwrap();
        assert_eq!(outcome.status, RunStatus::TimedOut);
        assert_eq!(outcome.elapsed, timeout);
        assert_eq!(outcome.answer, None);
        assert!(outcome.stderr.contains("TIMEOUT"));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[test]
    fn background_child_does_not_hide_answer() {
        let runner = SolverRunner::default();
        let started = Instant::now();
        let outcome = runner
            .run(&sh("cat >/dev/null; echo 2; sleep 4 &"), &grid(), Duration::from_secs(10))
            .unwrap();
        assert_eq!(outcome.status, RunStatus::Completed);
        assert_eq!(outcome.exit_code, Some(0));
        assert_eq!(outcome.answer, Some(2));
        assert_eq!(outcome.output_integrity, OutputIntegrity::Complete);
        assert!(started.elapsed() < Duration::from_millis(1500));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn background_child_is_killed_after_exit() {
        let dir = tempfile::tempdir().unwrap();
        let pid_file = dir.path().join("bg.pid");
        let script = format!(
            "cat >/dev/null; sleep 30 >/dev/null 2>&1 & echo $! > '{}'; echo 2",
            pid_file.display()
        );
        let outcome = SolverRunner::default()
            .run(&sh(&script), &grid(), Duration::from_secs(10))
            .unwrap();
        assert_eq!(outcome.answer, Some(2));

        let pid = std::fs::read_to_string(&pid_file).unwrap().trim().to_string();
        let stat = std::path::Path::new("/proc").join(&pid).join("stat");
        let deadline = Instant::now() + Duration::from_secs(2);
        // Gone, or a zombie waiting for its new parent to reap it.
        let dead = || match std::fs::read_to_string(&stat) {
            Ok(s) => s.rsplit(')').next().map_or(false, |rest| rest.trim_start().starts_with('Z')),
            Err(_) => true,
        };
        while !dead() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(20));
        }
        assert!(dead(), "background process {pid} survived the run");
    }

    #[test]
    fn missing_program_is_spawn_failure() {
        let runner = SolverRunner::default();
        let cmd = SolverCommand::parse("/nonexistent/wordmaze-solver").unwrap();
        let outcome = runner.run(&cmd, &grid(), Duration::from_secs(1)).unwrap();
        assert_eq!(outcome.status, RunStatus::SpawnFailed);
        assert!(!outcome.exited_cleanly());
        assert!(outcome.stderr.contains("failed to spawn"));
    }
}
