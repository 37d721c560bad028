use crate::config::presets::small_cases;
use crate::config::types::GraderConfig;
use crate::exec::command::SolverCommand;
use crate::exec::runner::SolverRunner;
use crate::fixtures::store::FixtureStore;
use crate::leaderboard::Leaderboard;
use crate::report::{render_grade_report, render_leaderboard};
use crate::verdict::scorer::Scorer;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

/// Grade a word-counting solver on correctness and speed.
///
/// The solver reads a grid (one row per line) on stdin and prints the total
/// overlap-aware match count of the target word as its first non-blank line.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Command to run the solver; split like a shell would, executed directly
    #[arg(long)]
    pub cmd: Option<String>,
    /// Name for the leaderboard
    #[arg(long, env = "USER", default_value = "anonymous")]
    pub name: String,
    /// Show the current leaderboard and exit
    #[arg(long)]
    pub list: bool,
    /// Directory holding tests/ and leaderboard.json
    #[arg(long, env = crate::config::types::ROOT_ENV_VAR)]
    pub root: Option<PathBuf>,
    /// Timeout for each correctness case, in seconds
    #[arg(long, default_value_t = 10)]
    pub case_timeout: u64,
    /// Timeout for the performance run, in seconds
    #[arg(long, default_value_t = 60)]
    pub perf_timeout: u64,
    /// Leaderboard rows printed after grading
    #[arg(long, default_value_t = 10)]
    pub top: usize,
}

impl Cli {
    pub fn config(&self) -> GraderConfig {
        let mut config = match &self.root {
            Some(root) => GraderConfig::with_root(root),
            None => GraderConfig::default(),
        };
        config.case_timeout = Duration::from_secs(self.case_timeout);
        config.perf_timeout = Duration::from_secs(self.perf_timeout);
        config
    }
}

pub fn run() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    execute(&cli, &mut stdout.lock())
}

/// Execute a parsed invocation, writing the human-readable report to `out`.
pub fn execute(cli: &Cli, out: &mut dyn Write) -> Result<()> {
    let config = cli.config();
    config.validate()?;
    log::debug!("configuration: {:?}", config);

    let board = Leaderboard::open(config.leaderboard_path());
    if cli.list {
        write!(out, "{}", render_leaderboard(&board.list(), None, true))?;
        return Ok(());
    }

    // The default solver lives under the root; operator commands run from the caller's cwd.
    let runner = SolverRunner::new(config.output_limits.clone());
    let (command, runner) = match &cli.cmd {
        Some(cmd) => (SolverCommand::parse(cmd)?, runner),
        None => (
            SolverCommand::parse(&config.default_command)?,
            runner.with_workdir(&config.root_dir),
        ),
    };

    let store = FixtureStore::new(config.tests_path());
    let cases = small_cases().context("building correctness fixtures")?;
    let suite = store
        .prepare(&cases, &config.perf)
        .with_context(|| format!("preparing fixtures in {}", store.dir().display()))?;

    let report = Scorer::from_config(&config, runner).grade(&command, &suite)?;
    write!(out, "{}", render_grade_report(&report, &cli.name))?;

    let ranked = board
        .record(report.to_entry(&cli.name, chrono::Utc::now()))
        .with_context(|| format!("updating {}", board.path().display()))?;
    writeln!(out, "\nLeaderboard (top {}):", cli.top)?;
    write!(out, "{}", render_leaderboard(&ranked, Some(cli.top), false))?;
    Ok(())
}
