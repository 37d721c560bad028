/// Idempotent fixture materialization and loading
///
/// Files are only ever created, never overwritten: once a fixture exists on
/// disk it is the grading contract for every later run.
use crate::config::types::{GraderError, Result};
use crate::fixtures::perf::{build_perf_fixture, PerfParams};
use crate::fixtures::{FixtureSuite, PerfFixture, PerfMeta, TestCase};
use crate::grid::Grid;
use crate::utils::fs::atomic_write;
use log::{debug, info};
use std::fs;
use std::path::{Path, PathBuf};

const PERF_INPUT: &str = "perf_fixed.in";
const PERF_META: &str = "perf_fixed.meta.json";

/// Fixture directory handle
#[derive(Clone, Debug)]
pub struct FixtureStore {
    dir: PathBuf,
}

impl FixtureStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn case_input_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.in"))
    }

    pub fn case_output_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.out"))
    }

    pub fn perf_input_path(&self) -> PathBuf {
        self.dir.join(PERF_INPUT)
    }

    pub fn perf_meta_path(&self) -> PathBuf {
        self.dir.join(PERF_META)
    }

    /// Create any missing fixture files. Returns the paths written.
    pub fn ensure(&self, cases: &[TestCase], perf: &PerfParams) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir)?;
        let mut written = Vec::new();

        for case in cases {
            let input = self.case_input_path(&case.name);
            if write_if_missing(&input, case.grid.to_solver_input().as_bytes())? {
                written.push(input);
            }
            let output = self.case_output_path(&case.name);
            if write_if_missing(&output, format!("{}\n", case.expected_total).as_bytes())? {
                written.push(output);
            }
        }

        let perf_input = self.perf_input_path();
        let perf_meta = self.perf_meta_path();
        if !perf_input.exists() || !perf_meta.exists() {
            info!("generating performance fixture (n={})", perf.n);
            let fixture = build_perf_fixture(perf)?;
            atomic_write(&perf_input, fixture.grid.to_solver_input().as_bytes())?;
            let meta = serde_json::to_string_pretty(&PerfMeta::from(&fixture))?;
            atomic_write(&perf_meta, meta.as_bytes())?;
            written.push(perf_input);
            written.push(perf_meta);
        }

        if written.is_empty() {
            debug!("fixtures already present in {}", self.dir.display());
        } else {
            info!("wrote {} fixture files to {}", written.len(), self.dir.display());
        }
        Ok(written)
    }

    /// Load the persisted copy of `case`. Name and points come from the preset.
    pub fn load_case(&self, case: &TestCase) -> Result<TestCase> {
        let input = read_fixture(&self.case_input_path(&case.name))?;
        let output = read_fixture(&self.case_output_path(&case.name))?;
        let expected_total = output.trim().parse::<u64>().map_err(|e| {
            GraderError::Fixture(format!("{}.out is not a count: {}", case.name, e))
        })?;
        Ok(TestCase {
            name: case.name.clone(),
            grid: Grid::parse(&input)?,
            expected_total,
            points: case.points,
        })
    }

    pub fn load_perf(&self) -> Result<PerfFixture> {
        let meta_path = self.perf_meta_path();
        let meta: PerfMeta = serde_json::from_str(&read_fixture(&meta_path)?).map_err(|e| {
            GraderError::Fixture(format!("{} is invalid: {}", meta_path.display(), e))
        })?;
        let grid = Grid::parse(&read_fixture(&self.perf_input_path())?)?;
        if grid.height() != meta.n || grid.width() != meta.n {
            return Err(GraderError::Fixture(format!(
                "performance grid is {}x{}, metadata says N={}",
                grid.height(),
                grid.width(),
                meta.n
            )));
        }
        Ok(PerfFixture {
            grid,
            expected_total: meta.expected_total,
            n: meta.n,
        })
    }

    /// Ensure then load every fixture.
    pub fn prepare(&self, cases: &[TestCase], perf: &PerfParams) -> Result<FixtureSuite> {
        self.ensure(cases, perf)?;
        let cases = cases
            .iter()
            .map(|case| self.load_case(case))
            .collect::<Result<Vec<_>>>()?;
        Ok(FixtureSuite {
            cases,
            perf: self.load_perf()?,
        })
    }
}

fn write_if_missing(path: &Path, content: &[u8]) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    atomic_write(path, content)?;
    Ok(true)
}

fn read_fixture(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| GraderError::Fixture(format!("cannot read {}: {}", path.display(), e)))
}
