/// Deterministic performance grid generation
///
/// The grid is filled with a filler character and the word is planted at
/// fixed strides along all four axes. Plants may overwrite one another and a
/// palindromic or self-overlapping word produces incidental matches at plant
/// boundaries, so the naive plant count is only reported for diagnostics. The
/// expected total always comes from [`reference_total`].
use crate::config::types::{GraderError, Result};
use crate::fixtures::PerfFixture;
use crate::grid::reference::reference_total;
use crate::grid::Grid;
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Performance grid parameters
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PerfParams {
    /// Grid side length
    pub n: usize,
    /// Planted word
    pub word: String,
    /// Background character
    pub filler: char,
    /// Row spacing of horizontal plants and row step along diagonals
    pub row_stride: usize,
    /// Column spacing of vertical plants and column step along diagonals
    pub col_stride: usize,
    /// Spacing of diagonal start columns on the top row
    pub diag_stride: usize,
}

impl Default for PerfParams {
    fn default() -> Self {
        Self {
            n: 1200,
            word: "rotator".to_string(),
            filler: 'x',
            row_stride: 11,
            col_stride: 13,
            diag_stride: 17,
        }
    }
}

impl PerfParams {
    pub fn with_size(n: usize) -> Self {
        Self {
            n,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.n == 0 {
            return Err(GraderError::Config("performance grid size must be positive".to_string()));
        }
        if self.word.is_empty() || !self.word.is_ascii() {
            return Err(GraderError::Config(
                "performance word must be non-empty ASCII".to_string(),
            ));
        }
        if !self.filler.is_ascii() {
            return Err(GraderError::Config("filler must be an ASCII character".to_string()));
        }
        if self.row_stride == 0 || self.col_stride == 0 || self.diag_stride == 0 {
            return Err(GraderError::Config("plant strides must be positive".to_string()));
        }
        Ok(())
    }
}

/// Generated grid together with the naive plant count
#[derive(Clone, Debug)]
pub struct PlantedGrid {
    pub grid: Grid,
    /// Two readings per plant; not authoritative
    pub planted: u64,
}

struct Canvas {
    cells: Vec<Vec<u8>>,
    planted: u64,
}

impl Canvas {
    fn plant(&mut self, word: &[u8], (r, c): (usize, usize), (dr, dc): (isize, isize)) {
        for (k, &ch) in word.iter().enumerate() {
            let row = (r as isize + dr * k as isize) as usize;
            let col = (c as isize + dc * k as isize) as usize;
            self.cells[row][col] = ch;
        }
        self.planted += 2;
    }
}

/// Build the stress grid described by `params`.
pub fn generate(params: &PerfParams) -> Result<PlantedGrid> {
    params.validate()?;
    let n = params.n;
    let word = params.word.as_bytes();
    let l = word.len();
    let (rs, cs, ds) = (params.row_stride, params.col_stride, params.diag_stride);

    let mut canvas = Canvas {
        cells: vec![vec![params.filler as u8; n]; n],
        planted: 0,
    };

    if l <= n {
        // Horizontal, left to right.
        for r in (0..n).step_by(rs) {
            for c in (0..=n - l).step_by(cs) {
                canvas.plant(word, (r, c), (0, 1));
            }
        }

        // Vertical, top to bottom.
        for c in (0..n).step_by(cs) {
            for r in (0..=n - l).step_by(rs) {
                canvas.plant(word, (r, c), (1, 0));
            }
        }

        // Down-right chains starting on the top row.
        for c0 in (0..=n - l).step_by(ds) {
            let (mut r, mut c) = (0, c0);
            while r + l <= n && c + l <= n {
                canvas.plant(word, (r, c), (1, 1));
                r += rs;
                c += cs;
            }
        }

        // Down-left chains starting on the top row.
        for c0 in (l - 1..n).step_by(ds) {
            let (mut r, mut c) = (0, c0);
            while r + l <= n && c + 1 >= l {
                canvas.plant(word, (r, c), (1, -1));
                r += rs;
                match c.checked_sub(cs) {
                    Some(next) => c = next,
                    None => break,
                }
            }
        }
    }

    debug!("planted {} readings in {}x{} grid", canvas.planted, n, n);
    Ok(PlantedGrid {
        grid: Grid::from_byte_rows(canvas.cells)?,
        planted: canvas.planted,
    })
}

/// Generate the grid and reconcile its expected total by a full scan.
pub fn build_perf_fixture(params: &PerfParams) -> Result<PerfFixture> {
    let planted = generate(params)?;
    let expected_total = reference_total(&planted.grid, &params.word);
    info!(
        "performance grid n={} planted={} expected_total={}",
        params.n, planted.planted, expected_total
    );
    Ok(PerfFixture {
        grid: planted.grid,
        expected_total,
        n: params.n,
    })
}
