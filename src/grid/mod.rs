//! Character grids and overlap-aware word counting
//!
//! - [`lines`]: decomposition into the four line families
//! - [`overlap`]: sliding-window occurrence counting within one line
//! - [`reference`]: ground-truth totals across every direction

pub mod lines;
pub mod overlap;
pub mod reference;

use crate::config::types::{GraderError, Result};

/// Rectangular ASCII grid with `height` rows of identical `width`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    rows: Vec<Vec<u8>>,
    width: usize,
}

impl Grid {
    /// Build a grid from textual rows, rejecting ragged or empty input.
    pub fn new<I, S>(rows: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut byte_rows = Vec::new();
        for (index, row) in rows.into_iter().enumerate() {
            let row = row.as_ref();
            if !row.is_ascii() {
                return Err(GraderError::MalformedGrid(format!(
                    "row {index} contains non-ASCII characters"
                )));
            }
            byte_rows.push(row.as_bytes().to_vec());
        }
        Self::from_byte_rows(byte_rows)
    }

    /// Build a grid from raw byte rows.
    pub fn from_byte_rows(rows: Vec<Vec<u8>>) -> Result<Self> {
        let width = match rows.first() {
            Some(first) => first.len(),
            None => return Err(GraderError::MalformedGrid("grid has no rows".to_string())),
        };
        if width == 0 {
            return Err(GraderError::MalformedGrid("grid rows are empty".to_string()));
        }
        if let Some((index, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(GraderError::MalformedGrid(format!(
                "row {index} has length {}, expected {width}",
                row.len()
            )));
        }
        Ok(Self { rows, width })
    }

    /// Parse the one-row-per-line format used by fixtures and solver input.
    /// Trailing blank lines and `\r` line endings are tolerated.
    pub fn parse(text: &str) -> Result<Self> {
        let mut rows: Vec<&str> = text.lines().map(|l| l.trim_end_matches('\r')).collect();
        while rows.last().is_some_and(|r| r.is_empty()) {
            rows.pop();
        }
        Self::new(rows)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn row(&self, r: usize) -> &[u8] {
        &self.rows[r]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> + '_ {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Cell at `(r, c)`. Panics when out of bounds.
    pub fn at(&self, r: usize, c: usize) -> u8 {
        self.rows[r][c]
    }

    /// Serialize as newline-joined rows with a trailing newline.
    pub fn to_solver_input(&self) -> String {
        let mut out = String::with_capacity(self.height() * (self.width + 1));
        for row in &self.rows {
            // Rows are validated ASCII at construction.
            out.extend(row.iter().map(|&b| b as char));
            out.push('\n');
        }
        out
    }
}
