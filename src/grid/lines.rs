/// Line decomposition of a grid into rows, columns and both diagonal orientations
///
/// Diagonals are anchored in two passes so each one is produced exactly once:
/// every row of the leading column first, then the remaining cells of the top
/// row with the shared corner excluded. Each diagonal family therefore yields
/// `height + width - 1` lines.
use super::Grid;

/// One of the four axis groupings scanned for matches
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LineFamily {
    Rows,
    Columns,
    /// Top-left to bottom-right
    DiagonalsSe,
    /// Top-right to bottom-left
    DiagonalsSw,
}

impl LineFamily {
    pub const ALL: [LineFamily; 4] = [
        LineFamily::Rows,
        LineFamily::Columns,
        LineFamily::DiagonalsSe,
        LineFamily::DiagonalsSw,
    ];

    pub fn is_diagonal(self) -> bool {
        matches!(self, LineFamily::DiagonalsSe | LineFamily::DiagonalsSw)
    }

    pub fn name(self) -> &'static str {
        match self {
            LineFamily::Rows => "rows",
            LineFamily::Columns => "columns",
            LineFamily::DiagonalsSe => "diagonals_se",
            LineFamily::DiagonalsSw => "diagonals_sw",
        }
    }
}

/// Lazily produce every line of `family`.
pub fn lines(grid: &Grid, family: LineFamily) -> Box<dyn Iterator<Item = Vec<u8>> + '_> {
    match family {
        LineFamily::Rows => Box::new(rows(grid)),
        LineFamily::Columns => Box::new(columns(grid)),
        LineFamily::DiagonalsSe => Box::new(diagonals_se(grid)),
        LineFamily::DiagonalsSw => Box::new(diagonals_sw(grid)),
    }
}

pub fn rows(grid: &Grid) -> impl Iterator<Item = Vec<u8>> + '_ {
    grid.rows().map(<[u8]>::to_vec)
}

pub fn columns(grid: &Grid) -> impl Iterator<Item = Vec<u8>> + '_ {
    (0..grid.width()).map(move |c| (0..grid.height()).map(|r| grid.at(r, c)).collect())
}

pub fn diagonals_se(grid: &Grid) -> impl Iterator<Item = Vec<u8>> + '_ {
    let (h, w) = (grid.height(), grid.width());
    (0..h)
        .map(|r| (r, 0))
        .chain((1..w).map(|c| (0, c)))
        .map(move |(r0, c0)| {
            (0..)
                .map(|k| (r0 + k, c0 + k))
                .take_while(|&(r, c)| r < h && c < w)
                .map(|(r, c)| grid.at(r, c))
                .collect()
        })
}

pub fn diagonals_sw(grid: &Grid) -> impl Iterator<Item = Vec<u8>> + '_ {
    let (h, w) = (grid.height(), grid.width());
    (0..h)
        .map(move |r| (r, w - 1))
        .chain((0..w - 1).rev().map(|c| (0, c)))
        .map(move |(r0, c0)| {
            (0..)
                .take_while(|&k| r0 + k < h && k <= c0)
                .map(|k| grid.at(r0 + k, c0 - k))
                .collect()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_3x4() -> Grid {
        Grid::new(["abcd", "efgh", "ijkl"]).unwrap()
    }

    fn as_strings(lines: impl Iterator<Item = Vec<u8>>) -> Vec<String> {
        lines.map(|l| String::from_utf8(l).unwrap()).collect()
    }

    #[test]
    fn rows_and_columns() {
        let grid = grid_3x4();
        assert_eq!(as_strings(rows(&grid)), ["abcd", "efgh", "ijkl"]);
        assert_eq!(as_strings(columns(&grid)), ["aei", "bfj", "cgk", "dhl"]);
    }

    #[test]
    fn se_diagonals_row_anchored_then_column_anchored() {
        let grid = grid_3x4();
        assert_eq!(
            as_strings(diagonals_se(&grid)),
            ["afk", "ej", "i", "bgl", "ch", "d"]
        );
    }

    #[test]
    fn sw_diagonals_row_anchored_then_column_anchored() {
        let grid = grid_3x4();
        assert_eq!(
            as_strings(diagonals_sw(&grid)),
            ["dgj", "hk", "l", "cfi", "be", "a"]
        );
    }

    #[test]
    fn every_cell_appears_once_per_diagonal_family() {
        let grid = Grid::new(["abcde", "fghij", "klmno", "pqrst"]).unwrap();
        for family in [LineFamily::DiagonalsSe, LineFamily::DiagonalsSw] {
            let all: Vec<Vec<u8>> = lines(&grid, family).collect();
            assert_eq!(all.len(), grid.height() + grid.width() - 1);
            let mut cells: Vec<u8> = all.into_iter().flatten().collect();
            cells.sort_unstable();
            assert_eq!(cells, b"abcdefghijklmnopqrst".to_vec());
        }
    }

    #[test]
    fn single_cell_grid() {
        let grid = Grid::new(["z"]).unwrap();
        for family in LineFamily::ALL {
            assert_eq!(as_strings(lines(&grid, family)), ["z"], "{}", family.name());
        }
    }
}
