/// Fixed correctness cases
///
/// The six cases below are the stable grading contract: their grids and
/// expected totals are persisted once and every later run is compared
/// against the persisted copies. Point values sum to [`CORRECTNESS_POINTS`].
use crate::config::types::Result;
use crate::fixtures::TestCase;
use crate::grid::Grid;

/// Maximum correctness score
pub const CORRECTNESS_POINTS: u32 = 60;

/// Static definition of a correctness case
#[derive(Debug, Clone, Copy)]
pub struct CasePreset {
    pub name: &'static str,
    pub points: u32,
    pub rows: &'static [&'static str],
    pub expected_total: u64,
}

const FILLER_ROW: &str = "xxxxxxxxxx";

pub const CASE_PRESETS: &[CasePreset] = &[
    CasePreset {
        name: "sample_multidir",
        points: 20,
        rows: &[
            "rotatorxxr",
            "xxxxxxxxxo",
            "xxxxxxxxxt",
            "xxrxxxrxxa",
            "xxxoxoxxxt",
            "xxxxtxxxxo",
            "xxxaxaxxxr",
            "xxtxxxtxxx",
            "xoxxxxxoxx",
            "rxxxxxxxrx",
        ],
        expected_total: 8,
    },
    CasePreset {
        name: "no_hits",
        points: 10,
        rows: &[FILLER_ROW; 10],
        expected_total: 0,
    },
    CasePreset {
        name: "single_horizontal_bidir",
        points: 10,
        rows: &[
            "rotatorxxx",
            FILLER_ROW,
            FILLER_ROW,
            FILLER_ROW,
            FILLER_ROW,
            FILLER_ROW,
            FILLER_ROW,
            FILLER_ROW,
            FILLER_ROW,
            FILLER_ROW,
        ],
        expected_total: 2,
    },
    CasePreset {
        name: "vertical_mid",
        points: 5,
        rows: &[
            "xxxxrxxxxx",
            "xxxxoxxxxx",
            "xxxxtxxxxx",
            "xxxxaxxxxx",
            "xxxxtxxxxx",
            "xxxxoxxxxx",
            "xxxxrxxxxx",
            FILLER_ROW,
            FILLER_ROW,
            FILLER_ROW,
        ],
        expected_total: 2,
    },
    CasePreset {
        name: "diag_cross",
        points: 5,
        rows: &[
            "rxxxxxrxxx",
            "xoxxxoxxxx",
            "xxtxtxxxxx",
            "xxxaxxxxxx",
            "xxtxtxxxxx",
            "xoxxxoxxxx",
            "rxxxxxrxxx",
            FILLER_ROW,
            FILLER_ROW,
            FILLER_ROW,
        ],
        expected_total: 4,
    },
    // Dense partial words to trip up off-by-one indexing.
    CasePreset {
        name: "overlap_corner",
        points: 10,
        rows: &[
            "rotatorrot",
            "otatorrota",
            "tatorrotax",
            "atorrotaxx",
            "torrotaxxx",
            "orrotaxxxx",
            "rrotaxxxxx",
            "rotaxxxxxx",
            "otaxxxxxxx",
            "taxxxxxxxx",
        ],
        expected_total: 4,
    },
];

impl CasePreset {
    pub fn to_test_case(&self) -> Result<TestCase> {
        Ok(TestCase {
            name: self.name.to_string(),
            grid: Grid::new(self.rows.iter().copied())?,
            expected_total: self.expected_total,
            points: self.points,
        })
    }
}

/// Materialize all presets, validating every grid.
pub fn small_cases() -> Result<Vec<TestCase>> {
    CASE_PRESETS.iter().map(CasePreset::to_test_case).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::reference::reference_total;

    #[test]
    fn points_sum_to_correctness_budget() {
        let sum: u32 = CASE_PRESETS.iter().map(|c| c.points).sum();
        assert_eq!(sum, CORRECTNESS_POINTS);
        assert_eq!(CASE_PRESETS.len(), 6);
    }

    #[test]
    fn presets_are_well_formed() {
        let cases = small_cases().expect("presets must be valid grids");
        for case in &cases {
            assert_eq!(case.grid.height(), 10, "{}", case.name);
            assert_eq!(case.grid.width(), 10, "{}", case.name);
        }
    }

    #[test]
    fn expected_totals_match_reference_counter() {
        for case in small_cases().unwrap() {
            assert_eq!(
                reference_total(&case.grid, "rotator"),
                case.expected_total,
                "case {}",
                case.name
            );
        }
    }

    #[test]
    fn case_names_are_unique() {
        let mut names: Vec<_> = CASE_PRESETS.iter().map(|c| c.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), CASE_PRESETS.len());
    }
}
