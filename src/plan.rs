//! The fixed measurement grid: which column/row counts get sampled, how many
//! sheets each fixture carries, and the file/sheet naming contract between
//! the synthesizer and the harness.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One fixture/sheet combination in the measurement grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleSpec {
    pub n_cols: usize,
    pub n_rows: usize,
    /// 1-based sheet index within the fixture.
    pub sheet: usize,
}

/// The benchmark grid. The defaults are the canonical run; tests shrink
/// them to keep runtimes sane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenchPlan {
    pub col_counts: Vec<usize>,
    pub row_counts: Vec<usize>,
    pub sheets: usize,
    pub seed: u64,
}

impl Default for BenchPlan {
    fn default() -> Self {
        Self {
            col_counts: vec![5, 10, 15, 20],
            row_counts: vec![100, 500, 1000, 5000, 10000],
            sheets: 10,
            seed: 42,
        }
    }
}

impl BenchPlan {
    /// Every (n_cols, n_rows, sheet) triple in the fixed nested order:
    /// column count outer, row count middle, sheet index inner.
    pub fn sample_specs(&self) -> Vec<SampleSpec> {
        let mut specs = Vec::with_capacity(self.col_counts.len() * self.row_counts.len() * self.sheets);
        for &n_cols in &self.col_counts {
            for &n_rows in &self.row_counts {
                for sheet in 1..=self.sheets {
                    specs.push(SampleSpec { n_cols, n_rows, sheet });
                }
            }
        }
        specs
    }

    /// Every (n_cols, n_rows) pair, one per fixture file, in grid order.
    pub fn fixture_pairs(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::with_capacity(self.col_counts.len() * self.row_counts.len());
        for &n_cols in &self.col_counts {
            for &n_rows in &self.row_counts {
                pairs.push((n_cols, n_rows));
            }
        }
        pairs
    }

    pub fn fixture_file_name(n_cols: usize, n_rows: usize) -> String {
        format!("sample_{}cols_{}rows.xlsx", n_cols, n_rows)
    }

    pub fn fixture_path(&self, dir: &Path, n_cols: usize, n_rows: usize) -> PathBuf {
        dir.join(Self::fixture_file_name(n_cols, n_rows))
    }

    pub fn sheet_name(sheet: usize) -> String {
        format!("sample_{:02}", sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_shape() {
        let plan = BenchPlan::default();
        assert_eq!(plan.col_counts.len(), 4);
        assert_eq!(plan.row_counts.len(), 5);
        assert_eq!(plan.sheets, 10);
        assert_eq!(plan.sample_specs().len(), 200);
        assert_eq!(plan.fixture_pairs().len(), 20);
    }

    #[test]
    fn test_spec_order_is_cols_rows_sheet() {
        let plan = BenchPlan {
            col_counts: vec![2, 3],
            row_counts: vec![10, 20],
            sheets: 2,
            seed: 1,
        };
        let specs = plan.sample_specs();
        assert_eq!(specs[0], SampleSpec { n_cols: 2, n_rows: 10, sheet: 1 });
        assert_eq!(specs[1], SampleSpec { n_cols: 2, n_rows: 10, sheet: 2 });
        assert_eq!(specs[2], SampleSpec { n_cols: 2, n_rows: 20, sheet: 1 });
        assert_eq!(specs[4], SampleSpec { n_cols: 3, n_rows: 10, sheet: 1 });
        assert_eq!(specs.len(), 8);
    }

    #[test]
    fn test_naming_contract() {
        assert_eq!(BenchPlan::fixture_file_name(5, 100), "sample_5cols_100rows.xlsx");
        assert_eq!(BenchPlan::sheet_name(1), "sample_01");
        assert_eq!(BenchPlan::sheet_name(10), "sample_10");
    }
}
