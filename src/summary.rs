//! Aggregator: pure reduction of the raw observation table into one summary
//! row per (routine, column count, row count) key.

use crate::errors::SheetBenchResult;
use polars::prelude::*;

/// Group the raw observations and reduce elapsed times to
/// mean / sample std-dev / min / median / max.
///
/// A single-observation group has an undefined sample std-dev (ddof = 1);
/// polars surfaces that as null and it is passed through untouched.
pub fn summarize(observations: DataFrame) -> SheetBenchResult<DataFrame> {
    let summary = observations
        .lazy()
        .group_by([col("routine"), col("n_cols"), col("n_rows")])
        .agg([
            col("elapsed_s").mean().alias("mean_s"),
            col("elapsed_s").std(1).alias("std_s"),
            col("elapsed_s").min().alias("min_s"),
            col("elapsed_s").median().alias("median_s"),
            col("elapsed_s").max().alias("max_s"),
        ])
        .sort(["routine", "n_cols", "n_rows"], Default::default())
        .collect()?;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_df(values: &[f64]) -> DataFrame {
        let n = values.len();
        df! {
            "routine" => vec!["calamine"; n],
            "n_cols" => vec![5u32; n],
            "n_rows" => vec![100u32; n],
            "sheet" => (1..=n as u32).collect::<Vec<u32>>(),
            "elapsed_s" => values,
        }
        .unwrap()
    }

    #[test]
    fn test_known_group_statistics() {
        let values = [0.01, 0.02, 0.03, 0.04, 0.05, 0.01, 0.02, 0.03, 0.04, 0.05];
        let summary = summarize(group_df(&values)).unwrap();

        assert_eq!(summary.height(), 1);
        let mean = summary.column("mean_s").unwrap().f64().unwrap().get(0).unwrap();
        let std = summary.column("std_s").unwrap().f64().unwrap().get(0).unwrap();
        let min = summary.column("min_s").unwrap().f64().unwrap().get(0).unwrap();
        let median = summary.column("median_s").unwrap().f64().unwrap().get(0).unwrap();
        let max = summary.column("max_s").unwrap().f64().unwrap().get(0).unwrap();

        assert!((mean - 0.03).abs() < 1e-12);
        assert!((median - 0.03).abs() < 1e-12);
        assert!((min - 0.01).abs() < 1e-12);
        assert!((max - 0.05).abs() < 1e-12);
        // sample std-dev of the group, ddof = 1
        assert!((std - 0.0149071198).abs() < 1e-6);
    }

    #[test]
    fn test_one_row_per_key_and_no_extras() {
        let df = df! {
            "routine" => ["calamine", "calamine", "umya", "umya", "office"],
            "n_cols" => [5u32, 5, 5, 10, 5],
            "n_rows" => [100u32, 100, 100, 100, 100],
            "sheet" => [1u32, 2, 1, 1, 1],
            "elapsed_s" => [0.01, 0.02, 0.03, 0.04, 0.05],
        }
        .unwrap();

        let summary = summarize(df).unwrap();
        // keys: (calamine,5,100), (umya,5,100), (umya,10,100), (office,5,100)
        assert_eq!(summary.height(), 4);

        // calamine group aggregates both of its observations
        let routines = summary.column("routine").unwrap().str().unwrap();
        let means = summary.column("mean_s").unwrap().f64().unwrap();
        let idx = (0..summary.height())
            .find(|&i| routines.get(i) == Some("calamine"))
            .unwrap();
        assert!((means.get(idx).unwrap() - 0.015).abs() < 1e-12);
    }

    #[test]
    fn test_single_observation_group_has_null_std() {
        let summary = summarize(group_df(&[0.02])).unwrap();

        assert_eq!(summary.height(), 1);
        let std = summary.column("std_s").unwrap().f64().unwrap();
        assert_eq!(std.get(0), None);
        // the other reductions stay defined
        let mean = summary.column("mean_s").unwrap().f64().unwrap();
        assert_eq!(mean.get(0), Some(0.02));
    }

    #[test]
    fn test_sorted_by_group_key() {
        let df = df! {
            "routine" => ["umya", "calamine", "calamine"],
            "n_cols" => [5u32, 10, 5],
            "n_rows" => [100u32, 100, 100],
            "sheet" => [1u32, 1, 1],
            "elapsed_s" => [0.01, 0.02, 0.03],
        }
        .unwrap();

        let summary = summarize(df).unwrap();
        let routines = summary.column("routine").unwrap().str().unwrap();
        let cols = summary.column("n_cols").unwrap().u32().unwrap();
        assert_eq!(routines.get(0), Some("calamine"));
        assert_eq!(cols.get(0), Some(5));
        assert_eq!(routines.get(1), Some("calamine"));
        assert_eq!(cols.get(1), Some(10));
        assert_eq!(routines.get(2), Some("umya"));
    }
}
