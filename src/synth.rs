//! Dataset Synthesizer: turns the Derived Record frame into the on-disk
//! workbook fixtures the harness times. One workbook per (column count,
//! row count) pair, each sheet an independent sample without replacement.

use crate::errors::{SheetBenchError, SheetBenchResult};
use crate::manifest::{compute_file_hash, FixtureEntry, FixtureManifest};
use crate::plan::BenchPlan;
use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Workbook};
use std::path::Path;
use tracing::info;
use uuid::Uuid;

/// Draw one sheet's worth of positions. The column subset is drawn before
/// the row subset, both without replacement, and both keep the RNG draw
/// order. Callers must not reorder the calls: the whole synthesis pass is
/// one deterministic RNG stream.
pub fn draw_sample(
    rng: &mut StdRng,
    total_cols: usize,
    total_rows: usize,
    n_cols: usize,
    n_rows: usize,
) -> (Vec<usize>, Vec<usize>) {
    let cols = rand::seq::index::sample(rng, total_cols, n_cols).into_vec();
    let rows = rand::seq::index::sample(rng, total_rows, n_rows).into_vec();
    (cols, rows)
}

/// Project the frame onto sampled column and row positions.
pub fn project(df: &DataFrame, cols: &[usize], rows: &[usize]) -> SheetBenchResult<DataFrame> {
    let all_names = df.get_column_names();
    let names: Vec<PlSmallStr> = cols.iter().map(|&i| all_names[i].clone()).collect();
    let projected = df.select(names)?;

    let indices: Vec<IdxSize> = rows.iter().map(|&i| i as IdxSize).collect();
    let idx = IdxCa::from_vec("idx".into(), indices);
    Ok(projected.take(&idx)?)
}

/// Generate every fixture in the plan. Seeded once at the start; any write
/// failure aborts the pass.
pub fn synthesize(
    df: &DataFrame,
    plan: &BenchPlan,
    out_dir: &Path,
    run_id: Uuid,
) -> SheetBenchResult<FixtureManifest> {
    let max_cols = plan.col_counts.iter().copied().max().unwrap_or(0);
    let max_rows = plan.row_counts.iter().copied().max().unwrap_or(0);
    if max_cols > df.width() {
        return Err(SheetBenchError::SynthError(format!(
            "plan asks for {} columns but the dataset has only {}",
            max_cols,
            df.width()
        )));
    }
    if max_rows > df.height() {
        return Err(SheetBenchError::SynthError(format!(
            "plan asks for {} rows but the dataset has only {}",
            max_rows,
            df.height()
        )));
    }

    std::fs::create_dir_all(out_dir)?;

    let pairs = plan.fixture_pairs();
    info!(
        "Synthesizing {} fixtures ({} sheets each) into {:?} with seed {}",
        pairs.len(),
        plan.sheets,
        out_dir,
        plan.seed
    );

    let pb = ProgressBar::new(pairs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
            .map_err(|e| SheetBenchError::Unknown(e.into()))?
            .progress_chars("#>-"),
    );

    let mut rng = StdRng::seed_from_u64(plan.seed);
    let mut manifest = FixtureManifest::new(run_id, plan.seed);

    for (n_cols, n_rows) in pairs {
        let file_name = BenchPlan::fixture_file_name(n_cols, n_rows);
        pb.set_message(file_name.clone());

        let path = plan.fixture_path(out_dir, n_cols, n_rows);
        write_fixture(df, plan, n_cols, n_rows, &mut rng, &path)?;

        let size_bytes = std::fs::metadata(&path)?.len();
        manifest.fixtures.push(FixtureEntry {
            file: file_name,
            n_cols,
            n_rows,
            sheets: plan.sheets,
            size_bytes,
            sha256: compute_file_hash(&path)?,
        });
        pb.inc(1);
    }
    pb.finish_with_message("fixtures written");

    manifest.save(out_dir)?;
    info!("Wrote manifest for {} fixtures", manifest.fixtures.len());
    Ok(manifest)
}

fn write_fixture(
    df: &DataFrame,
    plan: &BenchPlan,
    n_cols: usize,
    n_rows: usize,
    rng: &mut StdRng,
    path: &Path,
) -> SheetBenchResult<()> {
    let mut workbook = Workbook::new();
    // Pinned creation datetime; without it the archive embeds "now" and two
    // runs with the same seed would not be byte-identical.
    let created = ExcelDateTime::from_ymd(2024, 1, 1)?;
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

    for sheet in 1..=plan.sheets {
        let (cols, rows) = draw_sample(rng, df.width(), df.height(), n_cols, n_rows);
        let sampled = project(df, &cols, &rows)?;

        let worksheet = workbook.add_worksheet();
        worksheet.set_name(BenchPlan::sheet_name(sheet))?;

        for (c, column) in sampled.get_columns().iter().enumerate() {
            worksheet.write_string(0, c as u16, column.name().as_str())?;
            let series = column.as_materialized_series();
            for r in 0..sampled.height() {
                let value = series.get(r)?;
                write_cell(worksheet, (r + 1) as u32, c as u16, value)?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn write_cell(
    worksheet: &mut rust_xlsxwriter::Worksheet,
    row: u32,
    col: u16,
    value: AnyValue,
) -> SheetBenchResult<()> {
    match value {
        AnyValue::Null => {}
        AnyValue::Boolean(b) => {
            worksheet.write_boolean(row, col, b)?;
        }
        AnyValue::Int8(v) => {
            worksheet.write_number(row, col, v as f64)?;
        }
        AnyValue::Int16(v) => {
            worksheet.write_number(row, col, v as f64)?;
        }
        AnyValue::Int32(v) => {
            worksheet.write_number(row, col, v as f64)?;
        }
        AnyValue::Int64(v) => {
            worksheet.write_number(row, col, v as f64)?;
        }
        AnyValue::UInt8(v) => {
            worksheet.write_number(row, col, v as f64)?;
        }
        AnyValue::UInt16(v) => {
            worksheet.write_number(row, col, v as f64)?;
        }
        AnyValue::UInt32(v) => {
            worksheet.write_number(row, col, v as f64)?;
        }
        AnyValue::UInt64(v) => {
            worksheet.write_number(row, col, v as f64)?;
        }
        AnyValue::Float32(v) => {
            worksheet.write_number(row, col, v as f64)?;
        }
        AnyValue::Float64(v) => {
            worksheet.write_number(row, col, v)?;
        }
        AnyValue::String(s) => {
            worksheet.write_string(row, col, s)?;
        }
        AnyValue::StringOwned(s) => {
            worksheet.write_string(row, col, s.as_str())?;
        }
        other => {
            worksheet.write_string(row, col, other.to_string())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_sample_is_deterministic_for_a_seed() {
        let mut a = StdRng::seed_from_u64(7);
        let mut b = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            assert_eq!(
                draw_sample(&mut a, 22, 1000, 5, 100),
                draw_sample(&mut b, 22, 1000, 5, 100)
            );
        }
    }

    #[test]
    fn test_draw_sample_has_no_duplicates_within_a_draw() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..20 {
            let (cols, rows) = draw_sample(&mut rng, 20, 200, 15, 150);
            let mut c = cols.clone();
            c.sort_unstable();
            c.dedup();
            assert_eq!(c.len(), cols.len());
            let mut r = rows.clone();
            r.sort_unstable();
            r.dedup();
            assert_eq!(r.len(), rows.len());
        }
    }

    #[test]
    fn test_project_shape_and_columns() {
        let df = df! {
            "a" => [1, 2, 3, 4],
            "b" => [5, 6, 7, 8],
            "c" => [9, 10, 11, 12],
        }
        .unwrap();

        let out = project(&df, &[2, 0], &[3, 1]).unwrap();
        assert_eq!(out.shape(), (2, 2));
        let names: Vec<String> = out
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec!["c", "a"]);

        let a = out.column("a").unwrap().i32().unwrap();
        assert_eq!(a.get(0), Some(4));
        assert_eq!(a.get(1), Some(2));
    }

    #[test]
    fn test_synthesize_rejects_oversized_plan() {
        let df = df! { "a" => [1, 2], "b" => [3, 4] }.unwrap();
        let plan = BenchPlan {
            col_counts: vec![5],
            row_counts: vec![2],
            sheets: 1,
            seed: 1,
        };
        let dir = tempfile::tempdir().unwrap();
        let err = synthesize(&df, &plan, dir.path(), Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, SheetBenchError::SynthError(_)));
    }
}
