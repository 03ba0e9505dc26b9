//! Timing Harness: sequential wall-clock measurement of every routine over
//! the full fixture grid. Nothing here is parallel on purpose; contention
//! would pollute the latencies being measured.

use crate::errors::SheetBenchResult;
use crate::plan::BenchPlan;
use crate::readers::SheetReader;
use indicatif::{ProgressBar, ProgressStyle};
use polars::prelude::*;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// One timed read: (routine, column count, row count, sheet, elapsed seconds).
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub routine: String,
    pub n_cols: usize,
    pub n_rows: usize,
    pub sheet: usize,
    pub elapsed_s: f64,
}

/// Run every routine over the full grid, one observation per
/// (routine, fixture, sheet). Routines are measured strictly in sequence;
/// within a routine the grid is visited in plan order. A read failure
/// aborts the pass.
pub fn run(
    routines: &[Box<dyn SheetReader>],
    plan: &BenchPlan,
    fixtures_dir: &Path,
) -> SheetBenchResult<Vec<Observation>> {
    let specs = plan.sample_specs();
    let total = routines.len() * specs.len();
    info!(
        "Timing {} routines x {} fixture/sheet reads ({} observations)",
        routines.len(),
        specs.len(),
        total
    );

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
            .map_err(|e| crate::errors::SheetBenchError::Unknown(e.into()))?
            .progress_chars("#>-"),
    );

    let mut observations = Vec::with_capacity(total);
    for routine in routines {
        pb.set_message(routine.name().to_string());
        let pass = run_routine_pass(routine.as_ref(), plan, fixtures_dir, &pb)?;
        observations.extend(pass);
    }
    pb.finish_with_message("benchmark complete");

    Ok(observations)
}

/// One routine's pass over the grid, collected locally and concatenated by
/// the caller.
fn run_routine_pass(
    routine: &dyn SheetReader,
    plan: &BenchPlan,
    fixtures_dir: &Path,
    pb: &ProgressBar,
) -> SheetBenchResult<Vec<Observation>> {
    let specs = plan.sample_specs();
    let mut pass = Vec::with_capacity(specs.len());

    for spec in specs {
        let path = plan.fixture_path(fixtures_dir, spec.n_cols, spec.n_rows);
        let sheet = BenchPlan::sheet_name(spec.sheet);

        let start = Instant::now();
        let table = routine.read_sheet(&path, &sheet)?;
        let elapsed_s = start.elapsed().as_secs_f64();

        debug!(
            routine = routine.name(),
            n_cols = spec.n_cols,
            n_rows = spec.n_rows,
            sheet = spec.sheet,
            rows_read = table.n_rows(),
            elapsed_s,
            "read complete"
        );

        pass.push(Observation {
            routine: routine.name().to_string(),
            n_cols: spec.n_cols,
            n_rows: spec.n_rows,
            sheet: spec.sheet,
            elapsed_s,
        });
        pb.inc(1);
    }

    Ok(pass)
}

/// Convert the raw observation list into a DataFrame in one construction.
pub fn observations_to_frame(observations: &[Observation]) -> SheetBenchResult<DataFrame> {
    let routine: Vec<&str> = observations.iter().map(|o| o.routine.as_str()).collect();
    let n_cols: Vec<u32> = observations.iter().map(|o| o.n_cols as u32).collect();
    let n_rows: Vec<u32> = observations.iter().map(|o| o.n_rows as u32).collect();
    let sheet: Vec<u32> = observations.iter().map(|o| o.sheet as u32).collect();
    let elapsed_s: Vec<f64> = observations.iter().map(|o| o.elapsed_s).collect();

    Ok(df! {
        "routine" => routine,
        "n_cols" => n_cols,
        "n_rows" => n_rows,
        "sheet" => sheet,
        "elapsed_s" => elapsed_s,
    }?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observations_to_frame_shape() {
        let observations = vec![
            Observation {
                routine: "calamine".to_string(),
                n_cols: 5,
                n_rows: 100,
                sheet: 1,
                elapsed_s: 0.01,
            },
            Observation {
                routine: "umya".to_string(),
                n_cols: 5,
                n_rows: 100,
                sheet: 1,
                elapsed_s: 0.02,
            },
        ];

        let df = observations_to_frame(&observations).unwrap();
        assert_eq!(df.shape(), (2, 5));
        let routines = df.column("routine").unwrap().str().unwrap();
        assert_eq!(routines.get(0), Some("calamine"));
        assert_eq!(routines.get(1), Some("umya"));
    }
}
