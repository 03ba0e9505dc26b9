use clap::{Parser, Subcommand, ValueEnum};
use miette::Result;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

#[derive(Clone, ValueEnum, Debug)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "sheetbench")]
#[command(version = "0.1.0")]
#[command(about = "Benchmark spreadsheet-import libraries on synthetic workbooks", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase logging verbosity (Info -> Debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Silence all logs
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log format (text or json)
    #[arg(long, value_enum, global = true, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Enrich the source table and synthesize the workbook fixtures
    Synth {
        /// Source table (CSV or Parquet)
        #[arg(long, value_name = "FILE")]
        input: PathBuf,

        /// Directory the fixtures and manifest are written to
        #[arg(long, value_name = "DIR")]
        out_dir: PathBuf,

        /// Seed for the sampling RNG
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Column-count options of the grid
        #[arg(long, value_delimiter = ',', default_values_t = vec![5, 10, 15, 20])]
        cols: Vec<usize>,

        /// Row-count options of the grid
        #[arg(long, value_delimiter = ',', default_values_t = vec![100, 500, 1000, 5000, 10000])]
        rows: Vec<usize>,

        /// Sheets per fixture
        #[arg(long, default_value_t = 10)]
        sheets: usize,

        /// Value column for the per-group share
        #[arg(long, default_value = "distance")]
        share_value: String,

        /// Group key the share is computed within
        #[arg(long, default_value = "carrier")]
        share_group: String,

        /// Quantity column for the per-group statistics
        #[arg(long, default_value = "arr_delay")]
        stats_value: String,

        /// Group key the statistics are joined back on
        #[arg(long, default_value = "dest")]
        stats_group: String,
    },

    /// Time every routine over the fixture grid and print the summary
    Bench {
        /// Directory holding the fixtures and manifest
        #[arg(long, value_name = "DIR")]
        fixtures: PathBuf,

        /// Routines to measure, in order
        #[arg(long, value_delimiter = ',', default_values_t = vec!["calamine".to_string(), "umya".to_string(), "office".to_string()])]
        routines: Vec<String>,

        /// Write the raw observation table here (CSV or Parquet)
        #[arg(long, value_name = "FILE")]
        raw_out: Option<PathBuf>,

        /// Write the summary table here (CSV or Parquet)
        #[arg(long, value_name = "FILE")]
        summary_out: Option<PathBuf>,
    },

    /// Re-aggregate a persisted raw observation table
    Summarize {
        /// Raw observation table (CSV or Parquet)
        #[arg(long, value_name = "FILE")]
        input: PathBuf,

        /// Write the summary table here (CSV or Parquet)
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Check a fixture directory against its manifest
    Verify {
        /// Directory holding the fixtures and manifest
        #[arg(long, value_name = "DIR")]
        fixtures: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet {
        Level::ERROR
    } else if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    // SHEETBENCH_LOG takes precedence over the CLI flags
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .with_env_var("SHEETBENCH_LOG")
        .from_env_lossy();

    let run_id = Uuid::new_v4();

    match cli.log_format {
        LogFormat::Json => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .json()
                .with_span_list(false)
                .with_current_span(false)
                .init();
        }
        LogFormat::Text => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }

    let _span = tracing::info_span!("root", run_id = %run_id).entered();

    match cli.command {
        Commands::Synth {
            input,
            out_dir,
            seed,
            cols,
            rows,
            sheets,
            share_value,
            share_group,
            stats_value,
            stats_group,
        } => {
            let plan = sheetbench::plan::BenchPlan {
                col_counts: cols,
                row_counts: rows,
                sheets,
                seed,
            };
            let rules = sheetbench::dataset::EnrichRules {
                share_value,
                share_group,
                stats_value,
                stats_group,
            };

            info!("Reading source table {:?}", input);
            let lf = sheetbench::io::read_table(&input)?;
            let df = sheetbench::dataset::enrich_collected(lf, &rules)
                .map_err(sheetbench::errors::SheetBenchError::Unknown)?;
            info!(
                "Derived record set: {} rows x {} columns",
                df.height(),
                df.width()
            );

            sheetbench::synth::synthesize(&df, &plan, &out_dir, run_id)?;
        }

        Commands::Bench {
            fixtures,
            routines,
            raw_out,
            summary_out,
        } => {
            let manifest = sheetbench::manifest::FixtureManifest::load(&fixtures)?;
            let plan = plan_from_manifest(&manifest)?;
            info!(
                "Loaded manifest: {} fixtures, seed {}",
                manifest.fixtures.len(),
                manifest.seed
            );

            let mut selected = Vec::with_capacity(routines.len());
            for name in &routines {
                let routine = sheetbench::readers::routine_by_name(name).ok_or_else(|| {
                    miette::miette!("Unknown routine '{}' (known: calamine, umya, office)", name)
                })?;
                selected.push(routine);
            }

            let observations = sheetbench::harness::run(&selected, &plan, &fixtures)?;
            let mut raw = sheetbench::harness::observations_to_frame(&observations)?;
            if let Some(path) = raw_out {
                info!("Writing raw observations to {:?}", path);
                sheetbench::io::write_table(&mut raw, &path)?;
            }

            let mut summary = sheetbench::summary::summarize(raw)?;
            println!("{}", summary);
            if let Some(path) = summary_out {
                info!("Writing summary to {:?}", path);
                sheetbench::io::write_table(&mut summary, &path)?;
            }
        }

        Commands::Summarize { input, output } => {
            let raw = sheetbench::io::read_table(&input)?
                .collect()
                .map_err(sheetbench::errors::SheetBenchError::PolarsError)?;
            let mut summary = sheetbench::summary::summarize(raw)?;
            println!("{}", summary);
            if let Some(path) = output {
                sheetbench::io::write_table(&mut summary, &path)?;
            }
        }

        Commands::Verify { fixtures } => {
            let manifest = sheetbench::manifest::FixtureManifest::load(&fixtures)?;
            let mismatches = sheetbench::manifest::verify(&fixtures, &manifest)?;
            if mismatches.is_empty() {
                info!(
                    "All {} fixtures match the manifest",
                    manifest.fixtures.len()
                );
            } else {
                for m in &mismatches {
                    eprintln!("{}", m);
                }
                return Err(sheetbench::errors::SheetBenchError::ManifestError(format!(
                    "{} fixture(s) do not match the manifest",
                    mismatches.len()
                ))
                .into());
            }
        }
    }

    Ok(())
}

/// Rebuild the measurement grid from the manifest so the harness times
/// exactly the files the synthesizer wrote.
fn plan_from_manifest(
    manifest: &sheetbench::manifest::FixtureManifest,
) -> Result<sheetbench::plan::BenchPlan> {
    let mut col_counts: Vec<usize> = Vec::new();
    let mut row_counts: Vec<usize> = Vec::new();
    let mut sheets = 0usize;
    for entry in &manifest.fixtures {
        if !col_counts.contains(&entry.n_cols) {
            col_counts.push(entry.n_cols);
        }
        if !row_counts.contains(&entry.n_rows) {
            row_counts.push(entry.n_rows);
        }
        sheets = entry.sheets;
    }
    if manifest.fixtures.is_empty() {
        return Err(miette::miette!("Manifest lists no fixtures"));
    }
    col_counts.sort_unstable();
    row_counts.sort_unstable();

    Ok(sheetbench::plan::BenchPlan {
        col_counts,
        row_counts,
        sheets,
        seed: manifest.seed,
    })
}
