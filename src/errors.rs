use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum SheetBenchError {
    #[error("I/O error: {0}")]
    #[diagnostic(
        code("SHEETBENCH-001"),
        help("Check file paths and permissions.")
    )]
    IoError(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    #[diagnostic(
        code("SHEETBENCH-002"),
        help("An error occurred within the data processing engine.")
    )]
    PolarsError(#[from] polars::error::PolarsError),

    #[error("Fixture synthesis failed: {0}")]
    #[diagnostic(
        code("SHEETBENCH-003"),
        help("Fixture generation aborts on the first failure; nothing is retried.")
    )]
    SynthError(String),

    #[error("Workbook write error: {0}")]
    #[diagnostic(
        code("SHEETBENCH-004"),
        help("Failed to write an XLSX fixture to disk.")
    )]
    XlsxWriteError(#[from] rust_xlsxwriter::XlsxError),

    #[error("Routine '{routine}' failed to read sheet '{sheet}' of {fixture}: {message}")]
    #[diagnostic(
        code("SHEETBENCH-005"),
        help("A read failure aborts the benchmark pass; a partial observation table would corrupt the aggregate.")
    )]
    ReadError {
        routine: String,
        fixture: String,
        sheet: String,
        message: String,
    },

    #[error("Manifest error: {0}")]
    #[diagnostic(
        code("SHEETBENCH-006"),
        help("The fixture manifest is missing, unreadable, or does not match the files on disk.")
    )]
    ManifestError(String),

    #[error(transparent)]
    #[diagnostic(code("SHEETBENCH-000"))]
    Unknown(#[from] anyhow::Error),
}

pub type SheetBenchResult<T> = Result<T, SheetBenchError>;
