//! sheetbench: a reproducible benchmark of spreadsheet-import libraries.
//!
//! The pipeline has two phases plus a reduction:
//! 1. [`synth`] derives an enriched record set from a source table
//!    ([`dataset`]) and samples it into seeded, deterministic multi-sheet
//!    XLSX fixtures ([`plan`] fixes the grid and naming contract).
//! 2. [`harness`] times each import routine ([`readers`]) over every
//!    fixture/sheet combination, strictly sequentially.
//! 3. [`summary`] reduces the raw observations to per-group statistics.
//!
//! [`manifest`] records what was written (seed, per-file SHA-256) so a
//! fixture directory can be verified before it is timed.

pub mod dataset;
pub mod errors;
pub mod harness;
pub mod io;
pub mod manifest;
pub mod plan;
pub mod readers;
pub mod summary;
pub mod synth;
