use crate::errors::{SheetBenchError, SheetBenchResult};
use polars::prelude::*;
use std::path::Path;

pub fn read_csv<P: AsRef<Path>>(path: P) -> SheetBenchResult<LazyFrame> {
    LazyCsvReader::new(path)
        .finish()
        .map_err(SheetBenchError::PolarsError)
}

pub fn read_parquet<P: AsRef<Path>>(path: P) -> SheetBenchResult<LazyFrame> {
    LazyFrame::scan_parquet(path, Default::default()).map_err(SheetBenchError::PolarsError)
}

/// Read a tabular file, dispatching on the extension. CSV is the fallback.
pub fn read_table<P: AsRef<Path>>(path: P) -> SheetBenchResult<LazyFrame> {
    if path.as_ref().extension().is_some_and(|e| e == "parquet") {
        read_parquet(path)
    } else {
        read_csv(path)
    }
}

pub fn write_csv<P: AsRef<Path>>(df: &mut DataFrame, path: P) -> SheetBenchResult<()> {
    let mut file = std::fs::File::create(path).map_err(SheetBenchError::IoError)?;
    CsvWriter::new(&mut file)
        .finish(df)
        .map_err(SheetBenchError::PolarsError)?;
    Ok(())
}

pub fn write_parquet<P: AsRef<Path>>(df: DataFrame, path: P) -> SheetBenchResult<()> {
    let file = std::fs::File::create(path).map_err(SheetBenchError::IoError)?;
    ParquetWriter::new(file)
        .finish(&mut df.clone())
        .map_err(SheetBenchError::PolarsError)?;
    Ok(())
}

/// Write a result table, dispatching on the extension. CSV is the fallback.
pub fn write_table<P: AsRef<Path>>(df: &mut DataFrame, path: P) -> SheetBenchResult<()> {
    if path.as_ref().extension().is_some_and(|e| e == "parquet") {
        write_parquet(df.clone(), path)
    } else {
        write_csv(df, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_roundtrip() -> SheetBenchResult<()> {
        let dir = tempfile::tempdir()?;
        let csv_path = dir.path().join("test.csv");
        std::fs::write(&csv_path, "a,b,c\n1,2,3\n4,5,6")?;

        let lf = read_csv(&csv_path)?;
        let mut df = lf.collect().map_err(SheetBenchError::PolarsError)?;

        assert_eq!(df.shape(), (2, 3));

        let out_path = dir.path().join("out.csv");
        write_csv(&mut df, &out_path)?;
        let df_read = read_csv(&out_path)?
            .collect()
            .map_err(SheetBenchError::PolarsError)?;
        assert_eq!(df_read.shape(), (2, 3));
        Ok(())
    }

    #[test]
    fn test_parquet_roundtrip() -> SheetBenchResult<()> {
        let dir = tempfile::tempdir()?;
        let csv_path = dir.path().join("test.csv");
        let parquet_path = dir.path().join("test.parquet");
        std::fs::write(&csv_path, "a,b,c\n1,2,3\n4,5,6")?;

        let df = read_csv(&csv_path)?
            .collect()
            .map_err(SheetBenchError::PolarsError)?;
        write_parquet(df, &parquet_path)?;

        let df_read = read_table(&parquet_path)?
            .collect()
            .map_err(SheetBenchError::PolarsError)?;
        assert_eq!(df_read.shape(), (2, 3));
        Ok(())
    }
}
