//! Writing processed tables and decisions to disk.

use crate::error::{PrepError, Result, ResultExt as _};
use crate::loader::SourceFormat;
use crate::pipeline::DecisionRecord;
use polars::prelude::{CsvWriter, DataFrame, JsonFormat, JsonWriter, ParquetWriter, SerWriter as _};
use std::path::Path;

/// Save `df` in the format given by the extension of `path`.
///
/// # Errors
///
/// Returns an error for unknown extensions or when the file cannot be written.
pub fn save_table(df: &mut DataFrame, path: &Path) -> Result<()> {
    let format = SourceFormat::from_path(path).ok_or_else(|| {
        PrepError::Config(format!(
            "Unsupported output extension for {} (expected .csv, .json or .parquet)",
            path.display()
        ))
    })?;
    create_parent_dir(path)?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    match format {
        SourceFormat::Csv => CsvWriter::new(file)
            .include_header(true)
            .finish(df)
            .context("Failed to write CSV file")?,
        SourceFormat::Json => JsonWriter::new(file)
            .with_json_format(JsonFormat::Json)
            .finish(df)
            .context("Failed to write JSON file")?,
        SourceFormat::Parquet => {
            ParquetWriter::new(file)
                .finish(df)
                .context("Failed to write Parquet file")?;
        }
    }

    tracing::info!(
        "Wrote {} rows x {} columns to {}",
        df.height(),
        df.width(),
        path.display()
    );
    Ok(())
}

/// Write a decision (report included) as pretty JSON.
///
/// # Errors
///
/// Returns an error when the file cannot be written.
pub fn save_decision(record: &DecisionRecord, path: &Path) -> Result<()> {
    create_parent_dir(path)?;
    let content = serde_json::to_string_pretty(record)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

fn create_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
