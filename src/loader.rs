//! Loading raw tables from files.
//!
//! Every source format implements the single [`Loader`] capability. Loaders
//! keep the source's column order and its native null marker, and they fail
//! with [`PrepError::Load`] before a pipeline run starts.
//!
//! ```no_run
//! use prepgate::loader::{Loader as _, loader_for_path};
//!
//! let loader = loader_for_path("dataset_sucio_ventas.csv")?;
//! let df = loader.load()?;
//! println!("{} rows", df.height());
//! # Ok::<(), prepgate::error::PrepError>(())
//! ```

pub mod csv;
pub mod json;
pub mod parquet;

pub use csv::{CSV_NULL_VALUES, CsvLoader};
pub use json::JsonLoader;
pub use parquet::ParquetLoader;

use crate::error::{PrepError, Result};
use polars::prelude::DataFrame;
use std::path::Path;

/// File formats with a loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Json,
    Parquet,
}

impl SourceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "CSV",
            Self::Json => "JSON",
            Self::Parquet => "Parquet",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Parquet => "parquet",
        }
    }

    /// Detect the format from a file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "parquet" => Some(Self::Parquet),
            _ => None,
        }
    }
}

/// Produces a fresh raw table from a source.
pub trait Loader {
    /// Read the source into a new table.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::Load`] if the source is missing or malformed.
    fn load(&self) -> Result<DataFrame>;

    /// Human readable description of the source, for logs.
    fn describe(&self) -> String;
}

/// Pick the loader matching the extension of `path`.
///
/// # Errors
///
/// Returns [`PrepError::Load`] for unsupported extensions.
pub fn loader_for_path(path: impl AsRef<Path>) -> Result<Box<dyn Loader + Send + Sync>> {
    let path = path.as_ref();
    match SourceFormat::from_path(path) {
        Some(SourceFormat::Csv) => Ok(Box::new(CsvLoader::new(path))),
        Some(SourceFormat::Json) => Ok(Box::new(JsonLoader::new(path))),
        Some(SourceFormat::Parquet) => Ok(Box::new(ParquetLoader::new(path))),
        None => Err(PrepError::load(
            path,
            "unsupported file extension (expected .csv, .json or .parquet)",
        )),
    }
}

/// Fail early when `path` does not exist or does not carry `format`'s extension.
pub(crate) fn check_source(path: &Path, format: SourceFormat) -> Result<()> {
    if !path.exists() {
        return Err(PrepError::load(path, "file does not exist"));
    }
    if SourceFormat::from_path(path) != Some(format) {
        return Err(PrepError::load(
            path,
            format!(
                "file must be of type {} (.{})",
                format.as_str(),
                format.extension()
            ),
        ));
    }
    Ok(())
}

/// Hands out copies of a table that is already in memory.
///
/// Each call to [`Loader::load`] returns its own table value, so concurrent
/// runs over the same source never share a table.
#[derive(Debug, Clone)]
pub struct FrameLoader {
    df: DataFrame,
    label: String,
}

impl FrameLoader {
    pub fn new(df: DataFrame) -> Self {
        Self {
            df,
            label: "in-memory table".to_owned(),
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

impl Loader for FrameLoader {
    fn load(&self) -> Result<DataFrame> {
        Ok(self.df.clone())
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

pub(crate) fn describe_path(format: SourceFormat, path: &Path) -> String {
    format!("{} file {}", format.as_str(), path.display())
}
