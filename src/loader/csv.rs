use super::{Loader, SourceFormat, check_source, describe_path};
use crate::error::{PrepError, Result};
use polars::prelude::{DataFrame, LazyCsvReader, LazyFileListReader as _, NullValues};
use std::path::{Path, PathBuf};

/// Field values a CSV file uses to mean "missing". An empty field is one of them.
pub const CSV_NULL_VALUES: [&str; 3] = ["", "NaN", "null"];

/// Loads a CSV file with a header row.
#[derive(Debug, Clone)]
pub struct CsvLoader {
    path: PathBuf,
    null_values: Vec<String>,
    infer_schema_length: usize,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            null_values: CSV_NULL_VALUES.iter().map(|v| (*v).to_owned()).collect(),
            infer_schema_length: 10_000,
        }
    }

    /// Replace the tokens read as null.
    #[must_use]
    pub fn with_null_values(mut self, values: Vec<String>) -> Self {
        self.null_values = values;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Loader for CsvLoader {
    fn load(&self) -> Result<DataFrame> {
        check_source(&self.path, SourceFormat::Csv)?;

        let null_values = NullValues::AllColumns(
            self.null_values
                .iter()
                .map(|v| v.as_str().into())
                .collect(),
        );

        let df = LazyCsvReader::new(&self.path)
            .with_has_header(true)
            .with_infer_schema_length(Some(self.infer_schema_length))
            .with_null_values(Some(null_values))
            .finish()
            .and_then(|lf| lf.collect())
            .map_err(|e| PrepError::load(&self.path, format!("failed to read CSV: {e}")))?;

        tracing::info!(
            "Loaded {} rows x {} columns from {}",
            df.height(),
            df.width(),
            self.describe()
        );
        Ok(df)
    }

    fn describe(&self) -> String {
        describe_path(SourceFormat::Csv, &self.path)
    }
}
