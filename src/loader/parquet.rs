use super::{Loader, SourceFormat, check_source, describe_path};
use crate::error::{PrepError, Result};
use polars::prelude::{DataFrame, ParquetReader, SerReader as _};
use std::path::{Path, PathBuf};

/// Loads a Parquet file; the validity bitmap marks missing cells.
#[derive(Debug, Clone)]
pub struct ParquetLoader {
    path: PathBuf,
}

impl ParquetLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Loader for ParquetLoader {
    fn load(&self) -> Result<DataFrame> {
        check_source(&self.path, SourceFormat::Parquet)?;

        let file = std::fs::File::open(&self.path)
            .map_err(|e| PrepError::load(&self.path, e.to_string()))?;
        let df = ParquetReader::new(file)
            .finish()
            .map_err(|e| PrepError::load(&self.path, format!("failed to read Parquet: {e}")))?;

        tracing::info!(
            "Loaded {} rows x {} columns from {}",
            df.height(),
            df.width(),
            self.describe()
        );
        Ok(df)
    }

    fn describe(&self) -> String {
        describe_path(SourceFormat::Parquet, &self.path)
    }
}
