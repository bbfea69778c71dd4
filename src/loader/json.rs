use super::{Loader, SourceFormat, check_source, describe_path};
use crate::error::{PrepError, Result};
use polars::prelude::{DataFrame, JsonReader, SerReader as _};
use std::path::{Path, PathBuf};

/// Loads a JSON array of records. JSON `null` is the missing marker.
#[derive(Debug, Clone)]
pub struct JsonLoader {
    path: PathBuf,
}

impl JsonLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Loader for JsonLoader {
    fn load(&self) -> Result<DataFrame> {
        check_source(&self.path, SourceFormat::Json)?;

        let file = std::fs::File::open(&self.path)
            .map_err(|e| PrepError::load(&self.path, e.to_string()))?;
        let df = JsonReader::new(file)
            .finish()
            .map_err(|e| PrepError::load(&self.path, format!("failed to read JSON: {e}")))?;

        tracing::info!(
            "Loaded {} rows x {} columns from {}",
            df.height(),
            df.width(),
            self.describe()
        );
        Ok(df)
    }

    fn describe(&self) -> String {
        describe_path(SourceFormat::Json, &self.path)
    }
}
