//! Centralized error handling for prepgate.
//!
//! Every fatal condition of a pipeline run is a variant of [`PrepError`]:
//!
//! - [`PrepError::Load`]: the source could not be read; the pipeline never starts.
//! - [`PrepError::NamingCollision`]: two columns would share a name after sanitizing or flagging.
//! - [`PrepError::MissingCriticalColumn`]: a configured critical column is absent.
//!
//! A dataset that fails the quality gate is *not* an error. It is the
//! [`GateDecision::Rejected`](crate::pipeline::GateDecision::Rejected) value,
//! which carries the full report and every offending column.
//!
//! ## Context Extension Trait
//!
//! The `ResultExt` trait adds `.context()` to any `Result` whose error converts
//! into [`PrepError`]:
//!
//! ```no_run
//! use prepgate::error::ResultExt as _;
//! use std::fs;
//!
//! fn read_config() -> prepgate::error::Result<String> {
//!     fs::read_to_string("gate.json").context("Failed to read gate configuration")
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for prepgate operations.
#[derive(Debug, Error)]
pub enum PrepError {
    /// The source file is missing, has the wrong format or is malformed.
    #[error("Failed to load '{}': {message}", path.display())]
    Load { path: PathBuf, message: String },

    /// Several columns would end up with one name, either after sanitizing or
    /// once a null-flag name is derived.
    #[error("Column name collision: {sources:?} all map to '{name}'")]
    NamingCollision { name: String, sources: Vec<String> },

    /// One or more critical columns are not present in the sanitized table.
    #[error("Missing critical column(s) {columns:?}; available columns: {available:?}")]
    MissingCriticalColumn {
        columns: Vec<String>,
        available: Vec<String>,
    },

    /// Invalid gate or pipeline configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors outside of loading (export, config files).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors raised by the dataframe engine.
    #[error("Data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON (de)serialization of configs and reports.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{0}")]
    Other(String),
}

impl PrepError {
    /// Build a [`PrepError::Load`] for `path`.
    pub fn load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Load {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for prepgate operations.
pub type Result<T> = std::result::Result<T, PrepError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    ///
    /// # Errors
    ///
    /// Returns the original error wrapped as [`PrepError::Other`] with `msg` prefixed.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    ///
    /// # Errors
    ///
    /// Returns the original error wrapped as [`PrepError::Other`] with the closure's message prefixed.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<PrepError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: PrepError = e.into();
            PrepError::Other(format!("{}: {err}", msg.into()))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: PrepError = e.into();
            PrepError::Other(format!("{}: {err}", f()))
        })
    }
}
