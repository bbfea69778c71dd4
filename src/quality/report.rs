//! Per-column null-rate report.

use super::nulls::null_count;
use crate::error::Result;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Null statistics of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnQuality {
    pub name: String,
    pub null_count: usize,
    /// Fraction of missing cells, in `[0, 1]`.
    pub null_ratio: f64,
}

impl ColumnQuality {
    pub fn null_percent(&self) -> f64 {
        self.null_ratio * 100.0
    }
}

/// Snapshot of the null ratios of a table, in column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub row_count: usize,
    pub columns: Vec<ColumnQuality>,
}

/// `null_count / row_count`, defined as `0` for an empty table.
pub fn null_ratio(null_count: usize, row_count: usize) -> f64 {
    if row_count == 0 {
        0.0
    } else {
        null_count as f64 / row_count as f64
    }
}

impl QualityReport {
    /// Measure every column of `df` as it is right now.
    ///
    /// Run this before null flags are appended: flag columns are never null and
    /// would only dilute the report.
    ///
    /// # Errors
    ///
    /// Returns an error if a column's missingness cannot be computed.
    pub fn from_df(df: &DataFrame) -> Result<Self> {
        let row_count = df.height();
        let mut columns = Vec::with_capacity(df.width());

        for column in df.get_columns() {
            let nulls = null_count(column)?;
            let quality = ColumnQuality {
                name: column.name().as_str().to_owned(),
                null_count: nulls,
                null_ratio: null_ratio(nulls, row_count),
            };
            tracing::debug!(
                "Column '{}': {} of {row_count} cells missing ({:.2}%)",
                quality.name,
                quality.null_count,
                quality.null_percent()
            );
            columns.push(quality);
        }

        Ok(Self { row_count, columns })
    }

    pub fn get(&self, name: &str) -> Option<&ColumnQuality> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn null_ratio(&self, name: &str) -> Option<f64> {
        self.get(name).map(|c| c.null_ratio)
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// The report as a plain name → ratio mapping.
    pub fn ratios(&self) -> BTreeMap<String, f64> {
        self.columns
            .iter()
            .map(|c| (c.name.clone(), c.null_ratio))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Human readable table of null percentages, one line per column.
    pub fn render(&self) -> String {
        let mut out = String::from("Null percentage by column:\n");
        for column in &self.columns {
            let _ = writeln!(out, "{:<30}: {:.2}%", column.name, column.null_percent());
        }
        out
    }
}
