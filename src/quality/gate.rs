//! Threshold policy over critical columns.
//!
//! The gate looks up every critical column in a [`QualityReport`] and fails
//! the dataset when at least one of them has a null ratio strictly greater
//! than the threshold. A ratio equal to the threshold passes.

use super::naming::sanitize_column_name;
use super::report::QualityReport;
use crate::error::{PrepError, Result};
use serde::{Deserialize, Serialize};

/// Default maximum null ratio for critical columns.
pub const DEFAULT_NULL_THRESHOLD: f64 = 0.05;

/// Columns that must be complete for a transactions dataset to be usable.
pub const DEFAULT_CRITICAL_COLUMNS: [&str; 2] = ["monto", "es_fraude"];

/// A critical column whose null ratio exceeded the threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffendingColumn {
    pub name: String,
    pub null_ratio: f64,
}

/// Diagnostic payload of a failed gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rejection {
    pub reason: String,
    pub threshold: f64,
    /// Every offending critical column, in configuration order.
    pub offending: Vec<OffendingColumn>,
    /// The full report the decision was made on.
    pub report: QualityReport,
}

impl Rejection {
    pub fn offending_names(&self) -> Vec<&str> {
        self.offending.iter().map(|c| c.name.as_str()).collect()
    }

    /// One recommendation line per offending column.
    pub fn recommendations(&self) -> Vec<String> {
        self.offending
            .iter()
            .map(|c| {
                format!(
                    "Critical column '{}' exceeds the null threshold ({:.2}%) with {:.2}% missing. \
                     Discard the dataset and collect new data for this column.",
                    c.name,
                    self.threshold * 100.0,
                    c.null_ratio * 100.0
                )
            })
            .collect()
    }
}

/// Message shown when every critical column is within the threshold.
pub fn acceptance_message(threshold: f64) -> String {
    format!(
        "All critical columns are within the allowed null threshold ({:.2}%). \
         Continue with the analysis of the current dataset.",
        threshold * 100.0
    )
}

/// Outcome of [`evaluate`].
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Pass,
    Fail(Rejection),
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Self::Pass)
    }
}

/// Check that `threshold` lies in `(0, 1]`.
///
/// # Errors
///
/// Returns [`PrepError::Config`] for any other value, including `NaN`.
pub fn validate_threshold(threshold: f64) -> Result<()> {
    if threshold > 0.0 && threshold <= 1.0 {
        Ok(())
    } else {
        Err(PrepError::Config(format!(
            "null threshold must be in (0, 1], got {threshold}"
        )))
    }
}

/// Apply the threshold policy to `critical_columns`.
///
/// Critical names are sanitized before lookup, so raw spellings such as
/// `"¿Es_Fraude?"` match the `es_fraude` column.
///
/// # Errors
///
/// - [`PrepError::Config`] if `threshold` is outside `(0, 1]`.
/// - [`PrepError::MissingCriticalColumn`] listing every critical column absent from the report.
pub fn evaluate(
    report: &QualityReport,
    critical_columns: &[String],
    threshold: f64,
) -> Result<Verdict> {
    validate_threshold(threshold)?;

    let mut critical: Vec<String> = Vec::with_capacity(critical_columns.len());
    for name in critical_columns {
        let clean = sanitize_column_name(name);
        if !critical.contains(&clean) {
            critical.push(clean);
        }
    }

    let missing: Vec<String> = critical
        .iter()
        .filter(|name| report.get(name).is_none())
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(PrepError::MissingCriticalColumn {
            columns: missing,
            available: report.column_names(),
        });
    }

    let offending: Vec<OffendingColumn> = critical
        .iter()
        .filter_map(|name| report.get(name))
        .filter(|c| c.null_ratio > threshold)
        .map(|c| OffendingColumn {
            name: c.name.clone(),
            null_ratio: c.null_ratio,
        })
        .collect();

    if offending.is_empty() {
        return Ok(Verdict::Pass);
    }

    for c in &offending {
        tracing::warn!(
            "Critical column '{}' has {:.2}% nulls (threshold {:.2}%)",
            c.name,
            c.null_ratio * 100.0,
            threshold * 100.0
        );
    }

    let reason = format!(
        "{} critical column(s) exceed the null threshold of {:.2}%: {}",
        offending.len(),
        threshold * 100.0,
        offending
            .iter()
            .map(|c| format!("{} ({:.2}%)", c.name, c.null_ratio * 100.0))
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(Verdict::Fail(Rejection {
        reason,
        threshold,
        offending,
        report: report.clone(),
    }))
}

/// Threshold and critical columns fixed for the lifetime of the gate.
#[derive(Debug, Clone, PartialEq)]
pub struct QualityGate {
    threshold: f64,
    critical_columns: Vec<String>,
}

impl QualityGate {
    /// # Errors
    ///
    /// Returns [`PrepError::Config`] if the threshold is outside `(0, 1]` or
    /// no critical column is given.
    pub fn new(threshold: f64, critical_columns: Vec<String>) -> Result<Self> {
        validate_threshold(threshold)?;
        if critical_columns.is_empty() {
            return Err(PrepError::Config(
                "at least one critical column is required".to_owned(),
            ));
        }
        Ok(Self {
            threshold,
            critical_columns,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn critical_columns(&self) -> &[String] {
        &self.critical_columns
    }

    /// # Errors
    ///
    /// See [`evaluate`].
    pub fn evaluate(&self, report: &QualityReport) -> Result<Verdict> {
        evaluate(report, &self.critical_columns, self.threshold)
    }
}

impl Default for QualityGate {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_NULL_THRESHOLD,
            critical_columns: DEFAULT_CRITICAL_COLUMNS
                .iter()
                .map(|c| (*c).to_owned())
                .collect(),
        }
    }
}
