use crate::error::{PrepError, Result, ResultExt as _};
use crate::quality::gate::{
    DEFAULT_CRITICAL_COLUMNS, DEFAULT_NULL_THRESHOLD, QualityGate, validate_threshold,
};
use crate::quality::naming::{CollisionPolicy, sanitize_column_name};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Settings of one pipeline run. Missing fields take their defaults when loaded from JSON.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct GateConfig {
    /// Maximum allowed null ratio for critical columns, in `(0, 1]`.
    pub threshold: f64,
    /// Columns that must not exceed the threshold. Raw or sanitized spelling.
    pub critical_columns: Vec<String>,
    pub collision_policy: CollisionPolicy,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_NULL_THRESHOLD,
            critical_columns: DEFAULT_CRITICAL_COLUMNS
                .iter()
                .map(|c| (*c).to_owned())
                .collect(),
            collision_policy: CollisionPolicy::default(),
        }
    }
}

impl GateConfig {
    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the result is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json(&content)
    }

    /// # Errors
    ///
    /// Returns an error if `json` is malformed or describes an invalid configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("Failed to parse config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check the threshold range and the critical column set.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::Config`] on an out-of-range threshold, an empty
    /// critical set, or two critical names that sanitize to the same column.
    pub fn validate(&self) -> Result<()> {
        validate_threshold(self.threshold)?;

        if self.critical_columns.is_empty() {
            return Err(PrepError::Config(
                "at least one critical column is required".to_owned(),
            ));
        }

        let mut seen = HashSet::new();
        for name in &self.critical_columns {
            let clean = sanitize_column_name(name);
            if !seen.insert(clean.clone()) {
                return Err(PrepError::Config(format!(
                    "critical column '{name}' is listed twice (as '{clean}')"
                )));
            }
        }
        Ok(())
    }

    /// Build the gate this configuration describes.
    ///
    /// # Errors
    ///
    /// See [`GateConfig::validate`].
    pub fn gate(&self) -> Result<QualityGate> {
        self.validate()?;
        QualityGate::new(self.threshold, self.critical_columns.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GateConfig::default();
        assert_eq!(config.threshold, 0.05);
        assert_eq!(config.critical_columns, vec!["monto", "es_fraude"]);
        assert_eq!(config.collision_policy, CollisionPolicy::Reject);
        assert!(config.validate().is_ok(), "defaults are valid");
    }

    #[test]
    fn test_partial_json_uses_defaults() -> anyhow::Result<()> {
        let config = GateConfig::from_json(r#"{ "threshold": 0.1 }"#)?;
        assert_eq!(config.threshold, 0.1);
        assert_eq!(config.critical_columns, vec!["monto", "es_fraude"]);

        let config = GateConfig::from_json(r#"{ "collision_policy": "suffix" }"#)?;
        assert_eq!(config.collision_policy, CollisionPolicy::Suffix);
        Ok(())
    }

    #[test]
    fn test_invalid_configs() {
        assert!(GateConfig::from_json(r#"{ "threshold": 0 }"#).is_err(), "zero threshold");
        assert!(GateConfig::from_json(r#"{ "threshold": 1.01 }"#).is_err(), "above one");
        assert!(
            GateConfig::from_json(r#"{ "critical_columns": [] }"#).is_err(),
            "empty critical set"
        );
        assert!(
            GateConfig::from_json(r#"{ "critical_columns": ["Monto", "monto $$"] }"#).is_err(),
            "duplicate after sanitizing"
        );
    }

    #[test]
    fn test_file_roundtrip() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("gate.json");
        let config = GateConfig {
            threshold: 0.2,
            critical_columns: vec!["monto".to_owned()],
            collision_policy: CollisionPolicy::Suffix,
        };
        config.to_file(&path)?;
        assert_eq!(GateConfig::from_file(&path)?, config);
        Ok(())
    }

    #[test]
    fn test_missing_file() {
        let err = GateConfig::from_file("does/not/exist.json").expect_err("no such file");
        assert!(
            err.to_string().contains("Failed to read config file"),
            "unexpected error: {err}"
        );
    }
}
