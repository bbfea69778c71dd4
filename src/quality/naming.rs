//! Column name standardisation.

use crate::error::{PrepError, Result};
use polars::prelude::{Column, DataFrame};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Name given to a column whose raw name has no usable characters.
pub const EMPTY_NAME_FALLBACK: &str = "col";

/// What to do when two raw names sanitize to the same name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Fail the run with [`PrepError::NamingCollision`].
    #[default]
    Reject,
    /// Keep the first column as is and append `_1`, `_2`, ... to later ones.
    Suffix,
}

impl CollisionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reject => "reject",
            Self::Suffix => "suffix",
        }
    }
}

impl std::str::FromStr for CollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "suffix" => Ok(Self::Suffix),
            other => Err(format!(
                "unknown collision policy '{other}' (expected 'reject' or 'suffix')"
            )),
        }
    }
}

/// Normalise a raw column name to lowercase `[a-z0-9_]`.
///
/// Characters outside `[a-z0-9_ ]` are deleted (not replaced), spaces become
/// underscores, underscore runs collapse to one and leading/trailing
/// underscores are trimmed. The function is idempotent.
///
/// ```
/// use prepgate::quality::sanitize_column_name;
///
/// assert_eq!(sanitize_column_name("Monto $$"), "monto");
/// assert_eq!(sanitize_column_name("¿Es_Fraude?"), "es_fraude");
/// assert_eq!(sanitize_column_name("Nombre Cliente (RAW)"), "nombre_cliente_raw");
/// ```
pub fn sanitize_column_name(name: &str) -> String {
    let kept: String = name
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '_' || *c == ' ')
        .map(|c| if c == ' ' { '_' } else { c })
        .collect();

    // Collapse multiple underscores
    let mut result = String::with_capacity(kept.len());
    let mut last_was_underscore = false;
    for c in kept.chars() {
        if c == '_' {
            if !last_was_underscore {
                result.push(c);
                last_was_underscore = true;
            }
        } else {
            result.push(c);
            last_was_underscore = false;
        }
    }

    let result = result.trim_matches('_');
    if result.is_empty() {
        EMPTY_NAME_FALLBACK.to_owned()
    } else {
        result.to_owned()
    }
}

/// Sanitize a full header, resolving collisions according to `policy`.
///
/// The output has the same length and order as `names`; no column is ever dropped.
///
/// # Errors
///
/// Returns [`PrepError::NamingCollision`] under [`CollisionPolicy::Reject`] when
/// two or more names sanitize to the same value.
pub fn sanitize_column_names(names: &[String], policy: CollisionPolicy) -> Result<Vec<String>> {
    let cleaned: Vec<String> = names.iter().map(|n| sanitize_column_name(n)).collect();

    match policy {
        CollisionPolicy::Reject => {
            let mut sources: HashMap<&str, Vec<String>> = HashMap::new();
            for (raw, clean) in names.iter().zip(&cleaned) {
                sources.entry(clean.as_str()).or_default().push(raw.clone());
            }
            // Report the first collision in column order so the error is deterministic
            for clean in &cleaned {
                if let Some(raws) = sources.get(clean.as_str())
                    && raws.len() > 1
                {
                    return Err(PrepError::NamingCollision {
                        name: clean.clone(),
                        sources: raws.clone(),
                    });
                }
            }
            Ok(cleaned)
        }
        CollisionPolicy::Suffix => {
            let mut seen = HashSet::new();
            let mut resolved = Vec::with_capacity(cleaned.len());
            for clean_base in cleaned {
                let mut clean = clean_base.clone();
                let mut count = 0;
                while seen.contains(&clean) {
                    count += 1;
                    clean = format!("{clean_base}_{count}");
                }
                seen.insert(clean.clone());
                resolved.push(clean);
            }
            Ok(resolved)
        }
    }
}

/// Rename every column of `df` to its sanitized name, preserving order and data.
///
/// # Errors
///
/// Propagates collisions from [`sanitize_column_names`].
pub fn sanitize_table(df: DataFrame, policy: CollisionPolicy) -> Result<DataFrame> {
    let raw: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|n| n.as_str().to_owned())
        .collect();
    let clean = sanitize_column_names(&raw, policy)?;

    for (from, to) in raw.iter().zip(&clean) {
        if from != to {
            tracing::debug!("Renaming column '{from}' -> '{to}'");
        }
    }

    let columns: Vec<Column> = df
        .take_columns()
        .into_iter()
        .zip(&clean)
        .map(|(column, name)| column.with_name(name.as_str().into()))
        .collect();

    Ok(DataFrame::new(columns)?)
}
