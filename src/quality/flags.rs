//! Null-flag feature columns.
//!
//! For every column `c` of a table, [`add_null_flags`] appends an `Int32`
//! column `c_nan` holding `1` where `c` is missing and `0` elsewhere. All flag
//! columns come after all original columns, in original column order, so a
//! table of N columns always becomes one of 2N columns.
//!
//! A flag name can clash with a column the source already has (a table with
//! both `monto` and `monto_nan`). [`plan_flag_names`] resolves such clashes
//! with the same [`CollisionPolicy`] used for sanitizing, so the pipeline can
//! settle every name before the report is measured.

use super::naming::CollisionPolicy;
use super::nulls::null_mask;
use crate::error::{PrepError, Result};
use polars::prelude::{Column, DataFrame, NamedFrom as _, Series};
use std::collections::HashSet;

/// Suffix appended to a column name to name its flag column.
pub const NULL_FLAG_SUFFIX: &str = "_nan";

/// Name of the flag column derived from `name`.
pub fn flag_column_name(name: &str) -> String {
    format!("{name}{NULL_FLAG_SUFFIX}")
}

/// Choose the flag column name for each of `names`, in order.
///
/// Under [`CollisionPolicy::Suffix`] a flag whose natural name is taken
/// becomes `c_nan_1`, `c_nan_2`, ... until it is unique.
///
/// # Errors
///
/// Returns [`PrepError::NamingCollision`] under [`CollisionPolicy::Reject`]
/// when a flag name is already a column name. The error names both the
/// column being flagged and the column already holding the name.
pub fn plan_flag_names(names: &[String], policy: CollisionPolicy) -> Result<Vec<String>> {
    let mut taken: HashSet<String> = names.iter().cloned().collect();
    let mut planned = Vec::with_capacity(names.len());

    for name in names {
        let base = flag_column_name(name);
        let mut flag = base.clone();
        let mut count = 0;
        while taken.contains(&flag) {
            if policy == CollisionPolicy::Reject {
                return Err(PrepError::NamingCollision {
                    sources: vec![name.clone(), flag.clone()],
                    name: flag,
                });
            }
            count += 1;
            flag = format!("{base}_{count}");
        }
        if count > 0 {
            tracing::debug!("Flag for '{name}' renamed to '{flag}'");
        }
        taken.insert(flag.clone());
        planned.push(flag);
    }
    Ok(planned)
}

/// Build the flag column for a single source column.
///
/// # Errors
///
/// Returns an error if the column's missingness cannot be computed.
pub fn null_flag_column(column: &Column, flag_name: &str) -> Result<Column> {
    let flags: Vec<i32> = null_mask(column)?.into_iter().map(i32::from).collect();
    Ok(Column::from(Series::new(flag_name.into(), flags)))
}

/// Append one flag column per existing column, growing the table from N to 2N columns.
///
/// # Errors
///
/// Returns [`PrepError::NamingCollision`] under [`CollisionPolicy::Reject`] if a
/// flag name is already taken by an existing column.
pub fn add_null_flags(df: DataFrame, policy: CollisionPolicy) -> Result<DataFrame> {
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|n| n.as_str().to_owned())
        .collect();
    let flag_names = plan_flag_names(&names, policy)?;
    append_null_flags(df, &flag_names)
}

/// Append flags named by `flag_names`, one per column of `df` in column order.
///
/// # Errors
///
/// Returns [`PrepError::Config`] if the number of names does not match the
/// table width, or an engine error if a name is already taken.
pub fn append_null_flags(df: DataFrame, flag_names: &[String]) -> Result<DataFrame> {
    if flag_names.len() != df.width() {
        return Err(PrepError::Config(format!(
            "{} flag names given for {} columns",
            flag_names.len(),
            df.width()
        )));
    }

    let flags = df
        .get_columns()
        .iter()
        .zip(flag_names)
        .map(|(column, name)| null_flag_column(column, name))
        .collect::<Result<Vec<_>>>()?;

    tracing::debug!("Appending {} null-flag columns", flags.len());
    Ok(df.hstack(&flags)?)
}
