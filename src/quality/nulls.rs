//! The one definition of a missing cell, shared by the reporter and the flag augmenter.
//!
//! A cell is missing when its validity bit is unset (the loader's native null
//! marker: an empty CSV field, a JSON `null`, a Parquet null) or when it is a
//! floating point `NaN`.

use polars::prelude::{Column, DataType, PolarsResult};

/// Per-row missingness of `column`, `true` meaning missing.
///
/// # Errors
///
/// Returns an error if a float column cannot be widened to `Float64`.
pub fn null_mask(column: &Column) -> PolarsResult<Vec<bool>> {
    let series = column.as_materialized_series();
    if is_float(column.dtype()) {
        let floats = series.cast(&DataType::Float64)?;
        Ok(floats
            .f64()?
            .into_iter()
            .map(|v| v.is_none_or(f64::is_nan))
            .collect())
    } else {
        Ok(series
            .is_null()
            .into_iter()
            .map(|v| v.unwrap_or(false))
            .collect())
    }
}

/// Number of missing cells in `column`.
///
/// # Errors
///
/// See [`null_mask`].
pub fn null_count(column: &Column) -> PolarsResult<usize> {
    if is_float(column.dtype()) {
        Ok(null_mask(column)?.into_iter().filter(|missing| *missing).count())
    } else {
        Ok(column.null_count())
    }
}

fn is_float(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Float32 | DataType::Float64)
}
