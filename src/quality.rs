//! Column standardisation, null flagging, null-rate reporting and the quality gate.
//!
//! These are the pure building blocks of a pipeline run. Each takes a table
//! (or a report) and returns a new value; none of them touches shared state.

pub mod flags;
pub mod gate;
pub mod naming;
pub mod nulls;
pub mod report;

pub use flags::{
    NULL_FLAG_SUFFIX, add_null_flags, append_null_flags, flag_column_name, plan_flag_names,
};
pub use gate::{
    DEFAULT_CRITICAL_COLUMNS, DEFAULT_NULL_THRESHOLD, OffendingColumn, QualityGate, Rejection,
    Verdict, acceptance_message, evaluate,
};
pub use naming::{CollisionPolicy, sanitize_column_name, sanitize_column_names, sanitize_table};
pub use report::{ColumnQuality, QualityReport};
