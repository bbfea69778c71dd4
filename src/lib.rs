//! # prepgate - quality gate for transaction datasets
//!
//! prepgate turns a raw transactions table into an ML-ready one, or rejects it
//! outright when critical columns have too many missing values.
//!
//! ## Quick Start
//!
//! ```no_run
//! use prepgate::config::GateConfig;
//! use prepgate::loader::loader_for_path;
//! use prepgate::pipeline::{GateDecision, Preprocessor};
//!
//! let loader = loader_for_path("dataset_sucio_ventas.csv")?;
//! let preprocessor = Preprocessor::new(&GateConfig::default())?;
//!
//! match preprocessor.run_loader(loader.as_ref())? {
//!     GateDecision::Accepted(processed) => {
//!         println!("{}", processed.report.render());
//!         println!("{} columns after flagging", processed.table.width());
//!     }
//!     GateDecision::Rejected(rejection) => {
//!         for line in rejection.recommendations() {
//!             println!("{line}");
//!         }
//!     }
//! }
//! # Ok::<(), prepgate::error::PrepError>(())
//! ```
//!
//! ## Core Modules
//!
//! - [`quality`]: name sanitization, null flags, null-rate report and the gate
//! - [`loader`]: the `Loader` capability with CSV, JSON and Parquet variants
//! - [`pipeline`]: the `Loaded -> Sanitized -> Reported -> Gated` state machine
//! - [`config`]: threshold, critical columns and collision policy
//! - [`export`]: writing processed tables and decision records
//! - [`error`]: error types
//! - [`logging`]: tracing subscriber setup for the binary
//!
//! ## Pipeline Order
//!
//! The null report is measured on the sanitized table before any flag column
//! exists, and flags are only appended after the gate accepts the dataset:
//!
//! ```text
//! load -> sanitize -> report -> gate -> (accepted: add `_nan` flags) | (rejected: stop)
//! ```

#![warn(clippy::all, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod export;
pub mod loader;
pub mod logging;
pub mod pipeline;
pub mod quality;
