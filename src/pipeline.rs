//! Pipeline orchestration.
//!
//! A run walks a fixed, one-way sequence of stages:
//!
//! ```text
//! Loaded -> Sanitized -> Reported -> Gated -> Accepted | Rejected
//! ```
//!
//! The report is taken on the sanitized table *before* null flags exist, and
//! null flags are only appended once the gate has accepted the dataset.
//!
//! # Example
//!
//! ```no_run
//! use prepgate::config::GateConfig;
//! use prepgate::loader::CsvLoader;
//! use prepgate::pipeline::{GateDecision, run_pipeline};
//!
//! let loader = CsvLoader::new("dataset_sucio_ventas.csv");
//! match run_pipeline(&loader, &GateConfig::default())? {
//!     GateDecision::Accepted(processed) => println!("{}", processed.summary.summary()),
//!     GateDecision::Rejected(rejection) => println!("{}", rejection.reason),
//! }
//! # Ok::<(), prepgate::error::PrepError>(())
//! ```

pub mod executor;
pub mod stage;

pub use executor::{
    DecisionRecord, GateDecision, Preprocessor, ProcessedTable, RunSummary, run_pipeline,
};
pub use stage::{PipelineStage, StageTracker};
