//! Pipeline execution engine.
//!
//! Runs the quality pipeline over one table: sanitize names, report null
//! ratios on the pre-augmentation table, gate, and only when the gate passes
//! append null flags. A rejected dataset is never augmented.

use super::stage::{PipelineStage, StageTracker};
use crate::config::GateConfig;
use crate::error::Result;
use crate::loader::Loader;
use crate::quality::gate::{OffendingColumn, QualityGate, Rejection, Verdict, acceptance_message};
use crate::quality::naming::{CollisionPolicy, sanitize_table};
use crate::quality::QualityReport;
use crate::quality::flags::{append_null_flags, plan_flag_names};
use polars::prelude::DataFrame;
use serde::Serialize;

/// Facts about an accepted run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub rows: usize,
    pub columns_before: usize,
    pub columns_after: usize,
    pub threshold: f64,
    /// Stages visited, `Loaded` first.
    pub stages: Vec<PipelineStage>,
    pub duration: std::time::Duration,
}

impl RunSummary {
    pub fn summary(&self) -> String {
        format!(
            "Pipeline completed: {} rows, columns {} -> {} (null flags appended), {:.3}s",
            self.rows,
            self.columns_before,
            self.columns_after,
            self.duration.as_secs_f64()
        )
    }
}

/// The sanitized, flagged table of an accepted run.
#[derive(Debug, Clone)]
pub struct ProcessedTable {
    pub table: DataFrame,
    /// Report measured before the flag columns were appended.
    pub report: QualityReport,
    pub summary: RunSummary,
}

/// Terminal outcome of a pipeline run.
#[derive(Debug, Clone)]
pub enum GateDecision {
    Accepted(ProcessedTable),
    Rejected(Rejection),
}

impl GateDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    pub fn report(&self) -> &QualityReport {
        match self {
            Self::Accepted(processed) => &processed.report,
            Self::Rejected(rejection) => &rejection.report,
        }
    }

    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::Accepted(_) => PipelineStage::Accepted,
            Self::Rejected(_) => PipelineStage::Rejected,
        }
    }

    /// The processed table, if the dataset was accepted.
    pub fn into_table(self) -> Option<DataFrame> {
        match self {
            Self::Accepted(processed) => Some(processed.table),
            Self::Rejected(_) => None,
        }
    }

    /// Human readable advice, one line per point.
    pub fn messages(&self) -> Vec<String> {
        match self {
            Self::Accepted(processed) => vec![acceptance_message(processed.summary.threshold)],
            Self::Rejected(rejection) => rejection.recommendations(),
        }
    }

    /// Serializable view of the decision.
    pub fn record(&self) -> DecisionRecord {
        match self {
            Self::Accepted(processed) => DecisionRecord {
                decision: PipelineStage::Accepted,
                threshold: processed.summary.threshold,
                reason: None,
                offending: Vec::new(),
                messages: self.messages(),
                report: processed.report.clone(),
            },
            Self::Rejected(rejection) => DecisionRecord {
                decision: PipelineStage::Rejected,
                threshold: rejection.threshold,
                reason: Some(rejection.reason.clone()),
                offending: rejection.offending.clone(),
                messages: self.messages(),
                report: rejection.report.clone(),
            },
        }
    }
}

/// JSON document describing a decision.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionRecord {
    pub decision: PipelineStage,
    pub threshold: f64,
    pub reason: Option<String>,
    pub offending: Vec<OffendingColumn>,
    pub messages: Vec<String>,
    pub report: QualityReport,
}

/// Runs the quality pipeline with a fixed configuration.
///
/// The configuration is immutable, so one `Preprocessor` can be shared across
/// threads that each process their own table.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    gate: QualityGate,
    collision_policy: CollisionPolicy,
}

impl Preprocessor {
    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn new(config: &GateConfig) -> Result<Self> {
        Ok(Self {
            gate: config.gate()?,
            collision_policy: config.collision_policy,
        })
    }

    pub fn gate(&self) -> &QualityGate {
        &self.gate
    }

    /// Sanitize names and measure null ratios without gating.
    ///
    /// # Errors
    ///
    /// Returns an error on a naming collision.
    pub fn report(&self, table: DataFrame) -> Result<QualityReport> {
        let table = sanitize_table(table, self.collision_policy)?;
        QualityReport::from_df(&table)
    }

    /// Load a table from `loader` and run it through the pipeline.
    ///
    /// # Errors
    ///
    /// See [`Preprocessor::run`]; load failures are returned before any stage runs.
    pub fn run_loader(&self, loader: &dyn Loader) -> Result<GateDecision> {
        tracing::info!("Loading {}", loader.describe());
        let table = loader.load()?;
        self.run(table)
    }

    /// Run the pipeline on a raw table.
    ///
    /// # Errors
    ///
    /// Fatal conditions abort the run with no partial table:
    /// naming collisions (including a source column that already holds a
    /// flag name), missing critical columns, and engine errors.
    /// A failed gate is not an error; it is [`GateDecision::Rejected`].
    pub fn run(&self, table: DataFrame) -> Result<GateDecision> {
        let start = std::time::Instant::now();
        let mut stages = StageTracker::new();
        let rows = table.height();
        let columns_before = table.width();

        let table = sanitize_table(table, self.collision_policy)?;
        let column_names: Vec<String> = table
            .get_column_names()
            .iter()
            .map(|n| n.as_str().to_owned())
            .collect();
        let flag_names = plan_flag_names(&column_names, self.collision_policy)?;
        stages.advance(PipelineStage::Sanitized)?;

        let report = QualityReport::from_df(&table)?;
        stages.advance(PipelineStage::Reported)?;

        let verdict = self.gate.evaluate(&report)?;
        stages.advance(PipelineStage::Gated)?;

        match verdict {
            Verdict::Fail(rejection) => {
                stages.advance(PipelineStage::Rejected)?;
                tracing::warn!("Dataset rejected: {}", rejection.reason);
                Ok(GateDecision::Rejected(rejection))
            }
            Verdict::Pass => {
                let table = append_null_flags(table, &flag_names)?;
                stages.advance(PipelineStage::Accepted)?;

                let summary = RunSummary {
                    rows,
                    columns_before,
                    columns_after: table.width(),
                    threshold: self.gate.threshold(),
                    stages: stages.into_history(),
                    duration: start.elapsed(),
                };
                tracing::info!("{}", summary.summary());
                Ok(GateDecision::Accepted(ProcessedTable {
                    table,
                    report,
                    summary,
                }))
            }
        }
    }
}

/// Load from `loader` and run with `config`.
///
/// # Errors
///
/// See [`Preprocessor::run_loader`].
pub fn run_pipeline(loader: &dyn Loader, config: &GateConfig) -> Result<GateDecision> {
    Preprocessor::new(config)?.run_loader(loader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PrepError;
    use crate::loader::FrameLoader;
    use polars::df;

    fn config(threshold: f64) -> GateConfig {
        GateConfig {
            threshold,
            ..GateConfig::default()
        }
    }

    fn dirty() -> anyhow::Result<DataFrame> {
        Ok(df!(
            "Transaction ID #" => &[Some(1), Some(2), None],
            "Monto $$" => &[Some(100.0), None, Some(300.0)],
            "¿Es_Fraude?" => &[Some(0), Some(1), None]
        )?)
    }

    #[test]
    fn test_accepted_run_is_flagged() -> anyhow::Result<()> {
        let decision = Preprocessor::new(&config(0.4))?.run(dirty()?)?;
        let GateDecision::Accepted(processed) = decision else {
            panic!("33% nulls pass a 40% gate");
        };

        let names: Vec<&str> = processed
            .table
            .get_column_names()
            .iter()
            .map(|n| n.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "transaction_id",
                "monto",
                "es_fraude",
                "transaction_id_nan",
                "monto_nan",
                "es_fraude_nan"
            ]
        );
        assert_eq!(processed.summary.columns_before, 3);
        assert_eq!(processed.summary.columns_after, 6);
        assert_eq!(
            processed.summary.stages,
            vec![
                PipelineStage::Loaded,
                PipelineStage::Sanitized,
                PipelineStage::Reported,
                PipelineStage::Gated,
                PipelineStage::Accepted
            ]
        );
        // The report never sees flag columns
        assert_eq!(processed.report.len(), 3);
        Ok(())
    }

    #[test]
    fn test_rejected_run_is_not_flagged() -> anyhow::Result<()> {
        let decision = Preprocessor::new(&config(0.1))?.run(dirty()?)?;
        assert_eq!(decision.stage(), PipelineStage::Rejected);

        let GateDecision::Rejected(rejection) = &decision else {
            panic!("33% nulls fail a 10% gate");
        };
        assert_eq!(rejection.offending_names(), vec!["monto", "es_fraude"]);
        assert!(
            decision.report().get("monto_nan").is_none(),
            "no flags on a rejected dataset"
        );
        assert!(decision.into_table().is_none(), "rejection carries no table");
        Ok(())
    }

    #[test]
    fn test_collision_aborts_before_report() -> anyhow::Result<()> {
        let df = df!(
            "Monto $$" => &[1.0],
            "monto" => &[2.0],
            "es_fraude" => &[0]
        )?;
        let err = Preprocessor::new(&GateConfig::default())?
            .run(df)
            .expect_err("two columns sanitize to monto");
        assert!(matches!(err, PrepError::NamingCollision { .. }), "unexpected error: {err}");
        Ok(())
    }

    #[test]
    fn test_collision_suffix_policy() -> anyhow::Result<()> {
        let df = df!(
            "Monto $$" => &[1.0],
            "monto" => &[2.0],
            "es_fraude" => &[0]
        )?;
        let config = GateConfig {
            collision_policy: CollisionPolicy::Suffix,
            ..GateConfig::default()
        };
        let table = Preprocessor::new(&config)?
            .run(df)?
            .into_table()
            .expect("no nulls, accepted");
        assert!(table.column("monto_1").is_ok(), "second monto is suffixed");
        assert!(table.column("monto_1_nan").is_ok(), "and flagged");
        Ok(())
    }

    fn with_existing_flag() -> anyhow::Result<DataFrame> {
        Ok(df!(
            "monto" => &[Some(10.0), None, Some(30.0)],
            "monto_nan" => &[0, 1, 0],
            "es_fraude" => &[Some(0), Some(1), Some(0)]
        )?)
    }

    #[test]
    fn test_existing_flag_name_rejected_before_report() -> anyhow::Result<()> {
        let err = Preprocessor::new(&config(0.5))?
            .run(with_existing_flag()?)
            .expect_err("monto's flag name is already a column");
        match err {
            PrepError::NamingCollision { name, sources } => {
                assert_eq!(name, "monto_nan");
                assert_eq!(sources, vec!["monto", "monto_nan"]);
            }
            other => panic!("unexpected error: {other}"),
        }
        // Same table gives the same error even when the gate would reject it
        let err = Preprocessor::new(&config(0.1))?
            .run(with_existing_flag()?)
            .expect_err("collision surfaces before gating");
        assert!(matches!(err, PrepError::NamingCollision { .. }), "unexpected error: {err}");
        Ok(())
    }

    #[test]
    fn test_existing_flag_name_suffixed() -> anyhow::Result<()> {
        let config = GateConfig {
            threshold: 0.5,
            collision_policy: CollisionPolicy::Suffix,
            ..GateConfig::default()
        };
        let decision = Preprocessor::new(&config)?.run(with_existing_flag()?)?;
        let GateDecision::Accepted(processed) = decision else {
            panic!("33% nulls pass a 50% gate");
        };

        let names: Vec<&str> = processed
            .table
            .get_column_names()
            .iter()
            .map(|n| n.as_str())
            .collect();
        assert_eq!(
            names,
            vec![
                "monto",
                "monto_nan",
                "es_fraude",
                "monto_nan_1",
                "monto_nan_nan",
                "es_fraude_nan"
            ]
        );
        assert_eq!(processed.summary.columns_after, 2 * processed.summary.columns_before);
        assert_eq!(processed.report.len(), 3);
        Ok(())
    }

    #[test]
    fn test_decision_record() -> anyhow::Result<()> {
        let decision = Preprocessor::new(&config(0.1))?.run(dirty()?)?;
        let record = decision.record();
        let json = serde_json::to_value(&record)?;
        assert_eq!(json["decision"], "Rejected");
        assert_eq!(json["offending"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["report"]["row_count"], 3);
        Ok(())
    }

    #[test]
    fn test_run_pipeline_from_loader() -> anyhow::Result<()> {
        let loader = FrameLoader::new(dirty()?);
        let decision = run_pipeline(&loader, &config(0.5))?;
        assert!(decision.is_accepted(), "33% nulls pass a 50% gate");
        assert_eq!(decision.messages().len(), 1);
        Ok(())
    }
}
