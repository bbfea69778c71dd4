//! Integration tests for the full preprocessing pipeline
//!
//! These tests load the fixture files under `testdata/`, run them through
//! sanitize -> report -> gate -> flag and verify the end-to-end results.

use polars::prelude::ChunkAgg as _;
use prepgate::config::GateConfig;
use prepgate::error::PrepError;
use prepgate::export::{save_decision, save_table};
use prepgate::loader::{CsvLoader, JsonLoader, Loader as _, loader_for_path};
use prepgate::pipeline::{GateDecision, PipelineStage, Preprocessor, run_pipeline};
use prepgate::quality::CollisionPolicy;
use std::path::PathBuf;

const TRANSACTIONS_CSV: &str = "testdata/transactions.csv";
const TRANSACTIONS_JSON: &str = "testdata/transactions.json";

fn config_with_threshold(threshold: f64) -> GateConfig {
    GateConfig {
        threshold,
        ..GateConfig::default()
    }
}

fn assert_close(actual: Option<f64>, expected: f64) {
    let actual = actual.expect("column is in the report");
    assert!(
        (actual - expected).abs() < 1e-12,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_default_threshold_rejects_dirty_sales() -> anyhow::Result<()> {
    let loader = CsvLoader::new(TRANSACTIONS_CSV);
    let decision = run_pipeline(&loader, &GateConfig::default())?;

    let GateDecision::Rejected(rejection) = decision else {
        panic!("10% nulls in es_fraude must fail a 5% gate");
    };

    assert_eq!(rejection.offending_names(), vec!["es_fraude"]);
    assert_eq!(rejection.report.row_count, 20);
    assert_eq!(rejection.report.column_names(), vec!["monto", "es_fraude"]);
    assert_close(rejection.report.null_ratio("monto"), 0.05);
    assert_close(rejection.report.null_ratio("es_fraude"), 0.10);
    assert!(
        rejection.reason.contains("es_fraude"),
        "reason names the column: {}",
        rejection.reason
    );
    Ok(())
}

#[test]
fn test_relaxed_threshold_accepts_and_flags() -> anyhow::Result<()> {
    let loader = CsvLoader::new(TRANSACTIONS_CSV);
    let decision = run_pipeline(&loader, &config_with_threshold(0.10))?;
    assert_eq!(decision.stage(), PipelineStage::Accepted);

    let GateDecision::Accepted(processed) = decision else {
        panic!("a ratio equal to the threshold is accepted");
    };

    let names: Vec<String> = processed
        .table
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(names, vec!["monto", "es_fraude", "monto_nan", "es_fraude_nan"]);
    assert_eq!(processed.table.height(), 20);

    let monto_flags = processed
        .table
        .column("monto_nan")?
        .as_materialized_series()
        .i32()?
        .sum();
    let fraude_flags = processed
        .table
        .column("es_fraude_nan")?
        .as_materialized_series()
        .i32()?
        .sum();
    assert_eq!(monto_flags, Some(1));
    assert_eq!(fraude_flags, Some(2));

    // Report describes the table before augmentation
    assert_eq!(processed.report.len(), 2);
    assert_eq!(processed.summary.columns_before, 2);
    assert_eq!(processed.summary.columns_after, 4);
    assert_eq!(
        processed.summary.stages,
        vec![
            PipelineStage::Loaded,
            PipelineStage::Sanitized,
            PipelineStage::Reported,
            PipelineStage::Gated,
            PipelineStage::Accepted,
        ]
    );
    Ok(())
}

#[test]
fn test_json_source_matches_csv() -> anyhow::Result<()> {
    let preprocessor = Preprocessor::new(&GateConfig::default())?;
    let from_csv = preprocessor.run_loader(&CsvLoader::new(TRANSACTIONS_CSV))?;
    let from_json = preprocessor.run_loader(&JsonLoader::new(TRANSACTIONS_JSON))?;

    assert!(!from_json.is_accepted());
    assert_eq!(from_csv.report().ratios(), from_json.report().ratios());
    Ok(())
}

#[test]
fn test_missing_critical_column() {
    let loader = CsvLoader::new("testdata/missing_critical.csv");
    let err = run_pipeline(&loader, &GateConfig::default()).expect_err("es_fraude is absent");

    match err {
        PrepError::MissingCriticalColumn { columns, available } => {
            assert_eq!(columns, vec!["es_fraude"]);
            assert_eq!(available, vec!["monto", "cliente_id"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_colliding_names() -> anyhow::Result<()> {
    let loader = CsvLoader::new("testdata/colliding_names.csv");
    let err = run_pipeline(&loader, &GateConfig::default()).expect_err("two columns become monto");
    assert!(
        matches!(err, PrepError::NamingCollision { ref name, .. } if name == "monto"),
        "unexpected error: {err}"
    );

    let config = GateConfig {
        collision_policy: CollisionPolicy::Suffix,
        ..GateConfig::default()
    };
    let decision = run_pipeline(&loader, &config)?;
    assert_eq!(
        decision.report().column_names(),
        vec!["monto", "monto_1", "es_fraude"]
    );
    assert!(decision.is_accepted(), "fixture has no nulls");
    Ok(())
}

#[test]
fn test_load_failures() {
    let missing = loader_for_path("testdata/does_not_exist.csv")
        .and_then(|loader| loader.load())
        .expect_err("file does not exist");
    assert!(matches!(missing, PrepError::Load { .. }), "got {missing}");

    let wrong_format = loader_for_path("testdata/notes.txt").err().expect("txt is not a source format");
    assert!(matches!(wrong_format, PrepError::Load { .. }), "got {wrong_format}");

    let wrong_extension = CsvLoader::new(TRANSACTIONS_JSON)
        .load()
        .expect_err("json file behind a CSV loader");
    assert!(matches!(wrong_extension, PrepError::Load { .. }), "got {wrong_extension}");
}

#[test]
fn test_concurrent_runs_are_independent() -> anyhow::Result<()> {
    let thresholds = [0.05, 0.10, 0.5, 1.0];

    let outcomes: Vec<bool> = std::thread::scope(|scope| {
        let handles: Vec<_> = thresholds
            .iter()
            .map(|&threshold| {
                scope.spawn(move || {
                    let loader = CsvLoader::new(TRANSACTIONS_CSV);
                    run_pipeline(&loader, &config_with_threshold(threshold))
                        .map(|decision| decision.is_accepted())
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("pipeline thread panicked"))
            .collect::<Result<_, _>>()
    })?;

    assert_eq!(outcomes, vec![false, true, true, true]);
    Ok(())
}

#[test]
fn test_export_accepted_run() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let loader = loader_for_path(TRANSACTIONS_CSV)?;
    let decision = run_pipeline(loader.as_ref(), &config_with_threshold(0.10))?;

    let record_path = dir.path().join("decision.json");
    save_decision(&decision.record(), &record_path)?;
    let record: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&record_path)?)?;
    assert_eq!(record["decision"], "Accepted");
    assert_eq!(record["report"]["row_count"], 20);

    let mut table = decision.into_table().expect("accepted run has a table");
    let out_path: PathBuf = dir.path().join("clean.csv");
    save_table(&mut table, &out_path)?;

    let reloaded = CsvLoader::new(&out_path).load()?;
    assert_eq!(reloaded.width(), 4);
    assert_eq!(reloaded.height(), 20);
    Ok(())
}
