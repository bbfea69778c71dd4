use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use prepgate::config::GateConfig;
use prepgate::export::{save_decision, save_table};
use prepgate::loader::loader_for_path;
use prepgate::pipeline::{GateDecision, Preprocessor};
use prepgate::quality::CollisionPolicy;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Input file used when none is given.
pub const DEFAULT_INPUT_FILE: &str = "dataset_sucio_ventas.csv";

/// Exit code of a run whose dataset was rejected by the gate.
pub const EXIT_REJECTED: u8 = 2;

#[derive(Parser)]
#[command(
    name = "prepgate",
    about = "Null-rate quality gate for transaction datasets"
)]
pub struct Cli {
    /// Also write logs to rotating files in the app data directory
    #[arg(long, global = true)]
    pub log_file: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sanitize, report, gate and (when accepted) add null flags
    Run {
        /// Input file (CSV, JSON or Parquet)
        #[arg(short, long, default_value = DEFAULT_INPUT_FILE)]
        file: PathBuf,

        /// Path to a JSON gate configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Maximum null ratio for critical columns, in (0, 1]
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Critical column (repeatable). Replaces the configured set.
        #[arg(short, long = "critical")]
        critical: Vec<String>,

        /// What to do when two column names sanitize to the same name
        #[arg(long)]
        on_collision: Option<CollisionPolicy>,

        /// Where to write the processed table (CSV, JSON or Parquet)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Where to write the report and decision as JSON
        #[arg(long)]
        report_json: Option<PathBuf>,
    },
    /// Print the null-ratio report of a file without gating it
    Report {
        /// Input file (CSV, JSON or Parquet)
        #[arg(short, long, default_value = DEFAULT_INPUT_FILE)]
        file: PathBuf,

        /// What to do when two column names sanitize to the same name
        #[arg(long)]
        on_collision: Option<CollisionPolicy>,
    },
    /// Write the default gate configuration as JSON
    InitConfig {
        /// Output path
        #[arg(short, long, default_value = "prepgate.json")]
        output: PathBuf,
    },
}

pub fn run_command(command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Run {
            file,
            config,
            threshold,
            critical,
            on_collision,
            output,
            report_json,
        } => {
            let config = resolve_config(config, threshold, critical, on_collision)?;
            handle_run(&file, &config, output, report_json)
        }
        Commands::Report { file, on_collision } => {
            let config = resolve_config(None, None, Vec::new(), on_collision)?;
            handle_report(&file, &config)
        }
        Commands::InitConfig { output } => {
            GateConfig::default()
                .to_file(&output)
                .context("Failed to write default config")?;
            println!("Default configuration written to {}", output.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn resolve_config(
    path: Option<PathBuf>,
    threshold: Option<f64>,
    critical: Vec<String>,
    on_collision: Option<CollisionPolicy>,
) -> Result<GateConfig> {
    let mut config = match path {
        Some(path) => GateConfig::from_file(&path)?,
        None => GateConfig::default(),
    };
    if let Some(threshold) = threshold {
        config.threshold = threshold;
    }
    if !critical.is_empty() {
        config.critical_columns = critical;
    }
    if let Some(policy) = on_collision {
        config.collision_policy = policy;
    }
    config.validate()?;
    Ok(config)
}

fn handle_run(
    file: &Path,
    config: &GateConfig,
    output: Option<PathBuf>,
    report_json: Option<PathBuf>,
) -> Result<ExitCode> {
    let loader = loader_for_path(file)?;
    let preprocessor = Preprocessor::new(config)?;
    let decision = preprocessor.run_loader(loader.as_ref())?;

    println!("{}", decision.report().render());
    for line in decision.messages() {
        println!("{line}");
    }

    if let Some(path) = report_json {
        save_decision(&decision.record(), &path)?;
        println!("Decision written to {}", path.display());
    }

    match decision {
        GateDecision::Accepted(mut processed) => {
            println!("{}", processed.summary.summary());
            if let Some(path) = output {
                save_table(&mut processed.table, &path)?;
                println!("Processed table written to {}", path.display());
            }
            Ok(ExitCode::SUCCESS)
        }
        GateDecision::Rejected(rejection) => {
            println!("Dataset rejected: {}", rejection.reason);
            Ok(ExitCode::from(EXIT_REJECTED))
        }
    }
}

fn handle_report(file: &Path, config: &GateConfig) -> Result<ExitCode> {
    let loader = loader_for_path(file)?;
    let table = loader.load()?;
    let report = Preprocessor::new(config)?.report(table)?;
    println!("{}", report.render());
    Ok(ExitCode::SUCCESS)
}
