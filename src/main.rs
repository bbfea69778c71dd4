//! # prepgate command line entry point
//!
//! ```bash
//! prepgate run --file dataset_sucio_ventas.csv --threshold 0.05 --output clean.parquet
//! prepgate report --file dataset_sucio_ventas.csv
//! prepgate init-config --output prepgate.json
//! ```
//!
//! Exit codes: `0` accepted, `2` rejected by the quality gate, `1` fatal error.

#![warn(clippy::all, rust_2018_idioms)]
#![expect(clippy::print_stdout)] // Allow println! in main binary

mod cli;

use anyhow::Result;
use clap::Parser as _;
use prepgate::logging::{self, LogOptions};
use std::process::ExitCode;

fn main() -> Result<ExitCode> {
    let cli = cli::Cli::parse();

    logging::init(&LogOptions {
        to_file: cli.log_file,
        ..LogOptions::default()
    })?;

    cli::run_command(cli.command)
}
