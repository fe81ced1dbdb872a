pub mod cell;
pub mod cli;
pub mod compare;
pub mod correspondence;
pub mod engine;
pub mod error;
pub mod io_utils;
pub mod loader;
pub mod model;
pub mod preview;
pub mod prompt;
pub mod report;
pub mod source;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, debug};

use crate::cli::{Cli, Commands, InteractiveArgs, ReportFormat, ReportOptions};

pub use crate::{
    correspondence::{ColumnPair, Correspondence},
    engine::reconcile,
    error::{CorrespondenceError, InputError, LoadError},
    model::{ComparisonResult, Dataset, FieldDifference, FieldMismatch, Record},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("sheet_reconcile", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let command = cli.command.unwrap_or_else(|| {
        debug!("No subcommand given; starting interactive session");
        default_command()
    });
    match command {
        Commands::Interactive(args) => compare::execute_interactive(&args),
        Commands::Compare(args) => compare::execute(&args),
        Commands::Preview(args) => preview::execute(&args),
    }
}

fn default_command() -> Commands {
    Commands::Interactive(InteractiveArgs {
        report: ReportOptions {
            max_size_mib: source::DEFAULT_MAX_SIZE_MIB,
            format: ReportFormat::Text,
        },
    })
}
