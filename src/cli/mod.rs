//! Command-line parsing for the fit result tidier.
//!
//! Argument parsing and command dispatch stay separate from the extraction
//! code; `app` turns these structs into a `TidyConfig`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::OutputFormat;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "tidyfit", version, about = "Tidy fit results into tables")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// One row of summary statistics per fit.
    Glance(TidyArgs),
    /// One row per fitted parameter.
    Tidy(TidyArgs),
    /// One row per data point, with fitted values and residuals.
    Augment(TidyArgs),
    /// List the registered result types for each operation.
    Types,
}

/// Options shared by the extraction subcommands.
#[derive(Debug, Args, Clone)]
pub struct TidyArgs {
    /// Results JSON: a result object, or nested arrays/objects of them.
    #[arg(short = 'i', long)]
    pub input: PathBuf,

    /// Index column names, outermost nesting level first.
    #[arg(short = 'v', long, value_delimiter = ',', default_value = crate::domain::DEFAULT_VAR_NAME)]
    pub var_names: Vec<String>,

    /// Parameter names for results that only carry a parameter vector
    /// (space or comma separated).
    #[arg(short = 'p', long)]
    pub param_names: Option<String>,

    /// Name of the parameter-name column for key/value tables.
    #[arg(long)]
    pub key_column: Option<String>,

    /// Name of the parameter-value column for key/value tables.
    #[arg(long)]
    pub value_column: Option<String>,

    /// Output format.
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Write to this file instead of stdout.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}
