//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - builds the extractor registry
//! - loads the results JSON
//! - dispatches the requested extraction
//! - renders or writes the table

use std::io::Write;

use clap::Parser;

use crate::cli::{Cli, Command, TidyArgs};
use crate::dispatch::Tidier;
use crate::domain::{ExtractOptions, Kind, OutputFormat, TidyConfig};
use crate::error::{AppError, TidyError};
use crate::io::{open_output, read_fits_json, write_table_csv, write_table_json};
use crate::registry::{self, Registry};
use crate::table::Table;

/// Entry point for the `tidyfit` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let registry = registry::initialize(&crate::models::builtin_collaborators());

    match cli.command {
        Command::Glance(args) => handle_extract(registry, &tidy_config_from_args(Kind::Glance, &args)),
        Command::Tidy(args) => handle_extract(registry, &tidy_config_from_args(Kind::Tidy, &args)),
        Command::Augment(args) => handle_extract(registry, &tidy_config_from_args(Kind::Augment, &args)),
        Command::Types => handle_types(registry),
    }
}

/// Load, extract and emit according to `config`.
pub fn handle_extract(registry: &Registry, config: &TidyConfig) -> Result<(), AppError> {
    let table = extract_table(registry, config)?;
    if table.is_empty() {
        tracing::warn!(kind = %config.kind, input = %config.input.display(), "no rows extracted");
    }
    tracing::info!(
        kind = %config.kind,
        rows = table.row_count(),
        columns = table.column_count(),
        "extracted table"
    );
    emit(&table, config)?;
    Ok(())
}

/// The table `config` asks for, without writing it anywhere.
pub fn extract_table(registry: &Registry, config: &TidyConfig) -> Result<Table, TidyError> {
    let fits = read_fits_json(&config.input, registry)?;
    Tidier::new(registry).extract(config.kind, &fits, &config.var_names, &config.options)
}

fn emit(table: &Table, config: &TidyConfig) -> Result<(), TidyError> {
    let mut out = open_output(config.output.as_deref())?;
    let io_err = |source| TidyError::Io {
        path: config.output.clone().unwrap_or_else(|| "<stdout>".into()),
        source,
    };
    match config.format {
        OutputFormat::Table => {
            out.write_all(crate::report::format_table(table).as_bytes()).map_err(io_err)?;
            out.flush().map_err(io_err)?;
        }
        OutputFormat::Csv => write_table_csv(table, out)?,
        OutputFormat::Json => write_table_json(table, out)?,
    }
    Ok(())
}

fn handle_types(registry: &Registry) -> Result<(), AppError> {
    print!("{}", crate::report::format_registry(registry));
    Ok(())
}

pub fn tidy_config_from_args(kind: Kind, args: &TidyArgs) -> TidyConfig {
    let mut options = ExtractOptions {
        key_column: args.key_column.clone(),
        value_column: args.value_column.clone(),
        ..ExtractOptions::default()
    };
    if let Some(names) = &args.param_names {
        options = options.with_param_names(ExtractOptions::parse_param_names(names));
    }

    TidyConfig {
        kind,
        input: args.input.clone(),
        var_names: args.var_names.clone(),
        options,
        format: args.format,
        output: args.output.clone(),
    }
}
