//! Shared domain types.
//!
//! This module defines:
//!
//! - the three operation kinds (`Kind`)
//! - container keys used for index columns (`Key`)
//! - pass-through extractor options (`ExtractOptions`)
//! - a CLI run's configuration (`TidyConfig`, `OutputFormat`)

use std::fmt;
use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::table::Value;

/// Index column name used when the caller supplies none.
pub const DEFAULT_VAR_NAME: &str = "key";

/// Which view of a fit result to extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// One row per fit: summary statistics.
    Glance,
    /// One row per fitted parameter.
    Tidy,
    /// One row per data point.
    Augment,
}

impl Kind {
    pub const ALL: [Kind; 3] = [Kind::Glance, Kind::Tidy, Kind::Augment];

    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Glance => "glance",
            Kind::Tidy => "tidy",
            Kind::Augment => "augment",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Position or key of an element inside a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Index(usize),
    Name(String),
}

impl Key {
    /// Cell value written to the index column.
    pub fn to_value(&self) -> Value {
        match self {
            Key::Index(i) => Value::from(*i),
            Key::Name(name) => Value::from(name.as_str()),
        }
    }
}

/// Options passed unchanged to every leaf extractor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractOptions {
    /// Parameter names for results that only carry a bare parameter vector.
    pub param_names: Option<Vec<String>>,
    /// Name of the parameter-name column in key/value style tables.
    pub key_column: Option<String>,
    /// Name of the parameter-value column in key/value style tables.
    pub value_column: Option<String>,
}

impl ExtractOptions {
    pub fn with_param_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.param_names = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Split a `"a b c"` or `"a, b, c"` list of parameter names.
    pub fn parse_param_names(list: &str) -> Vec<String> {
        list.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn key_column(&self) -> &str {
        self.key_column.as_deref().unwrap_or("name")
    }

    pub fn value_column(&self) -> &str {
        self.value_column.as_deref().unwrap_or("value")
    }
}

/// How the CLI renders the resulting table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned plain text.
    Table,
    Csv,
    /// Array of row objects.
    Json,
}

/// A full CLI run's configuration.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct TidyConfig {
    pub kind: Kind,
    pub input: PathBuf,
    /// One index column name per nesting level of the input.
    pub var_names: Vec<String>,
    pub options: ExtractOptions,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
}
