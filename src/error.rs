//! Error types.
//!
//! - `TidyError`: everything the library can fail with (registry lookups,
//!   structural dispatch, extractors, input/output).
//! - `AppError`: what the `tidyfit` binary reports, carrying the process exit code.

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::Kind;

#[derive(Debug, Error)]
pub enum TidyError {
    #[error("`{kind}` does not support this object type ({type_name})")]
    UnsupportedType { kind: Kind, type_name: String },

    #[error(
        "The list of index column names is too short: a container at nesting level {depth} has no name left. \
         Supply one name per nesting level."
    )]
    ProvenanceArity { depth: usize },

    #[error("The option `{option}` is required for {type_name}")]
    MissingRequiredOption { option: &'static str, type_name: String },

    #[error("Invalid option `{option}`: {reason}")]
    InvalidOption { option: &'static str, reason: String },

    #[error("Nothing to tidy: the container for index column `{column}` is empty")]
    EmptyContainer { column: String },

    #[error("{type_name} has no attribute `{attribute}`")]
    MissingAttribute { type_name: String, attribute: &'static str },

    #[error("Invalid {type_name}: {reason}")]
    InvalidResult { type_name: String, reason: String },

    #[error("Column `{column}`: {reason}")]
    Column { column: String, reason: String },

    #[error("Extractor registered for {tag} was invoked with {found}")]
    HandlerMismatch { tag: &'static str, found: String },

    #[error("Unsupported JSON value ({found}): expected a result object, an array or an object")]
    UnsupportedJson { found: String },

    #[error("Invalid results JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, TidyError>;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<TidyError> for AppError {
    fn from(err: TidyError) -> Self {
        let exit_code = match &err {
            TidyError::UnsupportedType { .. } => 3,
            TidyError::ProvenanceArity { .. }
            | TidyError::MissingRequiredOption { .. }
            | TidyError::InvalidOption { .. }
            | TidyError::EmptyContainer { .. }
            | TidyError::MissingAttribute { .. }
            | TidyError::InvalidResult { .. }
            | TidyError::UnsupportedJson { .. }
            | TidyError::Json(_)
            | TidyError::Io { .. } => 2,
            TidyError::Csv(_) | TidyError::Column { .. } | TidyError::HandlerMismatch { .. } => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        let unsupported = TidyError::UnsupportedType {
            kind: Kind::Glance,
            type_name: "string".to_string(),
        };
        assert_eq!(AppError::from(unsupported).exit_code(), 3);

        let arity = TidyError::ProvenanceArity { depth: 1 };
        assert_eq!(AppError::from(arity).exit_code(), 2);

        let column = TidyError::Column {
            column: "x".to_string(),
            reason: "duplicate".to_string(),
        };
        assert_eq!(AppError::from(column).exit_code(), 4);
    }

    #[test]
    fn unsupported_type_message_names_the_type() {
        let err = TidyError::UnsupportedType {
            kind: Kind::Tidy,
            type_name: "Histogram".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Histogram"), "message should name the type: {msg}");
        assert!(msg.contains("tidy"), "message should name the operation: {msg}");
    }
}
