//! Built-in fit result types and their extractors.
//!
//! Each family registers itself through a [`Collaborator`]; nothing else in
//! the crate needs to know the concrete types.

pub mod minimizer;
pub mod ols;
pub mod optimize;

#[cfg(test)]
pub mod fixtures;

pub use minimizer::*;
pub use ols::*;
pub use optimize::*;

use serde::de::DeserializeOwned;

use crate::domain::{FitResult, LeafType};
use crate::error::Result;
use crate::registry::Collaborator;

/// Collaborators for every built-in leaf type.
pub fn builtin_collaborators() -> [&'static dyn Collaborator; 3] {
    [&MinimizerExtractors, &OptimizeExtractors, &OlsExtractors]
}

/// Decode a leaf object; the `"type"` member is ignored.
pub(crate) fn decode_leaf<T>(value: serde_json::Value) -> Result<Box<dyn FitResult>>
where
    T: LeafType + DeserializeOwned,
{
    let result: T = serde_json::from_value(value)?;
    Ok(Box::new(result))
}
