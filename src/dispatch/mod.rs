//! Structural dispatch over nested fit results.
//!
//! A leaf goes straight to its registered extractor. A container consumes
//! one index column name, extracts every element with the remaining names,
//! stamps each sub-table with the element's position or key, and stacks the
//! sub-tables in iteration order. Keyed levels become categorical columns.

use crate::domain::{ExtractOptions, Fits, Kind};
use crate::error::{Result, TidyError};
use crate::registry::{self, Registry};
use crate::table::{Table, Value};

/// Extracts tables from [`Fits`] trees against one registry.
#[derive(Debug, Clone, Copy)]
pub struct Tidier<'r> {
    registry: &'r Registry,
}

impl<'r> Tidier<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Extract `kind` from `fits`.
    ///
    /// `var_names` holds one index column name per nesting level, outermost
    /// first. A leaf ignores any names left over.
    pub fn extract<S: AsRef<str>>(
        &self,
        kind: Kind,
        fits: &Fits,
        var_names: &[S],
        opts: &ExtractOptions,
    ) -> Result<Table> {
        let names: Vec<&str> = var_names.iter().map(AsRef::as_ref).collect();
        self.walk(kind, fits, &names, opts, 0)
    }

    fn walk(&self, kind: Kind, fits: &Fits, names: &[&str], opts: &ExtractOptions, depth: usize) -> Result<Table> {
        if let Fits::Leaf(result) = fits {
            return self.registry.extract(kind, &**result, opts);
        }

        let Some((&column, rest)) = names.split_first() else {
            return Err(TidyError::ProvenanceArity { depth });
        };
        if fits.is_empty() {
            return Err(TidyError::EmptyContainer {
                column: column.to_string(),
            });
        }
        let entries = fits.entries();
        tracing::debug!(%kind, column, depth, elements = entries.len(), "extracting container");

        let mut pieces = Vec::with_capacity(entries.len());
        for (key, element) in &entries {
            let mut piece = self.walk(kind, element, rest, opts, depth + 1)?;
            piece.stamp(column, key.to_value());
            pieces.push(piece);
        }
        let mut table = Table::concat(pieces)?;

        if matches!(fits, Fits::Dict(_)) {
            let categories: Vec<Value> = entries.iter().map(|(key, _)| key.to_value()).collect();
            table.set_categorical(column, categories)?;
        }
        Ok(table)
    }
}

/// One summary row per leaf, using the process-wide registry.
///
/// For a single result or a flat list/dict pass `&[DEFAULT_VAR_NAME]` (see
/// `crate::domain`); nested input needs one name per level.
pub fn glance<S: AsRef<str>>(fits: &Fits, var_names: &[S], opts: &ExtractOptions) -> Result<Table> {
    Tidier::new(registry::global()).extract(Kind::Glance, fits, var_names, opts)
}

/// One row per fitted parameter of each leaf, using the process-wide registry.
///
/// `var_names` as for [`glance`].
pub fn tidy<S: AsRef<str>>(fits: &Fits, var_names: &[S], opts: &ExtractOptions) -> Result<Table> {
    Tidier::new(registry::global()).extract(Kind::Tidy, fits, var_names, opts)
}

/// One row per data point of each leaf, using the process-wide registry.
///
/// `var_names` as for [`glance`].
pub fn augment<S: AsRef<str>>(fits: &Fits, var_names: &[S], opts: &ExtractOptions) -> Result<Table> {
    Tidier::new(registry::global()).extract(Kind::Augment, fits, var_names, opts)
}
