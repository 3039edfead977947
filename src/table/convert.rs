//! Conversions between two-column tidy tables and key/value maps.

use std::collections::BTreeMap;

use crate::error::{Result, TidyError};
use crate::table::{Table, Value};

/// Build a two-column table (`key`, `value`) from key/value pairs.
///
/// Rows are sorted by key; keys listed in `exclude` are dropped. A repeated
/// key keeps its last value.
pub fn map_to_table<I, K>(entries: I, key: &str, value: &str, exclude: &[&str]) -> Result<Table>
where
    I: IntoIterator<Item = (K, Value)>,
    K: Into<String>,
{
    let sorted: BTreeMap<String, Value> = entries
        .into_iter()
        .map(|(k, v)| (k.into(), v))
        .filter(|(k, _)| !exclude.contains(&k.as_str()))
        .collect();

    let mut table = Table::with_rows(sorted.len());
    let (keys, values): (Vec<String>, Vec<Value>) = sorted.into_iter().unzip();
    table.push_column(key, keys)?;
    table.push_column(value, values)?;
    Ok(table)
}

/// Read a key/value mapping back out of a tidy table.
///
/// Each distinct key maps to the value of its first row. Keys are rendered
/// as text; keys listed in `exclude` are skipped.
pub fn table_to_map(table: &Table, key: &str, value: &str, exclude: &[&str]) -> Result<BTreeMap<String, Value>> {
    let missing = |name: &str| TidyError::Column {
        column: name.to_string(),
        reason: "no such column".to_string(),
    };
    let keys = table.column(key).ok_or_else(|| missing(key))?;
    let values = table.column(value).ok_or_else(|| missing(value))?;

    let mut out = BTreeMap::new();
    for (k, v) in keys.values().iter().zip(values.values()) {
        let k = k.to_field();
        if exclude.contains(&k.as_str()) {
            continue;
        }
        out.entry(k).or_insert_with(|| v.clone());
    }
    Ok(out)
}
