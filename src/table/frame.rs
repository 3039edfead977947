//! The tidy table: named columns of equal length, in display order.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::error::{Result, TidyError};
use crate::table::Value;

/// A named column, optionally carrying an ordered category domain.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    values: Vec<Value>,
    categories: Option<Vec<Value>>,
}

impl Column {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Ordered category domain, when the column is categorical.
    pub fn categories(&self) -> Option<&[Value]> {
        self.categories.as_deref()
    }

    pub fn is_categorical(&self) -> bool {
        self.categories.is_some()
    }
}

/// Row-ordered table with uniquely named columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    n_rows: usize,
}

impl Table {
    /// An empty table (no rows, no columns).
    pub fn new() -> Self {
        Self::default()
    }

    /// A table with `n_rows` rows and no columns yet.
    pub fn with_rows(n_rows: usize) -> Self {
        Self {
            columns: Vec::new(),
            n_rows,
        }
    }

    /// A single-row table built from `(column, value)` pairs.
    pub fn from_record<I, S>(record: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, Value)>,
        S: Into<String>,
    {
        let mut table = Table::with_rows(1);
        for (name, value) in record {
            table.push_column(name, vec![value])?;
        }
        Ok(table)
    }

    pub fn row_count(&self) -> usize {
        self.n_rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Cells of row `i`, in column order.
    pub fn row(&self, i: usize) -> Option<Vec<&Value>> {
        if i >= self.n_rows {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[i]).collect())
    }

    /// Append a column. The name must be new and the length must match.
    pub fn push_column<S, V>(&mut self, name: S, values: V) -> Result<()>
    where
        S: Into<String>,
        V: IntoIterator,
        V::Item: Into<Value>,
    {
        let name = name.into();
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        if self.position(&name).is_some() {
            return Err(TidyError::Column {
                column: name,
                reason: "duplicate column name".to_string(),
            });
        }
        if values.len() != self.n_rows {
            return Err(TidyError::Column {
                reason: format!("expected {} values, got {}", self.n_rows, values.len()),
                column: name,
            });
        }
        self.columns.push(Column {
            name,
            values,
            categories: None,
        });
        Ok(())
    }

    /// Set every row of `name` to `value`.
    ///
    /// Appends the column when it does not exist; otherwise overwrites it in
    /// place (dropping any category domain).
    pub fn stamp(&mut self, name: &str, value: Value) {
        let values = vec![value; self.n_rows];
        match self.position(name) {
            Some(idx) => {
                tracing::warn!(column = name, "index column overwrites an existing column");
                let col = &mut self.columns[idx];
                col.values = values;
                col.categories = None;
            }
            None => self.columns.push(Column {
                name: name.to_string(),
                values,
                categories: None,
            }),
        }
    }

    /// Mark `name` as an ordered categorical column over `categories`.
    pub fn set_categorical(&mut self, name: &str, categories: Vec<Value>) -> Result<()> {
        let Some(idx) = self.position(name) else {
            return Err(TidyError::Column {
                column: name.to_string(),
                reason: "no such column".to_string(),
            });
        };
        let col = &mut self.columns[idx];
        if let Some(stray) = col.values.iter().find(|v| !v.is_null() && !categories.contains(v)) {
            return Err(TidyError::Column {
                column: name.to_string(),
                reason: format!("value '{stray}' is not among the categories"),
            });
        }
        col.categories = Some(categories);
        Ok(())
    }

    /// Stack tables vertically.
    ///
    /// Rows keep input order. Columns are the union in order of first
    /// appearance, with `Null` where a piece lacks a column. A column stays
    /// categorical only if it is categorical in every piece that has it.
    pub fn concat<I>(tables: I) -> Result<Table>
    where
        I: IntoIterator<Item = Table>,
    {
        let tables: Vec<Table> = tables.into_iter().collect();
        let n_rows: usize = tables.iter().map(|t| t.n_rows).sum();

        let mut names: Vec<&str> = Vec::new();
        for t in &tables {
            for c in &t.columns {
                if !names.contains(&c.name.as_str()) {
                    names.push(&c.name);
                }
            }
        }

        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let mut values = Vec::with_capacity(n_rows);
            let mut categories: Option<Vec<Value>> = Some(Vec::new());
            for t in &tables {
                match t.column(name) {
                    Some(col) => {
                        values.extend(col.values.iter().cloned());
                        categories = match (categories, &col.categories) {
                            (Some(mut acc), Some(cats)) => {
                                for cat in cats {
                                    if !acc.contains(cat) {
                                        acc.push(cat.clone());
                                    }
                                }
                                Some(acc)
                            }
                            _ => None,
                        };
                    }
                    None => values.extend(std::iter::repeat_n(Value::Null, t.n_rows)),
                }
            }
            columns.push(Column {
                name: name.to_string(),
                values,
                categories,
            });
        }

        Ok(Table { columns, n_rows })
    }
}

/// Records orientation: `[{"col": value, ...}, ...]`.
impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.n_rows))?;
        for i in 0..self.n_rows {
            seq.serialize_element(&RowRef { table: self, row: i })?;
        }
        seq.end()
    }
}

struct RowRef<'a> {
    table: &'a Table,
    row: usize,
}

impl Serialize for RowRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.table.columns.len()))?;
        for col in &self.table.columns {
            map.serialize_entry(&col.name, &col.values[self.row])?;
        }
        map.end()
    }
}
