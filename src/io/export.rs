//! Write tables as CSV or JSON records.
//!
//! Both writers take any `io::Write`; [`open_output`] picks a file or stdout.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::{Result, TidyError};
use crate::table::Table;

/// Buffered writer for `path`, or stdout when absent.
pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|source| TidyError::Io {
                path: path.to_path_buf(),
                source,
            })?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}

/// Header row plus one record per table row. Nulls become empty fields.
pub fn write_table_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(table.column_names())?;
    for i in 0..table.row_count() {
        let row = table.row(i).unwrap_or_default();
        csv.write_record(row.iter().map(|v| v.to_field()))?;
    }
    csv.flush().map_err(|e| TidyError::Csv(e.into()))?;
    Ok(())
}

/// Pretty JSON array of row objects.
pub fn write_table_json<W: Write>(table: &Table, mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, table)?;
    writeln!(writer).map_err(|e| TidyError::Json(serde_json::Error::io(e)))?;
    Ok(())
}
