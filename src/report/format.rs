//! Plain-text rendering for the terminal.

use crate::domain::Kind;
use crate::registry::Registry;
use crate::table::{Table, Value};

/// Widest cell before truncation.
const MAX_WIDTH: usize = 24;

/// Render `table` as aligned columns with a dashed rule under the header.
///
/// Numbers are right-aligned, everything else left-aligned.
pub fn format_table(table: &Table) -> String {
    if table.column_count() == 0 {
        return "(empty table)\n".to_string();
    }

    let cells: Vec<Vec<String>> = table
        .columns()
        .iter()
        .map(|c| c.values().iter().map(|v| truncate(&fmt_cell(v), MAX_WIDTH)).collect())
        .collect();
    let widths: Vec<usize> = table
        .columns()
        .iter()
        .zip(&cells)
        .map(|(col, cells)| {
            let header = truncate(col.name(), MAX_WIDTH).chars().count();
            cells.iter().map(|c| c.chars().count()).fold(header, usize::max)
        })
        .collect();
    let numeric: Vec<bool> = table
        .columns()
        .iter()
        .map(|c| c.values().iter().all(|v| v.is_null() || v.as_f64().is_some()))
        .collect();

    let mut out = String::new();
    let header: Vec<String> = table
        .columns()
        .iter()
        .zip(&widths)
        .zip(&numeric)
        .map(|((col, w), num)| pad(&truncate(col.name(), MAX_WIDTH), *w, *num))
        .collect();
    push_line(&mut out, &header);

    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule);

    for i in 0..table.row_count() {
        let row: Vec<String> = cells
            .iter()
            .zip(&widths)
            .zip(&numeric)
            .map(|((col, w), num)| pad(&col[i], *w, *num))
            .collect();
        push_line(&mut out, &row);
    }
    out
}

/// Registered leaf types per operation, one line each.
pub fn format_registry(registry: &Registry) -> String {
    let mut out = String::new();
    for kind in Kind::ALL {
        let tags: Vec<&str> = registry.tags(kind).into_iter().map(|t| t.name()).collect();
        out.push_str(&format!("{:<8} {}\n", kind.as_str(), tags.join(", ")));
    }
    out
}

fn push_line(out: &mut String, parts: &[String]) {
    out.push_str(parts.join("  ").trim_end());
    out.push('\n');
}

fn pad(s: &str, width: usize, right: bool) -> String {
    if right {
        format!("{s:>width$}")
    } else {
        format!("{s:<width$}")
    }
}

fn fmt_cell(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::Float(x) if x.is_finite() && x.fract() != 0.0 => format!("{x:.6}"),
        other => other.to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::builtin_collaborators;

    #[test]
    fn aligns_columns_under_a_rule() {
        let mut t = Table::with_rows(2);
        t.push_column("name", vec!["amp", "center"]).unwrap();
        t.push_column("value", vec![1.5, 10.0]).unwrap();
        let text = format_table(&t);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "name       value");
        assert_eq!(lines[1], "------  --------");
        assert_eq!(lines[2], "amp     1.500000");
        assert_eq!(lines[3], "center        10");
    }

    #[test]
    fn long_cells_are_truncated() {
        let long = "x".repeat(40);
        assert_eq!(truncate(&long, 10).chars().count(), 10);
        assert!(truncate(&long, 10).ends_with('.'));
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn registry_listing_has_one_line_per_kind() {
        let registry = Registry::with_collaborators(&builtin_collaborators());
        let text = format_registry(&registry);
        assert_eq!(text.lines().count(), 3);
        assert!(text.lines().nth(2).unwrap().starts_with("augment"));
        assert!(text.contains("ModelResult"));
    }
}
