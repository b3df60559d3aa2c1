pub mod export;

use crate::service::models::{ExecutionResult, RowSet, WriteOutcome};
use crate::workbench::WorkbenchView;
use serde_json::Value;

pub const EMPTY_ROW_SET_STATUS: &str = "Query executed successfully. No rows returned.";

#[derive(Debug, Clone, PartialEq)]
pub enum DisplayModel {
    Table(TableView),
    Status(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub summary: String,
}

pub fn present(result: &ExecutionResult) -> DisplayModel {
    match result {
        ExecutionResult::Rows(set) => DisplayModel::Table(table_view(set)),
        ExecutionResult::Write(outcome) => DisplayModel::Status(write_status(outcome)),
    }
}

/// Column order for a row-set: what the service advertised, else the key
/// order of the first record.
pub fn column_order(set: &RowSet) -> Vec<String> {
    match &set.columns {
        Some(columns) => columns.clone(),
        None => set
            .rows
            .first()
            .map(|row| row.keys().cloned().collect())
            .unwrap_or_default(),
    }
}

/// Text for one cell. Missing and null values render empty.
pub fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn table_view(set: &RowSet) -> TableView {
    let columns = column_order(set);
    let rows = set
        .rows
        .iter()
        .map(|row| columns.iter().map(|c| cell_text(row.get(c))).collect())
        .collect();

    TableView {
        columns,
        rows,
        summary: row_set_summary(set),
    }
}

fn row_set_summary(set: &RowSet) -> String {
    if set.rows.is_empty() {
        return EMPTY_ROW_SET_STATUS.to_string();
    }

    let mut summary = match set.rows.len() {
        1 => "1 row".to_string(),
        n => format!("{} rows", n),
    };
    if let Some(ms) = set.duration_ms {
        summary.push_str(&format!(" in {:.0} ms", ms));
    }
    if set.truncated {
        match set.applied_limit {
            Some(limit) => summary.push_str(&format!(" (truncated to {} rows)", limit)),
            None => summary.push_str(" (truncated)"),
        }
    }
    summary
}

fn write_status(outcome: &WriteOutcome) -> String {
    let mut counters = Vec::new();
    if let Some(changes) = outcome.changes {
        counters.push(format!("changes: {}", changes));
    }
    if let Some(rowid) = outcome.last_insert_rowid {
        counters.push(format!("last insert id: {}", rowid));
    }

    if counters.is_empty() {
        outcome.message.clone()
    } else {
        format!("{} ({})", outcome.message, counters.join(", "))
    }
}

/// Fixed-width text table for the terminal.
pub fn render_table(table: &TableView) -> String {
    let flatten = |s: &str| s.replace(['\r', '\n'], " ");
    let header: Vec<String> = table.columns.iter().map(|c| flatten(c.as_str())).collect();
    let body: Vec<Vec<String>> = table
        .rows
        .iter()
        .map(|row| row.iter().map(|c| flatten(c.as_str())).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &body {
        for (i, cell) in row.iter().enumerate() {
            if let Some(width) = widths.get_mut(i) {
                *width = (*width).max(cell.chars().count());
            }
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    if !header.is_empty() {
        out.push_str(&line(header.as_slice()));
        out.push('\n');
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        out.push_str(&rule.join("-+-"));
        out.push('\n');
        for row in &body {
            out.push_str(&line(row.as_slice()));
            out.push('\n');
        }
    }
    out.push_str(&table.summary);
    out
}

pub fn render_view(view: &WorkbenchView) -> String {
    let mut out = String::new();
    out.push_str(&format!("Database: {}\n", view.target));
    out.push_str(&format!("State:    {}\n", view.phase));
    if !view.prompt.is_empty() {
        out.push_str(&format!("Prompt:   {}\n", view.prompt));
    }
    if !view.editable_sql.is_empty() {
        out.push_str(&format!("SQL:      {}\n", view.editable_sql));
    }

    if let Some(verdict) = &view.verdict {
        let mut line = if verdict.is_safe() {
            "Verdict:  safe".to_string()
        } else {
            "Verdict:  UNSAFE".to_string()
        };
        if let Some(explanation) = &verdict.explanation {
            line.push_str(&format!(" - {}", explanation));
        }
        if !verdict.is_safe() {
            line.push_str(if view.acknowledged {
                " [acknowledged]"
            } else {
                " [type `ack` to allow running it]"
            });
        }
        if view.sql_edited {
            line.push_str(" (SQL edited since generation)");
        }
        out.push_str(&line);
        out.push('\n');
    }

    if let Some(error) = &view.error {
        out.push_str(&format!("Error:    {}\n", error));
    }

    match &view.display {
        Some(DisplayModel::Table(table)) => {
            out.push('\n');
            out.push_str(&render_table(table));
            out.push('\n');
        }
        Some(DisplayModel::Status(status)) => {
            out.push('\n');
            out.push_str(status);
            out.push('\n');
        }
        None => {}
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::models::Record;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_columns_from_meta_win() {
        let set = RowSet {
            columns: Some(vec!["b".into(), "a".into()]),
            rows: vec![record(json!({"a": 1, "b": 2}))],
            ..RowSet::default()
        };
        let DisplayModel::Table(table) = present(&ExecutionResult::Rows(set)) else {
            panic!("expected table");
        };
        assert_eq!(table.columns, vec!["b", "a"]);
        assert_eq!(table.rows, vec![vec!["2".to_string(), "1".to_string()]]);
    }

    #[test]
    fn test_columns_from_first_record_order() {
        let set = RowSet {
            rows: vec![
                record(json!({"name": "Ada", "id": 1})),
                record(json!({"id": 2, "name": "Grace", "extra": true})),
            ],
            ..RowSet::default()
        };
        let DisplayModel::Table(table) = present(&ExecutionResult::Rows(set)) else {
            panic!("expected table");
        };
        assert_eq!(table.columns, vec!["name", "id"]);
        assert_eq!(table.rows[1], vec!["Grace".to_string(), "2".to_string()]);
    }

    #[test]
    fn test_null_and_missing_cells_are_empty() {
        let set = RowSet {
            columns: Some(vec!["id".into(), "email".into(), "age".into()]),
            rows: vec![record(json!({"id": 1, "email": null}))],
            ..RowSet::default()
        };
        let DisplayModel::Table(table) = present(&ExecutionResult::Rows(set)) else {
            panic!("expected table");
        };
        assert_eq!(table.rows[0], vec!["1".to_string(), String::new(), String::new()]);
    }

    #[test]
    fn test_summary_mentions_duration_and_truncation() {
        let set = RowSet {
            rows: vec![record(json!({"id": 1})), record(json!({"id": 2}))],
            truncated: true,
            applied_limit: Some(2),
            duration_ms: Some(42.0),
            ..RowSet::default()
        };
        let DisplayModel::Table(table) = present(&ExecutionResult::Rows(set)) else {
            panic!("expected table");
        };
        assert_eq!(table.summary, "2 rows in 42 ms (truncated to 2 rows)");
    }

    #[test]
    fn test_fractional_duration_is_rounded() {
        let set = RowSet {
            rows: vec![record(json!({"id": 1}))],
            duration_ms: Some(12.7),
            ..RowSet::default()
        };
        let DisplayModel::Table(table) = present(&ExecutionResult::Rows(set)) else {
            panic!("expected table");
        };
        assert_eq!(table.summary, "1 row in 13 ms");
    }

    #[test]
    fn test_empty_row_set_gets_default_status() {
        let DisplayModel::Table(table) = present(&ExecutionResult::Rows(RowSet::default())) else {
            panic!("expected table");
        };
        assert!(table.columns.is_empty());
        assert!(table.rows.is_empty());
        assert_eq!(table.summary, EMPTY_ROW_SET_STATUS);
        assert_eq!(render_table(&table), EMPTY_ROW_SET_STATUS);
    }

    #[test]
    fn test_write_outcome_counters() {
        let outcome = |changes, rowid| {
            present(&ExecutionResult::Write(WriteOutcome {
                message: "Statement executed successfully.".to_string(),
                changes,
                last_insert_rowid: rowid,
            }))
        };

        assert_eq!(
            outcome(None, None),
            DisplayModel::Status("Statement executed successfully.".to_string())
        );
        assert_eq!(
            outcome(Some(3), Some(17)),
            DisplayModel::Status(
                "Statement executed successfully. (changes: 3, last insert id: 17)".to_string()
            )
        );
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let table = TableView {
            columns: vec!["id".into(), "name".into()],
            rows: vec![
                vec!["1".into(), "Ada".into()],
                vec!["10".into(), "Line\nbreak".into()],
            ],
            summary: "2 rows".into(),
        };
        let rendered = render_table(&table);
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "id | name");
        assert_eq!(lines[1], "---+-----------");
        assert_eq!(lines[2], "1  | Ada");
        assert_eq!(lines[3], "10 | Line break");
        assert_eq!(lines[4], "2 rows");
    }
}
