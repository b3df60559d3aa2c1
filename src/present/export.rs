use crate::config::ExportFormat;
use crate::present::{cell_text, column_order};
use crate::service::models::Record;
use crate::session::SessionTarget;
use crate::workbench::ExecutionRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::error::Error;
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

#[derive(Debug)]
pub enum ExportError {
    NotARowSet,
    CsvError(csv::Error),
    JsonError(serde_json::Error),
    IoError(std::io::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::NotARowSet => write!(f, "only row results can be exported"),
            ExportError::CsvError(err) => write!(f, "CSV error: {}", err),
            ExportError::JsonError(err) => write!(f, "JSON error: {}", err),
            ExportError::IoError(err) => write!(f, "IO error: {}", err),
        }
    }
}

impl Error for ExportError {}

impl From<csv::Error> for ExportError {
    fn from(err: csv::Error) -> Self {
        ExportError::CsvError(err)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::JsonError(err)
    }
}

impl From<std::io::Error> for ExportError {
    fn from(err: std::io::Error) -> Self {
        ExportError::IoError(err)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryExport<'a> {
    query: ExportedQuery<'a>,
    executed_at: DateTime<Utc>,
    results: &'a [Record],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportedQuery<'a> {
    natural_language: &'a str,
    sql: &'a str,
    database: &'a str,
}

/// Comma-separated text: a header line, then one line per record. Fields
/// holding a comma, quote or line break are quoted with inner quotes doubled.
pub fn to_delimited_text(rows: &[Record], columns: &[String]) -> Result<String, ExportError> {
    if columns.is_empty() {
        return Ok(String::new());
    }

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(columns)?;
    for row in rows {
        writer.write_record(columns.iter().map(|column| cell_text(row.get(column))))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::IoError(e.into_error()))?;
    String::from_utf8(bytes)
        .map_err(|e| ExportError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// JSON document with the question, the statement that ran, the database
/// display name, when it ran, and the rows.
pub fn to_structured_text(
    record: &ExecutionRecord,
    target: &SessionTarget,
) -> Result<String, ExportError> {
    let rows = record.row_set().ok_or(ExportError::NotARowSet)?;
    let document = QueryExport {
        query: ExportedQuery {
            natural_language: &record.prompt,
            sql: &record.sql,
            database: &target.display_name,
        },
        executed_at: record.executed_at,
        results: &rows.rows,
    };
    Ok(serde_json::to_string_pretty(&document)?)
}

pub fn render(
    format: ExportFormat,
    record: &ExecutionRecord,
    target: &SessionTarget,
) -> Result<String, ExportError> {
    match format {
        ExportFormat::Csv => {
            let rows = record.row_set().ok_or(ExportError::NotARowSet)?;
            to_delimited_text(&rows.rows, &column_order(rows))
        }
        ExportFormat::Json => to_structured_text(record, target),
    }
}

pub fn export_file_name(format: ExportFormat, at: DateTime<Utc>) -> String {
    numbered_file_name(format, at, 0)
}

fn numbered_file_name(format: ExportFormat, at: DateTime<Utc>, copy: u32) -> String {
    let stamp = at.format("%Y%m%d-%H%M%S");
    match copy {
        0 => format!("query-results-{}.{}", stamp, format.extension()),
        n => format!("query-results-{}-{}.{}", stamp, n, format.extension()),
    }
}

/// Writes a new export file. Never replaces an existing one: a name already
/// taken within the same second gets a `-1`, `-2`, ... suffix.
pub async fn write_export(
    dir: &Path,
    format: ExportFormat,
    contents: &str,
) -> Result<PathBuf, ExportError> {
    tokio::fs::create_dir_all(dir).await?;
    let at = Utc::now();

    let mut copy = 0;
    loop {
        let path = dir.join(numbered_file_name(format, at, copy));
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(mut file) => {
                file.write_all(contents.as_bytes()).await?;
                file.flush().await?;
                return Ok(path);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => copy += 1,
            Err(e) => return Err(e.into()),
        }
    }
}
