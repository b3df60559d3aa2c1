use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// One row as returned by the execution service, in column order.
pub type Record = Map<String, Value>;

// Request body for SQL generation
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest<'a> {
    pub prompt: &'a str,
    pub db_filename: &'a str,
}

// Response body for SQL generation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(rename = "generatedSQL")]
    pub generated_sql: String,
    pub safe: bool,
    #[serde(default)]
    pub safety_error: Option<String>,
    #[serde(default)]
    pub schema_used: Option<Value>,
}

// Request body for execution
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest<'a> {
    pub sql: &'a str,
    pub db_filename: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowSetMeta {
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    #[serde(default)]
    pub truncated: Option<bool>,
    #[serde(default)]
    pub applied_limit: Option<u64>,
    #[serde(default)]
    pub duration_ms: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteCounters {
    #[serde(default)]
    pub changes: Option<u64>,
    #[serde(default)]
    pub last_insert_rowid: Option<i64>,
}

/// Raw execution response. Variant order is the discriminant: an array
/// `rows` wins, then a string `message`, anything else is a bare success.
/// `meta` stays raw here so a malformed one cannot knock out the rows.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ExecuteResponse {
    Rows {
        rows: Vec<Record>,
        #[serde(default)]
        meta: Option<Value>,
    },
    Message {
        message: String,
        #[serde(default)]
        result: Option<WriteCounters>,
    },
    Other(Value),
}

#[derive(Debug, Deserialize)]
pub struct TablesResponse {
    #[serde(default)]
    pub tables: Vec<TableEntry>,
}

#[derive(Debug, Deserialize)]
pub struct TableEntry {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<String>,
}

// Catalog listing entry
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseEntry {
    #[serde(rename = "_id")]
    pub id: String,
    pub original_name: String,
    pub filename: String,
    #[serde(default)]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SafetyLevel {
    Safe,
    Unsafe,
}

/// Verdict attached to a generated statement. Recorded once per generation
/// and never touched by later edits of the SQL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafetyVerdict {
    pub level: SafetyLevel,
    pub explanation: Option<String>,
}

impl SafetyVerdict {
    pub fn safe() -> Self {
        Self {
            level: SafetyLevel::Safe,
            explanation: None,
        }
    }

    pub fn unsafe_because(explanation: impl Into<String>) -> Self {
        Self {
            level: SafetyLevel::Unsafe,
            explanation: Some(explanation.into()),
        }
    }

    pub fn is_safe(&self) -> bool {
        self.level == SafetyLevel::Safe
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResult {
    pub sql: String,
    pub verdict: SafetyVerdict,
    pub schema_used: Option<Value>,
}

impl From<GenerateResponse> for GenerationResult {
    fn from(response: GenerateResponse) -> Self {
        let level = if response.safe {
            SafetyLevel::Safe
        } else {
            SafetyLevel::Unsafe
        };
        Self {
            sql: response.generated_sql,
            verdict: SafetyVerdict {
                level,
                explanation: response.safety_error.filter(|e| !e.trim().is_empty()),
            },
            schema_used: response.schema_used,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    /// Column order advertised by the service, when it sent one.
    pub columns: Option<Vec<String>>,
    pub rows: Vec<Record>,
    pub truncated: bool,
    pub applied_limit: Option<u64>,
    pub duration_ms: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WriteOutcome {
    pub message: String,
    pub changes: Option<u64>,
    pub last_insert_rowid: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionResult {
    Rows(RowSet),
    Write(WriteOutcome),
}

impl From<ExecuteResponse> for ExecutionResult {
    fn from(response: ExecuteResponse) -> Self {
        match response {
            ExecuteResponse::Rows { rows, meta } => {
                // Unreadable metadata is dropped, never the rows
                let meta: RowSetMeta = meta
                    .and_then(|raw| serde_json::from_value(raw).ok())
                    .unwrap_or_default();
                ExecutionResult::Rows(RowSet {
                    columns: meta.columns,
                    rows,
                    truncated: meta.truncated.unwrap_or(false),
                    applied_limit: meta.applied_limit,
                    duration_ms: meta.duration_ms,
                })
            }
            ExecuteResponse::Message { message, result } => {
                let counters = result.unwrap_or_default();
                ExecutionResult::Write(WriteOutcome {
                    message,
                    changes: counters.changes,
                    last_insert_rowid: counters.last_insert_rowid,
                })
            }
            ExecuteResponse::Other(_) => ExecutionResult::Rows(RowSet::default()),
        }
    }
}

/// Table name to ordered column names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaSnapshot {
    pub tables: BTreeMap<String, Vec<String>>,
}

impl SchemaSnapshot {
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn columns(&self, table: &str) -> Option<&[String]> {
        self.tables.get(table).map(Vec::as_slice)
    }
}

impl From<TablesResponse> for SchemaSnapshot {
    fn from(response: TablesResponse) -> Self {
        Self {
            tables: response
                .tables
                .into_iter()
                .map(|table| (table.name, table.columns))
                .collect(),
        }
    }
}
