pub mod driver;
pub mod gate;

use crate::present::{self, DisplayModel};
use crate::service::ServiceError;
use crate::service::models::{
    ExecutionResult, GenerationResult, RowSet, SafetyVerdict, SchemaSnapshot,
};
use crate::session::SessionTarget;
use chrono::{DateTime, Utc};
use gate::GateDecision;
use std::error::Error;
use std::fmt;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkbenchError {
    EmptyInputRejected,
    PromptTooLong { max: usize },
    MissingStorageId,
    Busy(Phase),
    AcknowledgmentRequired,
    NothingToAcknowledge,
    NoRowSet,
    GenerationFailed(String),
    ExecutionFailed(String),
    SchemaUnavailable(String),
    ExportFailed(String),
}

impl fmt::Display for WorkbenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkbenchError::EmptyInputRejected => write!(f, "Nothing to submit: input is empty"),
            WorkbenchError::PromptTooLong { max } => {
                write!(f, "Prompt is longer than {} characters", max)
            }
            WorkbenchError::MissingStorageId => write!(f, "No database selected"),
            WorkbenchError::Busy(phase) => write!(f, "Another request is in flight ({})", phase),
            WorkbenchError::AcknowledgmentRequired => {
                write!(f, "Statement was flagged unsafe; acknowledge it before running")
            }
            WorkbenchError::NothingToAcknowledge => {
                write!(f, "There is no unsafe statement to acknowledge")
            }
            WorkbenchError::NoRowSet => write!(f, "There are no rows to export"),
            WorkbenchError::GenerationFailed(reason) => {
                write!(f, "SQL generation failed: {}", reason)
            }
            WorkbenchError::ExecutionFailed(reason) => write!(f, "Execution failed: {}", reason),
            WorkbenchError::SchemaUnavailable(reason) => {
                write!(f, "Schema unavailable: {}", reason)
            }
            WorkbenchError::ExportFailed(reason) => write!(f, "Export failed: {}", reason),
        }
    }
}

impl Error for WorkbenchError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Generating,
    GeneratedSafe,
    GeneratedUnsafe,
    Executing,
    Results,
    WriteOutcome,
}

impl Phase {
    pub fn is_busy(&self) -> bool {
        matches!(self, Phase::Generating | Phase::Executing)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Idle => "idle",
            Phase::Generating => "generating",
            Phase::GeneratedSafe => "generated (safe)",
            Phase::GeneratedUnsafe => "generated (unsafe)",
            Phase::Executing => "executing",
            Phase::Results => "results",
            Phase::WriteOutcome => "write outcome",
        };
        f.write_str(name)
    }
}

/// What actually ran, kept alongside its result for export.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionRecord {
    pub prompt: String,
    pub sql: String,
    pub executed_at: DateTime<Utc>,
    pub result: ExecutionResult,
}

impl ExecutionRecord {
    pub fn row_set(&self) -> Option<&RowSet> {
        match &self.result {
            ExecutionResult::Rows(set) => Some(set),
            ExecutionResult::Write(_) => None,
        }
    }
}

#[derive(Debug)]
pub struct GenerationTicket {
    id: u64,
    prompt: String,
}

impl GenerationTicket {
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

#[derive(Debug)]
pub struct ExecutionTicket {
    id: u64,
    sql: String,
}

impl ExecutionTicket {
    pub fn sql(&self) -> &str {
        &self.sql
    }
}

/// Whether a finished request was applied or arrived for a superseded slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Discarded,
}

#[derive(Debug)]
enum InFlight {
    Generation { id: u64 },
    Execution { id: u64, prompt: String, sql: String },
}

/// Client-side state of one query session against one database.
///
/// Network calls never happen in here. Each request is split into a `begin_*`
/// that validates and hands out a ticket, and a `complete_*` that applies the
/// response only if that ticket is still the current one.
#[derive(Debug)]
pub struct Workbench {
    target: SessionTarget,
    max_prompt_chars: usize,
    prompt: String,
    editable_sql: String,
    generation: Option<GenerationResult>,
    acknowledged: bool,
    execution: Option<ExecutionRecord>,
    error: Option<WorkbenchError>,
    schema: Option<SchemaSnapshot>,
    in_flight: Option<InFlight>,
    next_ticket: u64,
}

impl Workbench {
    pub fn new(target: SessionTarget, max_prompt_chars: usize) -> Self {
        Self {
            target,
            max_prompt_chars,
            prompt: String::new(),
            editable_sql: String::new(),
            generation: None,
            acknowledged: false,
            execution: None,
            error: None,
            schema: None,
            in_flight: None,
            next_ticket: 1,
        }
    }

    pub fn target(&self) -> &SessionTarget {
        &self.target
    }

    pub fn phase(&self) -> Phase {
        match &self.in_flight {
            Some(InFlight::Generation { .. }) => return Phase::Generating,
            Some(InFlight::Execution { .. }) => return Phase::Executing,
            None => {}
        }
        if let Some(record) = &self.execution {
            return match record.result {
                ExecutionResult::Rows(_) => Phase::Results,
                ExecutionResult::Write(_) => Phase::WriteOutcome,
            };
        }
        match &self.generation {
            Some(generation) if generation.verdict.is_safe() => Phase::GeneratedSafe,
            Some(_) => Phase::GeneratedUnsafe,
            None => Phase::Idle,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn editable_sql(&self) -> &str {
        &self.editable_sql
    }

    pub fn generation(&self) -> Option<&GenerationResult> {
        self.generation.as_ref()
    }

    pub fn verdict(&self) -> Option<&SafetyVerdict> {
        self.generation.as_ref().map(|g| &g.verdict)
    }

    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged
    }

    pub fn execution(&self) -> Option<&ExecutionRecord> {
        self.execution.as_ref()
    }

    pub fn error(&self) -> Option<&WorkbenchError> {
        self.error.as_ref()
    }

    pub fn schema(&self) -> Option<&SchemaSnapshot> {
        self.schema.as_ref()
    }

    pub fn can_execute(&self) -> bool {
        !self.phase().is_busy()
            && gate::is_execution_permitted(self.verdict(), self.acknowledged, &self.editable_sql)
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn set_schema(&mut self, schema: SchemaSnapshot) {
        self.schema = Some(schema);
    }

    /// Replaces the editable SQL. The recorded verdict and the
    /// acknowledgment are left as they are.
    pub fn edit_sql(&mut self, sql: impl Into<String>) {
        self.editable_sql = sql.into();
        debug!("Editable SQL updated in phase {}", self.phase());
    }

    pub fn acknowledge(&mut self) -> Result<(), WorkbenchError> {
        match &self.generation {
            Some(generation) if !generation.verdict.is_safe() => {
                self.acknowledged = true;
                info!("Unsafe statement acknowledged");
                Ok(())
            }
            _ => Err(WorkbenchError::NothingToAcknowledge),
        }
    }

    pub fn begin_generation(&mut self) -> Result<GenerationTicket, WorkbenchError> {
        self.ensure_idle_slot()?;

        let prompt = self.prompt.trim();
        if prompt.is_empty() {
            return Err(WorkbenchError::EmptyInputRejected);
        }
        if prompt.chars().count() > self.max_prompt_chars {
            return Err(WorkbenchError::PromptTooLong {
                max: self.max_prompt_chars,
            });
        }
        if !self.target.has_valid_storage_id() {
            return Err(WorkbenchError::MissingStorageId);
        }

        let prompt = prompt.to_string();
        let id = self.issue_ticket();
        self.in_flight = Some(InFlight::Generation { id });
        self.error = None;
        info!("Generation #{} started", id);

        Ok(GenerationTicket { id, prompt })
    }

    pub fn complete_generation(
        &mut self,
        ticket: GenerationTicket,
        outcome: Result<GenerationResult, ServiceError>,
    ) -> Completion {
        match self.in_flight {
            Some(InFlight::Generation { id }) if id == ticket.id => {}
            _ => {
                debug!("Discarding stale generation #{}", ticket.id);
                return Completion::Discarded;
            }
        }
        self.in_flight = None;
        // Results belonged to the previous statement
        self.execution = None;

        match outcome {
            Ok(generation) => {
                self.editable_sql = generation.sql.clone();
                self.acknowledged = false;
                self.error = None;
                self.generation = Some(generation);
                info!("Generation #{} completed: {}", ticket.id, self.phase());
            }
            Err(e) => {
                warn!("Generation #{} failed: {}", ticket.id, e);
                self.error = Some(WorkbenchError::GenerationFailed(e.to_string()));
            }
        }
        Completion::Applied
    }

    pub fn begin_execution(&mut self) -> Result<ExecutionTicket, WorkbenchError> {
        self.ensure_idle_slot()?;

        match gate::evaluate(self.verdict(), self.acknowledged, &self.editable_sql) {
            GateDecision::Permitted => {}
            GateDecision::EmptyStatement => return Err(WorkbenchError::EmptyInputRejected),
            GateDecision::NeedsAcknowledgment => {
                return Err(WorkbenchError::AcknowledgmentRequired);
            }
        }
        if !self.target.has_valid_storage_id() {
            return Err(WorkbenchError::MissingStorageId);
        }

        let sql = self.editable_sql.clone();
        let id = self.issue_ticket();
        self.in_flight = Some(InFlight::Execution {
            id,
            prompt: self.prompt.clone(),
            sql: sql.clone(),
        });
        self.error = None;
        info!("Execution #{} started", id);

        Ok(ExecutionTicket { id, sql })
    }

    pub fn complete_execution(
        &mut self,
        ticket: ExecutionTicket,
        outcome: Result<ExecutionResult, ServiceError>,
    ) -> Completion {
        let (prompt, sql) = match self.in_flight.take() {
            Some(InFlight::Execution { id, prompt, sql }) if id == ticket.id => (prompt, sql),
            other => {
                self.in_flight = other;
                debug!("Discarding stale execution #{}", ticket.id);
                return Completion::Discarded;
            }
        };

        match outcome {
            Ok(result) => {
                self.execution = Some(ExecutionRecord {
                    prompt,
                    sql,
                    executed_at: Utc::now(),
                    result,
                });
                self.error = None;
                info!("Execution #{} completed: {}", ticket.id, self.phase());
            }
            Err(e) => {
                // Previous results stay until a new execution succeeds
                warn!("Execution #{} failed: {}", ticket.id, e);
                self.error = Some(WorkbenchError::ExecutionFailed(e.to_string()));
            }
        }
        Completion::Applied
    }

    /// Back to `Idle`. Any request still in flight will be discarded when it
    /// lands.
    pub fn reset(&mut self) {
        self.prompt.clear();
        self.editable_sql.clear();
        self.generation = None;
        self.acknowledged = false;
        self.execution = None;
        self.error = None;
        self.in_flight = None;
        info!("Workbench reset");
    }

    pub fn view(&self) -> WorkbenchView {
        WorkbenchView {
            target: self.target.clone(),
            phase: self.phase(),
            prompt: self.prompt.clone(),
            editable_sql: self.editable_sql.clone(),
            verdict: self.verdict().cloned(),
            sql_edited: self
                .generation
                .as_ref()
                .is_some_and(|g| g.sql != self.editable_sql),
            acknowledged: self.acknowledged,
            can_execute: self.can_execute(),
            error: self.error.as_ref().map(ToString::to_string),
            display: self.execution.as_ref().map(|r| present::present(&r.result)),
        }
    }

    fn ensure_idle_slot(&self) -> Result<(), WorkbenchError> {
        let phase = self.phase();
        if phase.is_busy() {
            return Err(WorkbenchError::Busy(phase));
        }
        Ok(())
    }

    fn issue_ticket(&mut self) -> u64 {
        let id = self.next_ticket;
        self.next_ticket += 1;
        id
    }
}

/// Read-only copy of the workbench for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkbenchView {
    pub target: SessionTarget,
    pub phase: Phase,
    pub prompt: String,
    pub editable_sql: String,
    pub verdict: Option<SafetyVerdict>,
    /// The SQL no longer matches what the verdict was computed for.
    pub sql_edited: bool,
    pub acknowledged: bool,
    pub can_execute: bool,
    pub error: Option<String>,
    pub display: Option<DisplayModel>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::models::{SafetyLevel, WriteOutcome};
    use serde_json::json;

    fn workbench() -> Workbench {
        Workbench::new(SessionTarget::new("Sales", "1695.sales.db"), 1000)
    }

    fn generated(sql: &str, verdict: SafetyVerdict) -> GenerationResult {
        GenerationResult {
            sql: sql.to_string(),
            verdict,
            schema_used: None,
        }
    }

    fn rows(count: usize) -> ExecutionResult {
        let rows = (0..count)
            .map(|i| json!({"id": i}).as_object().cloned().unwrap())
            .collect();
        ExecutionResult::Rows(RowSet {
            rows,
            ..RowSet::default()
        })
    }

    fn write_outcome() -> ExecutionResult {
        ExecutionResult::Write(WriteOutcome {
            message: "Statement executed successfully.".to_string(),
            changes: Some(0),
            last_insert_rowid: None,
        })
    }

    fn generate(wb: &mut Workbench, prompt: &str, result: GenerationResult) {
        wb.set_prompt(prompt);
        let ticket = wb.begin_generation().unwrap();
        assert_eq!(wb.complete_generation(ticket, Ok(result)), Completion::Applied);
    }

    fn execute(wb: &mut Workbench, result: ExecutionResult) {
        let ticket = wb.begin_execution().unwrap();
        assert_eq!(wb.complete_execution(ticket, Ok(result)), Completion::Applied);
    }

    #[test]
    fn test_starts_idle() {
        let wb = workbench();
        assert_eq!(wb.phase(), Phase::Idle);
        assert!(!wb.can_execute());
        assert!(wb.execution().is_none());
        assert!(wb.schema().is_none());
    }

    #[test]
    fn test_empty_prompt_rejected_locally() {
        let mut wb = workbench();
        wb.set_prompt("   ");
        assert_eq!(wb.begin_generation().unwrap_err(), WorkbenchError::EmptyInputRejected);
        assert_eq!(wb.phase(), Phase::Idle);
    }

    #[test]
    fn test_long_prompt_rejected_locally() {
        let mut wb = Workbench::new(SessionTarget::from_storage_id("a.db"), 5);
        wb.set_prompt("abcdef");
        assert_eq!(
            wb.begin_generation().unwrap_err(),
            WorkbenchError::PromptTooLong { max: 5 }
        );
    }

    #[test]
    fn test_missing_storage_id_rejected() {
        let mut wb = Workbench::new(SessionTarget::new("Nameless", ""), 100);
        wb.set_prompt("count orders");
        assert_eq!(wb.begin_generation().unwrap_err(), WorkbenchError::MissingStorageId);
    }

    #[test]
    fn test_safe_generation_seeds_sql_and_permits_execution() {
        let mut wb = workbench();
        let sql = "SELECT * FROM customers ORDER BY revenue DESC LIMIT 10;";
        wb.set_prompt("top 10 customers by revenue");

        let ticket = wb.begin_generation().unwrap();
        assert_eq!(ticket.prompt(), "top 10 customers by revenue");
        assert_eq!(wb.phase(), Phase::Generating);
        wb.complete_generation(ticket, Ok(generated(sql, SafetyVerdict::safe())));

        assert_eq!(wb.phase(), Phase::GeneratedSafe);
        assert_eq!(wb.editable_sql(), sql);
        assert!(!wb.is_acknowledged());
        assert!(wb.can_execute());

        execute(&mut wb, rows(10));
        assert_eq!(wb.phase(), Phase::Results);
        let record = wb.execution().unwrap();
        assert_eq!(record.sql, sql);
        assert_eq!(record.prompt, "top 10 customers by revenue");
        assert_eq!(record.row_set().unwrap().rows.len(), 10);
    }

    #[test]
    fn test_unsafe_generation_requires_acknowledgment() {
        let mut wb = workbench();
        generate(
            &mut wb,
            "drop the customers table",
            generated("DROP TABLE customers;", SafetyVerdict::unsafe_because("Destructive statement")),
        );

        assert_eq!(wb.phase(), Phase::GeneratedUnsafe);
        assert!(!wb.can_execute());
        assert_eq!(wb.begin_execution().unwrap_err(), WorkbenchError::AcknowledgmentRequired);
        assert_eq!(wb.phase(), Phase::GeneratedUnsafe);

        wb.acknowledge().unwrap();
        assert_eq!(wb.phase(), Phase::GeneratedUnsafe);
        assert!(wb.can_execute());

        execute(&mut wb, write_outcome());
        assert_eq!(wb.phase(), Phase::WriteOutcome);
        assert!(wb.execution().unwrap().row_set().is_none());
    }

    #[test]
    fn test_new_generation_resets_acknowledgment() {
        let mut wb = workbench();
        let unsafe_result = generated("DELETE FROM orders;", SafetyVerdict::unsafe_because("Deletes rows"));
        generate(&mut wb, "clear orders", unsafe_result.clone());
        wb.acknowledge().unwrap();
        assert!(wb.is_acknowledged());

        generate(&mut wb, "clear orders again", unsafe_result);
        assert!(!wb.is_acknowledged());
        assert!(!wb.can_execute());
    }

    #[test]
    fn test_acknowledge_needs_unsafe_verdict() {
        let mut wb = workbench();
        assert_eq!(wb.acknowledge().unwrap_err(), WorkbenchError::NothingToAcknowledge);

        generate(&mut wb, "count", generated("SELECT COUNT(*) FROM t;", SafetyVerdict::safe()));
        assert_eq!(wb.acknowledge().unwrap_err(), WorkbenchError::NothingToAcknowledge);
        assert!(!wb.is_acknowledged());
    }

    #[test]
    fn test_editing_keeps_verdict_and_acknowledgment() {
        let mut wb = workbench();
        generate(
            &mut wb,
            "drop it",
            generated("DROP TABLE customers;", SafetyVerdict::unsafe_because("Destructive statement")),
        );
        wb.acknowledge().unwrap();

        wb.edit_sql("DROP TABLE orders;");

        assert_eq!(wb.phase(), Phase::GeneratedUnsafe);
        assert_eq!(wb.editable_sql(), "DROP TABLE orders;");
        let generation = wb.generation().unwrap();
        assert_eq!(generation.sql, "DROP TABLE customers;");
        assert_eq!(generation.verdict.level, SafetyLevel::Unsafe);
        assert_eq!(generation.verdict.explanation.as_deref(), Some("Destructive statement"));
        assert!(wb.is_acknowledged());
        assert!(wb.view().sql_edited);
    }

    #[test]
    fn test_manual_sql_bypasses_gate() {
        let mut wb = workbench();
        wb.edit_sql("DELETE FROM orders;");
        assert_eq!(wb.phase(), Phase::Idle);
        assert!(wb.can_execute());

        let ticket = wb.begin_execution().unwrap();
        assert_eq!(ticket.sql(), "DELETE FROM orders;");
    }

    #[test]
    fn test_blank_sql_cannot_execute() {
        let mut wb = workbench();
        wb.edit_sql("  ");
        assert_eq!(wb.begin_execution().unwrap_err(), WorkbenchError::EmptyInputRejected);
    }

    #[test]
    fn test_generation_failure_keeps_sql_and_clears_results() {
        let mut wb = workbench();
        wb.edit_sql("SELECT 1;");
        execute(&mut wb, rows(1));
        assert_eq!(wb.phase(), Phase::Results);

        wb.set_prompt("something new");
        let ticket = wb.begin_generation().unwrap();
        wb.complete_generation(ticket, Err(ServiceError::ResponseError("model offline".to_string())));

        assert_eq!(wb.phase(), Phase::Idle);
        assert_eq!(wb.editable_sql(), "SELECT 1;");
        assert_eq!(wb.prompt(), "something new");
        assert!(wb.execution().is_none());
        assert_eq!(
            wb.error(),
            Some(&WorkbenchError::GenerationFailed("model offline".to_string()))
        );
    }

    #[test]
    fn test_execution_failure_returns_to_previous_phase() {
        let mut wb = workbench();
        generate(&mut wb, "count", generated("SELECT COUNT(*) FROM t;", SafetyVerdict::safe()));

        let ticket = wb.begin_execution().unwrap();
        assert_eq!(wb.phase(), Phase::Executing);
        wb.complete_execution(
            ticket,
            Err(ServiceError::ConnectionError("connection refused".to_string())),
        );

        assert_eq!(wb.phase(), Phase::GeneratedSafe);
        assert_eq!(wb.editable_sql(), "SELECT COUNT(*) FROM t;");
        assert_eq!(
            wb.error(),
            Some(&WorkbenchError::ExecutionFailed(
                "connection error: connection refused".to_string()
            ))
        );
    }

    #[test]
    fn test_execution_failure_keeps_previous_results() {
        let mut wb = workbench();
        wb.edit_sql("SELECT id FROM t;");
        execute(&mut wb, rows(3));

        let ticket = wb.begin_execution().unwrap();
        wb.complete_execution(ticket, Err(ServiceError::Timeout("30s".to_string())));

        assert_eq!(wb.phase(), Phase::Results);
        assert_eq!(wb.execution().unwrap().row_set().unwrap().rows.len(), 3);
        assert!(matches!(wb.error(), Some(WorkbenchError::ExecutionFailed(_))));
    }

    #[test]
    fn test_success_clears_error() {
        let mut wb = workbench();
        wb.edit_sql("SELECT 1;");
        let ticket = wb.begin_execution().unwrap();
        wb.complete_execution(ticket, Err(ServiceError::Timeout("30s".to_string())));
        assert!(wb.error().is_some());

        execute(&mut wb, rows(1));
        assert!(wb.error().is_none());
    }

    #[test]
    fn test_result_variants_are_exclusive() {
        let mut wb = workbench();
        wb.edit_sql("SELECT 1;");
        execute(&mut wb, rows(2));
        assert_eq!(wb.phase(), Phase::Results);

        execute(&mut wb, write_outcome());
        assert_eq!(wb.phase(), Phase::WriteOutcome);
        assert!(wb.execution().unwrap().row_set().is_none());

        execute(&mut wb, rows(1));
        assert_eq!(wb.phase(), Phase::Results);
        assert!(matches!(wb.execution().unwrap().result, ExecutionResult::Rows(_)));
    }

    #[test]
    fn test_busy_rejects_second_request() {
        let mut wb = workbench();
        wb.set_prompt("count");
        wb.edit_sql("SELECT 1;");
        let _ticket = wb.begin_generation().unwrap();

        assert_eq!(wb.begin_generation().unwrap_err(), WorkbenchError::Busy(Phase::Generating));
        assert_eq!(wb.begin_execution().unwrap_err(), WorkbenchError::Busy(Phase::Generating));
        assert!(!wb.can_execute());
    }

    #[test]
    fn test_reset_discards_in_flight_response() {
        let mut wb = workbench();
        wb.set_prompt("count");
        let ticket = wb.begin_generation().unwrap();
        wb.reset();

        let completion =
            wb.complete_generation(ticket, Ok(generated("SELECT 1;", SafetyVerdict::safe())));

        assert_eq!(completion, Completion::Discarded);
        assert_eq!(wb.phase(), Phase::Idle);
        assert_eq!(wb.editable_sql(), "");
        assert!(wb.generation().is_none());
    }

    #[test]
    fn test_superseded_execution_is_discarded() {
        let mut wb = workbench();
        wb.edit_sql("SELECT 1;");
        let stale = wb.begin_execution().unwrap();
        wb.reset();
        wb.edit_sql("SELECT 2;");
        let current = wb.begin_execution().unwrap();

        assert_eq!(wb.complete_execution(stale, Ok(rows(5))), Completion::Discarded);
        assert_eq!(wb.phase(), Phase::Executing);
        assert_eq!(wb.complete_execution(current, Ok(rows(1))), Completion::Applied);
        assert_eq!(wb.execution().unwrap().sql, "SELECT 2;");
        assert_eq!(wb.execution().unwrap().row_set().unwrap().rows.len(), 1);
    }

    #[test]
    fn test_reset_clears_everything_but_target_and_schema() {
        let mut wb = workbench();
        wb.set_schema(SchemaSnapshot::default());
        generate(
            &mut wb,
            "drop",
            generated("DROP TABLE t;", SafetyVerdict::unsafe_because("Destructive statement")),
        );
        wb.acknowledge().unwrap();
        execute(&mut wb, write_outcome());

        wb.reset();

        assert_eq!(wb.phase(), Phase::Idle);
        assert_eq!(wb.prompt(), "");
        assert_eq!(wb.editable_sql(), "");
        assert!(wb.generation().is_none());
        assert!(!wb.is_acknowledged());
        assert!(wb.execution().is_none());
        assert!(wb.error().is_none());
        assert_eq!(wb.target().storage_id, "1695.sales.db");
        assert!(wb.schema().is_some());
    }
}
