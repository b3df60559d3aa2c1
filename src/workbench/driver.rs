use crate::config::ExportFormat;
use crate::present::export;
use crate::service::models::SchemaSnapshot;
use crate::service::{SchemaSource, ServiceError, SqlExecutor, SqlGenerator};
use crate::session::SessionTarget;
use crate::workbench::{Completion, Workbench, WorkbenchError, WorkbenchView};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Runs the workbench against live services.
///
/// The state lock is never held across a network call, so a second request
/// arriving while one is in flight sees `Generating`/`Executing` and is
/// rejected with `Busy` instead of queueing.
#[derive(Clone)]
pub struct WorkbenchSession {
    state: Arc<Mutex<Workbench>>,
    generator: Arc<dyn SqlGenerator>,
    executor: Arc<dyn SqlExecutor>,
    schema_source: Arc<dyn SchemaSource>,
    call_timeout: Duration,
    export_dir: PathBuf,
}

impl WorkbenchSession {
    pub fn new(
        workbench: Workbench,
        generator: Arc<dyn SqlGenerator>,
        executor: Arc<dyn SqlExecutor>,
        schema_source: Arc<dyn SchemaSource>,
        call_timeout: Duration,
        export_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            state: Arc::new(Mutex::new(workbench)),
            generator,
            executor,
            schema_source,
            call_timeout,
            export_dir: export_dir.into(),
        }
    }

    pub async fn view(&self) -> WorkbenchView {
        self.state.lock().await.view()
    }

    pub async fn target(&self) -> SessionTarget {
        self.state.lock().await.target().clone()
    }

    /// Returns the schema, fetching it on first use. A failed fetch yields an
    /// empty snapshot and is retried next time.
    pub async fn load_schema(&self) -> SchemaSnapshot {
        let target = {
            let state = self.state.lock().await;
            if let Some(schema) = state.schema() {
                return schema.clone();
            }
            state.target().clone()
        };

        let outcome = self
            .with_timeout(self.schema_source.load_schema(&target))
            .await;

        match outcome {
            Ok(schema) => {
                self.state.lock().await.set_schema(schema.clone());
                schema
            }
            Err(e) => {
                let error = WorkbenchError::SchemaUnavailable(e.to_string());
                warn!("{}; continuing without table list", error);
                SchemaSnapshot::default()
            }
        }
    }

    pub async fn set_prompt(&self, prompt: &str) {
        self.state.lock().await.set_prompt(prompt);
    }

    pub async fn edit_sql(&self, sql: &str) {
        self.state.lock().await.edit_sql(sql);
    }

    pub async fn acknowledge(&self) -> Result<(), WorkbenchError> {
        self.state.lock().await.acknowledge()
    }

    pub async fn reset(&self) {
        self.state.lock().await.reset();
    }

    /// Sets the prompt and generates SQL for it.
    pub async fn ask(&self, prompt: &str) -> Result<Completion, WorkbenchError> {
        self.set_prompt(prompt).await;
        self.submit_prompt().await
    }

    /// Generates SQL for the current prompt. A service failure is recorded as
    /// the current error and also returned.
    pub async fn submit_prompt(&self) -> Result<Completion, WorkbenchError> {
        let (ticket, target) = {
            let mut state = self.state.lock().await;
            let ticket = state.begin_generation()?;
            (ticket, state.target().clone())
        };

        let outcome = self
            .with_timeout(self.generator.generate(ticket.prompt(), &target))
            .await;
        let failure = outcome
            .as_ref()
            .err()
            .map(|e| WorkbenchError::GenerationFailed(e.to_string()));

        let completion = self.state.lock().await.complete_generation(ticket, outcome);
        settle(completion, failure)
    }

    /// Runs the editable SQL if the safety gate allows it.
    pub async fn execute(&self) -> Result<Completion, WorkbenchError> {
        let (ticket, target) = {
            let mut state = self.state.lock().await;
            let ticket = state.begin_execution()?;
            (ticket, state.target().clone())
        };

        let outcome = self
            .with_timeout(self.executor.execute(ticket.sql(), &target))
            .await;
        let failure = outcome
            .as_ref()
            .err()
            .map(|e| WorkbenchError::ExecutionFailed(e.to_string()));

        let completion = self.state.lock().await.complete_execution(ticket, outcome);
        settle(completion, failure)
    }

    /// Writes the current row-set to the export directory. Never re-runs
    /// the query.
    pub async fn export(&self, format: ExportFormat) -> Result<PathBuf, WorkbenchError> {
        let contents = {
            let state = self.state.lock().await;
            let record = state
                .execution()
                .filter(|record| record.row_set().is_some())
                .ok_or(WorkbenchError::NoRowSet)?;
            export::render(format, record, state.target())
                .map_err(|e| WorkbenchError::ExportFailed(e.to_string()))?
        };

        let path = export::write_export(Path::new(&self.export_dir), format, &contents)
            .await
            .map_err(|e| WorkbenchError::ExportFailed(e.to_string()))?;
        info!("Exported results to {}", path.display());
        Ok(path)
    }

    async fn with_timeout<T>(
        &self,
        call: impl Future<Output = Result<T, ServiceError>>,
    ) -> Result<T, ServiceError> {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(outcome) => outcome,
            Err(_) => Err(ServiceError::Timeout(format!(
                "no response within {}s",
                self.call_timeout.as_secs_f64()
            ))),
        }
    }
}

fn settle(
    completion: Completion,
    failure: Option<WorkbenchError>,
) -> Result<Completion, WorkbenchError> {
    match (completion, failure) {
        (Completion::Applied, Some(error)) => Err(error),
        (completion, _) => Ok(completion),
    }
}
