use crate::service::http::HttpBackend;
use crate::service::models::{ExecuteRequest, ExecuteResponse, ExecutionResult};
use crate::service::{ServiceError, SqlExecutor};
use crate::session::SessionTarget;
use async_trait::async_trait;
use tracing::info;

#[async_trait]
impl SqlExecutor for HttpBackend {
    async fn execute(
        &self,
        sql: &str,
        target: &SessionTarget,
    ) -> Result<ExecutionResult, ServiceError> {
        let url = self.endpoint(&self.execute_path, &[])?;
        let request = ExecuteRequest {
            sql,
            db_filename: &target.storage_id,
        };

        info!("Executing SQL against {}: {}", target.storage_id, sql);

        // The response shape is decided here, once
        let response: ExecuteResponse = self.post_json(url, &request).await?;
        let result = ExecutionResult::from(response);

        match &result {
            ExecutionResult::Rows(set) => info!(
                "Query returned {} rows (truncated: {})",
                set.rows.len(),
                set.truncated
            ),
            ExecutionResult::Write(outcome) => info!(
                "Statement completed: {} (changes: {:?})",
                outcome.message, outcome.changes
            ),
        }

        Ok(result)
    }
}
