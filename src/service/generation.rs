use crate::service::http::HttpBackend;
use crate::service::models::{GenerateRequest, GenerateResponse, GenerationResult};
use crate::service::{ServiceError, SqlGenerator};
use crate::session::SessionTarget;
use async_trait::async_trait;
use tracing::{debug, info};

#[async_trait]
impl SqlGenerator for HttpBackend {
    async fn generate(
        &self,
        prompt: &str,
        target: &SessionTarget,
    ) -> Result<GenerationResult, ServiceError> {
        let url = self.endpoint(&self.generate_path, &[])?;
        let request = GenerateRequest {
            prompt,
            db_filename: &target.storage_id,
        };

        info!("Requesting SQL generation for database {}", target.storage_id);
        debug!("Prompt: {}", prompt);

        let response: GenerateResponse = self.post_json(url, &request).await?;
        let result = GenerationResult::from(response);

        if result.sql.trim().is_empty() {
            return Err(ServiceError::DecodeError(
                "service returned an empty statement".to_string(),
            ));
        }

        info!(
            "Generated SQL (safe: {}): {}",
            result.verdict.is_safe(),
            result.sql
        );
        Ok(result)
    }
}
