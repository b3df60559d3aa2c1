use crate::service::http::HttpBackend;
use crate::service::models::{SchemaSnapshot, TablesResponse};
use crate::service::{SchemaSource, ServiceError};
use crate::session::SessionTarget;
use async_trait::async_trait;
use tracing::info;

#[async_trait]
impl SchemaSource for HttpBackend {
    async fn load_schema(&self, target: &SessionTarget) -> Result<SchemaSnapshot, ServiceError> {
        let url = self.endpoint(&self.databases_path, &[target.storage_id.as_str(), "tables"])?;
        let response: TablesResponse = self.get_json(url).await?;
        let snapshot = SchemaSnapshot::from(response);

        info!(
            "Loaded schema for {}: {} tables",
            target.storage_id,
            snapshot.tables.len()
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::http::test_server::{backend, spawn};
    use axum::extract::Path;
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;

    #[tokio::test]
    async fn test_load_schema_for_storage_id() {
        let router = Router::new().route(
            "/api/dbs/{db}/tables",
            get(|Path(db): Path<String>| async move {
                assert_eq!(db, "my sales.db");
                Json(json!({
                    "tables": [
                        {"name": "customers", "columns": ["id", "name", "revenue"]}
                    ]
                }))
            }),
        );
        let base = spawn(router).await;
        let target = SessionTarget::new("Sales", "my sales.db");

        let snapshot = backend(&base, None).load_schema(&target).await.unwrap();

        assert_eq!(
            snapshot.columns("customers").unwrap(),
            &["id".to_string(), "name".to_string(), "revenue".to_string()]
        );
    }

    #[tokio::test]
    async fn test_load_schema_missing_database() {
        let base = spawn(Router::new()).await;

        let result = backend(&base, None)
            .load_schema(&SessionTarget::from_storage_id("gone.db"))
            .await;

        assert_eq!(result, Err(ServiceError::ResponseError("HTTP 404".to_string())));
    }
}
