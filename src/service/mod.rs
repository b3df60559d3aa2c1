pub mod catalog;
pub mod execution;
pub mod generation;
pub mod http;
pub mod models;
pub mod schema;

use crate::session::SessionTarget;
use async_trait::async_trait;
use models::{DatabaseEntry, ExecutionResult, GenerationResult, SchemaSnapshot};
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    ConnectionError(String),
    Timeout(String),
    ResponseError(String),
    DecodeError(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::ConnectionError(msg) => write!(f, "connection error: {}", msg),
            ServiceError::Timeout(msg) => write!(f, "request timed out: {}", msg),
            ServiceError::ResponseError(msg) => write!(f, "{}", msg),
            ServiceError::DecodeError(msg) => write!(f, "malformed response: {}", msg),
        }
    }
}

impl Error for ServiceError {}

/// Natural-language to SQL translation.
#[async_trait]
pub trait SqlGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        target: &SessionTarget,
    ) -> Result<GenerationResult, ServiceError>;
}

/// Runs a statement. Callers gate execution; implementations never re-check.
#[async_trait]
pub trait SqlExecutor: Send + Sync {
    async fn execute(
        &self,
        sql: &str,
        target: &SessionTarget,
    ) -> Result<ExecutionResult, ServiceError>;
}

#[async_trait]
pub trait SchemaSource: Send + Sync {
    async fn load_schema(&self, target: &SessionTarget) -> Result<SchemaSnapshot, ServiceError>;
}

#[async_trait]
pub trait DatabaseCatalog: Send + Sync {
    async fn list_databases(&self) -> Result<Vec<DatabaseEntry>, ServiceError>;
}
