use crate::service::http::HttpBackend;
use crate::service::models::DatabaseEntry;
use crate::service::{DatabaseCatalog, ServiceError};
use crate::session::SessionTarget;
use async_trait::async_trait;
use tracing::info;

#[async_trait]
impl DatabaseCatalog for HttpBackend {
    async fn list_databases(&self) -> Result<Vec<DatabaseEntry>, ServiceError> {
        let url = self.endpoint(&self.databases_path, &[])?;
        let databases: Vec<DatabaseEntry> = self.get_json(url).await?;
        info!("Catalog lists {} databases", databases.len());
        Ok(databases)
    }
}

impl From<DatabaseEntry> for SessionTarget {
    fn from(entry: DatabaseEntry) -> Self {
        SessionTarget::new(entry.original_name, entry.filename).with_record_id(entry.id)
    }
}

/// Finds a catalog entry by display name, storage file name or record id.
/// Exact matches on the file name or id win over a display-name match.
pub fn resolve_target(entries: &[DatabaseEntry], wanted: &str) -> Option<SessionTarget> {
    entries
        .iter()
        .find(|entry| entry.filename == wanted || entry.id == wanted)
        .or_else(|| {
            entries
                .iter()
                .find(|entry| entry.original_name.eq_ignore_ascii_case(wanted))
        })
        .cloned()
        .map(SessionTarget::from)
}
