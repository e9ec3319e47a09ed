//! Store connectivity report for the operational `/test` endpoint.

use tracing::warn;

use crate::ports::DocumentStore;

/// At most this many collection names are reported.
pub const MAX_REPORTED_COLLECTIONS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticReport {
    pub backend: String,
    pub database: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

/// Probes the store. A failing store is described in the report rather than
/// returned as an error.
pub async fn diagnose(store: &dyn DocumentStore) -> DiagnosticReport {
    let backend = store.backend().to_string();
    match store.collection_names().await {
        Ok(mut collections) => {
            collections.truncate(MAX_REPORTED_COLLECTIONS);
            let (database, connection_status) = if store.is_persistent() {
                ("Connected & Working", "Connected")
            } else {
                ("Not Available (records kept in memory)", "Not Connected")
            };
            DiagnosticReport {
                backend,
                database: database.to_string(),
                connection_status: connection_status.to_string(),
                collections,
            }
        }
        Err(e) => {
            warn!("Store diagnostic failed: {}", e);
            let detail: String = e.to_string().chars().take(50).collect();
            DiagnosticReport {
                backend,
                database: format!("Connected but Error: {}", detail),
                connection_status: "Error".to_string(),
                collections: Vec::new(),
            }
        }
    }
}
