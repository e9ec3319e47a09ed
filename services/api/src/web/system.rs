//! services/api/src/web/system.rs
//!
//! Liveness and store diagnostic endpoints. Operational only.

use axum::{extract::State, Json};
use futureme_core::operations;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

use crate::web::state::AppState;

#[derive(Serialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct DiagnosticResponse {
    pub backend: String,
    pub store: String,
    pub database: String,
    pub database_url: String,
    pub database_name: String,
    pub connection_status: String,
    pub collections: Vec<String>,
}

fn presence(value: &Option<String>) -> String {
    if value.is_some() { "Set" } else { "Not Set" }.to_string()
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "The service is up", body = RootResponse))
)]
pub async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: "FutureMe API is running".to_string(),
    })
}

/// Reports store connectivity and which database settings are present.
/// A failing store is described in the body; the endpoint itself still answers 200.
#[utoipa::path(
    get,
    path = "/test",
    responses((status = 200, description = "Diagnostic report", body = DiagnosticResponse))
)]
pub async fn diagnostics_handler(State(state): State<Arc<AppState>>) -> Json<DiagnosticResponse> {
    let report = operations::diagnose(state.store.as_ref()).await;
    Json(DiagnosticResponse {
        backend: "Running".to_string(),
        store: report.backend,
        database: report.database,
        database_url: presence(&state.config.database_url),
        database_name: presence(&state.config.database_name),
        connection_status: report.connection_status,
        collections: report.collections,
    })
}
