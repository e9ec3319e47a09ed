//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the vision and chat endpoints and the master
//! definition for the OpenAPI specification.

use axum::{extract::State, Json};
use futureme_core::document::to_wire_or_empty;
use futureme_core::operations;
use futureme_core::VisionPrompt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, OpenApi, ToSchema};

use crate::error::ApiError;
use crate::web::extract::{ApiJson, ApiQuery};
use crate::web::{auth, goals, state::AppState, system};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register_handler,
        auth::login_handler,
        auth::google_auth_handler,
        create_vision_handler,
        latest_vision_handler,
        goals::list_goals_handler,
        goals::create_goal_handler,
        goals::update_goal_handler,
        goals::delete_goal_handler,
        chat_handler,
        system::root_handler,
        system::diagnostics_handler,
    ),
    components(schemas(
        auth::RegisterRequest,
        auth::LoginRequest,
        auth::GoogleAuthRequest,
        auth::AuthResponse,
        auth::UserResponse,
        VisionRequest,
        goals::CreateGoalRequest,
        goals::UpdateGoalRequest,
        goals::DeleteResponse,
        ChatRequest,
        ChatResponse,
        system::RootResponse,
        system::DiagnosticResponse,
    )),
    tags(
        (name = "FutureMe API", description = "Life vision, goal tracking and reflection endpoints.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// The records of one user are selected with `?user_id=`.
#[derive(Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    pub user_id: String,
}

#[derive(Deserialize, ToSchema)]
pub struct VisionRequest {
    pub user_id: String,
    pub career: String,
    pub lifestyle: String,
    pub timeline: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ChatRequest {
    pub user_id: String,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct ChatResponse {
    pub reply: String,
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Generate and store a life vision from the user's answers.
#[utoipa::path(
    post,
    path = "/api/vision",
    request_body = VisionRequest,
    responses(
        (status = 200, description = "The stored vision record"),
        (status = 422, description = "Invalid request")
    )
)]
pub async fn create_vision_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<VisionRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let prompt = VisionPrompt {
        user_id: req.user_id,
        career: req.career,
        lifestyle: req.lifestyle,
        timeline: req.timeline,
    };
    let vision = operations::create_vision(
        state.store.as_ref(),
        state.vision_composer.as_ref(),
        prompt,
    )
    .await?;
    Ok(Json(vision.to_wire()))
}

/// Fetch the user's most recent vision, or `{}` when there is none.
#[utoipa::path(
    get,
    path = "/api/vision",
    params(UserQuery),
    responses(
        (status = 200, description = "The latest vision record or an empty object")
    )
)]
pub async fn latest_vision_handler(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let vision = operations::latest_vision(state.store.as_ref(), &query.user_id).await?;
    let doc = vision.map(|v| v.to_document());
    Ok(Json(to_wire_or_empty(doc.as_ref())))
}

/// Reply to a chat message. The reply does not depend on the message.
#[utoipa::path(
    post,
    path = "/api/chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "The reflective reply", body = ChatResponse)
    )
)]
pub async fn chat_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ChatRequest>,
) -> Json<ChatResponse> {
    let reply = operations::chat(state.reflection.as_ref(), &req.message);
    Json(ChatResponse { reply })
}
