//! services/api/src/web/goals.rs
//!
//! Goal CRUD endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use futureme_core::operations;
use futureme_core::{GoalChanges, GoalDraft};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::web::extract::{ApiJson, ApiQuery};
use crate::web::rest::UserQuery;
use crate::web::state::AppState;

#[derive(Deserialize, ToSchema)]
pub struct CreateGoalRequest {
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub target_date: Option<String>,
    /// Percentage between 0 and 100; defaults to 0.
    pub progress: Option<i64>,
    pub category: Option<String>,
}

/// Only the fields present (and non-null) are changed.
#[derive(Deserialize, ToSchema)]
pub struct UpdateGoalRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub target_date: Option<String>,
    pub progress: Option<i64>,
    pub category: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct DeleteResponse {
    pub ok: bool,
}

/// List the user's goals, newest first.
#[utoipa::path(
    get,
    path = "/api/goals",
    params(UserQuery),
    responses(
        (status = 200, description = "Array of goal records")
    )
)]
pub async fn list_goals_handler(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<Vec<serde_json::Value>>, ApiError> {
    let goals = operations::list_goals(state.store.as_ref(), &query.user_id).await?;
    Ok(Json(goals.iter().map(|g| g.to_wire()).collect()))
}

#[utoipa::path(
    post,
    path = "/api/goals",
    request_body = CreateGoalRequest,
    responses(
        (status = 200, description = "The stored goal record"),
        (status = 422, description = "Progress out of range or missing owner")
    )
)]
pub async fn create_goal_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateGoalRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let draft = GoalDraft {
        user_id: req.user_id,
        title: req.title,
        description: req.description,
        target_date: req.target_date,
        progress: req.progress,
        category: req.category,
    };
    let goal = operations::create_goal(state.store.as_ref(), draft).await?;
    Ok(Json(goal.to_wire()))
}

#[utoipa::path(
    put,
    path = "/api/goals/{goal_id}",
    request_body = UpdateGoalRequest,
    params(("goal_id" = String, Path, description = "Identity of the goal")),
    responses(
        (status = 200, description = "The updated goal record"),
        (status = 400, description = "Malformed goal id"),
        (status = 404, description = "Goal not found"),
        (status = 422, description = "Progress out of range")
    )
)]
pub async fn update_goal_handler(
    State(state): State<Arc<AppState>>,
    Path(goal_id): Path<String>,
    ApiJson(req): ApiJson<UpdateGoalRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let changes = GoalChanges {
        title: req.title,
        description: req.description,
        target_date: req.target_date,
        progress: req.progress,
        category: req.category,
    };
    let goal = operations::update_goal(state.store.as_ref(), &goal_id, changes).await?;
    Ok(Json(goal.to_wire()))
}

#[utoipa::path(
    delete,
    path = "/api/goals/{goal_id}",
    params(("goal_id" = String, Path, description = "Identity of the goal")),
    responses(
        (status = 200, description = "Goal deleted", body = DeleteResponse),
        (status = 400, description = "Malformed goal id"),
        (status = 404, description = "Goal not found")
    )
)]
pub async fn delete_goal_handler(
    State(state): State<Arc<AppState>>,
    Path(goal_id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    operations::delete_goal(state.store.as_ref(), &goal_id).await?;
    Ok(Json(DeleteResponse { ok: true }))
}
