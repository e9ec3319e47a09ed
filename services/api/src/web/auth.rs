//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for registration, login, and mock Google sign-in.
//!
//! The returned token is the user's id. No endpoint checks it.

use axum::{extract::State, Json};
use futureme_core::operations::{self, AuthSession};
use futureme_core::Registration;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::web::extract::ApiJson;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct GoogleAuthRequest {
    pub id_token: String,
}

/// The public-safe part of a user record.
#[derive(Serialize, ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserResponse,
}

impl From<AuthSession> for AuthResponse {
    fn from(session: AuthSession) -> Self {
        Self {
            token: session.token,
            user: UserResponse {
                id: session.user.id,
                email: session.user.email,
                name: session.user.name,
            },
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /api/auth/register - Create a password account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "User registered", body = AuthResponse),
        (status = 400, description = "Email already registered"),
        (status = 422, description = "Invalid request")
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let registration = Registration {
        email: req.email,
        password: req.password,
        name: req.name,
    };
    let session =
        operations::register(state.store.as_ref(), state.hasher.as_ref(), registration).await?;
    Ok(Json(session.into()))
}

/// POST /api/auth/login - Login with an existing password account
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let session = operations::login(
        state.store.as_ref(),
        state.hasher.as_ref(),
        &req.email,
        &req.password,
    )
    .await?;
    Ok(Json(session.into()))
}

/// POST /api/auth/google - Sign in with a Google id token (not verified)
#[utoipa::path(
    post,
    path = "/api/auth/google",
    request_body = GoogleAuthRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 422, description = "Empty id token")
    )
)]
pub async fn google_auth_handler(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<GoogleAuthRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let session = operations::google_auth(state.store.as_ref(), &req.id_token).await?;
    Ok(Json(session.into()))
}
