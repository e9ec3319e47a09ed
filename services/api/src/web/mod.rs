pub mod auth;
pub mod extract;
pub mod goals;
pub mod rest;
pub mod state;
pub mod system;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use state::AppState;

/// Builds the API router. Cross-origin requests are accepted from any origin.
pub fn router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(system::root_handler))
        .route("/test", get(system::diagnostics_handler))
        .route("/api/auth/register", post(auth::register_handler))
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/auth/google", post(auth::google_auth_handler))
        .route(
            "/api/vision",
            post(rest::create_vision_handler).get(rest::latest_vision_handler),
        )
        .route(
            "/api/goals",
            get(goals::list_goals_handler).post(goals::create_goal_handler),
        )
        .route(
            "/api/goals/{goal_id}",
            put(goals::update_goal_handler).delete(goals::delete_goal_handler),
        )
        .route("/api/chat", post(rest::chat_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(app_state)
}
