use crate::api::CHAT_PATH;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route(CHAT_PATH, post(super::handlers::chat::chat))
        .route("/health", get(super::handlers::health::health_check))
        .with_state(state)
}
