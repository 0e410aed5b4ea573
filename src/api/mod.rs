mod auth;
mod error;

use axum::{Router, routing::get};
use std::sync::Arc;

use crate::db::{Database, now_unix};
use crate::sessions::SessionManager;
use crate::token::TokenCodec;

pub use auth::AuthApiState;

/// Create the API router.
pub fn create_api_router(
    db: Database,
    sessions: Arc<SessionManager>,
    tokens: Arc<TokenCodec>,
    secure_cookies: bool,
) -> Router {
    let auth_state = AuthApiState {
        db,
        sessions,
        tokens,
        secure_cookies,
    };

    Router::new()
        .merge(auth::router(auth_state))
        .route("/health", get(health))
}

async fn health() -> String {
    format!("ok {}", now_unix())
}
