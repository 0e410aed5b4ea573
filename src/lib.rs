pub mod api;
pub mod auth;
pub mod cleanup;
pub mod cli;
pub mod db;
pub mod password;
pub mod sessions;
pub mod token;

use api::create_api_router;
use auth::propagate_session_cookie;
use axum::{Router, middleware};
use db::Database;
use sessions::SessionManager;
use std::sync::Arc;
use token::TokenCodec;
use tokio::net::TcpListener;

pub struct ServerConfig {
    /// Database connection (cloneable, uses connection pool internally)
    pub db: Database,
    /// Secret for signing session tokens
    pub signing_secret: Vec<u8>,
    /// Session lifetime in seconds
    pub session_ttl_secs: u64,
    /// Fraction of the lifetime remaining below which sessions are rotated
    pub renewal_fraction: f64,
    /// Whether to set Secure flag on cookies (should be true in production with HTTPS)
    pub secure_cookies: bool,
}

/// Create the application router with the given configuration.
pub fn create_app(config: &ServerConfig) -> Router {
    let tokens = Arc::new(TokenCodec::new(&config.signing_secret));
    let sessions = Arc::new(SessionManager::new(
        config.db.clone(),
        config.session_ttl_secs,
        config.renewal_fraction,
    ));

    create_api_router(
        config.db.clone(),
        sessions,
        tokens,
        config.secure_cookies,
    )
    .layer(middleware::from_fn(propagate_session_cookie))
}

/// Run cleanup tasks and spawn background scheduler.
/// Call this before starting the server.
pub async fn init_cleanup(db: &Database) {
    cleanup::run_cleanup(db).await;
    cleanup::spawn_cleanup_scheduler(db.clone());
}

/// Run the server on the given listener. This function blocks until the server exits.
/// Call `init_cleanup` before this to run cleanup on startup.
pub async fn run_server(config: ServerConfig, listener: TcpListener) -> Result<(), std::io::Error> {
    let app = create_app(&config);
    axum::serve(listener, app.into_make_service()).await
}
