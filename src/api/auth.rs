use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use super::error::{ApiError, ResultExt};
use crate::auth::{Auth, SESSION_COOKIE_NAME, clear_session_cookie, get_cookie, session_cookie};
use crate::db::{CreateUserError, Database};
use crate::impl_has_auth_backend;
use crate::password::{hash_password, verify_password};
use crate::sessions::SessionManager;
use crate::token::TokenCodec;

const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_PASSWORD_LENGTH: usize = 128;
const MAX_EMAIL_LENGTH: usize = 255;

/// Well-formed Argon2id digest belonging to no account. Verified against on
/// the unknown-email path so both login failures cost a hash computation.
const DUMMY_DIGEST: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$AAAAAAAAAAAAAAAAAAAAAA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

#[derive(Clone)]
pub struct AuthApiState {
    pub db: Database,
    pub sessions: Arc<SessionManager>,
    pub tokens: Arc<TokenCodec>,
    pub secure_cookies: bool,
}

impl_has_auth_backend!(AuthApiState);

pub fn router(state: AuthApiState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/protected", get(protected))
        .with_state(state)
}

#[derive(Deserialize)]
struct CredentialsRequest {
    email: String,
    password: String,
}

#[derive(Deserialize)]
struct LoginQuery {
    /// Return a signed bearer token instead of setting a cookie.
    #[serde(default)]
    token: bool,
}

fn validate_credentials_shape(email: &str, password: &str) -> Result<(), ApiError> {
    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH || !email.contains('@') {
        return Err(ApiError::bad_request("Invalid email"));
    }
    if password.len() < MIN_PASSWORD_LENGTH || password.len() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::bad_request(format!(
            "Password must be between {} and {} characters",
            MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

async fn register(
    State(state): State<AuthApiState>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = payload.email.trim();
    validate_credentials_shape(email, &payload.password)?;

    let digest = hash_password(payload.password)
        .await
        .map_err(|e| ApiError::internal_error("Failed to hash password", e))?;

    let user = match state.db.users().create(email, &digest).await {
        Ok(user) => user,
        Err(CreateUserError::DuplicateEmail) => {
            return Err(ApiError::bad_request("Email already used"));
        }
        Err(CreateUserError::Db(e)) => return Err(ApiError::db_error("Failed to create user", e)),
    };

    let session = state
        .sessions
        .create_session(&user.id)
        .await
        .db_err("Failed to create session")?;

    tracing::info!(user_id = %user.id, "User registered");

    let cookie = session_cookie(&session.id, state.sessions.ttl_secs(), state.secure_cookies);
    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(user.public()),
    ))
}

async fn login(
    State(state): State<AuthApiState>,
    Query(query): Query<LoginQuery>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<axum::response::Response, ApiError> {
    let user = state
        .db
        .users()
        .get_by_email(&payload.email)
        .await
        .db_err("Failed to look up user")?;

    // Unknown email and wrong password take the same exit, and both pay for
    // a verification so response timing does not separate them.
    let Some(user) = user else {
        let _ = verify_password(DUMMY_DIGEST.to_string(), payload.password).await;
        return Err(ApiError::invalid_credentials());
    };
    if !verify_password(user.password_hash.clone(), payload.password).await {
        return Err(ApiError::invalid_credentials());
    }

    let session = state
        .sessions
        .create_session(&user.id)
        .await
        .db_err("Failed to create session")?;

    tracing::info!(user_id = %user.id, token_mode = query.token, "User logged in");

    if query.token {
        let token = state
            .tokens
            .sign(&session.id, session.expires_at as u64)
            .map_err(|e| ApiError::internal_error("Failed to sign session token", e))?;
        return Ok(Json(json!({ "session": token })).into_response());
    }

    let cookie = session_cookie(&session.id, state.sessions.ttl_secs(), state.secure_cookies);
    Ok(([(header::SET_COOKIE, cookie)], Json(user.public())).into_response())
}

/// Log out the session named by the cookie, if any. Idempotent: the response
/// blanks the cookie whether or not a live session was found.
async fn logout(
    State(state): State<AuthApiState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    if let Some(session_id) = get_cookie(&headers, SESSION_COOKIE_NAME) {
        state
            .sessions
            .invalidate_session(session_id)
            .await
            .db_err("Failed to invalidate session")?;
    }

    Ok((
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, clear_session_cookie(state.secure_cookies))],
    ))
}

async fn protected(Auth(identity): Auth) -> impl IntoResponse {
    Json(identity)
}
