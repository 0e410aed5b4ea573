//! Request authentication: the dual-mode decision procedure.
//!
//! A request proves its identity either with the session cookie (browsers)
//! or with a signed bearer token (API clients). The cookie wins when both
//! are present, so a stray Authorization header can never silently override
//! a browser session.

use std::cell::RefCell;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, HeaderValue, header, request::Parts},
    middleware::Next,
    response::Response,
};

use super::cookie::{SESSION_COOKIE_NAME, get_cookie, session_cookie};
use super::errors::AuthRejection;
use super::state::HasAuthBackend;

tokio::task_local! {
    /// Task-local slot for a rotated session cookie.
    /// Set by the extractor when validation mints a replacement session,
    /// drained by [`propagate_session_cookie`] into the response.
    pub static ROTATED_SESSION_COOKIE: RefCell<Option<String>>;
}

/// Identity resolved for an authenticated request. Lives for the request
/// only; handlers receive it through the [`Auth`] extractor.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AuthenticatedIdentity {
    #[serde(rename = "id")]
    pub user_id: String,
    pub email: String,
}

/// Where the candidate session id came from. Only cookie-sourced requests
/// get cookie side effects (blanking, rotation); bearer clients are
/// stateless by design.
#[derive(Clone, Copy, PartialEq)]
enum CredentialSource {
    Cookie,
    Bearer,
}

/// Extract the token from an `Authorization: Bearer <token>` header.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    value.strip_prefix("Bearer ")
}

/// Extractor for routes that require an authenticated identity.
///
/// Decision procedure:
/// 1. A session cookie, if present, is the candidate session id.
/// 2. Otherwise a bearer token is verified; its embedded session id is the
///    candidate. A token that fails verification is treated as absent
///    rather than hard-rejected, preserving the cookie-less 401 below.
/// 3. No candidate means 401 before any store access.
/// 4. The candidate is validated by the session manager. A dead session
///    from a cookie also blanks that cookie; a rotated session re-emits it.
pub struct Auth(pub AuthenticatedIdentity);

impl<S> FromRequestParts<S> for Auth
where
    S: HasAuthBackend + Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let secure = state.secure_cookies();

        let candidate = match get_cookie(&parts.headers, SESSION_COOKIE_NAME) {
            Some(id) => Some((id.to_string(), CredentialSource::Cookie)),
            None => bearer_token(&parts.headers)
                .and_then(|token| state.tokens().verify(token).ok())
                .map(|claims| (claims.sid, CredentialSource::Bearer)),
        };

        let Some((session_id, source)) = candidate else {
            return Err(AuthRejection::unauthenticated(false, secure));
        };

        let validated = state
            .sessions()
            .validate_session(&session_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Session validation failed");
                AuthRejection::StoreError
            })?;

        let Some(validated) = validated else {
            let clear_cookie = source == CredentialSource::Cookie;
            return Err(AuthRejection::unauthenticated(clear_cookie, secure));
        };

        if validated.fresh && source == CredentialSource::Cookie {
            let cookie = session_cookie(
                &validated.session.id,
                state.sessions().ttl_secs(),
                secure,
            );
            let _ = ROTATED_SESSION_COOKIE.try_with(|cell| {
                cell.borrow_mut().replace(cookie);
            });
        }

        Ok(Auth(AuthenticatedIdentity {
            user_id: validated.user.id,
            email: validated.user.email,
        }))
    }
}

/// Response middleware that appends a rotated session cookie, if the auth
/// extractor minted one while handling this request.
pub async fn propagate_session_cookie(
    request: axum::extract::Request,
    next: Next,
) -> Response {
    ROTATED_SESSION_COOKIE
        .scope(RefCell::new(None), async move {
            let mut response = next.run(request).await;
            let rotated = ROTATED_SESSION_COOKIE.with(|cell| cell.borrow_mut().take());
            if let Some(cookie) = rotated {
                if let Ok(value) = HeaderValue::from_str(&cookie) {
                    response.headers_mut().append(header::SET_COOKIE, value);
                }
            }
            response
        })
        .await
}
