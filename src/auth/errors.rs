//! Authentication rejection types.

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};

use super::cookie::clear_session_cookie;

/// Rejection produced by the [`Auth`](super::Auth) extractor.
///
/// Authentication failures are deliberately featureless: a 401 with an empty
/// body, whatever the underlying reason. Store failures are the one
/// exception — they are a server health problem and surface as a 500, never
/// as a 401 the client might treat as "log in again".
#[derive(Debug)]
pub enum AuthRejection {
    Unauthenticated {
        /// Blank the session cookie in the response. Set only when a cookie
        /// was the credential source, so token-path clients are untouched.
        clear_cookie: bool,
        secure: bool,
    },
    StoreError,
}

impl AuthRejection {
    pub(super) fn unauthenticated(clear_cookie: bool, secure: bool) -> Self {
        Self::Unauthenticated {
            clear_cookie,
            secure,
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            AuthRejection::Unauthenticated {
                clear_cookie,
                secure,
            } => {
                let mut response = StatusCode::UNAUTHORIZED.into_response();
                if clear_cookie {
                    if let Ok(value) = HeaderValue::from_str(&clear_session_cookie(secure)) {
                        response.headers_mut().append(header::SET_COOKIE, value);
                    }
                }
                response
            }
            AuthRejection::StoreError => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_unauthenticated_has_empty_body() {
        let response = AuthRejection::unauthenticated(false, false).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(header::SET_COOKIE).is_none());

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }

    #[test]
    fn test_cookie_source_rejection_blanks_cookie() {
        let response = AuthRejection::unauthenticated(true, false).into_response();
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_store_error_is_server_error() {
        let response = AuthRejection::StoreError.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
