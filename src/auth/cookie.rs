//! Session cookie parsing and construction.

use axum::http::header;

/// Cookie name for the session id.
pub const SESSION_COOKIE_NAME: &str = "gatehouse_session";

/// Extract a cookie value from the Cookie header.
pub fn get_cookie<'a>(headers: &'a axum::http::HeaderMap, name: &str) -> Option<&'a str> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    cookie_header.split(';').find_map(|part| {
        let (key, value) = part.trim().split_once('=')?;
        (key.trim() == name).then(|| value.trim())
    })
}

/// Build the Set-Cookie value for a session cookie.
///
/// HttpOnly keeps it away from scripts; SameSite is fixed to Lax; Secure is
/// added only for production deployments so local HTTP still works.
pub fn session_cookie(session_id: &str, max_age_secs: u64, secure: bool) -> String {
    let secure = if secure { "; Secure" } else { "" };
    format!(
        "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}{}",
        SESSION_COOKIE_NAME, session_id, max_age_secs, secure
    )
}

/// Build the Set-Cookie value that blanks the session cookie.
pub fn clear_session_cookie(secure: bool) -> String {
    let secure = if secure { "; Secure" } else { "" };
    format!(
        "{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0{}",
        SESSION_COOKIE_NAME, secure
    )
}
