//! Request authentication for cookie and bearer-token clients.
//!
//! Browsers carry a session cookie; API clients carry a signed token that
//! wraps the same session id. Both paths converge on the session manager,
//! so invalidation is immediate for either kind of client. The [`Auth`]
//! extractor implements the decision procedure; the
//! [`propagate_session_cookie`] middleware delivers rotated cookies to the
//! response.

mod cookie;
mod errors;
mod extractors;
mod state;

pub use cookie::{SESSION_COOKIE_NAME, clear_session_cookie, get_cookie, session_cookie};
pub use errors::AuthRejection;
pub use extractors::{Auth, AuthenticatedIdentity, propagate_session_cookie};
pub use state::HasAuthBackend;
