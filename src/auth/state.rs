//! Authentication state trait and macro.

use crate::sessions::SessionManager;
use crate::token::TokenCodec;

/// Trait for router state types that back the [`Auth`](super::Auth)
/// extractor.
pub trait HasAuthBackend {
    fn sessions(&self) -> &SessionManager;
    fn tokens(&self) -> &TokenCodec;
    fn secure_cookies(&self) -> bool;
}

/// Implement `HasAuthBackend` for a state struct with the standard fields:
/// `sessions: Arc<SessionManager>`, `tokens: Arc<TokenCodec>`,
/// `secure_cookies: bool`.
#[macro_export]
macro_rules! impl_has_auth_backend {
    ($state_type:ty) => {
        impl $crate::auth::HasAuthBackend for $state_type {
            fn sessions(&self) -> &$crate::sessions::SessionManager {
                &self.sessions
            }
            fn tokens(&self) -> &$crate::token::TokenCodec {
                &self.tokens
            }
            fn secure_cookies(&self) -> bool {
                self.secure_cookies
            }
        }
    };
}
