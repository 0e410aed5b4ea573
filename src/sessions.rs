//! Session lifecycle management.
//!
//! The manager owns every session state transition. At validation time a
//! session is one of:
//!
//! - **Active**: not expired, outside the renewal window — returned as-is.
//! - **Stale**: not expired but within the renewal window of expiry —
//!   replaced by a fresh session for the same user and the old id retired.
//! - **Expired**: past its expiry — deleted on detection.
//! - **Void**: record absent, or the owning user no longer exists — orphan
//!   records are deleted on detection.
//!
//! Rotation bounds how long a stolen session id stays usable without forcing
//! a re-login. The replacement is created before the original is deleted, so
//! an interrupted rotation never leaves the caller without a valid session.

use crate::db::{Database, Session, User, now_unix};

/// Result of a successful validation: the (possibly rotated) session and the
/// resolved owning user.
#[derive(Debug, Clone)]
pub struct ValidatedSession {
    pub session: Session,
    pub user: User,
    /// True when the session was just created or rotated in this call.
    /// Cookie-path callers should re-emit the session cookie when set.
    pub fresh: bool,
}

#[derive(Clone)]
pub struct SessionManager {
    db: Database,
    ttl_secs: u64,
    renewal_window_secs: i64,
}

impl SessionManager {
    /// `renewal_fraction` is the fraction of the TTL remaining below which a
    /// session is rotated; expected in (0, 1], validated at the CLI boundary.
    pub fn new(db: Database, ttl_secs: u64, renewal_fraction: f64) -> Self {
        Self {
            db,
            ttl_secs,
            renewal_window_secs: (ttl_secs as f64 * renewal_fraction) as i64,
        }
    }

    /// Session lifetime in seconds; also the cookie Max-Age.
    pub fn ttl_secs(&self) -> u64 {
        self.ttl_secs
    }

    /// Create a new session for a user. Always succeeds unless the store is
    /// unavailable.
    pub async fn create_session(&self, user_id: &str) -> Result<Session, sqlx::Error> {
        self.db.sessions().create(user_id, self.ttl_secs).await
    }

    /// Validate a session id against the current time.
    ///
    /// `Ok(None)` means the id is not (or no longer) usable: absent, expired,
    /// or orphaned. Store failures propagate; they are a health problem, not
    /// an authentication decision.
    pub async fn validate_session(
        &self,
        id: &str,
    ) -> Result<Option<ValidatedSession>, sqlx::Error> {
        let Some(session) = self.db.sessions().get(id).await? else {
            return Ok(None);
        };

        let now = now_unix();
        if now >= session.expires_at {
            self.db.sessions().delete(id).await?;
            return Ok(None);
        }

        let Some(user) = self.db.users().get_by_id(&session.user_id).await? else {
            // Owning user is gone; the session is void. Clean up eagerly.
            self.db.sessions().delete(id).await?;
            return Ok(None);
        };

        let remaining = session.expires_at - now;
        if remaining <= self.renewal_window_secs {
            // Create the replacement before retiring the original.
            let replacement = self.create_session(&user.id).await?;
            self.db.sessions().delete(id).await?;
            tracing::debug!(user_id = %user.id, "Rotated stale session");
            return Ok(Some(ValidatedSession {
                session: replacement,
                user,
                fresh: true,
            }));
        }

        Ok(Some(ValidatedSession {
            session,
            user,
            fresh: false,
        }))
    }

    /// Delete a session unconditionally. Idempotent.
    pub async fn invalidate_session(&self, id: &str) -> Result<(), sqlx::Error> {
        self.db.sessions().delete(id).await
    }

    /// Delete every session owned by a user (e.g. on password change).
    pub async fn invalidate_all_for_user(&self, user_id: &str) -> Result<(), sqlx::Error> {
        self.db.sessions().delete_all_for_user(user_id).await?;
        Ok(())
    }
}
