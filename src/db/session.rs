//! Session record storage.
//!
//! Session ids are generated here, never accepted from callers, which rules
//! out identifier-injection and fixation. Deletion is idempotent.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use rand::RngCore;
use sqlx::sqlite::SqlitePool;

/// A stored session record.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    /// Expiry as unix seconds
    pub expires_at: i64,
}

/// Generate an unguessable session id: 32 random bytes, base64url.
fn generate_session_id() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[derive(Clone)]
pub struct SessionStore {
    pool: SqlitePool,
}

impl SessionStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a session for a user, expiring `ttl_secs` from now.
    pub async fn create(&self, user_id: &str, ttl_secs: u64) -> Result<Session, sqlx::Error> {
        let session = Session {
            id: generate_session_id(),
            user_id: user_id.to_string(),
            expires_at: now_unix() + ttl_secs as i64,
        };

        sqlx::query("INSERT INTO sessions (id, user_id, expires_at) VALUES (?, ?, ?)")
            .bind(&session.id)
            .bind(&session.user_id)
            .bind(session.expires_at)
            .execute(&self.pool)
            .await?;

        Ok(session)
    }

    /// Get a session by id.
    pub async fn get(&self, id: &str) -> Result<Option<Session>, sqlx::Error> {
        sqlx::query_as("SELECT id, user_id, expires_at FROM sessions WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Delete a session by id. Deleting an absent session is not an error.
    pub async fn delete(&self, id: &str) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Delete every session owned by a user.
    pub async fn delete_all_for_user(&self, user_id: &str) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete all sessions that expired at or before `now`.
    pub async fn delete_expired(&self, now: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

/// Current time as unix seconds.
pub(crate) fn now_unix() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
