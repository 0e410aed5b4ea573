//! Scheduled cleanup of expired sessions.
//!
//! Expired sessions are also deleted lazily when presented, so this sweep
//! only reclaims rows for sessions nobody uses anymore.

use crate::db::{Database, now_unix};
use std::time::Duration;
use tracing::{error, info};

/// Interval between cleanup runs.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(60 * 60); // 1 hour

/// Run all cleanup tasks once.
pub async fn run_cleanup(db: &Database) {
    match db.sessions().delete_expired(now_unix()).await {
        Ok(count) if count > 0 => info!("Cleaned up {} expired sessions", count),
        Ok(_) => {}
        Err(e) => error!("Failed to clean up expired sessions: {}", e),
    }
}

/// Spawn a background task that runs cleanup periodically.
/// Returns a handle that can be used to abort the task.
pub fn spawn_cleanup_scheduler(db: Database) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

        loop {
            interval.tick().await;
            run_cleanup(&db).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_cleanup_removes_expired_sessions() {
        let db = Database::open(":memory:").await.unwrap();
        let user = db.users().create("a@x.com", "digest").await.unwrap();

        let expired = db.sessions().create(&user.id, 0).await.unwrap();
        let live = db.sessions().create(&user.id, 1000).await.unwrap();

        run_cleanup(&db).await;

        assert!(db.sessions().get(&expired.id).await.unwrap().is_none());
        assert!(db.sessions().get(&live.id).await.unwrap().is_some());
    }
}
