//! User credential storage.
//!
//! Owns user identity: ids are server-generated and immutable, emails are
//! unique on their normalized form, and the stored password digest never
//! leaves this layer except for verification.

use sqlx::sqlite::SqlitePool;

/// A stored user record.
///
/// Deliberately does not derive `Serialize`; the only outward view is
/// [`PublicUser`] via [`User::public`].
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
}

/// Public projection of a user, safe to return to clients.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PublicUser {
    pub id: String,
    pub email: String,
}

impl User {
    /// The fixed projection from stored user to public view.
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            email: self.email.clone(),
        }
    }
}

/// Errors from user creation.
#[derive(Debug)]
pub enum CreateUserError {
    /// Another user already holds this email
    DuplicateEmail,
    /// The store could not be reached or the write failed
    Db(sqlx::Error),
}

impl std::fmt::Display for CreateUserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateUserError::DuplicateEmail => write!(f, "Email already used"),
            CreateUserError::Db(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for CreateUserError {}

/// Normalization applied to every email before it touches the store.
/// Applied identically on write and lookup so uniqueness and login agree.
fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user. The UNIQUE constraint on email makes this atomic:
    /// of two concurrent registrations for the same address, exactly one
    /// succeeds and the other gets `DuplicateEmail`.
    pub async fn create(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<User, CreateUserError> {
        let email = normalize_email(email);
        let id = uuid::Uuid::new_v4().to_string();

        sqlx::query("INSERT INTO users (id, email, password_hash) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(&email)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    CreateUserError::DuplicateEmail
                }
                _ => CreateUserError::Db(e),
            })?;

        Ok(User {
            id,
            email,
            password_hash: password_hash.to_string(),
        })
    }

    /// Get a user by email (normalized before lookup).
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as("SELECT id, email, password_hash FROM users WHERE email = ?")
            .bind(normalize_email(email))
            .fetch_optional(&self.pool)
            .await
    }

    /// Get a user by id.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as("SELECT id, email, password_hash FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    /// Delete a user by id.
    pub async fn delete(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
