//! Storage seam for the user directory.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use fleet_core::types::DbId;
use fleet_db::models::user::User;
use fleet_db::repositories::UserRepo;
use fleet_db::{DbErrorKind, DbPool};

/// Errors from a [`UserStore`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Another user already holds this email address.
    #[error("email address already registered")]
    DuplicateEmail,

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

/// Durable user storage as seen by the handlers.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails with [`StoreError::DuplicateEmail`] when the
    /// email is taken.
    async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError>;

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, StoreError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// All users, in insertion order.
    async fn list(&self) -> Result<Vec<User>, StoreError>;

    /// Whether the backing store answers a trivial probe.
    async fn healthy(&self) -> bool;
}

/// PostgreSQL-backed [`UserStore`].
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        UserRepo::create(&self.pool, username, email, password_hash)
            .await
            .map_err(|e| match fleet_db::classify_db_error(&e) {
                DbErrorKind::UniqueViolation(_) => StoreError::DuplicateEmail,
                _ => StoreError::Database(e),
            })
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, StoreError> {
        UserRepo::find_by_id(&self.pool, id)
            .await
            .map_err(StoreError::Database)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        UserRepo::find_by_username(&self.pool, username)
            .await
            .map_err(StoreError::Database)
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        UserRepo::list(&self.pool).await.map_err(StoreError::Database)
    }

    async fn healthy(&self) -> bool {
        fleet_db::health_check(&self.pool).await.is_ok()
    }
}

/// In-memory [`UserStore`] used by tests.
#[derive(Default)]
pub struct MemoryUserStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    next_id: DbId,
    users: BTreeMap<DbId, User>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.users.values().any(|user| user.email == email) {
            return Err(StoreError::DuplicateEmail);
        }

        inner.next_id += 1;
        let user = User {
            id: inner.next_id,
            username: username.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        inner.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: DbId) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.users.values().cloned().collect())
    }

    async fn healthy(&self) -> bool {
        true
    }
}
