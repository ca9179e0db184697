//! Database layer: connection pooling, embedded migrations, entity models,
//! and repositories.
//!
//! Each service owns its own database; the migration sets are split
//! accordingly and a service only ever runs its own set.

pub mod models;
pub mod repositories;

use sqlx::postgres::PgPoolOptions;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the registry service's migrations (cars).
pub async fn run_registry_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("migrations/registry").run(pool).await
}

/// Apply the ledger service's migrations (rentals).
pub async fn run_ledger_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("migrations/ledger").run(pool).await
}

/// Apply the directory service's migrations (users).
pub async fn run_directory_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("migrations/directory").run(pool).await
}

/// Coarse classification of a sqlx error for HTTP mapping.
#[derive(Debug)]
pub enum DbErrorKind<'a> {
    NotFound,
    /// Unique constraint violation, with the constraint name when known.
    UniqueViolation(&'a str),
    Other,
}

/// Classify a sqlx error.
///
/// `RowNotFound` maps to [`DbErrorKind::NotFound`]; PostgreSQL error code
/// 23505 maps to [`DbErrorKind::UniqueViolation`].
pub fn classify_db_error(err: &sqlx::Error) -> DbErrorKind<'_> {
    match err {
        sqlx::Error::RowNotFound => DbErrorKind::NotFound,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some("23505") => {
            DbErrorKind::UniqueViolation(db_err.constraint().unwrap_or("unknown"))
        }
        _ => DbErrorKind::Other,
    }
}
