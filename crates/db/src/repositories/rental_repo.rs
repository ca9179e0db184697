//! Repository for the `rentals` table.

use fleet_core::types::DbId;
use sqlx::PgPool;

use crate::models::rental::{NewRental, Rental};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, car_id, start_date, end_date, status, created_at";

/// Provides CRUD operations for rentals.
pub struct RentalRepo;

impl RentalRepo {
    /// Insert a new rental, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewRental) -> Result<Rental, sqlx::Error> {
        let query = format!(
            "INSERT INTO rentals (user_id, car_id, start_date, end_date, status)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Rental>(&query)
            .bind(input.user_id)
            .bind(input.car_id)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(&input.status)
            .fetch_one(pool)
            .await
    }

    /// Find a rental by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Rental>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rentals WHERE id = $1");
        sqlx::query_as::<_, Rental>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all rentals ordered by ID.
    pub async fn list(pool: &PgPool) -> Result<Vec<Rental>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rentals ORDER BY id");
        sqlx::query_as::<_, Rental>(&query).fetch_all(pool).await
    }

    /// List rentals in a given status, ordered by ID.
    pub async fn list_by_status(pool: &PgPool, status: &str) -> Result<Vec<Rental>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM rentals WHERE status = $1 ORDER BY id");
        sqlx::query_as::<_, Rental>(&query)
            .bind(status)
            .fetch_all(pool)
            .await
    }

    /// Delete a rental, returning the removed row if it existed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Rental>, sqlx::Error> {
        let query = format!("DELETE FROM rentals WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Rental>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
