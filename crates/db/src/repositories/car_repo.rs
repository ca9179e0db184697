//! Repository for the `cars` table.

use fleet_core::types::DbId;
use sqlx::PgPool;

use crate::models::car::{Car, CreateCar, UpdateCar};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, brand, model, year, price_per_day, mileage, \
                        location, category, image_url, is_rented, created_at, updated_at";

/// Provides CRUD operations for cars.
pub struct CarRepo;

impl CarRepo {
    /// Insert a new car. New cars are never rented.
    pub async fn create(pool: &PgPool, input: &CreateCar) -> Result<Car, sqlx::Error> {
        let query = format!(
            "INSERT INTO cars (brand, model, year, price_per_day, mileage, \
                               location, category, image_url)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Car>(&query)
            .bind(&input.brand)
            .bind(&input.model)
            .bind(input.year)
            .bind(input.price_per_day)
            .bind(input.mileage)
            .bind(&input.location)
            .bind(&input.category)
            .bind(input.image_url.as_deref())
            .fetch_one(pool)
            .await
    }

    /// Find a car by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Car>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cars WHERE id = $1");
        sqlx::query_as::<_, Car>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all cars ordered by ID.
    pub async fn list(pool: &PgPool) -> Result<Vec<Car>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cars ORDER BY id");
        sqlx::query_as::<_, Car>(&query).fetch_all(pool).await
    }

    /// Overwrite a car's descriptive fields and rental flag.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateCar,
    ) -> Result<Option<Car>, sqlx::Error> {
        let query = format!(
            "UPDATE cars SET
                brand = $2,
                model = $3,
                year = $4,
                price_per_day = $5,
                mileage = $6,
                location = $7,
                category = $8,
                image_url = $9,
                is_rented = $10,
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Car>(&query)
            .bind(id)
            .bind(&input.brand)
            .bind(&input.model)
            .bind(input.year)
            .bind(input.price_per_day)
            .bind(input.mileage)
            .bind(&input.location)
            .bind(&input.category)
            .bind(input.image_url.as_deref())
            .bind(input.is_rented)
            .fetch_optional(pool)
            .await
    }

    /// Write the rental flag, optionally guarded by an expected prior value.
    ///
    /// With `expected` set the UPDATE applies only while the stored flag
    /// still matches, making it a single-row compare-and-swap. `None` can
    /// then mean either a missing row or a lost swap; callers tell the two
    /// apart with a follow-up [`CarRepo::find_by_id`].
    pub async fn set_rented_status(
        pool: &PgPool,
        id: DbId,
        rented: bool,
        expected: Option<bool>,
    ) -> Result<Option<Car>, sqlx::Error> {
        let query = if expected.is_some() {
            format!(
                "UPDATE cars SET is_rented = $2, updated_at = now()
                 WHERE id = $1 AND is_rented = $3
                 RETURNING {COLUMNS}"
            )
        } else {
            format!(
                "UPDATE cars SET is_rented = $2, updated_at = now()
                 WHERE id = $1
                 RETURNING {COLUMNS}"
            )
        };

        let mut q = sqlx::query_as::<_, Car>(&query).bind(id).bind(rented);
        if let Some(prev) = expected {
            q = q.bind(prev);
        }
        q.fetch_optional(pool).await
    }

    /// Delete a car. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
