//! Storage seam for the registry service.
//!
//! Handlers talk to [`FleetStore`]; production wires in [`PgFleetStore`],
//! tests an in-memory implementation with identical compare-and-swap
//! semantics.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use fleet_core::types::DbId;
use fleet_db::models::car::{Car, CreateCar, UpdateCar};
use fleet_db::repositories::CarRepo;
use fleet_db::DbPool;

/// Errors from a [`FleetStore`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Outcome of a status mutation.
#[derive(Debug)]
pub enum StatusWrite {
    Updated(Car),
    /// The compare-and-swap precondition failed; no write happened.
    Conflict,
    NotFound,
}

/// Durable car storage as seen by the handlers.
#[async_trait]
pub trait FleetStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Car>, StoreError>;

    async fn create(&self, input: &CreateCar) -> Result<Car, StoreError>;

    async fn get(&self, id: DbId) -> Result<Option<Car>, StoreError>;

    async fn update(&self, id: DbId, input: &UpdateCar) -> Result<Option<Car>, StoreError>;

    /// Write the rental flag. With `expected` set, the write applies only
    /// while the stored flag still matches (single-writer arbitration per
    /// car); a mismatch reports [`StatusWrite::Conflict`] without writing.
    async fn set_rented_status(
        &self,
        id: DbId,
        rented: bool,
        expected: Option<bool>,
    ) -> Result<StatusWrite, StoreError>;

    /// Delete a car. Returns `true` if a row was removed.
    async fn delete(&self, id: DbId) -> Result<bool, StoreError>;

    /// Whether the backing store answers a trivial probe.
    async fn healthy(&self) -> bool;
}

/// PostgreSQL-backed [`FleetStore`].
pub struct PgFleetStore {
    pool: DbPool,
}

impl PgFleetStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FleetStore for PgFleetStore {
    async fn list(&self) -> Result<Vec<Car>, StoreError> {
        Ok(CarRepo::list(&self.pool).await?)
    }

    async fn create(&self, input: &CreateCar) -> Result<Car, StoreError> {
        Ok(CarRepo::create(&self.pool, input).await?)
    }

    async fn get(&self, id: DbId) -> Result<Option<Car>, StoreError> {
        Ok(CarRepo::find_by_id(&self.pool, id).await?)
    }

    async fn update(&self, id: DbId, input: &UpdateCar) -> Result<Option<Car>, StoreError> {
        Ok(CarRepo::update(&self.pool, id, input).await?)
    }

    async fn set_rented_status(
        &self,
        id: DbId,
        rented: bool,
        expected: Option<bool>,
    ) -> Result<StatusWrite, StoreError> {
        match CarRepo::set_rented_status(&self.pool, id, rented, expected).await? {
            Some(car) => Ok(StatusWrite::Updated(car)),
            // The conditional UPDATE touched nothing: either the row is gone
            // or the guard lost. A follow-up read tells the two apart.
            None => match CarRepo::find_by_id(&self.pool, id).await? {
                Some(_) => Ok(StatusWrite::Conflict),
                None => Ok(StatusWrite::NotFound),
            },
        }
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        Ok(CarRepo::delete(&self.pool, id).await?)
    }

    async fn healthy(&self) -> bool {
        fleet_db::health_check(&self.pool).await.is_ok()
    }
}

/// In-memory [`FleetStore`] used by tests and cacheless development.
///
/// The compare-and-swap is performed under one lock, giving the same
/// atomicity as the SQL conditional UPDATE.
#[derive(Default)]
pub struct MemoryFleetStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    next_id: DbId,
    cars: BTreeMap<DbId, Car>,
}

impl MemoryFleetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FleetStore for MemoryFleetStore {
    async fn list(&self) -> Result<Vec<Car>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.cars.values().cloned().collect())
    }

    async fn create(&self, input: &CreateCar) -> Result<Car, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let now = Utc::now();
        let car = Car {
            id: inner.next_id,
            brand: input.brand.clone(),
            model: input.model.clone(),
            year: input.year,
            price_per_day: input.price_per_day,
            mileage: input.mileage,
            location: input.location.clone(),
            category: input.category.clone(),
            image_url: input.image_url.clone(),
            is_rented: false,
            created_at: now,
            updated_at: now,
        };
        inner.cars.insert(car.id, car.clone());
        Ok(car)
    }

    async fn get(&self, id: DbId) -> Result<Option<Car>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.cars.get(&id).cloned())
    }

    async fn update(&self, id: DbId, input: &UpdateCar) -> Result<Option<Car>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.cars.get_mut(&id).map(|car| {
            car.brand = input.brand.clone();
            car.model = input.model.clone();
            car.year = input.year;
            car.price_per_day = input.price_per_day;
            car.mileage = input.mileage;
            car.location = input.location.clone();
            car.category = input.category.clone();
            car.image_url = input.image_url.clone();
            car.is_rented = input.is_rented;
            car.updated_at = Utc::now();
            car.clone()
        }))
    }

    async fn set_rented_status(
        &self,
        id: DbId,
        rented: bool,
        expected: Option<bool>,
    ) -> Result<StatusWrite, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        match inner.cars.get_mut(&id) {
            None => Ok(StatusWrite::NotFound),
            Some(car) => {
                if let Some(prev) = expected {
                    if car.is_rented != prev {
                        return Ok(StatusWrite::Conflict);
                    }
                }
                car.is_rented = rented;
                car.updated_at = Utc::now();
                Ok(StatusWrite::Updated(car.clone()))
            }
        }
    }

    async fn delete(&self, id: DbId) -> Result<bool, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.cars.remove(&id).is_some())
    }

    async fn healthy(&self) -> bool {
        true
    }
}
