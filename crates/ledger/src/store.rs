//! Storage seam for the reservation ledger.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use fleet_core::types::DbId;
use fleet_db::models::rental::{NewRental, Rental};
use fleet_db::repositories::RentalRepo;
use fleet_db::DbPool;

/// Errors from a [`RentalStore`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Durable rental storage as seen by the admission protocol and handlers.
#[async_trait]
pub trait RentalStore: Send + Sync {
    /// Insert a validated rental, returning the created row.
    async fn insert(&self, input: &NewRental) -> Result<Rental, StoreError>;

    /// Delete a rental, returning the removed row if it existed.
    async fn delete(&self, id: DbId) -> Result<Option<Rental>, StoreError>;

    /// All rentals, in insertion order.
    async fn list(&self) -> Result<Vec<Rental>, StoreError>;

    /// Rentals currently in the given status.
    async fn list_by_status(&self, status: &str) -> Result<Vec<Rental>, StoreError>;

    /// Whether the backing store answers a trivial probe.
    async fn healthy(&self) -> bool;
}

/// PostgreSQL-backed [`RentalStore`].
pub struct PgRentalStore {
    pool: DbPool,
}

impl PgRentalStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RentalStore for PgRentalStore {
    async fn insert(&self, input: &NewRental) -> Result<Rental, StoreError> {
        Ok(RentalRepo::create(&self.pool, input).await?)
    }

    async fn delete(&self, id: DbId) -> Result<Option<Rental>, StoreError> {
        Ok(RentalRepo::delete(&self.pool, id).await?)
    }

    async fn list(&self) -> Result<Vec<Rental>, StoreError> {
        Ok(RentalRepo::list(&self.pool).await?)
    }

    async fn list_by_status(&self, status: &str) -> Result<Vec<Rental>, StoreError> {
        Ok(RentalRepo::list_by_status(&self.pool, status).await?)
    }

    async fn healthy(&self) -> bool {
        fleet_db::health_check(&self.pool).await.is_ok()
    }
}

/// In-memory [`RentalStore`] used by tests.
#[derive(Default)]
pub struct MemoryRentalStore {
    inner: Mutex<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    next_id: DbId,
    rentals: BTreeMap<DbId, Rental>,
}

impl MemoryRentalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RentalStore for MemoryRentalStore {
    async fn insert(&self, input: &NewRental) -> Result<Rental, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let rental = Rental {
            id: inner.next_id,
            user_id: input.user_id,
            car_id: input.car_id,
            start_date: input.start_date,
            end_date: input.end_date,
            status: input.status.clone(),
            created_at: Utc::now(),
        };
        inner.rentals.insert(rental.id, rental.clone());
        Ok(rental)
    }

    async fn delete(&self, id: DbId) -> Result<Option<Rental>, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        Ok(inner.rentals.remove(&id))
    }

    async fn list(&self) -> Result<Vec<Rental>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner.rentals.values().cloned().collect())
    }

    async fn list_by_status(&self, status: &str) -> Result<Vec<Rental>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .rentals
            .values()
            .filter(|rental| rental.status == status)
            .cloned()
            .collect())
    }

    async fn healthy(&self) -> bool {
        true
    }
}
