//! Rental admission protocol.
//!
//! The sequence of checks and writes that decides whether a rental request
//! is accepted, across the status cache, the ledger's durable store, and the
//! registry's authoritative rental flag:
//!
//! 1. validate the requested date range;
//! 2. fast-path rejection on a cached `rented` tag. The cache can only ever
//!    shortcut to rejection, never to acceptance, because it may be stale in
//!    the available direction;
//! 3. authoritative read of the car from the registry, repairing a stale
//!    cache entry when the registry says rented;
//! 4. durable insert of the rental row;
//! 5. propagation of `is_rented = true` to the registry, guarded by the
//!    value read in step 3 (compare-and-swap). A lost swap means a
//!    concurrent admission won; the row from step 4 is withdrawn again and
//!    the request fails as already rented. An unreachable registry leaves
//!    the row in place for the reconciler to converge;
//! 6. best-effort cache repair to `rented`.
//!
//! Steps 4 and 5 are not atomic. The window where a rental row exists but
//! the registry flag is still false is observable and is closed either by
//! step 5 itself or by the reconciler.

use std::sync::Arc;
use std::time::Duration;

use fleet_cache::Cache;
use fleet_core::rental::{validate_rental_dates, STATUS_ONGOING};
use fleet_core::status::{status_key, AvailabilityTag};
use fleet_core::types::DbId;
use fleet_db::models::rental::{CreateRental, NewRental, Rental};

use crate::registry_client::{RegistryApi, StatusWriteOutcome};
use crate::store::{RentalStore, StoreError};

/// How long the non-authoritative fast path may spend on the cache before
/// the read is treated as a miss.
const CACHE_GATE_TIMEOUT: Duration = Duration::from_millis(250);

/// Where an already-rented verdict came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RejectionSource {
    #[error("cache")]
    Cache,
    #[error("registry")]
    Registry,
    /// Lost the compare-and-swap against a concurrent admission.
    #[error("concurrent request")]
    Race,
}

/// Terminal outcomes of the admission protocol.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Car {0} not found")]
    CarNotFound(DbId),

    #[error("Rental {0} not found")]
    RentalNotFound(DbId),

    #[error("Car {car_id} is already rented")]
    AlreadyRented {
        car_id: DbId,
        source: RejectionSource,
    },

    #[error("Registry unavailable: {0}")]
    UpstreamUnavailable(String),

    /// The rental row was committed but the registry write failed. The row
    /// is left in place; the reconciler retries the propagation out of band.
    #[error("Failed to propagate rental status for car {car_id}: {reason}")]
    PropagationFailure { car_id: DbId, reason: String },

    #[error(transparent)]
    Storage(#[from] StoreError),
}

/// Orchestrates rental admission over injected capabilities.
///
/// Constructed once at startup and shared across handler tasks; every
/// dependency is an explicit handle, never a module global.
pub struct AdmissionController {
    store: Arc<dyn RentalStore>,
    registry: Arc<dyn RegistryApi>,
    cache: Arc<dyn Cache>,
}

impl AdmissionController {
    pub fn new(
        store: Arc<dyn RentalStore>,
        registry: Arc<dyn RegistryApi>,
        cache: Arc<dyn Cache>,
    ) -> Self {
        Self {
            store,
            registry,
            cache,
        }
    }

    /// Run the admission protocol for one rental request.
    pub async fn admit(&self, request: CreateRental) -> Result<Rental, AdmissionError> {
        let (start_date, end_date) =
            validate_rental_dates(request.start_date, request.end_date)
                .map_err(|e| AdmissionError::InvalidRequest(e.to_string()))?;
        let car_id = request.car_id;

        // Fast path: a cached `rented` tag rejects without an authoritative
        // round trip. Anything else (miss, unknown value, error, timeout)
        // falls through to the registry.
        if self.cache_says_rented(car_id).await {
            return Err(AdmissionError::AlreadyRented {
                car_id,
                source: RejectionSource::Cache,
            });
        }

        let car = self
            .registry
            .fetch_car(car_id)
            .await
            .map_err(|e| AdmissionError::UpstreamUnavailable(e.to_string()))?
            .ok_or(AdmissionError::CarNotFound(car_id))?;

        if car.is_rented {
            // Read repair: the cache answered miss or stale-available for a
            // car the registry knows is rented.
            self.repair_cache(car_id, AvailabilityTag::Rented).await;
            return Err(AdmissionError::AlreadyRented {
                car_id,
                source: RejectionSource::Registry,
            });
        }

        let new_rental = NewRental {
            user_id: request.user_id,
            car_id,
            start_date,
            end_date,
            status: request
                .status
                .unwrap_or_else(|| STATUS_ONGOING.to_string()),
        };
        let rental = self.store.insert(&new_rental).await?;

        // Propagate, guarded by the flag value read in the authoritative
        // check. Of any number of concurrent admissions for this car,
        // exactly one can win this write.
        match self.registry.write_status(car_id, true, Some(false)).await {
            Ok(StatusWriteOutcome::Updated) => {
                self.repair_cache(car_id, AvailabilityTag::Rented).await;
                tracing::info!(
                    rental_id = rental.id,
                    car_id,
                    user_id = rental.user_id,
                    "Rental admitted"
                );
                Ok(rental)
            }
            Ok(StatusWriteOutcome::Conflict) => {
                self.compensate(rental.id, car_id).await;
                self.repair_cache(car_id, AvailabilityTag::Rented).await;
                Err(AdmissionError::AlreadyRented {
                    car_id,
                    source: RejectionSource::Race,
                })
            }
            Ok(StatusWriteOutcome::NotFound) => {
                // The car vanished between the authoritative read and the
                // propagation. Withdraw the row again.
                self.compensate(rental.id, car_id).await;
                Err(AdmissionError::CarNotFound(car_id))
            }
            Err(e) => {
                // The row stays: deleting it here could revoke an admission
                // whose registry write actually landed. The reconciler
                // re-drives the propagation until the two stores agree.
                tracing::error!(
                    rental_id = rental.id,
                    car_id,
                    error = %e,
                    "Status propagation failed after durable write"
                );
                Err(AdmissionError::PropagationFailure {
                    car_id,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Remove a rental. When the rental was ongoing, release the car: swap
    /// the registry flag back to available and repair the cache.
    ///
    /// The release is best-effort; a failure leaves the registry flag set
    /// and is logged for operator attention.
    pub async fn withdraw(&self, rental_id: DbId) -> Result<Rental, AdmissionError> {
        let rental = self
            .store
            .delete(rental_id)
            .await?
            .ok_or(AdmissionError::RentalNotFound(rental_id))?;

        if rental.status == STATUS_ONGOING {
            match self
                .registry
                .write_status(rental.car_id, false, Some(true))
                .await
            {
                Ok(StatusWriteOutcome::Updated) => {
                    self.repair_cache(rental.car_id, AvailabilityTag::Available)
                        .await;
                    tracing::info!(
                        rental_id,
                        car_id = rental.car_id,
                        "Rental deleted, car released"
                    );
                }
                Ok(outcome) => {
                    tracing::warn!(
                        rental_id,
                        car_id = rental.car_id,
                        ?outcome,
                        "Release found no rented flag to clear"
                    );
                }
                Err(e) => {
                    tracing::error!(
                        rental_id,
                        car_id = rental.car_id,
                        error = %e,
                        "Failed to release car after rental deletion"
                    );
                }
            }
        }

        Ok(rental)
    }

    /// Fast-path gate. Only a clean `rented` hit counts; errors and
    /// timeouts degrade to a miss so the cache can never block admission.
    async fn cache_says_rented(&self, car_id: DbId) -> bool {
        let key = status_key(car_id);
        match tokio::time::timeout(CACHE_GATE_TIMEOUT, self.cache.get(&key)).await {
            Ok(Ok(Some(value))) => AvailabilityTag::parse(&value) == Some(AvailabilityTag::Rented),
            Ok(Ok(None)) => false,
            Ok(Err(e)) => {
                tracing::warn!(car_id, error = %e, "Cache read failed; treating as miss");
                false
            }
            Err(_) => {
                tracing::warn!(car_id, "Cache read timed out; treating as miss");
                false
            }
        }
    }

    /// Best-effort cache write; failures are logged and swallowed.
    async fn repair_cache(&self, car_id: DbId, tag: AvailabilityTag) {
        if let Err(e) = self.cache.set(&status_key(car_id), tag.as_str()).await {
            tracing::warn!(car_id, error = %e, "Cache repair failed");
        }
    }

    /// Saga compensation: withdraw a rental row whose propagation lost.
    async fn compensate(&self, rental_id: DbId, car_id: DbId) {
        match self.store.delete(rental_id).await {
            Ok(Some(_)) => {
                tracing::debug!(rental_id, car_id, "Compensated lost admission");
            }
            Ok(None) => {
                tracing::warn!(rental_id, "Compensation found no rental row to remove");
            }
            Err(e) => {
                tracing::error!(
                    rental_id,
                    car_id,
                    error = %e,
                    "Compensating delete failed; rental row is orphaned"
                );
            }
        }
    }
}
