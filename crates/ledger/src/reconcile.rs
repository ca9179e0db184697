//! Out-of-band convergence of the registry with the ledger.
//!
//! Admission commits the rental row before propagating the status flag, so
//! a registry outage at the wrong moment leaves an ongoing rental whose car
//! is still marked available. This task re-drives that propagation on a
//! fixed interval until the two stores agree.

use std::sync::Arc;
use std::time::Duration;

use fleet_cache::Cache;
use fleet_core::rental::STATUS_ONGOING;
use fleet_core::status::{status_key, AvailabilityTag};
use tokio_util::sync::CancellationToken;

use crate::registry_client::{RegistryApi, StatusWriteOutcome};
use crate::store::{RentalStore, StoreError};

/// Run the reconciliation loop until `cancel` is triggered.
pub async fn run(
    store: Arc<dyn RentalStore>,
    registry: Arc<dyn RegistryApi>,
    cache: Arc<dyn Cache>,
    interval: Duration,
    cancel: CancellationToken,
) {
    tracing::info!(interval_secs = interval.as_secs(), "Reconciler started");

    let mut ticker = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Reconciler stopping");
                break;
            }
            _ = ticker.tick() => {
                match reconcile_once(store.clone(), registry.clone(), cache.clone()).await {
                    Ok(0) => tracing::debug!("Reconciliation pass: nothing to repair"),
                    Ok(repaired) => tracing::info!(repaired, "Reconciliation pass repaired rentals"),
                    Err(e) => tracing::error!(error = %e, "Reconciliation pass failed"),
                }
            }
        }
    }
}

/// One pass: every ongoing rental whose car is still unmarked gets the
/// guarded propagation retried. Per-car failures are logged and retried on
/// the next tick; only a store failure aborts the pass.
pub async fn reconcile_once(
    store: Arc<dyn RentalStore>,
    registry: Arc<dyn RegistryApi>,
    cache: Arc<dyn Cache>,
) -> Result<usize, StoreError> {
    let ongoing = store.list_by_status(STATUS_ONGOING).await?;
    let mut repaired = 0;

    for rental in ongoing {
        match registry.fetch_car(rental.car_id).await {
            Ok(Some(car)) if !car.is_rented => {
                match registry
                    .write_status(rental.car_id, true, Some(false))
                    .await
                {
                    Ok(StatusWriteOutcome::Updated) => {
                        repaired += 1;
                        if let Err(e) = cache
                            .set(&status_key(rental.car_id), AvailabilityTag::Rented.as_str())
                            .await
                        {
                            tracing::warn!(
                                car_id = rental.car_id,
                                error = %e,
                                "Cache repair failed during reconciliation"
                            );
                        }
                        tracing::info!(
                            rental_id = rental.id,
                            car_id = rental.car_id,
                            "Reconciled rental status"
                        );
                    }
                    Ok(outcome) => {
                        // Conflict means a concurrent writer got there first;
                        // NotFound means the car is gone. Neither is
                        // retryable work for this pass.
                        tracing::debug!(
                            rental_id = rental.id,
                            car_id = rental.car_id,
                            ?outcome,
                            "Reconciliation write not applied"
                        );
                    }
                    Err(e) => {
                        tracing::warn!(
                            rental_id = rental.id,
                            car_id = rental.car_id,
                            error = %e,
                            "Registry write failed during reconciliation"
                        );
                    }
                }
            }
            Ok(Some(_)) => {} // already consistent
            Ok(None) => {
                tracing::warn!(
                    rental_id = rental.id,
                    car_id = rental.car_id,
                    "Ongoing rental references a missing car"
                );
            }
            Err(e) => {
                tracing::warn!(
                    car_id = rental.car_id,
                    error = %e,
                    "Registry read failed during reconciliation"
                );
            }
        }
    }

    Ok(repaired)
}
