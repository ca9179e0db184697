//! Rental entity and DTOs for the reservation ledger.

use chrono::NaiveDate;
use fleet_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `rentals` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Rental {
    pub id: DbId,
    pub user_id: DbId,
    pub car_id: DbId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub created_at: Timestamp,
}

/// Inbound payload for requesting a rental.
///
/// Dates are optional at the wire level so their absence surfaces as a
/// domain validation error rather than a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRental {
    pub user_id: DbId,
    pub car_id: DbId,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: Option<String>,
}

/// A validated rental ready for the durable insert.
#[derive(Debug, Clone)]
pub struct NewRental {
    pub user_id: DbId,
    pub car_id: DbId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
}
