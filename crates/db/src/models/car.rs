//! Car entity and DTOs for the fleet registry.

use fleet_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `cars` table.
///
/// `is_rented` is the authoritative rental flag; the status cache only ever
/// holds a projection of it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Car {
    pub id: DbId,
    pub brand: String,
    pub model: String,
    pub year: i32,
    pub price_per_day: f64,
    pub mileage: i32,
    pub location: String,
    pub category: String,
    pub image_url: Option<String>,
    pub is_rented: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Payload for registering a new car. New cars always start unrented.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCar {
    #[validate(length(min = 1, message = "brand must not be empty"))]
    pub brand: String,
    #[validate(length(min = 1, message = "model must not be empty"))]
    pub model: String,
    pub year: i32,
    #[validate(range(min = 0.0, message = "price_per_day must not be negative"))]
    pub price_per_day: f64,
    #[validate(range(min = 0, message = "mileage must not be negative"))]
    pub mileage: i32,
    pub location: String,
    pub category: String,
    pub image_url: Option<String>,
}

/// Full update payload, including `is_rented`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCar {
    #[validate(length(min = 1, message = "brand must not be empty"))]
    pub brand: String,
    #[validate(length(min = 1, message = "model must not be empty"))]
    pub model: String,
    pub year: i32,
    #[validate(range(min = 0.0, message = "price_per_day must not be negative"))]
    pub price_per_day: f64,
    #[validate(range(min = 0, message = "mileage must not be negative"))]
    pub mileage: i32,
    pub location: String,
    pub category: String,
    pub image_url: Option<String>,
    pub is_rented: bool,
}

/// Status mutation payload for `PUT /cars/{id}/status`.
///
/// With `expected` present the write is a compare-and-swap: it applies only
/// while the stored flag still matches, otherwise the registry answers 409
/// and performs no write. Without it the write is a plain overwrite.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CarStatusUpdate {
    pub is_rented: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<bool>,
}
