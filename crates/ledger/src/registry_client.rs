//! HTTP client for the fleet registry.
//!
//! The admission protocol only needs two registry operations: the
//! authoritative car read and the guarded status write. Both are behind the
//! [`RegistryApi`] trait so tests can substitute an in-process fake.

use std::time::Duration;

use async_trait::async_trait;
use fleet_core::types::DbId;
use fleet_db::models::car::CarStatusUpdate;
use serde::Deserialize;

/// The slice of a car record the admission protocol needs.
#[derive(Debug, Clone, Deserialize)]
pub struct CarView {
    pub id: DbId,
    pub is_rented: bool,
}

/// Outcome of a guarded status write against the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusWriteOutcome {
    Updated,
    /// The compare-and-swap lost: another writer changed the flag first.
    Conflict,
    NotFound,
}

/// Errors from the registry client.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// The HTTP request itself failed (connection, DNS, timeout).
    #[error("registry request failed: {0}")]
    Request(String),

    /// The registry answered with a status the contract does not cover.
    #[error("registry returned unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
}

/// Registry operations the admission protocol depends on.
#[async_trait]
pub trait RegistryApi: Send + Sync {
    /// Fetch a car. `Ok(None)` when the registry answers 404.
    async fn fetch_car(&self, id: DbId) -> Result<Option<CarView>, RegistryError>;

    /// Write the rental flag, optionally guarded by an expected prior value.
    async fn write_status(
        &self,
        id: DbId,
        is_rented: bool,
        expected: Option<bool>,
    ) -> Result<StatusWriteOutcome, RegistryError>;
}

/// reqwest-backed [`RegistryApi`] implementation.
pub struct HttpRegistryClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRegistryClient {
    /// Create a client for the registry at `base_url`.
    ///
    /// Every call is bounded by `timeout`; an expired timeout surfaces as a
    /// request error, which the admission protocol treats as the registry
    /// being unreachable.
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build registry HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl RegistryApi for HttpRegistryClient {
    async fn fetch_car(&self, id: DbId) -> Result<Option<CarView>, RegistryError> {
        let response = self
            .client
            .get(format!("{}/cars/{id}", self.base_url))
            .send()
            .await
            .map_err(|e| RegistryError::Request(e.to_string()))?;

        match response.status() {
            status if status.is_success() => {
                let car = response
                    .json::<CarView>()
                    .await
                    .map_err(|e| RegistryError::Request(e.to_string()))?;
                Ok(Some(car))
            }
            reqwest::StatusCode::NOT_FOUND => Ok(None),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(RegistryError::UnexpectedStatus {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }

    async fn write_status(
        &self,
        id: DbId,
        is_rented: bool,
        expected: Option<bool>,
    ) -> Result<StatusWriteOutcome, RegistryError> {
        let body = CarStatusUpdate {
            is_rented,
            expected,
        };

        let response = self
            .client
            .put(format!("{}/cars/{id}/status", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| RegistryError::Request(e.to_string()))?;

        match response.status() {
            status if status.is_success() => Ok(StatusWriteOutcome::Updated),
            reqwest::StatusCode::CONFLICT => Ok(StatusWriteOutcome::Conflict),
            reqwest::StatusCode::NOT_FOUND => Ok(StatusWriteOutcome::NotFound),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(RegistryError::UnexpectedStatus {
                    status: status.as_u16(),
                    body,
                })
            }
        }
    }
}
