//! Upstream forwarding.
//!
//! One shared `reqwest::Client` serves all three backends; the pass-through
//! relays whatever status and JSON body the upstream produced, so backend
//! error envelopes reach the client untouched.

use std::time::Duration;

use axum::http::{Method, StatusCode};
use serde_json::Value;

use crate::config::Config;
use crate::error::AppError;

/// HTTP forwarding to the backend services.
pub struct Upstream {
    client: reqwest::Client,
    pub users_url: String,
    pub cars_url: String,
    pub rentals_url: String,
}

impl Upstream {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()
            .expect("Failed to build upstream HTTP client");

        Self {
            client,
            users_url: config.user_service_url.trim_end_matches('/').to_string(),
            cars_url: config.car_service_url.trim_end_matches('/').to_string(),
            rentals_url: config.rental_service_url.trim_end_matches('/').to_string(),
        }
    }

    /// Forward a request and relay the upstream's status and JSON body.
    ///
    /// A connection-level failure (the upstream cannot be reached at all)
    /// maps to [`AppError::Unavailable`]; an upstream error response is not
    /// a gateway failure and is passed through as-is.
    pub async fn forward(
        &self,
        method: Method,
        url: String,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value), AppError> {
        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Unavailable(format!("{url}: {e}")))?;

        let status = response.status();
        let body = response
            .json::<Value>()
            .await
            .unwrap_or_else(|_| Value::Null);

        Ok((status, body))
    }
}
