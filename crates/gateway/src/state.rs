use std::sync::Arc;

use fleet_cache::Cache;

use crate::upstream::Upstream;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// The gateway is stateless apart from the shared cache handle used for
/// login sessions.
#[derive(Clone)]
pub struct AppState {
    /// Forwarding client for the backend services.
    pub upstream: Arc<Upstream>,
    /// Shared cache, used only for login session entries.
    pub cache: Arc<dyn Cache>,
}
