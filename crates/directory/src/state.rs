use std::sync::Arc;

use fleet_cache::Cache;

use crate::store::UserStore;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Durable user storage.
    pub store: Arc<dyn UserStore>,
    /// Shared cache, used for login session entries.
    pub cache: Arc<dyn Cache>,
}
