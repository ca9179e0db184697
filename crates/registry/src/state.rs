use std::sync::Arc;

use fleet_cache::Cache;

use crate::store::FleetStore;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
///
/// Both dependencies are explicitly constructed in `main` and injected;
/// nothing here is a module global.
#[derive(Clone)]
pub struct AppState {
    /// Durable car storage (authoritative).
    pub store: Arc<dyn FleetStore>,
    /// Shared status cache (best-effort projection).
    pub cache: Arc<dyn Cache>,
}
