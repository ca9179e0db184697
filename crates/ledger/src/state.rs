use std::sync::Arc;

use crate::admission::AdmissionController;
use crate::store::RentalStore;

/// Shared application state available to all Axum handlers via
/// `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// The admission protocol orchestrator.
    pub admission: Arc<AdmissionController>,
    /// Durable rental storage, for reads outside the admission path.
    pub store: Arc<dyn RentalStore>,
}
