use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use fleet_cache::{Cache, RedisCache};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fleet_ledger::admission::AdmissionController;
use fleet_ledger::config::Config;
use fleet_ledger::registry_client::{HttpRegistryClient, RegistryApi};
use fleet_ledger::state::AppState;
use fleet_ledger::store::{PgRentalStore, RentalStore};
use fleet_ledger::{reconcile, router};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fleet_ledger=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = Config::from_env();
    tracing::info!(host = %config.host, port = config.port, "Loaded ledger configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = fleet_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    fleet_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    fleet_db::run_ledger_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready");

    // --- Status cache ---
    let cache: Arc<dyn Cache> = Arc::new(
        RedisCache::connect(&config.redis_url, config.redis_max_connections)
            .await
            .expect("Failed to connect to Redis"),
    );
    tracing::info!(redis_url = %config.redis_url, "Status cache connected");

    // --- Registry client ---
    let registry: Arc<dyn RegistryApi> = Arc::new(HttpRegistryClient::new(
        &config.registry_url,
        Duration::from_secs(config.registry_timeout_secs),
    ));
    tracing::info!(registry_url = %config.registry_url, "Registry client ready");

    // --- Admission controller ---
    let store: Arc<dyn RentalStore> = Arc::new(PgRentalStore::new(pool));
    let admission = Arc::new(AdmissionController::new(
        store.clone(),
        registry.clone(),
        cache.clone(),
    ));

    // --- Reconciler ---
    let reconcile_cancel = CancellationToken::new();
    let reconcile_handle = tokio::spawn(reconcile::run(
        store.clone(),
        registry,
        cache,
        Duration::from_secs(config.reconcile_interval_secs),
        reconcile_cancel.clone(),
    ));

    // --- App state ---
    let state = AppState {
        admission,
        store,
    };

    let app = router::build_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting reservation ledger");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    reconcile_cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), reconcile_handle).await;
    tracing::info!("Reconciler stopped");

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server shuts
/// down cleanly whether stopped interactively or by a process manager.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
