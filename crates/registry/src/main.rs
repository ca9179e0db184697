use std::net::SocketAddr;
use std::sync::Arc;

use fleet_cache::{Cache, RedisCache};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fleet_registry::config::Config;
use fleet_registry::router;
use fleet_registry::state::AppState;
use fleet_registry::store::{FleetStore, PgFleetStore};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fleet_registry=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = Config::from_env();
    tracing::info!(host = %config.host, port = config.port, "Loaded registry configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = fleet_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    fleet_db::health_check(&pool)
        .await
        .expect("Database health check failed");

    fleet_db::run_registry_migrations(&pool)
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

    // --- App state ---
    let store: Arc<dyn FleetStore> = Arc::new(PgFleetStore::new(pool));
    let state = AppState { store, cache };

    let app = router::build_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting fleet registry");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

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
