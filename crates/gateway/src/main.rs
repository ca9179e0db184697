use std::net::SocketAddr;
use std::sync::Arc;

use fleet_cache::{Cache, RedisCache};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fleet_gateway::config::Config;
use fleet_gateway::router;
use fleet_gateway::state::AppState;
use fleet_gateway::upstream::Upstream;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fleet_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = Config::from_env();
    tracing::info!(host = %config.host, port = config.port, "Loaded gateway configuration");

    // --- Session cache ---
    let cache: Arc<dyn Cache> = Arc::new(
        RedisCache::connect(&config.redis_url, config.redis_max_connections)
            .await
            .expect("Failed to connect to Redis"),
    );
    tracing::info!(redis_url = %config.redis_url, "Session cache connected");

    // --- App state ---
    let upstream = Arc::new(Upstream::new(&config));
    let state = AppState { upstream, cache };

    let app = router::build_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting request gateway");

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
