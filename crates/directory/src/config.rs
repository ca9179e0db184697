/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development. In production,
/// override via environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8001`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Redis connection URL (default: `redis://localhost:6379`).
    pub redis_url: String,
    /// Maximum Redis pool size (default: `16`).
    pub redis_max_connections: usize,
}

impl Config {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                 | Default                   |
    /// |-------------------------|---------------------------|
    /// | `HOST`                  | `0.0.0.0`                 |
    /// | `PORT`                  | `8001`                    |
    /// | `CORS_ORIGINS`          | `http://localhost:3000`   |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                      |
    /// | `REDIS_URL`             | `redis://localhost:6379`  |
    /// | `REDIS_MAX_CONNECTIONS` | `16`                      |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "8001".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".into());

        let redis_max_connections: usize = std::env::var("REDIS_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "16".into())
            .parse()
            .expect("REDIS_MAX_CONNECTIONS must be a valid usize");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            redis_url,
            redis_max_connections,
        }
    }
}
