//! Redis-backed cache implementation.

use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{Config as PoolConfig, Pool, Runtime};
use redis::AsyncCommands;

use crate::{Cache, CacheError};

/// Cache backed by the shared Redis instance.
///
/// Connections come from a deadpool pool shared across handler tasks.
pub struct RedisCache {
    pool: Pool,
}

impl RedisCache {
    /// Connect to Redis and verify the connection with a PING.
    pub async fn connect(url: &str, max_connections: usize) -> Result<Self, CacheError> {
        let pool = PoolConfig::from_url(url)
            .builder()
            .map_err(|e| CacheError::Connection(format!("invalid pool config: {e}")))?
            .max_size(max_connections)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| CacheError::Connection(format!("failed to build pool: {e}")))?;

        let mut conn = pool
            .get()
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        redis::cmd("PING")
            .query_async::<String>(&mut *conn)
            .await
            .map_err(|e| CacheError::Connection(format!("PING failed: {e}")))?;

        Ok(Self { pool })
    }

    async fn conn(&self) -> Result<deadpool_redis::Connection, CacheError> {
        self.pool
            .get()
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.conn().await?;
        conn.get(key)
            .await
            .map_err(|e| CacheError::Command(format!("GET {key}: {e}")))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let mut conn = self.conn().await?;
        conn.set(key, value)
            .await
            .map_err(|e| CacheError::Command(format!("SET {key}: {e}")))
    }

    async fn set_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let mut conn = self.conn().await?;
        conn.set_ex(key, value, ttl.as_secs().max(1))
            .await
            .map_err(|e| CacheError::Command(format!("SETEX {key}: {e}")))
    }

    async fn delete(&self, key: &str) -> Result<bool, CacheError> {
        let mut conn = self.conn().await?;
        let deleted: i64 = conn
            .del(key)
            .await
            .map_err(|e| CacheError::Command(format!("DEL {key}: {e}")))?;
        Ok(deleted > 0)
    }
}
