//! Redis cache store
//!
//! The snapshot is a Redis list. `replace` runs `DEL`, `RPUSH` and `EXPIRE`
//! inside one `MULTI`/`EXEC` pipeline, so no reader ever sees a partial list
//! or a list without an expiry.

use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;
use tokio::time::timeout;
use tracing::{debug, instrument, warn};

use core_kernel::{DomainPort, HealthCheckResult, HealthCheckable, PortError};
use domain_reporting::CacheStorePort;

use crate::error::CacheError;

const ADAPTER_ID: &str = "redis-cache-store";

/// Connection settings for [`RedisCacheStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisCacheConfig {
    /// Redis connection URL
    pub url: String,
    /// Upper bound for connecting plus running one command
    pub command_timeout: Duration,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379/0".to_string(),
            command_timeout: Duration::from_millis(500),
        }
    }
}

impl RedisCacheConfig {
    /// Creates a configuration for the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the per-command timeout
    pub fn command_timeout(mut self, command_timeout: Duration) -> Self {
        self.command_timeout = command_timeout;
        self
    }
}

/// Redis-backed implementation of `CacheStorePort`
#[derive(Debug, Clone)]
pub struct RedisCacheStore {
    client: redis::Client,
    command_timeout: Duration,
}

impl RedisCacheStore {
    /// Creates a store from configuration
    ///
    /// Only the URL is validated here; no connection is opened until the
    /// first command.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::InvalidUrl` if the URL cannot be parsed
    pub fn new(config: &RedisCacheConfig) -> Result<Self, CacheError> {
        let client = redis::Client::open(config.url.as_str()).map_err(CacheError::InvalidUrl)?;
        Ok(Self {
            client,
            command_timeout: config.command_timeout,
        })
    }

    async fn connection(&self) -> Result<MultiplexedConnection, CacheError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }

    /// Runs `op` on a fresh multiplexed connection under the command timeout
    async fn run<T, F, Fut>(&self, operation: &'static str, op: F) -> Result<T, CacheError>
    where
        F: FnOnce(MultiplexedConnection) -> Fut,
        Fut: Future<Output = redis::RedisResult<T>>,
    {
        let result = timeout(self.command_timeout, async {
            let conn = self.connection().await?;
            op(conn).await.map_err(CacheError::from)
        })
        .await;

        match result {
            Ok(inner) => inner,
            Err(_) => {
                warn!(operation, timeout_ms = self.command_timeout.as_millis() as u64, "Redis command timed out");
                Err(CacheError::Timeout {
                    operation,
                    after: self.command_timeout,
                })
            }
        }
    }
}

impl DomainPort for RedisCacheStore {}

#[async_trait]
impl HealthCheckable for RedisCacheStore {
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();
        let result: Result<String, CacheError> = self
            .run("PING", |mut conn| async move { redis::cmd("PING").query_async(&mut conn).await })
            .await;
        let latency_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(_) => HealthCheckResult::healthy(ADAPTER_ID, latency_ms),
            Err(e) => HealthCheckResult::unhealthy(ADAPTER_ID, latency_ms, e.to_string()),
        }
    }
}

#[async_trait]
impl CacheStorePort for RedisCacheStore {
    #[instrument(skip(self))]
    async fn delete(&self, key: &str) -> Result<(), PortError> {
        let removed: i64 = self
            .run("DEL", |mut conn| async move { conn.del(key).await })
            .await?;
        debug!(key, removed, "Cache key deleted");
        Ok(())
    }

    #[instrument(skip(self, values), fields(entries = values.len()))]
    async fn replace(&self, key: &str, values: Vec<String>, ttl: Duration) -> Result<(), PortError> {
        let ttl_secs = expire_seconds(ttl)?;
        let _: () = self
            .run("MULTI", |mut conn| async move {
                let mut pipe = redis::pipe();
                pipe.atomic().del(key).ignore();
                if !values.is_empty() {
                    pipe.rpush(key, values).ignore().expire(key, ttl_secs).ignore();
                }
                pipe.query_async(&mut conn).await
            })
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn read_all(&self, key: &str) -> Result<Vec<String>, PortError> {
        let values: Vec<String> = self
            .run("LRANGE", |mut conn| async move { conn.lrange(key, 0, -1).await })
            .await?;
        Ok(values)
    }
}

/// Converts a TTL into the whole seconds `EXPIRE` takes
///
/// Fractions of a second are dropped. A TTL under one second, or one too
/// large for `EXPIRE`, is rejected instead of being clamped.
fn expire_seconds(ttl: Duration) -> Result<i64, PortError> {
    let secs = i64::try_from(ttl.as_secs())
        .map_err(|_| PortError::validation(format!("TTL of {}s exceeds the Redis expiry range", ttl.as_secs())))?;
    if secs == 0 {
        return Err(PortError::validation(format!(
            "TTL must be at least one second, got {}ms",
            ttl.as_millis()
        )));
    }
    Ok(secs)
}
