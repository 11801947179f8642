//! API configuration

use std::time::Duration;

use serde::Deserialize;

use domain_reporting::{DebtorCacheConfig, DEFAULT_CACHE_KEY, DEFAULT_TTL};

/// API configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// PostgreSQL URL of the billing database
    pub database_url: String,
    /// Redis URL of the report cache
    pub redis_url: String,
    /// Key the debtor snapshot is stored under
    pub cache_key: String,
    /// Snapshot lifetime in seconds
    pub cache_ttl_secs: u64,
    /// Log level
    pub log_level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/mobile_operator".to_string(),
            redis_url: "redis://127.0.0.1:6379/0".to_string(),
            cache_key: DEFAULT_CACHE_KEY.to_string(),
            cache_ttl_secs: DEFAULT_TTL.as_secs(),
            log_level: "info".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from `API_*` environment variables
    ///
    /// Unset variables keep their default values. `cache_ttl_secs` must be
    /// between 1 and `i64::MAX`, the range Redis `EXPIRE` accepts.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        Self::from_source(config::Environment::with_prefix("API").try_parsing(true))
    }

    fn from_source<S>(source: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let defaults = Self::default();
        config::Config::builder()
            .set_default("host", defaults.host)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("database_url", defaults.database_url)?
            .set_default("redis_url", defaults.redis_url)?
            .set_default("cache_key", defaults.cache_key)?
            .set_default("cache_ttl_secs", defaults.cache_ttl_secs as i64)?
            .set_default("log_level", defaults.log_level)?
            .add_source(source)
            .build()?
            .try_deserialize::<Self>()?
            .validated()
    }

    fn validated(self) -> Result<Self, config::ConfigError> {
        if self.cache_ttl_secs == 0 || i64::try_from(self.cache_ttl_secs).is_err() {
            return Err(config::ConfigError::Message(format!(
                "cache_ttl_secs must be between 1 and {}, got {}",
                i64::MAX,
                self.cache_ttl_secs
            )));
        }
        Ok(self)
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the cache settings
    pub fn cache_config(&self) -> DebtorCacheConfig {
        DebtorCacheConfig::new()
            .key(self.cache_key.clone())
            .ttl(Duration::from_secs(self.cache_ttl_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let source: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        config::Environment::with_prefix("API")
            .try_parsing(true)
            .source(Some(source))
    }

    #[test]
    fn test_defaults_apply_when_unset() {
        let config = ApiConfig::from_source(env(&[])).unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.cache_key, "debtors_cache");
        assert_eq!(config.cache_ttl_secs, 3600);
    }

    #[test]
    fn test_environment_overrides() {
        let config = ApiConfig::from_source(env(&[
            ("API_PORT", "9090"),
            ("API_REDIS_URL", "redis://cache:6379/2"),
            ("API_CACHE_TTL_SECS", "60"),
        ]))
        .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.redis_url, "redis://cache:6379/2");
        assert_eq!(config.server_addr(), "0.0.0.0:9090");
        assert_eq!(config.cache_config().ttl, Duration::from_secs(60));
    }

    #[test]
    fn test_zero_cache_ttl_rejected() {
        let err = ApiConfig::from_source(env(&[("API_CACHE_TTL_SECS", "0")])).unwrap_err();
        assert!(err.to_string().contains("cache_ttl_secs"));
    }

    #[test]
    fn test_cache_ttl_beyond_expiry_range_rejected() {
        let config = ApiConfig {
            cache_ttl_secs: u64::MAX,
            ..ApiConfig::default()
        };
        assert!(config.validated().is_err());

        let config = ApiConfig {
            cache_ttl_secs: i64::MAX as u64,
            ..ApiConfig::default()
        };
        assert_eq!(config.validated().unwrap().cache_ttl_secs, i64::MAX as u64);
    }
}
