/// Configuration management for Post Service
///
/// Loaded from environment variables (a `.env` file is honoured by the
/// binary before this runs).
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Which collaborator backends to wire up
    pub storage: StorageBackend,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Cache (Redis) configuration, used by the rate limiter
    pub cache: CacheConfig,
    /// Identity provider configuration
    pub identity: IdentityConfig,
    /// Feed configuration
    pub feed: FeedConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
    /// Emit JSON logs
    pub json_logs: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Postgres posts, Redis rate limiting, HTTP identity provider
    External,
    /// Everything in process; for local development only
    Memory,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
}

/// Cache (Redis) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Redis URL
    pub url: String,
}

/// Identity provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub base_url: String,
    #[serde(skip_serializing)]
    pub api_key: String,
    pub timeout_ms: u64,
}

/// Feed configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Posts per page when the client does not ask for a size
    pub default_page_size: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, String> {
        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
        let production = app_env.eq_ignore_ascii_case("production");

        let storage = match std::env::var("STORAGE_BACKEND") {
            Ok(value) if value.eq_ignore_ascii_case("memory") => StorageBackend::Memory,
            Ok(value) if value.eq_ignore_ascii_case("external") => StorageBackend::External,
            Ok(value) => return Err(format!("Unknown STORAGE_BACKEND '{}'", value)),
            Err(_) => StorageBackend::External,
        };
        if production && storage == StorageBackend::Memory {
            return Err("STORAGE_BACKEND=memory is not allowed in production".to_string());
        }

        let api_key = std::env::var("IDENTITY_API_KEY").unwrap_or_default();
        if production && api_key.trim().is_empty() {
            return Err("IDENTITY_API_KEY must be set in production".to_string());
        }

        Ok(Config {
            app: AppConfig {
                env: app_env,
                host: std::env::var("POST_SERVICE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or_default("POST_SERVICE_PORT", 8085)?,
                json_logs: std::env::var("LOG_FORMAT")
                    .map(|v| v.eq_ignore_ascii_case("json"))
                    .unwrap_or(false),
            },
            storage,
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgresql://localhost/chirp".to_string()),
                max_connections: parse_env_or_default("DATABASE_MAX_CONNECTIONS", 10)?,
            },
            cache: CacheConfig {
                url: std::env::var("REDIS_URL")
                    .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            },
            identity: IdentityConfig {
                base_url: std::env::var("IDENTITY_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:8090".to_string()),
                api_key,
                timeout_ms: parse_env_or_default("IDENTITY_TIMEOUT_MS", 2_000)?,
            },
            feed: FeedConfig {
                default_page_size: parse_env_or_default("FEED_DEFAULT_PAGE_SIZE", 100)?,
            },
        })
    }
}

fn parse_env_or_default<T>(key: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(val) => val
            .parse()
            .map_err(|e| format!("Failed to parse {}='{}': {}", key, val, e)),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "APP_ENV",
        "STORAGE_BACKEND",
        "IDENTITY_API_KEY",
        "POST_SERVICE_PORT",
        "FEED_DEFAULT_PAGE_SIZE",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn defaults_for_development() {
        clear_env();
        let config = Config::from_env().unwrap();
        assert_eq!(config.app.env, "development");
        assert_eq!(config.app.port, 8085);
        assert_eq!(config.storage, StorageBackend::External);
        assert_eq!(config.feed.default_page_size, 100);
    }

    #[test]
    #[serial]
    fn production_requires_identity_key() {
        clear_env();
        std::env::set_var("APP_ENV", "production");
        assert!(Config::from_env().is_err());

        std::env::set_var("IDENTITY_API_KEY", "sk_live_123");
        assert!(Config::from_env().is_ok());

        std::env::set_var("STORAGE_BACKEND", "memory");
        assert!(Config::from_env().is_err());
        clear_env();
    }

    #[test]
    #[serial]
    fn bad_numbers_are_reported() {
        clear_env();
        std::env::set_var("POST_SERVICE_PORT", "eighty");
        let err = Config::from_env().unwrap_err();
        assert!(err.contains("POST_SERVICE_PORT"));
        clear_env();
    }
}
