mod auth;
mod cors;
mod server;
mod store;
mod url;

pub use self::auth::AuthConfig;
pub use self::cors::CorsConfig;
pub use self::server::ServerConfig;
pub use self::store::{redis_url_from_parts, BackendKind, StoreConfig};
pub use self::url::UrlConfig;

use crate::error::{AppError, AppResult};
use serde::Deserialize;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub url: UrlConfig,
    pub auth: AuthConfig,
    pub cors: CorsConfig,
}

/// Read `key` through `lookup`, falling back to `default`, and parse it.
fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: &str,
) -> AppResult<T> {
    lookup(key)
        .unwrap_or_else(|| default.to_string())
        .trim()
        .parse()
        .map_err(|_| AppError::Configuration(format!("Invalid {}", key)))
}

impl Config {
    /// Load configuration from environment variables, seeding them from a
    /// `.env` file when one exists.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let host = lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port_raw = lookup("SERVER_PORT")
            .or_else(|| lookup("APP_PORT"))
            .unwrap_or_else(|| "3000".to_string());
        let port = port_raw
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration("Invalid SERVER_PORT".to_string()))?;
        let max_body_bytes = parse_var(&lookup, "MAX_BODY_BYTES", "16384")?;

        let backend = lookup("STORE_BACKEND")
            .unwrap_or_else(|| "redis".to_string())
            .parse::<BackendKind>()
            .map_err(|e| AppError::Configuration(format!("Invalid STORE_BACKEND: {}", e)))?;

        let redis_url = match lookup("REDIS_URL") {
            Some(url) => url,
            None => {
                let redis_host = lookup("REDIS_HOST").unwrap_or_else(|| "127.0.0.1".to_string());
                let redis_port = lookup("REDIS_PORT").unwrap_or_else(|| "6379".to_string());
                let redis_password = lookup("REDIS_PASSWORD").unwrap_or_default();
                let redis_db = parse_var(&lookup, "REDIS_DB", "0")?;
                redis_url_from_parts(&redis_host, &redis_port, &redis_password, redis_db)
                    .map_err(AppError::Configuration)?
            }
        };
        let max_connections = parse_var(&lookup, "REDIS_MAX_CONNECTIONS", "10")?;
        let collection = lookup("LINKS_COLLECTION")
            .unwrap_or_else(|| crate::services::link_store::DEFAULT_COLLECTION.to_string());
        let timeout_ms = parse_var(&lookup, "STORE_TIMEOUT_MS", "5000")?;

        let short_code_length = parse_var(&lookup, "SHORT_CODE_LENGTH", "8")?;
        let short_code_max_attempts = parse_var(&lookup, "SHORT_CODE_MAX_ATTEMPTS", "5")?;
        let strict_url_validation = parse_var(&lookup, "STRICT_URL_VALIDATION", "true")?;

        // Authentication config
        let username = lookup("BASIC_AUTH_USERNAME")
            .ok_or_else(|| AppError::MissingEnvVar("BASIC_AUTH_USERNAME".to_string()))?;
        let password = lookup("BASIC_AUTH_PASSWORD")
            .ok_or_else(|| AppError::MissingEnvVar("BASIC_AUTH_PASSWORD".to_string()))?;

        let cors = CorsConfig::parse(&lookup("ALLOWED_ORIGINS").unwrap_or_else(|| "*".to_string()));

        let config = Config {
            server: ServerConfig {
                host,
                port,
                max_body_bytes,
            },
            store: StoreConfig {
                backend,
                redis_url,
                max_connections,
                collection,
                timeout_ms,
            },
            url: UrlConfig {
                short_code_length,
                short_code_max_attempts,
                strict_url_validation,
            },
            auth: AuthConfig { username, password },
            cors,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> AppResult<()> {
        self.server.validate().map_err(AppError::Configuration)?;
        self.store.validate().map_err(AppError::Configuration)?;
        self.url.validate().map_err(AppError::Configuration)?;
        self.auth.validate().map_err(AppError::Configuration)?;
        Ok(())
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store.timeout_ms)
    }
}
