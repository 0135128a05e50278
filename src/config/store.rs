use serde::Deserialize;
use std::str::FromStr;

/// Which key-value backend holds the mappings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Redis,
    Memory,
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(BackendKind::Redis),
            "memory" => Ok(BackendKind::Memory),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

/// Key-value store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Backend selection
    pub backend: BackendKind,

    /// Redis connection URL
    pub redis_url: String,

    /// Maximum number of Redis connections in the pool
    pub max_connections: u32,

    /// Hash holding every code -> URL mapping
    pub collection: String,

    /// Deadline for a single backend command in milliseconds
    pub timeout_ms: u64,
}

impl StoreConfig {
    /// Validate store configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.max_connections == 0 {
            return Err("REDIS_MAX_CONNECTIONS must be greater than 0".to_string());
        }

        if self.collection.trim().is_empty() {
            return Err("LINKS_COLLECTION must not be empty".to_string());
        }

        if self.timeout_ms == 0 {
            return Err("STORE_TIMEOUT_MS must be greater than 0".to_string());
        }

        Ok(())
    }
}

/// Assemble a Redis URL from discrete host/port/password/db settings.
///
/// The password is percent-encoded into the userinfo part.
pub fn redis_url_from_parts(
    host: &str,
    port: &str,
    password: &str,
    db: u32,
) -> Result<String, String> {
    let mut url = ::url::Url::parse(&format!("redis://{}:{}/{}", host, port, db))
        .map_err(|e| format!("Invalid Redis address {}:{}: {}", host, port, e))?;

    if !password.is_empty() {
        url.set_password(Some(password))
            .map_err(|_| "REDIS_PASSWORD cannot be applied to this address".to_string())?;
    }

    Ok(url.to_string())
}
