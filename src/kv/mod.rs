//! Key-value backends holding the code -> URL mapping.
//!
//! The link store only ever talks to a single named collection (a Redis hash)
//! through the small command set of [`KvBackend`]. Field-level commands are
//! assumed to be linearizable; nothing here offers multi-field transactions.

mod memory;
mod redis;

pub use self::memory::MemoryBackend;
pub use self::redis::RedisBackend;

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while talking to a key-value backend.
#[derive(Error, Debug)]
pub enum KvError {
    #[error("Redis error: {0}")]
    Redis(#[from] ::redis::RedisError),

    #[error("Redis pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    #[error("Backend operation exceeded deadline of {0:?}")]
    Timeout(Duration),
}

pub type KvResult<T> = Result<T, KvError>;

/// Field-level commands over a named collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait KvBackend: Send + Sync + 'static {
    /// Fetch one field. A missing field is `Ok(None)`, never an error.
    async fn field_get(&self, collection: &str, field: &str) -> KvResult<Option<String>>;

    /// Write one field, replacing any existing value.
    async fn field_set(&self, collection: &str, field: &str, value: &str) -> KvResult<()>;

    /// Write one field only if it is absent. Returns `true` when the write happened.
    async fn field_set_if_absent(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> KvResult<bool>;

    /// Remove one field. Returns `true` when a field was actually removed.
    async fn field_delete(&self, collection: &str, field: &str) -> KvResult<bool>;

    /// Fetch every field of the collection.
    async fn field_get_all(&self, collection: &str) -> KvResult<HashMap<String, String>>;

    /// Connectivity check.
    async fn ping(&self) -> KvResult<String>;
}
