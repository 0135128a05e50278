//! Link store: the code -> URL mapping kept in one collection of a key-value
//! backend.
//!
//! The store holds no mutable state of its own. Every operation is one or more
//! sequential round-trips to the backend, each bounded by the store deadline.
//! Create writes with a conditional set, so a candidate that another writer
//! claimed between the existence check and the write counts as a collision.
//! Update and Delete check existence first; an Update racing a Delete can
//! still resurrect the code (last writer wins).

use crate::kv::{KvBackend, KvError, KvResult};
use crate::services::short_code::CodeGenerator;
use async_trait::async_trait;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default name of the collection holding all mappings.
pub const DEFAULT_COLLECTION: &str = "encurtador";

/// Default number of candidate codes tried by [`LinkRepository::create`].
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default deadline for a single backend command.
pub const DEFAULT_OPERATION_TIMEOUT: Duration = Duration::from_secs(5);

/// Errors returned by link store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("short code not found: {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(#[from] KvError),

    #[error("no free short code after {attempts} attempts")]
    ExhaustedRetries { attempts: u32 },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Create/read/list/update/delete over the code -> URL mapping.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync + 'static {
    /// Store `url` under a freshly generated code and return the code.
    ///
    /// The URL is stored as given; syntax checks belong to the caller.
    async fn create(&self, url: &str) -> StoreResult<String>;

    /// Resolve a code to its URL.
    async fn read(&self, code: &str) -> StoreResult<String>;

    /// Every mapping in the collection. All or nothing.
    async fn list(&self) -> StoreResult<HashMap<String, String>>;

    /// Point an existing code at `new_url`. The code itself never changes.
    async fn update(&self, code: &str, new_url: &str) -> StoreResult<String>;

    /// Remove an existing code.
    async fn delete(&self, code: &str) -> StoreResult<()>;
}

/// [`LinkRepository`] backed by any [`KvBackend`].
pub struct LinkStore<G> {
    backend: Arc<dyn KvBackend>,
    generator: G,
    collection: String,
    max_attempts: u32,
    timeout: Duration,
}

impl<G: CodeGenerator> LinkStore<G> {
    pub fn new(backend: Arc<dyn KvBackend>, generator: G) -> Self {
        Self {
            backend,
            generator,
            collection: DEFAULT_COLLECTION.to_string(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout: DEFAULT_OPERATION_TIMEOUT,
        }
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Run one backend command under the store deadline.
    async fn guard<T>(&self, op: impl Future<Output = KvResult<T>>) -> StoreResult<T> {
        match tokio::time::timeout(self.timeout, op).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(KvError::Timeout(self.timeout).into()),
        }
    }

    async fn exists(&self, code: &str) -> StoreResult<bool> {
        let value = self
            .guard(self.backend.field_get(&self.collection, code))
            .await?;
        Ok(value.is_some())
    }
}

#[async_trait]
impl<G: CodeGenerator> LinkRepository for LinkStore<G> {
    async fn create(&self, url: &str) -> StoreResult<String> {
        for attempt in 1..=self.max_attempts {
            let code = self.generator.generate();

            if self.exists(&code).await? {
                debug!(code = %code, attempt, "Short code collision");
                continue;
            }

            let written = self
                .guard(
                    self.backend
                        .field_set_if_absent(&self.collection, &code, url),
                )
                .await?;

            if written {
                info!(code = %code, attempt, "Created short link");
                return Ok(code);
            }

            debug!(code = %code, attempt, "Short code claimed by a concurrent writer");
        }

        warn!(
            attempts = self.max_attempts,
            collection = %self.collection,
            "Could not find a free short code"
        );
        Err(StoreError::ExhaustedRetries {
            attempts: self.max_attempts,
        })
    }

    async fn read(&self, code: &str) -> StoreResult<String> {
        self.guard(self.backend.field_get(&self.collection, code))
            .await?
            .ok_or_else(|| StoreError::NotFound(code.to_string()))
    }

    async fn list(&self) -> StoreResult<HashMap<String, String>> {
        self.guard(self.backend.field_get_all(&self.collection))
            .await
    }

    async fn update(&self, code: &str, new_url: &str) -> StoreResult<String> {
        if !self.exists(code).await? {
            return Err(StoreError::NotFound(code.to_string()));
        }

        self.guard(self.backend.field_set(&self.collection, code, new_url))
            .await?;

        info!(code = %code, "Updated short link");
        Ok(code.to_string())
    }

    async fn delete(&self, code: &str) -> StoreResult<()> {
        if !self.exists(code).await? {
            return Err(StoreError::NotFound(code.to_string()));
        }

        let removed = self
            .guard(self.backend.field_delete(&self.collection, code))
            .await?;

        if !removed {
            // Deleted by someone else between the check and HDEL.
            return Err(StoreError::NotFound(code.to_string()));
        }

        info!(code = %code, "Deleted short link");
        Ok(())
    }
}
