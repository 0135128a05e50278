use super::{KvBackend, KvResult};
use async_trait::async_trait;
use deadpool_redis::{redis::AsyncCommands, Manager, Pool, Runtime};
use std::collections::HashMap;
use tracing::trace;

/// Redis backend: each collection is a hash, each code a field of it.
#[derive(Clone)]
pub struct RedisBackend {
    pool: Pool,
}

impl RedisBackend {
    /// Create a new Redis connection pool
    pub fn new(redis_url: &str, max_connections: u32) -> Result<Self, String> {
        let manager =
            Manager::new(redis_url).map_err(|e| format!("Invalid Redis URL: {}", e))?;

        let pool = Pool::builder(manager)
            .max_size(max_connections as usize)
            .runtime(Runtime::Tokio1)
            .build()
            .map_err(|e| format!("Failed to create Redis pool: {}", e))?;

        Ok(Self { pool })
    }
}

#[async_trait]
impl KvBackend for RedisBackend {
    async fn field_get(&self, collection: &str, field: &str) -> KvResult<Option<String>> {
        trace!(collection, field, "HGET");
        let mut conn = self.pool.get().await?;
        let value: Option<String> = conn.hget(collection, field).await?;
        Ok(value)
    }

    async fn field_set(&self, collection: &str, field: &str, value: &str) -> KvResult<()> {
        trace!(collection, field, "HSET");
        let mut conn = self.pool.get().await?;
        let _: i64 = conn.hset(collection, field, value).await?;
        Ok(())
    }

    async fn field_set_if_absent(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> KvResult<bool> {
        trace!(collection, field, "HSETNX");
        let mut conn = self.pool.get().await?;
        let written: bool = conn.hset_nx(collection, field, value).await?;
        Ok(written)
    }

    async fn field_delete(&self, collection: &str, field: &str) -> KvResult<bool> {
        trace!(collection, field, "HDEL");
        let mut conn = self.pool.get().await?;
        let removed: i64 = conn.hdel(collection, field).await?;
        Ok(removed > 0)
    }

    async fn field_get_all(&self, collection: &str) -> KvResult<HashMap<String, String>> {
        trace!(collection, "HGETALL");
        let mut conn = self.pool.get().await?;
        let fields: HashMap<String, String> = conn.hgetall(collection).await?;
        Ok(fields)
    }

    async fn ping(&self) -> KvResult<String> {
        let mut conn = self.pool.get().await?;
        let response: String = ::redis::cmd("PING").query_async(&mut conn).await?;
        Ok(response)
    }
}
