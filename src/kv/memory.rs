use super::{KvBackend, KvResult};
use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::Arc;

/// In-process backend. Collections live in a `DashMap`, so every command on a
/// collection runs under that collection's shard lock.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    collections: Arc<DashMap<String, HashMap<String, String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvBackend for MemoryBackend {
    async fn field_get(&self, collection: &str, field: &str) -> KvResult<Option<String>> {
        Ok(self
            .collections
            .get(collection)
            .and_then(|fields| fields.get(field).cloned()))
    }

    async fn field_set(&self, collection: &str, field: &str, value: &str) -> KvResult<()> {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(field.to_string(), value.to_string());
        Ok(())
    }

    async fn field_set_if_absent(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> KvResult<bool> {
        let mut fields = self.collections.entry(collection.to_string()).or_default();
        match fields.entry(field.to_string()) {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(slot) => {
                slot.insert(value.to_string());
                Ok(true)
            }
        }
    }

    async fn field_delete(&self, collection: &str, field: &str) -> KvResult<bool> {
        Ok(self
            .collections
            .get_mut(collection)
            .map(|mut fields| fields.remove(field).is_some())
            .unwrap_or(false))
    }

    async fn field_get_all(&self, collection: &str) -> KvResult<HashMap<String, String>> {
        Ok(self
            .collections
            .get(collection)
            .map(|fields| fields.clone())
            .unwrap_or_default())
    }

    async fn ping(&self) -> KvResult<String> {
        Ok("PONG".to_string())
    }
}
