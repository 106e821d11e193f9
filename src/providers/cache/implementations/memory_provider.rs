use async_trait::async_trait;
use dashmap::DashMap;

use crate::data::CacheEntry;
use crate::errors::StoreError;
use crate::providers::cache::trait_cache::CacheProvider;

/// Cache en memoria del proceso, apto para invocaciones concurrentes.
///
/// No implementa expulsión ni cotas de tamaño: la expiración la decide el
/// protocolo con `observed_at` y los TTL de la invocación.
pub struct InMemoryCacheProvider {
    entries: DashMap<String, CacheEntry>,
}

impl InMemoryCacheProvider {
    pub fn new() -> Self {
        Self { entries: DashMap::new() }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for InMemoryCacheProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheProvider for InMemoryCacheProvider {
    fn get_name(&self) -> &str {
        "InMemoryCacheProvider"
    }

    fn get_version(&self) -> &str {
        "1.0.0"
    }

    fn get_description(&self) -> &str {
        "Process-local cache backed by a concurrent map"
    }

    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        Ok(self.entries.get(key).map(|e| e.value().clone()))
    }

    async fn set(&self, key: &str, entry: CacheEntry) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), entry);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}
