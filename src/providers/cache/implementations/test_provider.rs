use std::sync::Mutex;

use async_trait::async_trait;

use crate::data::CacheEntry;
use crate::errors::StoreError;
use crate::providers::cache::trait_cache::CacheProvider;

/// Cache guionado para pruebas del protocolo.
///
/// Mantiene a lo sumo una entrada, registra cada `set`/`remove` recibido y
/// puede fallar a demanda en cualquiera de las tres operaciones.
pub struct ScriptedCacheProvider {
    entry: Mutex<Option<CacheEntry>>,
    fail_get: bool,
    fail_set: bool,
    fail_remove: bool,
    set_calls: Mutex<Vec<(String, CacheEntry)>>,
    remove_calls: Mutex<Vec<String>>,
}

impl ScriptedCacheProvider {
    pub fn new() -> Self {
        Self { entry: Mutex::new(None),
               fail_get: false,
               fail_set: false,
               fail_remove: false,
               set_calls: Mutex::new(Vec::new()),
               remove_calls: Mutex::new(Vec::new()) }
    }

    pub fn with_entry(entry: CacheEntry) -> Self {
        let provider = Self::new();
        *provider.entry.lock().unwrap_or_else(|e| e.into_inner()) = Some(entry);
        provider
    }

    pub fn failing_get(mut self) -> Self {
        self.fail_get = true;
        self
    }

    pub fn failing_set(mut self) -> Self {
        self.fail_set = true;
        self
    }

    pub fn failing_remove(mut self) -> Self {
        self.fail_remove = true;
        self
    }

    /// Entrada vigente (la última escrita, o la inicial).
    pub fn current_entry(&self) -> Option<CacheEntry> {
        self.entry.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Escrituras recibidas, en orden.
    pub fn set_calls(&self) -> Vec<(String, CacheEntry)> {
        self.set_calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Claves eliminadas, en orden.
    pub fn remove_calls(&self) -> Vec<String> {
        self.remove_calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Default for ScriptedCacheProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheProvider for ScriptedCacheProvider {
    fn get_name(&self) -> &str {
        "ScriptedCacheProvider"
    }

    fn get_version(&self) -> &str {
        "1.0.0"
    }

    fn get_description(&self) -> &str {
        "Scripted cache provider for testing purposes"
    }

    async fn get(&self, _key: &str) -> Result<Option<CacheEntry>, StoreError> {
        if self.fail_get {
            return Err(StoreError::Backend("scripted get failure".into()));
        }
        Ok(self.entry.lock().unwrap_or_else(|e| e.into_inner()).clone())
    }

    async fn set(&self, key: &str, entry: CacheEntry) -> Result<(), StoreError> {
        self.set_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((key.to_string(), entry.clone()));
        if self.fail_set {
            return Err(StoreError::Backend("scripted set failure".into()));
        }
        *self.entry.lock().unwrap_or_else(|e| e.into_inner()) = Some(entry);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.remove_calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(key.to_string());
        if self.fail_remove {
            return Err(StoreError::Backend("scripted remove failure".into()));
        }
        *self.entry.lock().unwrap_or_else(|e| e.into_inner()) = None;
        Ok(())
    }
}
