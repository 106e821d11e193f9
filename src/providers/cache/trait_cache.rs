//! Trait para el almacén de cache inyectado por el llamador.
//!
//! El protocolo solo toma referencias prestadas durante una invocación; la
//! propiedad del store es del llamador, que también es responsable de que la
//! implementación sea segura para invocaciones concurrentes. El protocolo no
//! coordina invocaciones entre sí (sin single-flight, sin locking).
use async_trait::async_trait;

use crate::data::CacheEntry;
use crate::errors::StoreError;

#[async_trait]
pub trait CacheProvider: Send + Sync {
    fn get_name(&self) -> &str;
    fn get_version(&self) -> &str;
    fn get_description(&self) -> &str;

    /// Lee la entrada de la clave, `None` si no existe.
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError>;

    /// Escribe o reemplaza la entrada de la clave.
    async fn set(&self, key: &str, entry: CacheEntry) -> Result<(), StoreError>;

    /// Elimina la entrada de la clave; eliminar una clave ausente no es error.
    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}
