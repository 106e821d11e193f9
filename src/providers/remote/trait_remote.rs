//! Trait para el fetcher remoto inyectado por el llamador.
//!
//! Una invocación del protocolo hace a lo sumo una llamada remota, siempre
//! condicional si hay un validador disponible. Cualquier deadline debe
//! imponerlo la implementación (p.ej. timeouts del cliente HTTP); el
//! protocolo no agrega capa de timeout propia.
use async_trait::async_trait;

use crate::data::RemoteResult;
use crate::errors::RemoteError;

#[async_trait]
pub trait RemoteProvider: Send + Sync {
    fn get_name(&self) -> &str;
    fn get_version(&self) -> &str;
    fn get_description(&self) -> &str;

    /// Ejecuta una única petición condicional.
    ///
    /// `validator_etag` se envía como `If-None-Match` cuando está presente.
    /// Los status definidos mapean a `RemoteResult`; todo lo demás es un
    /// `RemoteError` fatal.
    async fn fetch(&self,
                   key: &str,
                   credential: &str,
                   validator_etag: Option<&str>)
                   -> Result<RemoteResult, RemoteError>;
}
