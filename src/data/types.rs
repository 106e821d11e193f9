//! Tipos neutrales del dominio: entradas de cache, resultados remotos y el
//! resultado visible para el llamador.
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Error opaco transportado dentro de un resultado (causa original).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Transformación del contenido aplicada por el llamador antes de cachear.
/// Por defecto es la identidad.
pub type SerializeFn = Arc<dyn Fn(String) -> Result<String, BoxError> + Send + Sync>;

/// Entrada persistida en el cache para una clave.
///
/// Invariante: `observed_at` es el instante de la última confirmación
/// remota (un fetch fresco o una validación 304), nunca el instante en que
/// el proceso local leyó el cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum CacheEntry {
    /// El remoto confirmó contenido para la clave.
    Found {
        content: String,
        etag: String,
        observed_at: DateTime<Utc>,
    },
    /// El remoto confirmó que la clave no existe (cache negativo).
    NotFound { observed_at: DateTime<Utc> },
}

impl CacheEntry {
    /// Instante de la última confirmación remota.
    pub fn observed_at(&self) -> DateTime<Utc> {
        match self {
            CacheEntry::Found { observed_at, .. } => *observed_at,
            CacheEntry::NotFound { observed_at } => *observed_at,
        }
    }
}

/// Cabeceras de cuota expuestas por el remoto al agotar el límite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitInfo {
    pub limit: u64,
    pub remaining: u64,
    pub reset_at_epoch_seconds: u64,
}

/// Resultado de una única llamada condicional al remoto.
///
/// Todo lo que no entra en estas variantes (fallo de transporte, credenciales
/// malas, cuerpo no parseable, status no soportado) viaja como
/// `Err(RemoteError)` desde el fetcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteResult {
    /// 200: contenido fresco con su validador.
    Content { content: String, etag: String },
    /// 304: el remoto confirma que lo cacheado sigue vigente.
    NotModified,
    /// 404: la clave no existe en el remoto.
    NotFound,
    /// 403 con cuota agotada: sin contenido autoritativo.
    RateLimited(RateLimitInfo),
}

/// Resultado terminal de una invocación del protocolo, ya traducido a la
/// forma que ve el llamador.
#[derive(Debug)]
pub enum ContentOutcome {
    Found {
        content: String,
        etag: String,
        cache_hit: bool,
    },
    NotFound {
        /// Siempre vacío; presente para que la forma sea uniforme.
        content: String,
        cache_hit: bool,
    },
    RateLimitExceeded {
        limit: u64,
        remaining: u64,
        reset_at_epoch_seconds: u64,
        content: String,
        etag: String,
        cache_hit: bool,
    },
    Error { message: String, cause: BoxError },
}

impl ContentOutcome {
    /// Etiqueta estable del resultado, útil para logs y demos.
    pub fn status(&self) -> &'static str {
        match self {
            ContentOutcome::Found { .. } => "found",
            ContentOutcome::NotFound { .. } => "notFound",
            ContentOutcome::RateLimitExceeded { .. } => "rateLimitExceeded",
            ContentOutcome::Error { .. } => "error",
        }
    }
}
