use thiserror::Error;

/// Errores del backend de cache.
///
/// `get` y `remove` los propagan como fatales al protocolo; los fallos de
/// `set` se tragan tras un intento best-effort (el cache es consultivo, no
/// fuente de verdad).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O failure in the cache backend: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not decode a cache entry: {0}")]
    Corrupt(String),
    #[error("cache backend failure: {0}")]
    Backend(String),
}
