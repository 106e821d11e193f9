use thiserror::Error;

/// Errores de precondición de una invocación del protocolo.
///
/// Se devuelven antes de entrar al workflow: una invocación mal armada no
/// produce un resultado estructurado sino un fallo inmediato.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Please provide all of the required arguments - missing {0}")]
    MissingArgument(&'static str),
}
