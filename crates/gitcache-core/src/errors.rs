//! Errores específicos del motor (simples por ahora).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errores de definición del workflow, no de ejecución de un step.
///
/// Un `EngineError` siempre significa que la tabla de transiciones o el
/// estado inicial están mal construidos. Los fallos propios de un step
/// viajan por el evento de error del flujo y terminan en un estado
/// terminal; nunca llegan aquí.
#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum EngineError {
    #[error("no transition wired for state {state} on event {event}")]
    NoRoute { state: String, event: String },
    #[error("initial step {state} is terminal and can produce no payload")]
    InitialStepTerminal { state: String },
}
