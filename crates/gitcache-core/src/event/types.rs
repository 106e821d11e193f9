//! Tipos de evento de traza y estructura `TraceEvent`.
//!
//! Rol en el flujo:
//! - Cada ejecución del `FlowEngine` puede reportar sus transiciones a un
//!   `TraceStore` append-only.
//! - La traza es un efecto observable lateral: nunca altera el control de
//!   flujo ni el resultado de la ejecución.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tipos de eventos de traza soportados.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceEventKind {
    /// Comienzo de una ejecución sobre el estado inicial dado.
    RunStarted { initial: String },
    /// Transición tomada: estado actual, evento elegido y estado siguiente.
    TransitionTaken {
        state: String,
        event: String,
        next: String,
    },
    /// La ejecución alcanzó un estado terminal.
    RunCompleted { terminal: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceEvent {
    pub seq: u64, // asignado por el TraceStore (orden append)
    pub run_id: Uuid,
    pub kind: TraceEventKind,
    pub ts: DateTime<Utc>, // metadato, no participa en el control de flujo
}
