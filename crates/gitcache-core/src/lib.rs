//! gitcache-core: motor de workflows dirigidos por eventos
//!
//! Este crate expone el motor genérico que secuencia acciones asíncronas y
//! decide el siguiente step mediante eventos nombrados:
//! - `step`: el trait `StepFlow` (estados, eventos, acciones, tabla).
//! - `engine`: el `FlowEngine` que ejecuta un flujo hasta su terminal.
//! - `event`: traza append-only de transiciones (`TraceStore`).
//! - `errors`: errores de definición del workflow.
//!
//! Puede usarse por cualquier crate que necesite una máquina de estados
//! asíncrona con transiciones declarativas.

pub mod engine;
pub mod errors;
pub mod event;
pub mod step;

pub use engine::{FlowEngine, TerminalOutcome};
pub use errors::EngineError;
pub use event::{InMemoryTraceStore, NoopTraceStore, TraceEvent, TraceEventKind, TraceStore};
pub use step::{StepEmit, StepFlow};
