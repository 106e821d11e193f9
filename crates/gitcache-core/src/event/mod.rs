//! Definiciones de eventos de traza y trait TraceStore.

mod store;
mod types;

pub use store::{InMemoryTraceStore, NoopTraceStore, TraceStore};
pub use types::{TraceEvent, TraceEventKind};
