//! Engine module for FlowEngine implementation
//!
//! Provides the event-routed engine driving `StepFlow` implementations.

pub mod core;

pub use self::core::{FlowEngine, TerminalOutcome};

pub use crate::event::{InMemoryTraceStore, NoopTraceStore, TraceEvent, TraceEventKind, TraceStore};
pub use crate::step::{StepEmit, StepFlow};
