use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use super::{TraceEvent, TraceEventKind};

/// Almacenamiento de eventos de traza append-only.
pub trait TraceStore {
    /// Agrega un evento a partir de su kind y devuelve el evento completo
    /// (con seq y ts).
    fn append_kind(&mut self, run_id: Uuid, kind: TraceEventKind) -> TraceEvent;
    /// Lista eventos de una ejecución (orden ascendente por seq).
    fn list(&self, run_id: Uuid) -> Vec<TraceEvent>;
}

pub struct InMemoryTraceStore {
    pub inner: HashMap<Uuid, Vec<TraceEvent>>,
}

impl Default for InMemoryTraceStore {
    fn default() -> Self {
        Self { inner: HashMap::new() }
    }
}

impl TraceStore for InMemoryTraceStore {
    fn append_kind(&mut self, run_id: Uuid, kind: TraceEventKind) -> TraceEvent {
        let vec = self.inner.entry(run_id).or_insert_with(Vec::new);
        let seq = vec.len() as u64;
        let ev = TraceEvent { seq, run_id, kind, ts: Utc::now() };
        vec.push(ev.clone());
        ev
    }

    fn list(&self, run_id: Uuid) -> Vec<TraceEvent> {
        self.inner.get(&run_id).cloned().unwrap_or_default()
    }
}

/// Sumidero nulo: construye el evento pero no lo retiene. Es el store por
/// defecto cuando la traza está deshabilitada.
#[derive(Default)]
pub struct NoopTraceStore;

impl TraceStore for NoopTraceStore {
    fn append_kind(&mut self, run_id: Uuid, kind: TraceEventKind) -> TraceEvent {
        TraceEvent { seq: 0, run_id, kind, ts: Utc::now() }
    }

    fn list(&self, _run_id: Uuid) -> Vec<TraceEvent> {
        Vec::new()
    }
}
