//! Core FlowEngine implementation

use uuid::Uuid;

use crate::errors::EngineError;
use crate::event::{NoopTraceStore, TraceEventKind, TraceStore};
use crate::step::{StepEmit, StepFlow};

/// Resultado de una ejecución completa: el estado terminal alcanzado y el
/// payload producido por el último step no terminal.
pub struct TerminalOutcome<F: StepFlow> {
    pub state: F::State,
    pub payload: F::Payload,
}

impl<F: StepFlow> std::fmt::Debug for TerminalOutcome<F> where F::Payload: std::fmt::Debug
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalOutcome")
         .field("state", &self.state)
         .field("payload", &self.payload)
         .finish()
    }
}

/// Motor de ejecución de workflows dirigidos por eventos.
///
/// Responsable de invocar la acción del step actual contra el contexto
/// compartido, interpretar el evento emitido y resolver el siguiente estado
/// con la tabla de transiciones del flujo. La ejecución es una cadena
/// estricta: exactamente una acción en vuelo a la vez, sin reintentos, sin
/// timeouts y sin concurrencia dentro de una ejecución.
pub struct FlowEngine<F, T = NoopTraceStore>
    where F: StepFlow,
          T: TraceStore
{
    flow: F,
    trace: T,
    last_run_id: Option<Uuid>,
}

impl<F> FlowEngine<F, NoopTraceStore> where F: StepFlow
{
    /// Crea un engine sin traza.
    pub fn new(flow: F) -> Self {
        Self::with_trace(flow, NoopTraceStore)
    }
}

impl<F, T> FlowEngine<F, T>
    where F: StepFlow,
          T: TraceStore
{
    /// Crea un engine con el sumidero de traza proporcionado.
    pub fn with_trace(flow: F, trace: T) -> Self {
        Self { flow, trace, last_run_id: None }
    }

    /// Acceso al flujo subyacente.
    pub fn flow(&self) -> &F {
        &self.flow
    }

    /// Acceso al store de traza para listar eventos tras una ejecución.
    pub fn trace_store(&self) -> &T {
        &self.trace
    }

    /// Identificador de la última ejecución, si hubo alguna.
    pub fn last_run_id(&self) -> Option<Uuid> {
        self.last_run_id
    }

    /// Ejecuta el flujo desde `initial` hasta alcanzar un estado terminal.
    ///
    /// Cada iteración invoca la acción del step actual. Si la acción emite
    /// sin evento se aplica el evento implícito de done; si devuelve un
    /// `Fault` se fuerza el evento de error con el fallo como payload. Un
    /// par estado x evento sin transición cableada corta la ejecución con
    /// `EngineError::NoRoute`: es un error de definición del workflow y se
    /// distingue de cualquier fallo producido por la acción de un step.
    pub async fn run(&mut self,
                     initial: F::State,
                     ctx: &mut F::Context)
                     -> Result<TerminalOutcome<F>, EngineError> {
        let run_id = Uuid::new_v4();
        self.last_run_id = Some(run_id);

        if self.flow.is_terminal(initial) {
            // Un terminal no tiene acción: no existe payload que devolver.
            return Err(EngineError::InitialStepTerminal { state: format!("{:?}", initial) });
        }

        self.trace
            .append_kind(run_id, TraceEventKind::RunStarted { initial: format!("{:?}", initial) });

        let mut state = initial;
        loop {
            let (event, payload) = match self.flow.enter(state, ctx).await {
                Ok(StepEmit { event, payload }) => {
                    (event.unwrap_or_else(|| self.flow.done_event()), payload)
                }
                Err(fault) => (self.flow.error_event(), self.flow.fault_payload(state, fault)),
            };

            let next = match self.flow.route(state, event) {
                Some(next) => next,
                None => {
                    return Err(EngineError::NoRoute { state: format!("{:?}", state),
                                                      event: format!("{:?}", event) })
                }
            };

            tracing::debug!(state = ?state, event = ?event, next = ?next, "workflow transition");
            self.trace
                .append_kind(run_id,
                             TraceEventKind::TransitionTaken { state: format!("{:?}", state),
                                                               event: format!("{:?}", event),
                                                               next: format!("{:?}", next) });

            state = next;
            if self.flow.is_terminal(state) {
                self.trace
                    .append_kind(run_id,
                                 TraceEventKind::RunCompleted { terminal: format!("{:?}", state) });
                return Ok(TerminalOutcome { state, payload });
            }
            // El payload de un step intermedio no sobrevive a la siguiente
            // transición; solo el del último step llega al terminal.
        }
    }
}
