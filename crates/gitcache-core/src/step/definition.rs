use async_trait::async_trait;
use std::fmt::Debug;

/// Emisión de un step: el evento elegido (o ninguno, para el evento
/// implícito de "done") y el payload que acompaña a la transición.
pub struct StepEmit<E, P> {
    pub event: Option<E>,
    pub payload: P,
}

impl<E, P> StepEmit<E, P> {
    /// Emite un evento explícito con su payload.
    pub fn with_event(event: E, payload: P) -> Self {
        Self { event: Some(event), payload }
    }

    /// Emite sin evento; el engine aplicará el evento implícito de done.
    pub fn done(payload: P) -> Self {
        Self { event: None, payload }
    }
}

/// Trait que define un workflow dirigido por eventos.
///
/// A diferencia de un pipeline lineal, cada step elige el siguiente mediante
/// un evento nombrado que la tabla de transiciones (`route`) resuelve a un
/// estado. El conjunto de estados y eventos es cerrado: son enums del
/// implementador, de modo que una transición no cableada es la única
/// condición que queda como error de definición en tiempo de ejecución.
#[async_trait]
pub trait StepFlow: Send + Sync {
    /// Nombre de step. Estados terminales no tienen acción.
    type State: Copy + Eq + Debug + Send + Sync;
    /// Evento nombrado que decide la transición.
    type Event: Copy + Eq + Debug + Send + Sync;
    /// Contexto mutable compartido entre los steps de una ejecución.
    type Context: Send;
    /// Payload que viaja con cada transición; el del último step no
    /// terminal es el resultado de la ejecución.
    type Payload: Send;
    /// Fallo no manejado dentro de la acción de un step.
    type Fault: Send;

    /// Indica si el estado es terminal (sin acción; detiene la ejecución).
    fn is_terminal(&self, state: Self::State) -> bool;

    /// Acción asíncrona del step. Nunca se invoca para estados terminales.
    async fn enter(&self,
                   state: Self::State,
                   ctx: &mut Self::Context)
                   -> Result<StepEmit<Self::Event, Self::Payload>, Self::Fault>;

    /// Tabla de transiciones: estado actual + evento -> siguiente estado.
    /// `None` significa que el par no está cableado (error de definición).
    fn route(&self, state: Self::State, event: Self::Event) -> Option<Self::State>;

    /// Evento implícito cuando la acción no emite ninguno.
    fn done_event(&self) -> Self::Event;

    /// Evento forzado cuando la acción devuelve un `Fault`.
    fn error_event(&self) -> Self::Event;

    /// Convierte el fallo capturado en el payload que acompaña al evento de
    /// error (normalmente hacia un estado terminal de error).
    fn fault_payload(&self, state: Self::State, fault: Self::Fault) -> Self::Payload;
}
