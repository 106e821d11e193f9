//! Punto de entrada del protocolo.
//! Se encarga de:
//! - Validar las precondiciones de la invocación (fail-fast, fuera del
//!   workflow).
//! - Elegir el estado inicial (`ClearCacheEntry` con bypass, `LookInCache`
//!   sin él).
//! - Ejecutar el flujo con el engine y traducir el terminal alcanzado a la
//!   forma visible para el llamador.
use std::sync::Arc;
use std::time::Duration;

use gitcache_core::{FlowEngine, TerminalOutcome};

use crate::data::{ContentOutcome, SerializeFn};
use crate::errors::ConfigError;
use crate::providers::cache::CacheProvider;
use crate::providers::remote::RemoteProvider;
use crate::workflow::retrieval::{RetrievalContext, RetrievalFlow, RetrievalState, StepData};

/// Parámetros de una invocación. Los colaboradores se toman prestados solo
/// durante la llamada.
pub struct ContentRequest<'a> {
    pub key: String,
    pub credential: String,
    /// Elimina la entrada cacheada y fuerza la consulta remota.
    pub cache_bypass: bool,
    /// TTL de una entrada positiva; dentro de él no hay llamada remota.
    pub max_age: Option<Duration>,
    /// TTL de una entrada negativa; por defecto no expira.
    pub max_404_age: Option<Duration>,
    /// Transformación del contenido antes de cachear; identidad por defecto.
    pub serialize: Option<SerializeFn>,
    pub cache: &'a dyn CacheProvider,
    pub remote: &'a dyn RemoteProvider,
}

impl<'a> ContentRequest<'a> {
    pub fn new(key: impl Into<String>,
               credential: impl Into<String>,
               cache: &'a dyn CacheProvider,
               remote: &'a dyn RemoteProvider)
               -> Self {
        Self { key: key.into(),
               credential: credential.into(),
               cache_bypass: false,
               max_age: None,
               max_404_age: None,
               serialize: None,
               cache,
               remote }
    }
}

/// Recupera el contenido de una clave a través del cache y del remoto.
///
/// Devuelve `Err(ConfigError)` solo ante precondiciones incumplidas; todo
/// fallo posterior llega como `ContentOutcome::Error` estructurado, nunca
/// como pánico ni como `Err`.
pub async fn get_content(request: ContentRequest<'_>) -> Result<ContentOutcome, ConfigError> {
    if request.key.trim().is_empty() {
        return Err(ConfigError::MissingArgument("key"));
    }
    if request.credential.trim().is_empty() {
        return Err(ConfigError::MissingArgument("credential"));
    }

    let initial = if request.cache_bypass {
        RetrievalState::ClearCacheEntry
    } else {
        RetrievalState::LookInCache
    };

    let mut ctx = RetrievalContext::new(request.key,
                                        request.credential,
                                        request.max_age,
                                        request.max_404_age,
                                        request.serialize.unwrap_or_else(identity_serialize));
    let flow = RetrievalFlow::new(request.cache, request.remote);
    let mut engine = FlowEngine::new(flow);

    match engine.run(initial, &mut ctx).await {
        Ok(outcome) => Ok(translate(outcome)),
        // Con la tabla bien formada esto es inalcanzable; aun así el
        // llamador recibe un resultado estructurado.
        Err(err) => Ok(ContentOutcome::Error {
            message: "The content retrieval workflow definition is inconsistent".to_string(),
            cause: Box::new(err),
        }),
    }
}

fn identity_serialize() -> SerializeFn {
    Arc::new(|content| Ok(content))
}

/// Traducción del terminal alcanzado a la forma del llamador.
fn translate(outcome: TerminalOutcome<RetrievalFlow<'_>>) -> ContentOutcome {
    match (outcome.state, outcome.payload) {
        (RetrievalState::Found, StepData::Found { content, etag, cache_hit }) => {
            ContentOutcome::Found { content, etag, cache_hit }
        }
        (RetrievalState::NotFound, StepData::NotFound { cache_hit }) => {
            ContentOutcome::NotFound { content: String::new(), cache_hit }
        }
        (RetrievalState::RateLimitExceeded,
         StepData::RateLimited { info, content, etag, cache_hit }) => {
            ContentOutcome::RateLimitExceeded { limit: info.limit,
                                                remaining: info.remaining,
                                                reset_at_epoch_seconds: info.reset_at_epoch_seconds,
                                                content,
                                                etag,
                                                cache_hit }
        }
        (RetrievalState::Error, StepData::Failure { message, cause }) => {
            ContentOutcome::Error { message, cause }
        }
        (state, payload) => ContentOutcome::Error {
            message: format!("Terminal step {:?} carried an unexpected payload", state),
            cause: format!("{:?}", payload).into(),
        },
    }
}
