//! Máquina de estados del protocolo de recuperación de contenido.
//!
//! Tres steps con acción (`ClearCacheEntry`, `LookInCache`, `LookInGithub`)
//! y cuatro terminales. La política completa:
//! - lookup en cache con TTL positivo (`max_age`) y TTL negativo
//!   (`max_404_age`),
//! - fetch remoto condicional con el etag cacheado como validador,
//! - escrituras de cache best-effort (un fallo de escritura nunca cambia el
//!   resultado),
//! - stale-on-error: un fallo fatal del remoto degrada a la copia cacheada
//!   si existe.
use chrono::{DateTime, Utc};
use std::time::Duration;

use async_trait::async_trait;
use gitcache_core::{StepEmit, StepFlow};

use crate::data::{BoxError, CacheEntry, RateLimitInfo, RemoteResult, SerializeFn};
use crate::providers::cache::CacheProvider;
use crate::providers::remote::RemoteProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalState {
    ClearCacheEntry,
    LookInCache,
    LookInGithub,
    Found,
    NotFound,
    RateLimitExceeded,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalEvent {
    /// Evento implícito; ningún step del protocolo lo emite.
    Done,
    CacheCleared,
    Found,
    FoundInCache,
    NotInCache,
    Cache404Expired,
    Cache404Hit,
    Github404,
    RateLimitExceeded,
    Error,
}

/// Payload que acompaña cada transición; el que entra a un terminal es el
/// resultado de la ejecución.
#[derive(Debug)]
pub enum StepData {
    /// Transición de solo enrutado, sin datos.
    Empty,
    Found {
        content: String,
        etag: String,
        cache_hit: bool,
    },
    NotFound { cache_hit: bool },
    RateLimited {
        info: RateLimitInfo,
        content: String,
        etag: String,
        cache_hit: bool,
    },
    Failure { message: String, cause: BoxError },
}

/// Fallo no recuperado dentro de un step; el engine lo convierte en el
/// evento de error y este payload viaja al terminal `Error`.
#[derive(Debug)]
pub struct RetrievalFault {
    pub message: String,
    pub cause: BoxError,
}

/// Copia cacheada levantada por `LookInCache` para validación condicional.
#[derive(Debug, Clone)]
pub struct CachedContent {
    pub content: String,
    pub etag: String,
    pub observed_at: DateTime<Utc>,
}

/// Contexto mutable de una invocación. Vive exactamente una llamada: nunca
/// se comparte entre invocaciones ni se persiste.
pub struct RetrievalContext {
    pub key: String,
    pub credential: String,
    pub max_age: Option<Duration>,
    pub max_404_age: Option<Duration>,
    pub serialize: SerializeFn,
    pub(crate) cached: Option<CachedContent>,
    pub(crate) max_age_expired: bool,
}

impl RetrievalContext {
    pub fn new(key: String,
               credential: String,
               max_age: Option<Duration>,
               max_404_age: Option<Duration>,
               serialize: SerializeFn)
               -> Self {
        Self { key,
               credential,
               max_age,
               max_404_age,
               serialize,
               cached: None,
               max_age_expired: false }
    }
}

/// Definición del flujo: los steps y su tabla de transiciones. Solo toma
/// referencias prestadas a los colaboradores; la propiedad es del llamador.
pub struct RetrievalFlow<'a> {
    cache: &'a dyn CacheProvider,
    remote: &'a dyn RemoteProvider,
}

type RetrievalEmit = StepEmit<RetrievalEvent, StepData>;

impl<'a> RetrievalFlow<'a> {
    pub fn new(cache: &'a dyn CacheProvider, remote: &'a dyn RemoteProvider) -> Self {
        Self { cache, remote }
    }

    /// Elimina la entrada para forzar un fetch fresco. Aquí un fallo del
    /// store sí es fatal: no podemos garantizar el bypass pedido.
    async fn clear_cache_entry(&self, ctx: &mut RetrievalContext) -> Result<RetrievalEmit, RetrievalFault> {
        self.cache.remove(&ctx.key).await.map_err(|e| RetrievalFault {
            message: format!("Error when trying to remove entry from the cache at path {}", ctx.key),
            cause: Box::new(e),
        })?;
        Ok(StepEmit::with_event(RetrievalEvent::CacheCleared, StepData::Empty))
    }

    async fn look_in_cache(&self, ctx: &mut RetrievalContext) -> Result<RetrievalEmit, RetrievalFault> {
        let entry = self.cache.get(&ctx.key).await.map_err(|e| RetrievalFault {
            message: format!("Error when trying to get entry from the cache at path {}", ctx.key),
            cause: Box::new(e),
        })?;
        let now = Utc::now();
        match entry {
            None => Ok(StepEmit::with_event(RetrievalEvent::NotInCache, StepData::Empty)),
            Some(CacheEntry::NotFound { observed_at }) => {
                let expired = ctx.max_404_age
                                 .map(|limit| age_exceeds(now, observed_at, limit))
                                 .unwrap_or(false);
                if expired {
                    // Entrada negativa vencida: se elimina y se consulta el
                    // remoto de nuevo.
                    Ok(StepEmit::with_event(RetrievalEvent::Cache404Expired, StepData::Empty))
                } else {
                    Ok(StepEmit::with_event(RetrievalEvent::Cache404Hit,
                                            StepData::NotFound { cache_hit: true }))
                }
            }
            Some(CacheEntry::Found { content, etag, observed_at }) => {
                if let Some(max_age) = ctx.max_age {
                    if !age_exceeds(now, observed_at, max_age) {
                        // Hit puro: sin llamada remota.
                        return Ok(StepEmit::with_event(RetrievalEvent::Found,
                                                       StepData::Found { content,
                                                                         etag,
                                                                         cache_hit: true }));
                    }
                    ctx.max_age_expired = true;
                }
                ctx.cached = Some(CachedContent { content, etag, observed_at });
                Ok(StepEmit::with_event(RetrievalEvent::FoundInCache, StepData::Empty))
            }
        }
    }

    async fn look_in_github(&self, ctx: &mut RetrievalContext) -> Result<RetrievalEmit, RetrievalFault> {
        let validator = ctx.cached.as_ref().map(|c| c.etag.clone());
        let response = match self.remote.fetch(&ctx.key, &ctx.credential, validator.as_deref()).await {
            Ok(response) => response,
            Err(err) => {
                // Stale-on-error: con copia cacheada preferimos servirla a
                // fallar la llamada.
                if let Some(cached) = &ctx.cached {
                    tracing::warn!(key = %ctx.key, error = %err,
                                   "remote fetch failed, returning the value from the cache");
                    return Ok(StepEmit::with_event(RetrievalEvent::Found,
                                                   StepData::Found { content: cached.content.clone(),
                                                                     etag: cached.etag.clone(),
                                                                     cache_hit: true }));
                }
                return Err(RetrievalFault {
                    message: format!("Unexpected error when looking for content on GitHub at path {}", ctx.key),
                    cause: Box::new(err),
                });
            }
        };

        match response {
            RemoteResult::NotModified => {
                let Some(cached) = ctx.cached.as_ref() else {
                    // Un 304 solo es posible si enviamos un validador.
                    return Err(RetrievalFault {
                        message: format!("Received a 304 from GitHub without a cached entry for path {}", ctx.key),
                        cause: "conditional response without validator".into(),
                    });
                };
                if ctx.max_age_expired {
                    // Reconfirmado por el remoto: refrescar observed_at o el
                    // TTL quedaría vencido para siempre.
                    self.write_cache_best_effort(&ctx.key,
                                                 CacheEntry::Found { content: cached.content.clone(),
                                                                     etag: cached.etag.clone(),
                                                                     observed_at: Utc::now() })
                        .await;
                }
                Ok(StepEmit::with_event(RetrievalEvent::Found,
                                        StepData::Found { content: cached.content.clone(),
                                                          etag: cached.etag.clone(),
                                                          cache_hit: true }))
            }
            RemoteResult::NotFound => {
                // Cachear el 404 evita quemar cuota en claves inexistentes;
                // expira con max_404_age.
                self.write_cache_best_effort(&ctx.key, CacheEntry::NotFound { observed_at: Utc::now() })
                    .await;
                Ok(StepEmit::with_event(RetrievalEvent::Github404,
                                        StepData::NotFound { cache_hit: false }))
            }
            RemoteResult::RateLimited(info) => {
                // Sin escritura de cache: la respuesta no trae contenido
                // autoritativo. Si hay copia cacheada, se ofrece.
                let (content, etag, cache_hit) = match &ctx.cached {
                    Some(cached) => (cached.content.clone(), cached.etag.clone(), true),
                    None => (String::new(), String::new(), false),
                };
                Ok(StepEmit::with_event(RetrievalEvent::RateLimitExceeded,
                                        StepData::RateLimited { info, content, etag, cache_hit }))
            }
            RemoteResult::Content { content, etag } => {
                let serialized = (ctx.serialize)(content).map_err(|cause| RetrievalFault {
                    message: "Error occured when serializing the content".to_string(),
                    cause,
                })?;
                self.write_cache_best_effort(&ctx.key,
                                             CacheEntry::Found { content: serialized.clone(),
                                                                 etag: etag.clone(),
                                                                 observed_at: Utc::now() })
                    .await;
                Ok(StepEmit::with_event(RetrievalEvent::Found,
                                        StepData::Found { content: serialized,
                                                          etag,
                                                          cache_hit: false }))
            }
        }
    }

    /// Intenta escribir, reporta y descarta el error. La política de tragar
    /// fallos de escritura queda en un único lugar visible.
    async fn write_cache_best_effort(&self, key: &str, entry: CacheEntry) {
        if let Err(err) = self.cache.set(key, entry).await {
            tracing::warn!(key = %key, store = %self.cache.get_name(), error = %err,
                           "ignoring cache write failure");
        }
    }
}

#[async_trait]
impl StepFlow for RetrievalFlow<'_> {
    type State = RetrievalState;
    type Event = RetrievalEvent;
    type Context = RetrievalContext;
    type Payload = StepData;
    type Fault = RetrievalFault;

    fn is_terminal(&self, state: RetrievalState) -> bool {
        matches!(state,
                 RetrievalState::Found
                 | RetrievalState::NotFound
                 | RetrievalState::RateLimitExceeded
                 | RetrievalState::Error)
    }

    async fn enter(&self,
                   state: RetrievalState,
                   ctx: &mut RetrievalContext)
                   -> Result<RetrievalEmit, RetrievalFault> {
        match state {
            RetrievalState::ClearCacheEntry => self.clear_cache_entry(ctx).await,
            RetrievalState::LookInCache => self.look_in_cache(ctx).await,
            RetrievalState::LookInGithub => self.look_in_github(ctx).await,
            // El engine nunca entra a un terminal; si ocurre es un defecto
            // de la definición y se reporta como tal.
            RetrievalState::Found
            | RetrievalState::NotFound
            | RetrievalState::RateLimitExceeded
            | RetrievalState::Error => Err(RetrievalFault {
                message: format!("Step {:?} is terminal and has no action", state),
                cause: "workflow definition defect".into(),
            }),
        }
    }

    fn route(&self, state: RetrievalState, event: RetrievalEvent) -> Option<RetrievalState> {
        use RetrievalEvent as E;
        use RetrievalState as S;
        match (state, event) {
            (S::ClearCacheEntry, E::CacheCleared) => Some(S::LookInGithub),
            (S::ClearCacheEntry, E::Error) => Some(S::Error),
            (S::LookInCache, E::Found) => Some(S::Found),
            (S::LookInCache, E::FoundInCache) => Some(S::LookInGithub),
            (S::LookInCache, E::NotInCache) => Some(S::LookInGithub),
            (S::LookInCache, E::Cache404Expired) => Some(S::ClearCacheEntry),
            (S::LookInCache, E::Cache404Hit) => Some(S::NotFound),
            (S::LookInCache, E::Error) => Some(S::Error),
            (S::LookInGithub, E::Found) => Some(S::Found),
            (S::LookInGithub, E::Github404) => Some(S::NotFound),
            (S::LookInGithub, E::RateLimitExceeded) => Some(S::RateLimitExceeded),
            (S::LookInGithub, E::Error) => Some(S::Error),
            _ => None,
        }
    }

    fn done_event(&self) -> RetrievalEvent {
        RetrievalEvent::Done
    }

    fn error_event(&self) -> RetrievalEvent {
        RetrievalEvent::Error
    }

    fn fault_payload(&self, _state: RetrievalState, fault: RetrievalFault) -> StepData {
        StepData::Failure { message: fault.message, cause: fault.cause }
    }
}

/// `true` si la edad de la observación supera estrictamente el límite.
/// Una observación futura (reloj en retroceso) cuenta como edad cero.
fn age_exceeds(now: DateTime<Utc>, observed_at: DateTime<Utc>, limit: Duration) -> bool {
    now.signed_duration_since(observed_at)
       .to_std()
       .map(|age| age > limit)
       .unwrap_or(false)
}
