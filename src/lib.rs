//! gitcache Rust Library
//!
//! Este crate actúa como la librería central de gitcache:
//! - Expone `workflow` con el protocolo de recuperación (`get_content`).
//! - Expone `providers` con los colaboradores inyectables (cache y remoto).
//! - Expone `data` y `errors` con el modelo y la taxonomía de fallos.
//!
//! Puede usarse desde `main.rs` o por otros crates/clientes.

pub mod config;
pub mod data;
pub mod errors;
pub mod providers;
pub mod workflow;

pub use data::{BoxError, CacheEntry, ContentOutcome, RateLimitInfo, RemoteResult, SerializeFn};
pub use errors::{ConfigError, RemoteError, StoreError};
pub use providers::cache::{CacheProvider, InMemoryCacheProvider};
pub use providers::remote::{GithubRemoteProvider, RemoteProvider};
pub use workflow::{get_content, ContentRequest};
