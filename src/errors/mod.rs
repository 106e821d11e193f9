//! Taxonomía de errores del protocolo (config, cache, remoto).

pub mod config_error;
pub mod remote_error;
pub mod store_error;

pub use config_error::ConfigError;
pub use remote_error::RemoteError;
pub use store_error::StoreError;
