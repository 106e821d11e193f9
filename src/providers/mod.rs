//! Colaboradores externos del protocolo: cache y fetcher remoto.

pub mod cache;
pub mod remote;
