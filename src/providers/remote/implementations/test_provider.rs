use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::data::RemoteResult;
use crate::errors::RemoteError;
use crate::providers::remote::trait_remote::RemoteProvider;

/// Fetcher guionado para pruebas del protocolo.
///
/// Devuelve una secuencia predefinida de resultados y registra los
/// validadores que el protocolo le ofreció en cada llamada.
pub struct ScriptedRemoteProvider {
    script: Mutex<VecDeque<Result<RemoteResult, RemoteError>>>,
    offered_etags: Mutex<Vec<Option<String>>>,
}

impl ScriptedRemoteProvider {
    pub fn new() -> Self {
        Self { script: Mutex::new(VecDeque::new()),
               offered_etags: Mutex::new(Vec::new()) }
    }

    /// Encola el siguiente resultado del guion.
    pub fn then(self, outcome: Result<RemoteResult, RemoteError>) -> Self {
        self.script.lock().unwrap_or_else(|e| e.into_inner()).push_back(outcome);
        self
    }

    /// Número de llamadas recibidas.
    pub fn call_count(&self) -> usize {
        self.offered_etags.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// Validadores ofrecidos por el protocolo, en orden de llamada.
    pub fn offered_etags(&self) -> Vec<Option<String>> {
        self.offered_etags.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Default for ScriptedRemoteProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteProvider for ScriptedRemoteProvider {
    fn get_name(&self) -> &str {
        "ScriptedRemoteProvider"
    }

    fn get_version(&self) -> &str {
        "1.0.0"
    }

    fn get_description(&self) -> &str {
        "Scripted remote provider for testing purposes"
    }

    async fn fetch(&self,
                   _key: &str,
                   _credential: &str,
                   validator_etag: Option<&str>)
                   -> Result<RemoteResult, RemoteError> {
        self.offered_etags
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(validator_etag.map(str::to_string));
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            // Guion agotado: status imposible para que el test falle claro.
            .unwrap_or(Err(RemoteError::UnsupportedStatus(0)))
    }
}
