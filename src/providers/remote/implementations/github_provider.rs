//! Fetcher sobre la API de contents de GitHub.
//!
//! Mapea la respuesta HTTP al contrato del protocolo:
//! - 200 -> `Content` (cuerpo JSON con `content` en base64).
//! - 304 -> `NotModified` (la petición condicional no cuenta contra la cuota).
//! - 404 -> `NotFound`.
//! - 403 con `x-ratelimit-remaining: 0` -> `RateLimited`.
//! - 401 y 403 sin señal de cuota -> `RemoteError::BadCredentials`.
//! - cualquier otro status -> `RemoteError::UnsupportedStatus`.
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, ETAG, IF_NONE_MATCH, USER_AGENT};
use serde::Deserialize;

use crate::data::{RateLimitInfo, RemoteResult};
use crate::errors::RemoteError;
use crate::providers::remote::trait_remote::RemoteProvider;

const GITHUB_API: &str = "https://api.github.com";
const ACCEPT_CONTENTS: &str = "application/vnd.github.v3+json";

/// Cuerpo relevante de la respuesta 200 de la API de contents.
#[derive(Debug, Deserialize)]
struct ContentsBody {
    content: String,
}

pub struct GithubRemoteProvider {
    owner: String,
    repo: String,
    user_agent: String,
    client: reqwest::Client,
}

impl GithubRemoteProvider {
    pub fn new(owner: String, repo: String, user_agent: String) -> Self {
        Self::with_client(owner, repo, user_agent, reqwest::Client::new())
    }

    /// Permite inyectar un cliente preconfigurado (timeouts, proxy).
    pub fn with_client(owner: String, repo: String, user_agent: String, client: reqwest::Client) -> Self {
        Self { owner, repo, user_agent, client }
    }

    fn contents_url(&self, key: &str) -> String {
        format!("{}/repos/{}/{}/contents/{}", GITHUB_API, self.owner, self.repo, key)
    }
}

#[async_trait]
impl RemoteProvider for GithubRemoteProvider {
    fn get_name(&self) -> &str {
        "GithubRemoteProvider"
    }

    fn get_version(&self) -> &str {
        "1.0.0"
    }

    fn get_description(&self) -> &str {
        "Conditional fetcher over the GitHub repository contents API"
    }

    async fn fetch(&self,
                   key: &str,
                   credential: &str,
                   validator_etag: Option<&str>)
                   -> Result<RemoteResult, RemoteError> {
        // La API de contents devuelve un listado para directorios; este
        // cliente solo soporta ficheros.
        if !has_file_extension(key) {
            return Err(RemoteError::NotAFile(key.to_string()));
        }

        let mut request = self.client
                              .get(self.contents_url(key))
                              .header(ACCEPT, ACCEPT_CONTENTS)
                              .header(USER_AGENT, &self.user_agent)
                              .header(AUTHORIZATION, format!("token {}", credential));
        if let Some(etag) = validator_etag {
            request = request.header(IF_NONE_MATCH, etag);
        }

        let response = request.send().await.map_err(RemoteError::Transport)?;
        let status = response.status().as_u16();
        match status {
            200 => {
                let etag = response.headers()
                                   .get(ETAG)
                                   .and_then(|v| v.to_str().ok())
                                   .unwrap_or_default()
                                   .to_string();
                let body: ContentsBody = response.json()
                                                 .await
                                                 .map_err(|e| RemoteError::MalformedBody(Box::new(e)))?;
                let content = decode_content(&body.content)?;
                Ok(RemoteResult::Content { content, etag })
            }
            304 => Ok(RemoteResult::NotModified),
            404 => Ok(RemoteResult::NotFound),
            403 => match rate_limit_from_headers(response.headers()) {
                Some(info) => Ok(RemoteResult::RateLimited(info)),
                None => Err(RemoteError::BadCredentials(status)),
            },
            401 => Err(RemoteError::BadCredentials(status)),
            other => Err(RemoteError::UnsupportedStatus(other)),
        }
    }
}

/// El último segmento de la clave debe tener una extensión no vacía.
fn has_file_extension(key: &str) -> bool {
    let name = key.rsplit('/').next().unwrap_or(key);
    match name.rsplit_once('.') {
        Some((stem, ext)) => !stem.is_empty() && !ext.is_empty(),
        None => false,
    }
}

/// Decodifica el campo `content` (base64, posiblemente envuelto en saltos
/// de línea) a texto UTF-8.
fn decode_content(raw: &str) -> Result<String, RemoteError> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let bytes = BASE64.decode(compact.as_bytes())
                      .map_err(|e| RemoteError::MalformedBody(Box::new(e)))?;
    String::from_utf8(bytes).map_err(|e| RemoteError::MalformedBody(Box::new(e)))
}

/// Señal de cuota agotada: solo un 403 con `x-ratelimit-remaining` presente
/// y exactamente en cero es un rate limit.
fn rate_limit_from_headers(headers: &HeaderMap) -> Option<RateLimitInfo> {
    let header_u64 = |name: &str| {
        headers.get(name)
               .and_then(|v| v.to_str().ok())
               .and_then(|v| v.trim().parse::<u64>().ok())
    };
    let remaining = header_u64("x-ratelimit-remaining")?;
    if remaining != 0 {
        return None;
    }
    Some(RateLimitInfo { limit: header_u64("x-ratelimit-limit").unwrap_or_default(),
                         remaining,
                         reset_at_epoch_seconds: header_u64("x-ratelimit-reset").unwrap_or_default() })
}
