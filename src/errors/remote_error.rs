use thiserror::Error;

use crate::data::BoxError;

/// Resultados fatales del fetcher remoto: todo lo que no mapea a una
/// variante de `RemoteResult`.
///
/// El protocolo los recupera sirviendo la copia cacheada si existe
/// (stale-on-error); sin copia, terminan como resultado `error`.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Received HTTP response status code {0} from GitHub. This means bad credentials were provided or you do not have access to the resource")]
    BadCredentials(u16),
    #[error("Received HTTP response status code {0} from GitHub which is not an actionable code for the github contents cache")]
    UnsupportedStatus(u16),
    #[error("Could not complete request to the GitHub api")]
    Transport(#[source] reqwest::Error),
    #[error("Received a 200 response from GitHub but could not parse the response body")]
    MalformedBody(#[source] BoxError),
    #[error("The path {0} is not a file with an extension, which is currently not supported in the github contents cache")]
    NotAFile(String),
}
