//! Protocolo de recuperación de contenido sobre el engine de
//! `gitcache-core`: la máquina de estados (`retrieval`) y el punto de
//! entrada con su traducción de resultados (`manager`).

pub mod manager;
pub mod retrieval;

pub use manager::{get_content, ContentRequest};
pub use retrieval::{RetrievalContext, RetrievalEvent, RetrievalFlow, RetrievalState, StepData};
