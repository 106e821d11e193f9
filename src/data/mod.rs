//! Modelos neutrales (CacheEntry, RemoteResult, ContentOutcome,...)

pub mod types;

pub use types::{BoxError, CacheEntry, ContentOutcome, RateLimitInfo, RemoteResult, SerializeFn};
