//! Suite de integración del protocolo completo: cache guionado + remoto
//! guionado, cubriendo hits puros, validación condicional, cache negativo,
//! rate limit, bypass y degradación a copia vieja.
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use gitcache_rust::providers::cache::{CacheProvider, InMemoryCacheProvider, ScriptedCacheProvider};
use gitcache_rust::providers::remote::{RemoteProvider, ScriptedRemoteProvider};
use gitcache_rust::{get_content, CacheEntry, ContentOutcome, ContentRequest, RateLimitInfo,
                    RemoteError, RemoteResult, SerializeFn};

const KEY: &str = "test-file.mdx";
const TOKEN: &str = "123";
const CONTENT: &str = "This is a Test";
const ETAG: &str = "abc";

fn found_entry(content: &str, etag: &str, age: Duration) -> CacheEntry {
    CacheEntry::Found { content: content.to_string(),
                        etag: etag.to_string(),
                        observed_at: Utc::now() - chrono::Duration::from_std(age).unwrap() }
}

fn not_found_entry(age: Duration) -> CacheEntry {
    CacheEntry::NotFound { observed_at: Utc::now() - chrono::Duration::from_std(age).unwrap() }
}

fn remote_content() -> RemoteResult {
    RemoteResult::Content { content: CONTENT.to_string(),
                            etag: ETAG.to_string() }
}

fn lowercase_serialize() -> SerializeFn {
    Arc::new(|content: String| Ok(content.to_lowercase()))
}

struct Call<'a> {
    cache: &'a dyn CacheProvider,
    remote: &'a dyn RemoteProvider,
    cache_bypass: bool,
    max_age: Option<Duration>,
    max_404_age: Option<Duration>,
    serialize: Option<SerializeFn>,
}

impl<'a> Call<'a> {
    fn new(cache: &'a dyn CacheProvider, remote: &'a dyn RemoteProvider) -> Self {
        Self { cache,
               remote,
               cache_bypass: false,
               max_age: None,
               max_404_age: None,
               serialize: None }
    }

    async fn run(self) -> ContentOutcome {
        get_content(ContentRequest { key: KEY.to_string(),
                                     credential: TOKEN.to_string(),
                                     cache_bypass: self.cache_bypass,
                                     max_age: self.max_age,
                                     max_404_age: self.max_404_age,
                                     serialize: self.serialize,
                                     cache: self.cache,
                                     remote: self.remote }).await
                                                           .expect("request precondiciones ok")
    }
}

#[tokio::test]
async fn cache_miss_fetches_and_populates_the_cache() {
    let cache = ScriptedCacheProvider::new();
    let remote = ScriptedRemoteProvider::new().then(Ok(remote_content()));

    let before = Utc::now();
    let outcome = Call { serialize: Some(lowercase_serialize()),
                         ..Call::new(&cache, &remote) }.run()
                                                       .await;

    match outcome {
        ContentOutcome::Found { content, etag, cache_hit } => {
            assert_eq!(content, "this is a test");
            assert_eq!(etag, ETAG);
            assert!(!cache_hit);
        }
        other => panic!("expected found, got {:?}", other),
    }
    // Sin entrada previa no se ofrece validador.
    assert_eq!(remote.offered_etags(), vec![None]);
    // El cache queda poblado con el contenido serializado y observed_at fresco.
    match cache.current_entry() {
        Some(CacheEntry::Found { content, etag, observed_at }) => {
            assert_eq!(content, "this is a test");
            assert_eq!(etag, ETAG);
            assert!(observed_at >= before && observed_at <= Utc::now());
        }
        other => panic!("expected a found entry in cache, got {:?}", other),
    }
}

#[tokio::test]
async fn fresh_entry_within_max_age_skips_the_remote_entirely() {
    let cache = ScriptedCacheProvider::with_entry(found_entry(CONTENT, ETAG, Duration::from_secs(5)));
    let remote = ScriptedRemoteProvider::new();

    let outcome = Call { max_age: Some(Duration::from_secs(60)),
                         ..Call::new(&cache, &remote) }.run()
                                                       .await;

    match outcome {
        ContentOutcome::Found { content, etag, cache_hit } => {
            assert_eq!(content, CONTENT);
            assert_eq!(etag, ETAG);
            assert!(cache_hit);
        }
        other => panic!("expected found, got {:?}", other),
    }
    assert_eq!(remote.call_count(), 0, "hit puro: sin llamada remota");
    assert!(cache.set_calls().is_empty());
}

#[tokio::test]
async fn expired_max_age_revalidates_and_refreshes_observed_at_on_304() {
    let stale_age = Duration::from_secs(300);
    let cache = ScriptedCacheProvider::with_entry(found_entry(CONTENT, ETAG, stale_age));
    let remote = ScriptedRemoteProvider::new().then(Ok(RemoteResult::NotModified));

    let before = Utc::now();
    let outcome = Call { max_age: Some(Duration::from_secs(60)),
                         ..Call::new(&cache, &remote) }.run()
                                                       .await;

    match outcome {
        ContentOutcome::Found { content, cache_hit, .. } => {
            assert_eq!(content, CONTENT);
            assert!(cache_hit, "el 304 confirma lo cacheado");
        }
        other => panic!("expected found, got {:?}", other),
    }
    // La validación fue condicional con el etag cacheado.
    assert_eq!(remote.offered_etags(), vec![Some(ETAG.to_string())]);
    // observed_at se refresca o el TTL quedaría vencido para siempre.
    match cache.current_entry() {
        Some(CacheEntry::Found { observed_at, .. }) => assert!(observed_at >= before),
        other => panic!("expected a found entry in cache, got {:?}", other),
    }
}

#[tokio::test]
async fn not_modified_without_configured_ttl_does_not_rewrite_the_entry() {
    let cache = ScriptedCacheProvider::with_entry(found_entry(CONTENT, ETAG, Duration::from_secs(5)));
    let remote = ScriptedRemoteProvider::new().then(Ok(RemoteResult::NotModified));

    let outcome = Call::new(&cache, &remote).run().await;

    match outcome {
        ContentOutcome::Found { cache_hit, .. } => assert!(cache_hit),
        other => panic!("expected found, got {:?}", other),
    }
    assert_eq!(remote.call_count(), 1, "sin TTL siempre se revalida");
    assert!(cache.set_calls().is_empty(), "sin TTL vencido no hay refresh que hacer");
}

#[tokio::test]
async fn young_negative_entry_answers_not_found_without_remote_call() {
    let cache = ScriptedCacheProvider::with_entry(not_found_entry(Duration::from_secs(5)));
    let remote = ScriptedRemoteProvider::new();

    let outcome = Call { max_404_age: Some(Duration::from_secs(60)),
                         ..Call::new(&cache, &remote) }.run()
                                                       .await;

    match outcome {
        ContentOutcome::NotFound { content, cache_hit } => {
            assert_eq!(content, "");
            assert!(cache_hit);
        }
        other => panic!("expected notFound, got {:?}", other),
    }
    assert_eq!(remote.call_count(), 0);
}

#[tokio::test]
async fn expired_negative_entry_forces_a_fresh_remote_check() {
    let cache = ScriptedCacheProvider::with_entry(not_found_entry(Duration::from_secs(120)));
    let remote = ScriptedRemoteProvider::new().then(Ok(remote_content()));

    let outcome = Call { max_404_age: Some(Duration::from_secs(60)),
                         ..Call::new(&cache, &remote) }.run()
                                                       .await;

    match outcome {
        ContentOutcome::Found { content, cache_hit, .. } => {
            assert_eq!(content, CONTENT);
            assert!(!cache_hit);
        }
        other => panic!("expected found, got {:?}", other),
    }
    // La entrada negativa vencida se eliminó antes de reconsultar.
    assert_eq!(cache.remove_calls(), vec![KEY.to_string()]);
    assert_eq!(remote.offered_etags(), vec![None]);
}

#[tokio::test]
async fn negative_entry_without_ttl_never_expires() {
    // Diez días en cache y sigue siendo un hit negativo.
    let cache = ScriptedCacheProvider::with_entry(not_found_entry(Duration::from_secs(864_000)));
    let remote = ScriptedRemoteProvider::new();

    let outcome = Call::new(&cache, &remote).run().await;

    assert!(matches!(outcome, ContentOutcome::NotFound { cache_hit: true, .. }));
    assert_eq!(remote.call_count(), 0);
}

#[tokio::test]
async fn repeated_calls_become_cache_hits_with_a_real_cache() {
    let cache = InMemoryCacheProvider::new();
    let remote = ScriptedRemoteProvider::new().then(Ok(remote_content()))
                                              .then(Ok(RemoteResult::NotModified));

    let first = Call::new(&cache, &remote).run().await;
    match first {
        ContentOutcome::Found { ref content, cache_hit, .. } => {
            assert_eq!(content, CONTENT);
            assert!(!cache_hit);
        }
        ref other => panic!("expected found, got {:?}", other),
    }

    let second = Call::new(&cache, &remote).run().await;
    match second {
        ContentOutcome::Found { ref content, cache_hit, .. } => {
            assert_eq!(content, CONTENT);
            assert!(cache_hit, "la segunda llamada valida con etag y reusa el cache");
        }
        ref other => panic!("expected found, got {:?}", other),
    }
    assert_eq!(remote.offered_etags(), vec![None, Some(ETAG.to_string())]);
}

#[tokio::test]
async fn remote_failure_with_stale_copy_degrades_to_the_cache() {
    let cache = ScriptedCacheProvider::with_entry(found_entry(CONTENT, ETAG, Duration::from_secs(600)));
    let remote = ScriptedRemoteProvider::new().then(Err(RemoteError::UnsupportedStatus(500)));

    let outcome = Call { max_age: Some(Duration::from_secs(60)),
                         ..Call::new(&cache, &remote) }.run()
                                                       .await;

    match outcome {
        ContentOutcome::Found { content, etag, cache_hit } => {
            assert_eq!(content, CONTENT);
            assert_eq!(etag, ETAG);
            assert!(cache_hit, "stale-on-error: mejor viejo que nada");
        }
        other => panic!("expected found, got {:?}", other),
    }
}

#[tokio::test]
async fn remote_failure_without_cache_is_a_structured_error() {
    let cache = ScriptedCacheProvider::new();
    let remote = ScriptedRemoteProvider::new().then(Err(RemoteError::BadCredentials(401)));

    let outcome = Call::new(&cache, &remote).run().await;

    match outcome {
        ContentOutcome::Error { message, cause } => {
            assert_eq!(message,
                       format!("Unexpected error when looking for content on GitHub at path {}", KEY));
            assert!(cause.to_string().starts_with("Received HTTP response status code 401"));
        }
        other => panic!("expected error, got {:?}", other),
    }
}

#[tokio::test]
async fn serialize_failure_discards_the_fetched_content() {
    let cache = ScriptedCacheProvider::new();
    let remote = ScriptedRemoteProvider::new().then(Ok(remote_content()));
    let failing: SerializeFn = Arc::new(|_| Err("mdx compiler exploded".into()));

    let outcome = Call { serialize: Some(failing),
                         ..Call::new(&cache, &remote) }.run()
                                                       .await;

    match outcome {
        ContentOutcome::Error { message, cause } => {
            assert_eq!(message, "Error occured when serializing the content");
            assert_eq!(cause.to_string(), "mdx compiler exploded");
        }
        other => panic!("expected error, got {:?}", other),
    }
    assert!(cache.set_calls().is_empty(), "nada se cachea si serialize falla");
}

#[tokio::test]
async fn rate_limit_without_cache_returns_empty_content() {
    let cache = ScriptedCacheProvider::new();
    let remote = ScriptedRemoteProvider::new().then(Ok(RemoteResult::RateLimited(
        RateLimitInfo { limit: 5000, remaining: 0, reset_at_epoch_seconds: 1697059200 })));

    let outcome = Call::new(&cache, &remote).run().await;

    match outcome {
        ContentOutcome::RateLimitExceeded { limit, remaining, reset_at_epoch_seconds,
                                            content, etag, cache_hit } => {
            assert_eq!(limit, 5000);
            assert_eq!(remaining, 0);
            assert_eq!(reset_at_epoch_seconds, 1697059200);
            assert_eq!(content, "");
            assert_eq!(etag, "");
            assert!(!cache_hit);
        }
        other => panic!("expected rateLimitExceeded, got {:?}", other),
    }
    assert!(cache.set_calls().is_empty(), "un rate limit no escribe cache");
}

#[tokio::test]
async fn rate_limit_with_cache_offers_the_stale_copy() {
    let cache = ScriptedCacheProvider::with_entry(found_entry(CONTENT, ETAG, Duration::from_secs(600)));
    let remote = ScriptedRemoteProvider::new().then(Ok(RemoteResult::RateLimited(
        RateLimitInfo { limit: 5000, remaining: 0, reset_at_epoch_seconds: 1697059200 })));

    let outcome = Call { max_age: Some(Duration::from_secs(60)),
                         ..Call::new(&cache, &remote) }.run()
                                                       .await;

    match outcome {
        ContentOutcome::RateLimitExceeded { content, etag, cache_hit, .. } => {
            assert_eq!(content, CONTENT);
            assert_eq!(etag, ETAG);
            assert!(cache_hit);
        }
        other => panic!("expected rateLimitExceeded, got {:?}", other),
    }
}

#[tokio::test]
async fn cache_bypass_clears_the_entry_and_always_asks_the_remote() {
    let cache = ScriptedCacheProvider::with_entry(found_entry("old cached", ETAG, Duration::from_secs(1)));
    let remote = ScriptedRemoteProvider::new().then(Ok(remote_content()));

    let outcome = Call { cache_bypass: true,
                         max_age: Some(Duration::from_secs(3600)),
                         ..Call::new(&cache, &remote) }.run()
                                                       .await;

    match outcome {
        ContentOutcome::Found { content, cache_hit, .. } => {
            assert_eq!(content, CONTENT);
            assert!(!cache_hit, "el bypass ignora la frescura de la entrada");
        }
        other => panic!("expected found, got {:?}", other),
    }
    assert_eq!(cache.remove_calls(), vec![KEY.to_string()]);
    // Tras limpiar no queda validador que ofrecer.
    assert_eq!(remote.offered_etags(), vec![None]);
}

#[tokio::test]
async fn failing_remove_during_bypass_is_fatal() {
    let cache = ScriptedCacheProvider::new().failing_remove();
    let remote = ScriptedRemoteProvider::new();

    let outcome = Call { cache_bypass: true,
                         ..Call::new(&cache, &remote) }.run()
                                                       .await;

    match outcome {
        ContentOutcome::Error { message, .. } => {
            assert_eq!(message,
                       format!("Error when trying to remove entry from the cache at path {}", KEY));
        }
        other => panic!("expected error, got {:?}", other),
    }
    assert_eq!(remote.call_count(), 0);
}

#[tokio::test]
async fn failing_get_is_fatal() {
    let cache = ScriptedCacheProvider::new().failing_get();
    let remote = ScriptedRemoteProvider::new();

    let outcome = Call::new(&cache, &remote).run().await;

    match outcome {
        ContentOutcome::Error { message, cause } => {
            assert_eq!(message,
                       format!("Error when trying to get entry from the cache at path {}", KEY));
            assert_eq!(cause.to_string(), "cache backend failure: scripted get failure");
        }
        other => panic!("expected error, got {:?}", other),
    }
}

#[tokio::test]
async fn cache_write_failures_never_change_the_outcome() {
    let cache = ScriptedCacheProvider::new().failing_set();
    let remote = ScriptedRemoteProvider::new().then(Ok(remote_content()));

    let outcome = Call::new(&cache, &remote).run().await;

    match outcome {
        ContentOutcome::Found { content, cache_hit, .. } => {
            assert_eq!(content, CONTENT);
            assert!(!cache_hit);
        }
        other => panic!("expected found, got {:?}", other),
    }
    // El intento de escritura ocurrió y su fallo se tragó.
    assert_eq!(cache.set_calls().len(), 1);
}

#[tokio::test]
async fn remote_404_is_cached_as_a_negative_entry() {
    let cache = ScriptedCacheProvider::new();
    let remote = ScriptedRemoteProvider::new().then(Ok(RemoteResult::NotFound));

    let before = Utc::now();
    let outcome = Call::new(&cache, &remote).run().await;

    match outcome {
        ContentOutcome::NotFound { content, cache_hit } => {
            assert_eq!(content, "");
            assert!(!cache_hit);
        }
        other => panic!("expected notFound, got {:?}", other),
    }
    match cache.current_entry() {
        Some(CacheEntry::NotFound { observed_at }) => assert!(observed_at >= before),
        other => panic!("expected a negative entry, got {:?}", other),
    }
}
