//! Binario de demostración: recupera un fichero del repositorio configurado
//! dos veces seguidas para mostrar el miss inicial y el hit posterior.
//!
//! Variables de entorno (o .env): GITHUB_TOKEN, GITHUB_OWNER, GITHUB_REPO,
//! GITHUB_USER_AGENT, CACHE_MAX_AGE_MS, CACHE_MAX_404_AGE_MS. La clave a
//! recuperar llega como primer argumento (README.md por defecto).
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use gitcache_rust::config::CONFIG;
use gitcache_rust::{get_content, ContentOutcome, ContentRequest, GithubRemoteProvider,
                    InMemoryCacheProvider};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let key = std::env::args().nth(1).unwrap_or_else(|| "README.md".to_string());

    let cache = InMemoryCacheProvider::new();
    let remote = GithubRemoteProvider::new(CONFIG.github.owner.clone(),
                                           CONFIG.github.repo.clone(),
                                           CONFIG.github.user_agent.clone());

    println!("repo  : {}/{}", CONFIG.github.owner, CONFIG.github.repo);
    println!("key   : {}", key);

    for attempt in 1..=2 {
        let request = ContentRequest {
            key: key.clone(),
            credential: CONFIG.github.token.clone(),
            cache_bypass: false,
            max_age: CONFIG.cache.max_age_ms.map(Duration::from_millis),
            max_404_age: CONFIG.cache.max_404_age_ms.map(Duration::from_millis),
            serialize: None,
            cache: &cache,
            remote: &remote,
        };
        match get_content(request).await {
            Ok(outcome) => report(attempt, &outcome),
            Err(err) => {
                eprintln!("invalid request: {}", err);
                std::process::exit(2);
            }
        }
    }
}

fn report(attempt: u32, outcome: &ContentOutcome) {
    match outcome {
        ContentOutcome::Found { content, etag, cache_hit } => {
            println!("[{}] found (cache_hit={}) etag={} bytes={}",
                     attempt, cache_hit, etag, content.len());
        }
        ContentOutcome::NotFound { cache_hit, .. } => {
            println!("[{}] not found (cache_hit={})", attempt, cache_hit);
        }
        ContentOutcome::RateLimitExceeded { limit, remaining, reset_at_epoch_seconds, cache_hit, .. } => {
            println!("[{}] rate limit exceeded (cache_hit={}) {}/{} resets at {}",
                     attempt, cache_hit, remaining, limit, reset_at_epoch_seconds);
        }
        ContentOutcome::Error { message, cause } => {
            println!("[{}] error: {} ({})", attempt, message, cause);
        }
    }
}
