//! Configuración central de la aplicación.
//! Carga variables de entorno (.env) y expone una estructura inmutable
//! (`CONFIG`) usada por el binario de demostración para construir los
//! colaboradores reales (fetcher de GitHub y cache en memoria).
use once_cell::sync::Lazy;
use std::env;

/// Configuración global de la aplicación.
pub struct AppConfig {
    /// Identidad del repositorio remoto y credencial.
    pub github: GithubConfig,
    /// TTLs del cache, en milisegundos.
    pub cache: CacheConfig,
}

/// Parámetros para hablar con la API de contents de GitHub.
pub struct GithubConfig {
    pub token: String,
    pub owner: String,
    pub repo: String,
    /// GitHub exige un user-agent identificable.
    pub user_agent: String,
}

/// TTLs opcionales; ausentes significan sin expiración.
pub struct CacheConfig {
    pub max_age_ms: Option<u64>,
    pub max_404_age_ms: Option<u64>,
}

/// Instancia global perezosa de configuración, evaluada una sola vez.
pub static CONFIG: Lazy<AppConfig> = Lazy::new(|| {
    let token = env::var("GITHUB_TOKEN").expect("GITHUB_TOKEN not set");
    let owner = env::var("GITHUB_OWNER").expect("GITHUB_OWNER not set");
    let repo = env::var("GITHUB_REPO").expect("GITHUB_REPO not set");
    let user_agent = env::var("GITHUB_USER_AGENT")
        .unwrap_or_else(|_| format!("gitcache-rust for {}/{}", owner, repo));
    let max_age_ms = env::var("CACHE_MAX_AGE_MS").ok().and_then(|v| v.parse().ok());
    let max_404_age_ms = env::var("CACHE_MAX_404_AGE_MS").ok().and_then(|v| v.parse().ok());
    AppConfig {
        github: GithubConfig { token, owner, repo, user_agent },
        cache: CacheConfig { max_age_ms, max_404_age_ms },
    }
});
