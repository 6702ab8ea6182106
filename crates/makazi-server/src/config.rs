use makazi_query::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use makazi_store::StoreConfig;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub max_body_bytes: usize,
    pub default_page_size: usize,
    pub session_cookie: String,
    pub session_ttl: Duration,
    pub session_purge_interval: Duration,
    pub pbkdf2_iterations: u32,
    pub allow_registration: bool,
    pub notify_webhook_url: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 64 * 1024,
            default_page_size: DEFAULT_PAGE_SIZE,
            session_cookie: "makazi_session".to_string(),
            session_ttl: Duration::from_secs(24 * 60 * 60),
            session_purge_interval: Duration::from_secs(60 * 60),
            pbkdf2_iterations: 200_000,
            allow_registration: false,
            notify_webhook_url: None,
        }
    }
}

/// Refuses to boot on configuration that would silently misbehave later.
pub fn validate_startup_config(api: &ApiConfig, store: &StoreConfig) -> Result<(), String> {
    if api.max_body_bytes == 0 {
        return Err("max_body_bytes must be > 0".to_string());
    }
    if api.default_page_size == 0 || api.default_page_size > MAX_PAGE_SIZE {
        return Err(format!(
            "default_page_size must be between 1 and {MAX_PAGE_SIZE}"
        ));
    }
    if api.session_ttl.is_zero() || api.session_purge_interval.is_zero() {
        return Err("session durations must be > 0".to_string());
    }
    if api.session_cookie.trim().is_empty() {
        return Err("session_cookie must not be empty".to_string());
    }
    if api.pbkdf2_iterations < 10_000 {
        return Err("pbkdf2_iterations must be at least 10000".to_string());
    }
    if store.max_connections == 0 {
        return Err("store max_connections must be > 0".to_string());
    }
    if store.acquire_timeout.is_zero() {
        return Err("store acquire_timeout must be > 0".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_config_validation_catches_nonsense() {
        assert!(validate_startup_config(&ApiConfig::default(), &StoreConfig::default()).is_ok());

        let api = ApiConfig {
            default_page_size: 0,
            ..ApiConfig::default()
        };
        assert!(validate_startup_config(&api, &StoreConfig::default()).is_err());

        let api = ApiConfig {
            pbkdf2_iterations: 100,
            ..ApiConfig::default()
        };
        assert!(validate_startup_config(&api, &StoreConfig::default()).is_err());

        let store = StoreConfig {
            max_connections: 0,
            ..StoreConfig::default()
        };
        assert!(validate_startup_config(&ApiConfig::default(), &store).is_err());
    }
}
