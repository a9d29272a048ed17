// src/config.rs
//! Startup configuration. Values come from the process environment (after `.env`
//! has been loaded by dotenvy) with the secret store as a fallback for the backend URL.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

pub const BACKEND_URL_KEY: &str = "BACKEND_URL";

/// Flat key/value secrets, read from a JSON object of strings
#[derive(Debug, Clone, Default)]
pub struct SecretStore {
    values: HashMap<String, String>,
}

impl SecretStore {
    pub fn from_map(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// A missing file yields an empty store; a file that exists must parse.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No secrets file at {}", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::SecretsIo {
                    path: path.display().to_string(),
                    source,
                })
            }
        };

        let values = serde_json::from_str(&raw).map_err(|source| ConfigError::SecretsFormat {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub bind_addr: String,
    pub image_timeout: Duration,
    pub video_timeout: Duration,
    pub download_timeout: Duration,
    pub progress_settle: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let secrets_path = std::env::var("SECRETS_PATH").unwrap_or_else(|_| "secrets.json".to_string());
        let secrets = SecretStore::load(Path::new(&secrets_path))?;
        Self::from_sources(|key| std::env::var(key).ok(), &secrets)
    }

    /// Resolves every setting from `env`, consulting `secrets` only for the backend URL.
    pub fn from_sources<F>(env: F, secrets: &SecretStore) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = env(BACKEND_URL_KEY)
            .filter(|v| !v.trim().is_empty())
            .or_else(|| secrets.get(BACKEND_URL_KEY).map(str::to_string))
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::MissingBaseUrl)?;

        Ok(Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            bind_addr: env("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            image_timeout: Duration::from_secs(parse_u64(&env, "IMAGE_TIMEOUT_SECS", 600)?),
            video_timeout: Duration::from_secs(parse_u64(&env, "VIDEO_TIMEOUT_SECS", 3600)?),
            download_timeout: Duration::from_secs(parse_u64(&env, "DOWNLOAD_TIMEOUT_SECS", 300)?),
            progress_settle: Duration::from_millis(parse_u64(&env, "PROGRESS_SETTLE_MS", 400)?),
        })
    }

    /// Defaults with an explicit backend, used by tests and embedders
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
            image_timeout: Duration::from_secs(600),
            video_timeout: Duration::from_secs(3600),
            download_timeout: Duration::from_secs(300),
            progress_settle: Duration::from_millis(400),
        }
    }
}

fn parse_u64<F>(env: &F, key: &str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match env(key) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    fn secrets_of(pairs: &[(&str, &str)]) -> SecretStore {
        SecretStore::from_map(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
    }

    #[test]
    fn test_environment_takes_precedence_over_secrets() {
        let config = AppConfig::from_sources(
            env_of(&[("BACKEND_URL", "http://env.local/")]),
            &secrets_of(&[("BACKEND_URL", "http://secret.local")]),
        )
        .unwrap();
        assert_eq!(config.base_url, "http://env.local");
    }

    #[test]
    fn test_secret_store_is_the_fallback() {
        let config = AppConfig::from_sources(env_of(&[]), &secrets_of(&[("BACKEND_URL", "http://secret.local")])).unwrap();
        assert_eq!(config.base_url, "http://secret.local");
        assert_eq!(config.image_timeout, Duration::from_secs(600));
        assert_eq!(config.video_timeout, Duration::from_secs(3600));
        assert_eq!(config.progress_settle, Duration::from_millis(400));
    }

    #[test]
    fn test_missing_base_url_is_a_startup_error() {
        let err = AppConfig::from_sources(env_of(&[("BACKEND_URL", "  ")]), &SecretStore::default()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingBaseUrl));
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        let err = AppConfig::from_sources(
            env_of(&[("BACKEND_URL", "http://x"), ("VIDEO_TIMEOUT_SECS", "an hour")]),
            &SecretStore::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "VIDEO_TIMEOUT_SECS"));
    }

    #[test]
    fn test_missing_secrets_file_is_empty() {
        let store = SecretStore::load(Path::new("/nonexistent/ad-studio/secrets.json")).unwrap();
        assert!(store.get(BACKEND_URL_KEY).is_none());
    }
}
