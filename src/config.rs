//! Application-level configuration loading.

use std::{env, fs, io::ErrorKind, path::PathBuf};

use serde::Deserialize;
use tracing::{info, warn};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "GAME_RATINGS_CONFIG_PATH";
/// Environment variable selecting the rating store backend.
const STORE_BACKEND_ENV: &str = "RATING_STORE";

const DEFAULT_APPLICATION_NAME: &str = "gameRatingsApp";
const DEFAULT_API_ROOT: &str = "/api";
const DEFAULT_PAGE_SIZE: u64 = 20;
const DEFAULT_MAX_PAGE_SIZE: u64 = 100;

/// Immutable runtime configuration shared across the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Prefix used for alert header names (`X-{application_name}-alert`).
    pub application_name: String,
    /// Path every REST resource is nested under.
    pub api_root: String,
    /// Page size used when a listing request does not specify one.
    pub default_page_size: u64,
    /// Upper bound applied to requested page sizes.
    pub max_page_size: u64,
}

impl AppConfig {
    /// Load the configuration from disk, falling back to built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<RawConfig>(&contents) {
                Ok(raw) => {
                    let config: Self = raw.into();
                    info!(
                        path = %path.display(),
                        api_root = %config.api_root,
                        "loaded configuration"
                    );
                    config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            application_name: DEFAULT_APPLICATION_NAME.into(),
            api_root: DEFAULT_API_ROOT.into(),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

/// JSON representation of the configuration file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    application_name: Option<String>,
    api_root: Option<String>,
    default_page_size: Option<u64>,
    max_page_size: Option<u64>,
}

impl From<RawConfig> for AppConfig {
    fn from(value: RawConfig) -> Self {
        let defaults = Self::default();
        let max_page_size = value
            .max_page_size
            .filter(|size| *size > 0)
            .unwrap_or(defaults.max_page_size);
        let default_page_size = value
            .default_page_size
            .filter(|size| *size > 0)
            .unwrap_or(defaults.default_page_size)
            .min(max_page_size);
        Self {
            application_name: value
                .application_name
                .filter(|name| !name.trim().is_empty())
                .unwrap_or(defaults.application_name),
            api_root: value
                .api_root
                .map(|root| normalize_api_root(&root))
                .unwrap_or(defaults.api_root),
            default_page_size,
            max_page_size,
        }
    }
}

/// Ensure the API root starts with a slash and has no trailing one (`""` mounts at `/`).
fn normalize_api_root(root: &str) -> String {
    let trimmed = root.trim().trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{trimmed}")
    }
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Storage backend selected through `RATING_STORE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Mongo,
    Couch,
}

impl StoreBackend {
    /// Read the backend from the environment, defaulting to the in-memory store.
    pub fn from_env() -> Self {
        match env::var(STORE_BACKEND_ENV) {
            Ok(value) => Self::parse(&value).unwrap_or_else(|| {
                warn!(value = %value, "unknown rating store backend; using memory");
                StoreBackend::Memory
            }),
            Err(_) => StoreBackend::Memory,
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" | "" => Some(StoreBackend::Memory),
            "mongo" | "mongodb" => Some(StoreBackend::Mongo),
            "couch" | "couchdb" => Some(StoreBackend::Couch),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let raw: RawConfig = serde_json::from_str(r#"{"api_root": "v1/"}"#).unwrap();
        let config = AppConfig::from(raw);
        assert_eq!(config.api_root, "/v1");
        assert_eq!(config.application_name, "gameRatingsApp");
        assert_eq!(config.default_page_size, 20);
    }

    #[test]
    fn default_page_size_never_exceeds_max() {
        let raw: RawConfig =
            serde_json::from_str(r#"{"default_page_size": 50, "max_page_size": 10}"#).unwrap();
        let config = AppConfig::from(raw);
        assert_eq!(config.max_page_size, 10);
        assert_eq!(config.default_page_size, 10);
    }

    #[test]
    fn api_root_can_be_empty() {
        assert_eq!(normalize_api_root("/"), "");
        assert_eq!(normalize_api_root("/api/"), "/api");
    }

    #[test]
    fn backend_names_are_case_insensitive() {
        assert_eq!(StoreBackend::parse("MongoDB"), Some(StoreBackend::Mongo));
        assert_eq!(StoreBackend::parse("couch"), Some(StoreBackend::Couch));
        assert_eq!(StoreBackend::parse("memory"), Some(StoreBackend::Memory));
        assert_eq!(StoreBackend::parse("redis"), None);
    }
}
