// src/config.rs

use std::env;
use std::path::PathBuf;
use std::time::Duration;
use dotenvy::dotenv;

/// Process-level configuration, read once at startup.
///
/// Plugin behaviour (size ceiling, CSS) lives in `settings::PluginSettings`,
/// which can be reloaded while the server runs. Everything here is fixed for
/// the lifetime of the process.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub rust_log: String,
    pub log_dir: PathBuf,
    /// Root directory of the local file store.
    pub storage_root: PathBuf,
    /// JSON plugin settings file. Built-in defaults are used when unset.
    pub settings_path: Option<PathBuf>,
    pub request_timeout: Duration,
    /// Optional prefix the API is mounted under (e.g. "/plugins/html-viewer").
    pub base_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
            rust_log: "info".to_string(),
            log_dir: PathBuf::from("logs"),
            storage_root: PathBuf::from("data/files"),
            settings_path: None,
            request_timeout: Duration::from_secs(30),
            base_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let defaults = Self::default();

        let bind_addr = env::var("HTML_VIEWER_BIND_ADDR").unwrap_or(defaults.bind_addr);

        let rust_log = env::var("RUST_LOG").unwrap_or(defaults.rust_log);

        let log_dir = env::var("HTML_VIEWER_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.log_dir);

        let storage_root = env::var("HTML_VIEWER_STORAGE_ROOT")
            .map(PathBuf::from)
            .unwrap_or(defaults.storage_root);

        let settings_path = env::var("HTML_VIEWER_SETTINGS_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let request_timeout = env::var("HTML_VIEWER_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        let base_path = env::var("HTML_VIEWER_BASE_PATH")
            .ok()
            .and_then(|p| normalize_base_path(&p));

        Self {
            bind_addr,
            rust_log,
            log_dir,
            storage_root,
            settings_path,
            request_timeout,
            base_path,
        }
    }
}

/// Turns "plugins/x/" into "/plugins/x". Empty or "/" means no prefix.
pub fn normalize_base_path(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("/{}", trimmed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_path_is_normalized() {
        assert_eq!(
            normalize_base_path("plugins/com.mattermost.html-viewer/"),
            Some("/plugins/com.mattermost.html-viewer".to_string())
        );
        assert_eq!(normalize_base_path("/viewer"), Some("/viewer".to_string()));
        assert_eq!(normalize_base_path("/"), None);
        assert_eq!(normalize_base_path("  "), None);
    }
}
