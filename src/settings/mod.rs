//! Plugin settings.
//!
//! # Data Flow
//! ```text
//! settings file (JSON)
//!     → source.rs (read, deserialize, validate)
//!     → PluginSettings (immutable snapshot)
//!     → store.rs (Arc<ArcSwap<PluginSettings>>) read by every request
//!
//! On change notification:
//!     watcher.rs sees the file change
//!     → source.rs loads a complete replacement
//!     → store.rs swaps the pointer, or keeps the last good snapshot on failure
//! ```

pub mod source;
pub mod store;
pub mod watcher;

use std::path::Path;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;

pub use source::{JsonFileSource, SettingsSource, StaticSource};
pub use store::SettingsStore;
pub use watcher::SettingsWatcher;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Settings the host configures for the viewer.
///
/// Keys match the host's plugin settings document (`MaxFileSize`,
/// `EnableJavaScript`, `EnableCSS`). Missing keys fall back to defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PluginSettings {
    /// Size ceiling in megabytes.
    #[serde(rename = "MaxFileSize")]
    #[validate(range(min = 1))]
    pub max_file_size_mb: u64,

    /// Reserved. Script is always stripped; this value is never consulted
    /// by the sanitizer.
    #[serde(rename = "EnableJavaScript")]
    pub enable_javascript: bool,

    /// Allows the `style` attribute through the sanitizer.
    #[serde(rename = "EnableCSS")]
    pub enable_css: bool,
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            max_file_size_mb: 10,
            enable_javascript: false,
            enable_css: true,
        }
    }
}

impl PluginSettings {
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(BYTES_PER_MB)
    }

    /// Parses and validates a settings document.
    pub fn from_json(raw: &str) -> Result<Self, SettingsError> {
        let settings: PluginSettings = serde_json::from_str(raw)?;
        settings.validate()?;
        Ok(settings)
    }
}

/// Startup load: the JSON file at `path`, or built-in defaults when unset.
///
/// The file source is handed back so the caller can watch it. Any failure is
/// a `ConfigurationLoadFailure`; the viewer must not serve without settings.
pub fn activate(
    path: Option<&Path>,
) -> Result<(SettingsStore, Option<JsonFileSource>), AppError> {
    match path {
        Some(path) => {
            let source = JsonFileSource::new(path);
            let store = SettingsStore::activate(&source)?;
            Ok((store, Some(source)))
        }
        None => {
            tracing::info!("No settings file configured, using default plugin settings");
            Ok((SettingsStore::activate(&StaticSource::default())?, None))
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}
