//! Settings loaders (the host's `LoadConfiguration`).

use std::fs;
use std::path::{Path, PathBuf};

use validator::Validate;

use super::{PluginSettings, SettingsError};

/// Produces a complete, validated settings value on every call.
pub trait SettingsSource: Send + Sync {
    fn load(&self) -> Result<PluginSettings, SettingsError>;
}

/// Reads a JSON settings file from disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsSource for JsonFileSource {
    fn load(&self) -> Result<PluginSettings, SettingsError> {
        let raw = fs::read_to_string(&self.path)?;
        PluginSettings::from_json(&raw)
    }
}

/// Fixed settings, used when no settings file is configured.
#[derive(Debug, Clone, Default)]
pub struct StaticSource(pub PluginSettings);

impl SettingsSource for StaticSource {
    fn load(&self) -> Result<PluginSettings, SettingsError> {
        self.0.validate()?;
        Ok(self.0.clone())
    }
}
