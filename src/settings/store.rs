//! Process-wide settings snapshot.

use std::sync::Arc;

use arc_swap::ArcSwap;

use super::{PluginSettings, SettingsError, SettingsSource};

/// Shared handle to the current `PluginSettings`.
///
/// Readers get a whole `Arc` snapshot; writers replace the whole value.
/// There is no field-level mutation.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    current: Arc<ArcSwap<PluginSettings>>,
}

impl SettingsStore {
    pub fn new(settings: PluginSettings) -> Self {
        warn_reserved_flags(&settings);
        Self {
            current: Arc::new(ArcSwap::from_pointee(settings)),
        }
    }

    /// First load at startup. Failure here is fatal to the caller; the viewer
    /// must not serve without settings.
    pub fn activate(source: &dyn SettingsSource) -> Result<Self, SettingsError> {
        let settings = source.load()?;
        tracing::info!(
            max_file_size_mb = settings.max_file_size_mb,
            enable_css = settings.enable_css,
            "Plugin settings loaded"
        );
        Ok(Self::new(settings))
    }

    pub fn current(&self) -> Arc<PluginSettings> {
        self.current.load_full()
    }

    /// Loads a replacement and publishes it atomically.
    ///
    /// On failure the previous snapshot stays in effect and the error is
    /// returned for the caller to report.
    pub fn reload(&self, source: &dyn SettingsSource) -> Result<(), SettingsError> {
        match source.load() {
            Ok(settings) => {
                warn_reserved_flags(&settings);
                tracing::info!(
                    max_file_size_mb = settings.max_file_size_mb,
                    enable_css = settings.enable_css,
                    "Plugin settings reloaded"
                );
                self.current.store(Arc::new(settings));
                Ok(())
            }
            Err(e) => {
                tracing::error!("Failed to reload settings: {}. Keeping current settings.", e);
                Err(e)
            }
        }
    }
}

fn warn_reserved_flags(settings: &PluginSettings) {
    if settings.enable_javascript {
        tracing::warn!("EnableJavaScript is set but ignored; scripts are always stripped");
    }
}
