use std::sync::Arc;

use crate::{config::Config, settings::SettingsStore, storage::FileStore};

/// Shared by every handler. Cloning is cheap: the store and the settings
/// snapshot pointer are both reference counted.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FileStore>,
    pub settings: SettingsStore,
    pub config: Config,
}

impl AppState {
    pub fn new(store: Arc<dyn FileStore>, settings: SettingsStore, config: Config) -> Self {
        Self {
            store,
            settings,
            config,
        }
    }
}
