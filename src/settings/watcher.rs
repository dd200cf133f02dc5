//! Settings file watcher for hot reload.

use std::path::PathBuf;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use super::{JsonFileSource, SettingsStore};

/// Watches the settings file and reloads the store when it changes.
pub struct SettingsWatcher {
    source: JsonFileSource,
    store: SettingsStore,
}

impl SettingsWatcher {
    pub fn new(source: JsonFileSource, store: SettingsStore) -> Self {
        Self { source, store }
    }

    /// Start watching in the background.
    ///
    /// The parent directory is watched so editors that replace the file by
    /// rename still trigger a reload. The returned watcher must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let target = self.source.path().to_path_buf();
        let dir = watch_dir(&target);
        let file_name = target.file_name().map(|n| n.to_os_string());
        let source = self.source;
        let store = self.store;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if !(event.kind.is_modify() || event.kind.is_create()) {
                        return;
                    }
                    let touches_target = event
                        .paths
                        .iter()
                        .any(|p| p.file_name().map(|n| n.to_os_string()) == file_name);
                    if touches_target {
                        tracing::info!("Settings file change detected, reloading...");
                        // Failure is logged by the store; the old settings stay.
                        let _ = store.reload(&source);
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?target, "Settings watcher started");
        Ok(watcher)
    }
}

fn watch_dir(path: &std::path::Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
