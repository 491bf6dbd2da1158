//! Config file watcher
//!
//! Watches the directory holding `config.toml` and posts
//! [`Message::ReloadConfig`] when the file itself changes. Editors often
//! replace files instead of writing them in place, so the parent directory
//! is watched and events are filtered by file name.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::RecursiveMode;
use notify_debouncer_full::{new_debouncer, DebounceEventResult};
use swipenav_core::prelude::*;
use tokio::sync::mpsc;

use crate::message::Message;

/// Default debounce duration in milliseconds
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

/// Watches a single config file for changes
pub struct ConfigWatcher {
    config_path: PathBuf,
    debounce: Duration,
    /// Handle to stop the watcher
    stop_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl ConfigWatcher {
    pub fn new(config_path: PathBuf) -> Self {
        Self {
            config_path,
            debounce: Duration::from_millis(DEFAULT_DEBOUNCE_MS),
            stop_tx: None,
        }
    }

    /// Set debounce duration in milliseconds
    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.debounce = Duration::from_millis(ms);
        self
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Start watching; sends `Message::ReloadConfig` to the channel
    pub fn start(&mut self, message_tx: mpsc::Sender<Message>) -> Result<()> {
        if self.is_running() {
            return Err(Error::runtime("Config watcher is already running"));
        }

        let watch_dir = match self.config_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !watch_dir.is_dir() {
            return Err(Error::config(format!(
                "Config directory does not exist: {}",
                watch_dir.display()
            )));
        }

        let config_path = self.config_path.clone();
        let debounce = self.debounce;
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel();
        self.stop_tx = Some(stop_tx);

        tokio::task::spawn_blocking(move || {
            Self::run_watcher(watch_dir, config_path, debounce, message_tx, stop_rx);
        });

        Ok(())
    }

    /// Stop the watcher
    pub fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
    }

    pub fn is_running(&self) -> bool {
        self.stop_tx.is_some()
    }

    fn run_watcher(
        watch_dir: PathBuf,
        config_path: PathBuf,
        debounce: Duration,
        message_tx: mpsc::Sender<Message>,
        mut stop_rx: tokio::sync::oneshot::Receiver<()>,
    ) {
        let file_name = config_path.file_name().map(|n| n.to_os_string());
        let tx = message_tx.clone();

        let debouncer_result = new_debouncer(debounce, None, move |result: DebounceEventResult| {
            match result {
                Ok(events) => {
                    let touched = events.iter().any(|event| {
                        event
                            .paths
                            .iter()
                            .any(|path| path.file_name().map(|n| n.to_os_string()) == file_name)
                    });
                    if !touched {
                        return;
                    }

                    debug!("Config file changed");
                    let _ = tx.blocking_send(Message::ReloadConfig);
                }
                Err(errors) => {
                    for error in errors {
                        warn!("Config watcher error: {:?}", error);
                    }
                }
            }
        });

        let mut debouncer = match debouncer_result {
            Ok(d) => d,
            Err(e) => {
                error!("Failed to create config watcher: {}", e);
                return;
            }
        };

        if let Err(e) = debouncer.watch(&watch_dir, RecursiveMode::NonRecursive) {
            warn!("Failed to watch {}: {}", watch_dir.display(), e);
            return;
        }
        info!("Watching config: {}", config_path.display());

        // Keep running until stop signal
        loop {
            match stop_rx.try_recv() {
                Ok(()) | Err(tokio::sync::oneshot::error::TryRecvError::Closed) => {
                    info!("Config watcher stopping");
                    break;
                }
                Err(tokio::sync::oneshot::error::TryRecvError::Empty) => {
                    std::thread::sleep(Duration::from_millis(100));
                }
            }
        }
    }
}

impl Drop for ConfigWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}
