//! File watcher that reloads a Temple on change

use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::config::ReloaderConfig;
use crate::error::{Result, TempleError};
use crate::registry::Temple;

type WatchMessage = notify::Result<Event>;

/// Whether an event kind means a watched file's contents were written
pub fn is_write_event(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Modify(ModifyKind::Data(_)) | EventKind::Modify(ModifyKind::Any))
}

/// Paths added to and removed from the watch set by [`Reloader::resync`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResyncReport {
    pub added: Vec<PathBuf>,
    pub removed: Vec<PathBuf>,
}

impl ResyncReport {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Watches the files of a Temple and reloads it when one is written
///
/// The watch set is the Temple's file list at spawn time. Files discovered by
/// later reloads are only watched after an explicit [`Reloader::resync`].
pub struct Reloader {
    temple: Arc<Temple>,
    watcher: RecommendedWatcher,
    watched: BTreeSet<PathBuf>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Reloader {
    /// Start watching every file of `temple`
    ///
    /// Must be called from within a tokio runtime. If any file cannot be
    /// watched, the watcher is released and the error returned.
    pub fn spawn(temple: Arc<Temple>, config: &ReloaderConfig) -> Result<Self> {
        let (tx, rx) = mpsc::channel::<WatchMessage>(config.channel_capacity.max(1));

        let mut watcher = RecommendedWatcher::new(
            move |message: WatchMessage| {
                if let Err(e) = tx.blocking_send(message) {
                    debug!("Reloader channel closed, dropping watch event: {}", e);
                }
            },
            notify::Config::default(),
        )
        .map_err(|source| TempleError::Watch { path: None, source })?;

        let watched: BTreeSet<PathBuf> = temple.files().into_iter().collect();
        for path in &watched {
            if let Err(source) = watcher.watch(path, RecursiveMode::NonRecursive) {
                drop(watcher);
                return Err(TempleError::Watch {
                    path: Some(path.clone()),
                    source,
                });
            }
            debug!(path = %path.display(), "Reloader: watching");
        }

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(run(Arc::clone(&temple), rx, shutdown_rx));

        info!(
            root = %temple.root().display(),
            files = watched.len(),
            "Reloader started"
        );

        Ok(Self {
            temple,
            watcher,
            watched,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        })
    }

    /// The registry being reloaded
    pub fn temple(&self) -> &Arc<Temple> {
        &self.temple
    }

    /// Files currently watched, sorted
    pub fn watched(&self) -> Vec<PathBuf> {
        self.watched.iter().cloned().collect()
    }

    /// Bring the watch set in line with the Temple's current file list
    pub fn resync(&mut self) -> Result<ResyncReport> {
        let current: BTreeSet<PathBuf> = self.temple.files().into_iter().collect();
        let to_add: Vec<PathBuf> = current.difference(&self.watched).cloned().collect();
        let to_remove: Vec<PathBuf> = self.watched.difference(&current).cloned().collect();

        let mut report = ResyncReport::default();

        for path in to_remove {
            // The file may already be gone, which drops the watch on its own
            if let Err(e) = self.watcher.unwatch(&path) {
                debug!(path = %path.display(), error = %e, "Reloader::resync: unwatch failed");
            }
            self.watched.remove(&path);
            report.removed.push(path);
        }

        for path in to_add {
            self.watcher
                .watch(&path, RecursiveMode::NonRecursive)
                .map_err(|source| TempleError::Watch {
                    path: Some(path.clone()),
                    source,
                })?;
            self.watched.insert(path.clone());
            report.added.push(path);
        }

        info!(
            added = report.added.len(),
            removed = report.removed.len(),
            watched = self.watched.len(),
            "Reloader watch set resynced"
        );
        Ok(report)
    }

    /// Stop processing events and release the watcher
    ///
    /// A reload already in progress runs to completion first.
    pub async fn close(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!(error = %e, "Reloader task ended abnormally");
            }
        }
        info!(root = %self.temple.root().display(), "Reloader closed");
    }
}

impl Drop for Reloader {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// Event loop: one reload per burst of write events
async fn run(temple: Arc<Temple>, mut rx: mpsc::Receiver<WatchMessage>, mut shutdown_rx: oneshot::Receiver<()>) {
    loop {
        tokio::select! {
            message = rx.recv() => {
                match message {
                    Some(Ok(event)) => {
                        if !is_write_event(&event.kind) {
                            debug!(kind = ?event.kind, paths = ?event.paths, "Reloader: ignoring event");
                            continue;
                        }
                        info!(paths = ?event.paths, "Template file changed, reloading");
                        drain_pending(&mut rx);
                        reload(&temple).await;
                    }
                    Some(Err(e)) => {
                        error!(error = %e, "Reloader watch error");
                    }
                    None => {
                        debug!("Reloader channel closed");
                        break;
                    }
                }
            }
            _ = &mut shutdown_rx => {
                debug!("Reloader received shutdown signal");
                break;
            }
        }
    }
    debug!("Reloader task exiting");
}

/// Discard events already queued behind the one that triggered a reload
fn drain_pending(rx: &mut mpsc::Receiver<WatchMessage>) {
    while let Ok(message) = rx.try_recv() {
        match message {
            Ok(event) => debug!(kind = ?event.kind, paths = ?event.paths, "Reloader: coalesced event"),
            Err(e) => error!(error = %e, "Reloader watch error"),
        }
    }
}

async fn reload(temple: &Arc<Temple>) {
    let temple = Arc::clone(temple);
    match tokio::task::spawn_blocking(move || temple.reload()).await {
        Ok(Ok(())) => debug!("Reloader: reload complete"),
        Ok(Err(e)) => error!(error = %e, "Reload failed, keeping previous templates"),
        Err(e) => error!(error = %e, "Reload task panicked"),
    }
}
