//! Directory watches for override files.
//!
//! One watch per override file, installed on the containing directory so that
//! editors which save by rename-and-replace are still observed.

use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use parking_lot::Mutex;
use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Handle to a live directory watch. Clones share the same watch.
#[derive(Clone)]
pub struct Subscription {
    path: Arc<PathBuf>,
    active: Arc<AtomicBool>,
    watcher: Arc<Mutex<Option<RecommendedWatcher>>>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("path", &self.path)
            .field("active", &self.is_active())
            .finish()
    }
}

impl Subscription {
    /// A subscription with no watch behind it (watching disabled or failed).
    pub fn inactive(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Arc::new(path.into()),
            active: Arc::new(AtomicBool::new(false)),
            watcher: Arc::new(Mutex::new(None)),
        }
    }

    /// The watched override file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    /// Stop watching. Returns `false` if the watch was already gone.
    pub fn unsubscribe(&self) -> bool {
        let was_active = self.active.swap(false, Ordering::SeqCst);
        let watcher = self.watcher.lock().take();
        drop(watcher);
        if was_active {
            tracing::debug!(path = %self.path.display(), "watch removed");
        }
        was_active
    }
}

fn is_relevant(event: &Event, file_name: &OsString) -> bool {
    if matches!(event.kind, EventKind::Access(_)) {
        return false;
    }
    event
        .paths
        .iter()
        .any(|path| path.file_name() == Some(file_name.as_os_str()))
}

/// Watch `path`'s parent directory and call `on_change` for every event that
/// touches `path`. Events are delivered on the watcher's thread, in order.
pub fn watch_file<F>(path: &Path, mut on_change: F) -> notify::Result<Subscription>
where
    F: FnMut() + Send + 'static,
{
    let directory = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let file_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .ok_or_else(|| notify::Error::path_not_found().add_path(path.to_path_buf()))?;

    let active = Arc::new(AtomicBool::new(true));
    let callback_active = Arc::clone(&active);
    let watched_path = path.to_path_buf();

    let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
        if !callback_active.load(Ordering::SeqCst) {
            return;
        }
        match result {
            Ok(event) if is_relevant(&event, &file_name) => {
                tracing::debug!(path = %watched_path.display(), kind = ?event.kind, "override file changed");
                on_change();
            }
            Ok(_) => {}
            Err(err) => {
                tracing::warn!(path = %watched_path.display(), error = %err, "watch error");
            }
        }
    })?;
    watcher.watch(&directory, RecursiveMode::NonRecursive)?;

    Ok(Subscription {
        path: Arc::new(path.to_path_buf()),
        active,
        watcher: Arc::new(Mutex::new(Some(watcher))),
    })
}
