//! Lazy directory listing for the workspace tree
//!
//! Children are read from the filesystem every time they are requested.
//! Nothing is cached, so a listing always reflects the directory at read time.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, Weak};

use thiserror::Error;
use tracing::debug;

use super::{DirectoryEntry, EntryKind};

/// Errors raised while reading the workspace
#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("Failed to read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to stat {}: {source}", .path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

type Observer = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct Observers {
    next_id: u64,
    entries: Vec<(u64, Observer)>,
}

/// Handle for a refresh observer; dropping it unsubscribes
pub struct Subscription {
    id: u64,
    observers: Weak<Mutex<Observers>>,
}

impl Subscription {
    /// Explicitly unsubscribe (same as dropping the handle)
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(observers) = self.observers.upgrade() {
            if let Ok(mut observers) = observers.lock() {
                observers.entries.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

/// Lists workspace directories on demand
pub struct TreeProvider {
    root: PathBuf,
    observers: Arc<Mutex<Observers>>,
}

impl TreeProvider {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            observers: Arc::new(Mutex::new(Observers::default())),
        }
    }

    /// The workspace root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether `path` lives inside this workspace
    pub fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.root)
    }

    /// List the children of `parent`, or of the workspace root for `None`
    ///
    /// File entries are terminal and always yield no children.
    pub fn list_children(
        &self,
        parent: Option<&DirectoryEntry>,
    ) -> Result<Vec<DirectoryEntry>, WorkspaceError> {
        match parent {
            None => read_directory(&self.root),
            Some(entry) if entry.is_expandable() => read_directory(&entry.path),
            Some(_) => Ok(Vec::new()),
        }
    }

    /// Register a callback fired on every `refresh`
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut observers = self
            .observers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let id = observers.next_id;
        observers.next_id += 1;
        observers.entries.push((id, Arc::new(callback)));

        Subscription {
            id,
            observers: Arc::downgrade(&self.observers),
        }
    }

    /// Notify every subscriber that the tree should be re-read
    pub fn refresh(&self) {
        // Callbacks run outside the lock so they may subscribe or drop handles
        let callbacks: Vec<Observer> = {
            let observers = self
                .observers
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            observers.entries.iter().map(|(_, cb)| Arc::clone(cb)).collect()
        };

        debug!(observers = callbacks.len(), "refreshing workspace tree");
        for callback in callbacks {
            callback();
        }
    }

    #[cfg(test)]
    fn observer_count(&self) -> usize {
        self.observers
            .lock()
            .map(|o| o.entries.len())
            .unwrap_or_default()
    }
}

/// Read one directory level, stat-ing every child
fn read_directory(directory: &Path) -> Result<Vec<DirectoryEntry>, WorkspaceError> {
    let read_dir = fs::read_dir(directory).map_err(|source| WorkspaceError::ReadDir {
        path: directory.to_path_buf(),
        source,
    })?;

    let mut entries = Vec::new();
    for child in read_dir {
        let child = child.map_err(|source| WorkspaceError::ReadDir {
            path: directory.to_path_buf(),
            source,
        })?;
        let path = child.path();

        // Follows symlinks, so a link to a directory expands like one
        let metadata = fs::metadata(&path).map_err(|source| WorkspaceError::Stat {
            path: path.clone(),
            source,
        })?;

        let kind = if metadata.is_dir() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        entries.push(DirectoryEntry::new(path, kind));
    }

    entries.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.name.cmp(&b.name)));

    debug!(directory = %directory.display(), count = entries.len(), "listed directory");
    Ok(entries)
}
