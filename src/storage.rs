use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Key the workout snapshot is stored under.
pub const SNAPSHOT_KEY: &str = "workouts";

/// Somewhere a single textual snapshot can live between sessions.
pub trait SnapshotStorage {
    /// `Ok(None)` when nothing has been written yet.
    fn read_snapshot(&self) -> Result<Option<String>>;
    fn write_snapshot(&mut self, text: &str) -> Result<()>;
    fn clear_snapshot(&mut self) -> Result<()>;
}

/// Snapshot kept in one JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/workouts.json`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(format!("{SNAPSHOT_KEY}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStorage for FileStorage {
    fn read_snapshot(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                Err(e).with_context(|| format!("reading snapshot: {}", self.path.display()))
            }
        }
    }

    fn write_snapshot(&mut self, text: &str) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating dir: {}", parent.display()))?;
        }
        fs::write(&self.path, text)
            .with_context(|| format!("writing snapshot: {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), bytes = text.len(), "snapshot written");
        Ok(())
    }

    fn clear_snapshot(&mut self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "snapshot removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("removing snapshot: {}", self.path.display()))
            }
        }
    }
}

/// Snapshot held in memory; nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Option<String>,
}

impl MemoryStorage {
    pub fn with_snapshot(text: impl Into<String>) -> Self {
        Self {
            slot: Some(text.into()),
        }
    }
}

impl SnapshotStorage for MemoryStorage {
    fn read_snapshot(&self) -> Result<Option<String>> {
        Ok(self.slot.clone())
    }

    fn write_snapshot(&mut self, text: &str) -> Result<()> {
        self.slot = Some(text.to_string());
        Ok(())
    }

    fn clear_snapshot(&mut self) -> Result<()> {
        self.slot = None;
        Ok(())
    }
}
