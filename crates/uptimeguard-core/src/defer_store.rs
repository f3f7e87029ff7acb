//! Deferral counter persistence.
//!
//! The counter is a single ASCII decimal in a small file. Reads are tolerant:
//! a missing, empty or corrupt record reads as zero.

use std::cell::Cell;
use std::path::{Path, PathBuf};

use crate::error::StoreError;

/// Storage for the number of deferrals used since the last restart.
pub trait DeferStore {
    /// Current count; never fails.
    fn get(&self) -> u32;

    /// Persist `get() + 1` and return the new value.
    fn increment(&self) -> Result<u32, StoreError>;

    /// Forget all deferrals. Called only after a restart.
    fn reset(&self) -> Result<(), StoreError>;
}

/// File-backed counter.
#[derive(Debug, Clone)]
pub struct FileDeferStore {
    path: PathBuf,
}

impl FileDeferStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the counter file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the parent directory and prove a file can be written there.
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or written to.
    pub fn ensure_writable(&self) -> Result<(), StoreError> {
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        std::fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;

        let probe = dir.join(".uptimeguard-write-test");
        std::fs::write(&probe, b"").map_err(|e| StoreError::io(&probe, e))?;
        std::fs::remove_file(&probe).map_err(|e| StoreError::io(&probe, e))?;
        Ok(())
    }
}

impl DeferStore for FileDeferStore {
    fn get(&self) -> u32 {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => content.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(
                    path = %self.path.display(),
                    "Defer counter is corrupt, treating as 0"
                );
                0
            }),
            Err(_) => 0,
        }
    }

    fn increment(&self) -> Result<u32, StoreError> {
        let next = self.get().saturating_add(1);
        std::fs::write(&self.path, format!("{next}\n")).map_err(|e| StoreError::io(&self.path, e))?;
        Ok(next)
    }

    fn reset(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io(&self.path, e)),
        }
    }
}

/// In-memory counter for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryDeferStore {
    count: Cell<u32>,
}

impl MemoryDeferStore {
    pub fn new(count: u32) -> Self {
        Self {
            count: Cell::new(count),
        }
    }
}

impl DeferStore for MemoryDeferStore {
    fn get(&self) -> u32 {
        self.count.get()
    }

    fn increment(&self) -> Result<u32, StoreError> {
        let next = self.count.get().saturating_add(1);
        self.count.set(next);
        Ok(next)
    }

    fn reset(&self) -> Result<(), StoreError> {
        self.count.set(0);
        Ok(())
    }
}
