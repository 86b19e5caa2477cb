//! Versioned configuration store.
//!
//! The storage image starts with a short version marker followed by the
//! parameter segments:
//!
//! ```text
//! ┌──────────────────────┬───────────┬───────────┬─────┐
//! │ version marker       │ segment 1 │ segment 2 │ ... │
//! │ (version.len() bytes)│ (cap 1)   │ (cap 2)   │     │
//! └──────────────────────┴───────────┴───────────┴─────┘
//! ```
//!
//! Changing the marker invalidates everything stored before: a mismatching
//! image is not loaded and every parameter falls back to its default. Bump the
//! version whenever the parameter layout changes.

use crate::set::ParameterSet;
use crate::storage::{check_bounds, ByteStorage, StorageError};
use tracing::{debug, info, warn};

/// Result of [`ConfigStore::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Stored values were loaded.
    Loaded,
    /// The stored marker did not match; defaults were applied instead.
    VersionMismatch,
}

/// A [`ParameterSet`] persisted behind a version marker.
#[derive(Debug)]
pub struct ConfigStore<S: ByteStorage> {
    storage: S,
    version: String,
}

impl<S: ByteStorage> ConfigStore<S> {
    pub fn new(storage: S, version: impl Into<String>) -> Self {
        Self {
            storage,
            version: version.into(),
        }
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Bytes needed to hold the marker and every segment of `set`.
    pub fn required_size(&self, set: &ParameterSet) -> usize {
        self.version.len() + set.storage_size()
    }

    /// Write the version marker and every parameter, then commit.
    pub fn save(&mut self, set: &ParameterSet) -> Result<(), StorageError> {
        check_bounds(0, self.required_size(set), self.storage.size())?;

        self.storage.write(0, self.version.as_bytes())?;
        let end = set.save(&mut self.storage, self.version.len())?;
        self.storage.commit()?;

        info!(version = %self.version, bytes = end, "Configuration saved");
        Ok(())
    }

    /// Load every parameter if the stored marker matches.
    ///
    /// On mismatch the storage is left untouched and the set is reset to its
    /// defaults.
    pub fn load(&mut self, set: &mut ParameterSet) -> Result<LoadOutcome, StorageError> {
        check_bounds(0, self.required_size(set), self.storage.size())?;

        let mut marker = vec![0u8; self.version.len()];
        self.storage.read(0, &mut marker)?;

        if marker != self.version.as_bytes() {
            warn!(
                expected = %self.version,
                found = %String::from_utf8_lossy(&marker),
                "Configuration version mismatch, using defaults"
            );
            set.reset_to_defaults();
            return Ok(LoadOutcome::VersionMismatch);
        }

        set.load(&self.storage, self.version.len())?;
        debug!(version = %self.version, "Configuration loaded");
        Ok(LoadOutcome::Loaded)
    }
}
