//! File-backed store for the fleet aggregate.
//!
//! The whole aggregate is one small JSON document, so `save` is a plain
//! synchronous write-through performed inline at the end of every
//! mutating call. A failed write leaves the in-memory state
//! authoritative for the rest of the session; the failure is surfaced
//! to the caller as [`BoardError::PersistenceFailure`].

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::models::merge_stored;
use crate::domain::{FleetState, VehicleCatalog};
use crate::error::BoardError;

/// JSON-document store for the [`FleetState`] aggregate.
#[derive(Debug, Clone)]
pub struct FleetStore {
    path: PathBuf,
}

impl FleetStore {
    /// Creates a store over the given document path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the aggregate, merging the stored document with the catalog.
    ///
    /// A missing or unreadable document is not an error: it falls back to
    /// the freshly initialized aggregate. Malformed fields inside a
    /// readable document are repaired by the merge defaults.
    #[must_use]
    pub fn load(&self, catalog: &VehicleCatalog) -> FleetState {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::info!(path = %self.path.display(), %err, "no stored fleet state, starting fresh");
                return FleetState::initial(catalog);
            }
        };

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => merge_stored(&value, catalog),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "stored fleet state unreadable, reinitializing");
                FleetState::initial(catalog)
            }
        }
    }

    /// Serializes and writes the full aggregate.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError::PersistenceFailure`] when serialization or
    /// the filesystem write fails.
    pub fn save(&self, state: &FleetState) -> Result<(), BoardError> {
        let bytes = serde_json::to_vec_pretty(state)
            .map_err(|e| BoardError::PersistenceFailure(e.to_string()))?;
        fs::write(&self.path, bytes).map_err(|e| BoardError::PersistenceFailure(e.to_string()))
    }
}
