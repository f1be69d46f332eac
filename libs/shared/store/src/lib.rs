//! Single-document JSON persistence used by the scheduling cell.
//!
//! The document is read and written whole, per request. `mutate` applies the
//! change to a copy, persists the copy, and only then commits it to memory,
//! so a failed write never leaves the in-memory state ahead of the file.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Shared store over a single serializable document.
///
/// All mutations go through one internal lock, which also serializes the
/// availability re-check and the write during booking.
pub struct JsonStore<T> {
    path: PathBuf,
    data: Mutex<T>,
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned + Clone,
{
    /// Load the document from `path`, falling back to `default` when the
    /// file does not exist yet.
    pub fn load(path: impl AsRef<Path>, default: T) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let data = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Store file {} not found, starting from default document", path.display());
                default
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            data: Mutex::new(data),
        })
    }

    /// Clone the current document for read-only use.
    pub async fn snapshot(&self) -> T {
        self.data.lock().await.clone()
    }

    /// Apply `f` to a copy of the document, persist the copy, then commit it.
    ///
    /// If `f` fails or the write fails, the prior document stays in place.
    pub async fn mutate<F, R, E>(&self, f: F) -> Result<R, E>
    where
        F: FnOnce(&mut T) -> Result<R, E>,
        E: From<StoreError>,
    {
        let mut guard = self.data.lock().await;
        let mut candidate = guard.clone();

        let result = f(&mut candidate)?;

        self.persist(&candidate).await.map_err(E::from)?;
        *guard = candidate;

        Ok(result)
    }

    async fn persist(&self, data: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string_pretty(data)?;

        // Write to a sibling temp file and rename so readers never observe a
        // partially written document.
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, raw).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!("Persisted store document to {}", self.path.display());
        Ok(())
    }
}
