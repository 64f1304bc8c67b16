//! Flat-file summary cache keyed by sanitized article title.
//!
//! Each summary lives in `<root>/<sanitized title>.txt`. Entries are never
//! rewritten by the pipeline once present, so a stored summary stays
//! authoritative even if the article changes upstream.
//!
//! Sanitization is lossy: `"AC/DC"` and `"AC:DC"` share the key `"AC_DC"`.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, info};

use crate::errors::BotError;

/// Characters that are replaced with `_` before a title is used as a file name.
pub const RESERVED_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

const ENTRY_EXTENSION: &str = "txt";

#[must_use]
pub fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .map(|c| if RESERVED_CHARS.contains(&c) { '_' } else { c })
        .collect()
}

pub struct SummaryStore {
    root: PathBuf,
    gates: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl SummaryStore {
    /// Open the store, creating `root` if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the directory cannot be created.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self, BotError> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await.map_err(|e| {
            BotError::StorageError(format!("create {}: {e}", root.display()))
        })?;
        info!(root = %root.display(), "Summary cache ready");

        Ok(Self {
            root,
            gates: Mutex::new(HashMap::new()),
        })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn path_for(&self, title: &str) -> PathBuf {
        self.root
            .join(format!("{}.{ENTRY_EXTENSION}", sanitize_title(title)))
    }

    pub async fn has(&self, title: &str) -> bool {
        tokio::fs::try_exists(self.path_for(title))
            .await
            .unwrap_or(false)
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the entry is missing or unreadable.
    pub async fn read(&self, title: &str) -> Result<String, BotError> {
        let path = self.path_for(title);
        debug!(path = %path.display(), "Reading cached summary");
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| BotError::StorageError(format!("read {}: {e}", path.display())))
    }

    /// # Errors
    ///
    /// Returns `StorageError` if the entry cannot be written.
    pub async fn write(&self, title: &str, text: &str) -> Result<(), BotError> {
        let path = self.path_for(title);
        debug!(path = %path.display(), bytes = text.len(), "Writing summary");
        tokio::fs::write(&path, text)
            .await
            .map_err(|e| BotError::StorageError(format!("write {}: {e}", path.display())))
    }

    /// Acquire the single-flight gate for `title`.
    ///
    /// Titles that sanitize to the same key share a gate, matching the way they
    /// share a file.
    pub async fn lock_title(&self, title: &str) -> OwnedMutexGuard<()> {
        let gate = {
            let mut gates = self.gates.lock().unwrap_or_else(PoisonError::into_inner);
            gates
                .entry(sanitize_title(title))
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        gate.lock_owned().await
    }
}
