//! Persisted record of locators that completed ingestion.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs;
use tokio::sync::Mutex;

use crate::types::QaError;

/// Append-only set of ingested document locators, persisted as a JSON array.
///
/// Locators match byte-for-byte; no normalization is applied, so two
/// spellings of the same address are two documents. Insertion order is kept.
/// An async mutex is held across each read-modify-write so concurrent
/// `record` calls within the process serialize against each other;
/// cross-process writers are not coordinated.
#[derive(Clone, Debug)]
pub struct IngestLedger {
    path: PathBuf,
    state: Arc<Mutex<Vec<String>>>,
}

impl IngestLedger {
    /// Creates a ledger that persists to the provided path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads previously persisted locators, if the file exists.
    pub async fn load(&self) -> Result<(), QaError> {
        if !self.path.exists() {
            return Ok(());
        }
        let data = fs::read_to_string(&self.path).await?;
        let locators: Vec<String> = serde_json::from_str(&data).map_err(|err| {
            QaError::Ledger(format!("unreadable ledger {}: {err}", self.path.display()))
        })?;
        let mut guard = self.state.lock().await;
        *guard = locators;
        Ok(())
    }

    /// Whether `locator` already completed ingestion.
    pub async fn contains(&self, locator: &str) -> bool {
        let guard = self.state.lock().await;
        guard.iter().any(|entry| entry == locator)
    }

    /// Appends `locator` and rewrites the backing file. Recording a locator
    /// that is already present changes nothing.
    pub async fn record(&self, locator: &str) -> Result<(), QaError> {
        let mut guard = self.state.lock().await;
        if guard.iter().any(|entry| entry == locator) && self.path.exists() {
            return Ok(());
        }
        if !guard.iter().any(|entry| entry == locator) {
            guard.push(locator.to_string());
        }

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let serialized = serde_json::to_string_pretty(&*guard)
            .map_err(|err| QaError::Ledger(format!("ledger serialization failed: {err}")))?;
        fs::write(&self.path, serialized).await?;
        Ok(())
    }
}
