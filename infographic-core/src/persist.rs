//! Single-slot persistence of the card list.
//!
//! A slot holds one JSON array of cards. Saving overwrites it, loading a
//! missing or unreadable slot yields `None`, and clearing an empty slot is
//! not an error.

use crate::card::Card;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single save location.
#[async_trait]
pub trait SaveSlot: Send + Sync {
    /// Overwrite the slot with `cards`.
    async fn save(&self, cards: &[Card]) -> Result<(), PersistError>;

    /// Read the slot. Missing or corrupt content is `None`.
    async fn load(&self) -> Result<Option<Vec<Card>>, PersistError>;

    /// Empty the slot.
    async fn clear(&self) -> Result<(), PersistError>;
}

fn decode(raw: &str, origin: &str) -> Option<Vec<Card>> {
    match serde_json::from_str::<Vec<Card>>(raw) {
        Ok(cards) => Some(cards),
        Err(e) => {
            warn!(origin, error = %e, "ignoring corrupt saved infographic");
            None
        }
    }
}

/// A slot stored as one JSON file.
#[derive(Debug, Clone)]
pub struct FileSlot {
    path: PathBuf,
}

impl FileSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SaveSlot for FileSlot {
    async fn save(&self, cards: &[Card]) -> Result<(), PersistError> {
        let content = serde_json::to_string_pretty(cards)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }
        // Write then rename so a crash never leaves a half-written slot.
        let temp = self.temp_path();
        fs::write(&temp, content).await?;
        fs::rename(&temp, &self.path).await?;
        debug!(path = %self.path.display(), count = cards.len(), "saved infographic");
        Ok(())
    }

    async fn load(&self) -> Result<Option<Vec<Card>>, PersistError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!(path = %self.path.display(), "saved infographic is not UTF-8");
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };
        Ok(decode(&content, &self.path.display().to_string()))
    }

    async fn clear(&self) -> Result<(), PersistError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// An in-process slot, for tests and headless runs without a disk.
#[derive(Debug, Default)]
pub struct MemorySlot {
    raw: Mutex<Option<String>>,
}

impl MemorySlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// A slot pre-filled with arbitrary text.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }

    pub async fn raw(&self) -> Option<String> {
        self.raw.lock().await.clone()
    }
}

#[async_trait]
impl SaveSlot for MemorySlot {
    async fn save(&self, cards: &[Card]) -> Result<(), PersistError> {
        let content = serde_json::to_string(cards)?;
        *self.raw.lock().await = Some(content);
        Ok(())
    }

    async fn load(&self) -> Result<Option<Vec<Card>>, PersistError> {
        Ok(self
            .raw
            .lock()
            .await
            .as_deref()
            .and_then(|raw| decode(raw, "memory")))
    }

    async fn clear(&self) -> Result<(), PersistError> {
        *self.raw.lock().await = None;
        Ok(())
    }
}
