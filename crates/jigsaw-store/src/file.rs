//! One `<id>.json` file per session in a directory.

use async_trait::async_trait;
use jigsaw_core::{PuzzleError, Result};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::ports::SessionStore;

const EXTENSION: &str = "json";

#[derive(Debug, Clone)]
pub struct JsonFileSessionStore {
    dir: PathBuf,
}

impl JsonFileSessionStore {
    /// The directory is created on first save
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> Result<PathBuf> {
        let valid = !id.is_empty()
            && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(PuzzleError::InvalidConfig {
                key: "session_id".to_string(),
                reason: format!("'{}' is not a valid session id", id),
            });
        }
        Ok(self.dir.join(format!("{}.{}", id, EXTENSION)))
    }
}

#[async_trait]
impl SessionStore for JsonFileSessionStore {
    async fn save(&self, id: &str, document: &str) -> Result<()> {
        let path = self.path_for(id)?;
        fs::create_dir_all(&self.dir).await?;
        // Write then rename so a crash never leaves a truncated session
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, document).await?;
        fs::rename(&tmp, &path).await?;
        tracing::debug!(session_id = %id, path = %path.display(), "Saved session");
        Ok(())
    }

    async fn load(&self, id: &str) -> Result<Option<String>> {
        let path = self.path_for(id)?;
        match fs::read_to_string(&path).await {
            Ok(document) => Ok(Some(document)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let path = self.path_for(id)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self) -> Result<Vec<String>> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}
