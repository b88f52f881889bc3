//! Saved registration forms ("restore last selection").
//!
//! A plain key-value file keyed by session. Nothing in the engine reads it; the
//! CLI uses it to park a half-filled registration between runs.

use anyhow::{Context, Result};
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const REGISTER_DRAFT_KEY: &str = "register_cooking";

#[derive(Debug, Default, Serialize, Deserialize)]
struct DraftFile {
    sessions: HashMap<String, HashMap<String, Vec<u8>>>,
}

#[derive(Debug)]
pub struct DraftStore {
    path: PathBuf,
    session: String,
    file: DraftFile,
}

impl DraftStore {
    pub fn open(path: &Path, session: &str) -> Result<Self> {
        let file = if path.exists() {
            let bytes = fs::read(path)
                .with_context(|| format!("Failed to read draft file at {:?}", path))?;
            bincode::deserialize(&bytes)
                .with_context(|| format!("Draft file at {:?} is corrupt", path))?
        } else {
            DraftFile::default()
        };
        Ok(DraftStore {
            path: path.to_path_buf(),
            session: session.to_string(),
            file,
        })
    }

    pub fn session(&self) -> &str {
        &self.session
    }

    pub fn save<T: Serialize>(&mut self, key: &str, data: &T) -> Result<()> {
        let bytes = bincode::serialize(data)
            .with_context(|| format!("Failed to encode draft '{}'", key))?;
        self.file
            .sessions
            .entry(self.session.clone())
            .or_default()
            .insert(key.to_string(), bytes);
        self.flush()?;
        debug!("Saved draft '{}' for session '{}'", key, self.session);
        Ok(())
    }

    /// `Ok(None)` when nothing was saved under `key` for this session.
    pub fn restore<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(bytes) = self
            .file
            .sessions
            .get(&self.session)
            .and_then(|entries| entries.get(key))
        else {
            return Ok(None);
        };
        let data = bincode::deserialize(bytes)
            .with_context(|| format!("Failed to decode draft '{}'", key))?;
        Ok(Some(data))
    }

    /// Removes a draft. Returns whether one existed.
    pub fn clear(&mut self, key: &str) -> Result<bool> {
        let removed = self
            .file
            .sessions
            .get_mut(&self.session)
            .map_or(false, |entries| entries.remove(key).is_some());
        if removed {
            self.flush()?;
        }
        Ok(removed)
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
        let bytes = bincode::serialize(&self.file).context("Failed to encode draft file")?;
        fs::write(&self.path, bytes)
            .with_context(|| format!("Failed to write draft file at {:?}", self.path))
    }
}
