// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Key-value storage backends.
//!
//! The interface mirrors browser local storage: string keys mapping to
//! JSON-encoded string values, with whole-value reads and writes.

use crate::error::AppError;
use dashmap::DashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const FILE_EXTENSION: &str = "json";

/// String key-value storage shared across requests.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, AppError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), AppError>;
    fn remove_item(&self, key: &str) -> Result<(), AppError>;
    fn clear(&self) -> Result<(), AppError>;
    /// All keys currently present, in no particular order.
    fn keys(&self) -> Result<Vec<String>, AppError>;
}

/// In-memory store. Contents are lost on drop.
#[derive(Default)]
pub struct MemoryStore {
    items: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.items.get(key).map(|v| v.value().clone()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), AppError> {
        self.items.remove(key);
        Ok(())
    }

    fn clear(&self) -> Result<(), AppError> {
        self.items.clear();
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, AppError> {
        Ok(self.items.iter().map(|e| e.key().clone()).collect())
    }
}

/// File-backed store: one `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, AppError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| {
            AppError::Storage(format!("Failed to create {}: {}", dir.display(), e))
        })?;
        tracing::info!(path = %dir.display(), "Opened file store");
        Ok(Self { dir })
    }

    /// `None` for keys that cannot be a file name. Such keys can never be
    /// stored, so reads see them as absent.
    fn path_for(&self, key: &str) -> Option<PathBuf> {
        is_valid_key(key).then(|| self.dir.join(format!("{}.{}", key, FILE_EXTENSION)))
    }
}

/// Keys become file names verbatim, so only `[A-Za-z0-9_-]` is accepted.
fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

impl KeyValueStore for FileStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, AppError> {
        let Some(path) = self.path_for(key) else {
            return Ok(None);
        };
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), AppError> {
        let path = self
            .path_for(key)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid storage key: {:?}", key)))?;
        // Unique temp file per write; the last rename wins
        let tmp = self
            .dir
            .join(format!("{}.{}.tmp", key, uuid::Uuid::new_v4().simple()));
        let result = fs::write(&tmp, value).and_then(|_| fs::rename(&tmp, &path));
        if result.is_err() {
            let _ = fs::remove_file(&tmp);
        }
        result.map_err(|e| AppError::Storage(format!("Failed to write {}: {}", path.display(), e)))
    }

    fn remove_item(&self, key: &str) -> Result<(), AppError> {
        let Some(path) = self.path_for(key) else {
            return Ok(());
        };
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Storage(format!(
                "Failed to remove {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn clear(&self) -> Result<(), AppError> {
        for key in self.keys()? {
            self.remove_item(&key)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, AppError> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            AppError::Storage(format!("Failed to list {}: {}", self.dir.display(), e))
        })?;

        let mut keys = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| AppError::Storage(e.to_string()))?
                .path();
            if path.extension().and_then(|e| e.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                keys.push(stem.to_string());
            }
        }
        Ok(keys)
    }
}
