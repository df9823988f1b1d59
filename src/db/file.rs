// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed store: one `<key>.json` file per key under a data directory.
//!
//! The directory may hold other files. The store only ever removes files for
//! keys it has read or written itself.

use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::db::{KeyValueStore, StoreError};

const EXTENSION: &str = "json";

/// Key-value store backed by files in a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
    /// Keys seen through `get` or `set`; `clear` removes only these.
    known_keys: Arc<Mutex<BTreeSet<String>>>,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, StoreError> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir).map_err(|e| io_error(&dir, e))?;
        tracing::info!(dir = %dir.display(), "Opened snapshot store");
        Ok(Self {
            dir,
            known_keys: Arc::default(),
        })
    }

    fn known_keys(&self) -> Result<MutexGuard<'_, BTreeSet<String>>, StoreError> {
        self.known_keys
            .lock()
            .map_err(|_| StoreError::Unavailable("store lock poisoned".to_string()))
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(StoreError::Unavailable(format!("invalid key '{key}'")));
        }
        Ok(self.dir.join(format!("{key}.{EXTENSION}")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => {
                self.known_keys()?.insert(key.to_string());
                Ok(Some(contents))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        // Write beside the target and rename so readers never see a partial file.
        let tmp = path.with_extension(format!("{EXTENSION}.tmp"));
        fs::write(&tmp, value).map_err(|e| io_error(&tmp, e))?;
        fs::rename(&tmp, &path).map_err(|e| io_error(&path, e))?;
        self.known_keys()?.insert(key.to_string());
        tracing::debug!(key, bytes = value.len(), "Snapshot written");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut known = self.known_keys()?;
        while let Some(key) = known.pop_first() {
            let path = self.path_for(&key)?;
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    known.insert(key);
                    return Err(io_error(&path, e));
                }
            }
        }
        tracing::debug!(dir = %self.dir.display(), "Snapshot store cleared");
        Ok(())
    }
}

fn io_error(path: &Path, err: std::io::Error) -> StoreError {
    StoreError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}
