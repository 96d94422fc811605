//! Durable key-value slots used to persist small pieces of client state.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::{collections::HashMap, fmt::Debug, fs, io, path::PathBuf};

/// A string-valued key-value store local to this client.
pub trait KeyValueStore: Send + Sync + Debug {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &std::path::Path {
        &self.dir
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.slot_path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                Err(e).with_context(|| format!("Failed to read storage slot: {}", path.display()))
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).with_context(|| {
            format!("Failed to create storage directory: {}", self.dir.display())
        })?;

        // Write next to the target and rename over it so readers never see a partial value.
        let path = self.slot_path(key);
        let tmp = self.dir.join(format!(".{key}.json.tmp"));

        fs::write(&tmp, value)
            .with_context(|| format!("Failed to write storage slot: {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("Failed to replace storage slot: {}", path.display()))?;

        Ok(())
    }
}

/// Process-local store; contents are lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.slots.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
