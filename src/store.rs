use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

const STORE_VERSION: u32 = 1;
const CACHE_DIR: &str = "squadmap_terminal";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct StoreFile {
    version: u32,
    entries: HashMap<String, String>,
}

/// Persistent string-keyed store backed by a versioned JSON file. A missing,
/// unreadable, unparsable, or version-mismatched file loads as an empty
/// store, never as an error.
#[derive(Debug, Clone)]
pub struct KvStore {
    path: Option<PathBuf>,
    file: StoreFile,
}

impl KvStore {
    /// Opens the store at the default cache location. Without a resolvable
    /// cache dir the store still works, it just won't persist.
    pub fn open_default(file_name: &str) -> Self {
        Self::open_at(store_path(file_name))
    }

    pub fn open_at(path: Option<PathBuf>) -> Self {
        let file = path
            .as_deref()
            .map(load_store_file)
            .unwrap_or_default();
        Self { path, file }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.file.entries.get(key).map(String::as_str)
    }

    pub fn insert(&mut self, key: String, value: String) {
        self.file.entries.insert(key, value);
        let _ = self.save();
    }

    pub fn len(&self) -> usize {
        self.file.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file.entries.is_empty()
    }

    fn save(&mut self) -> Result<()> {
        let Some(path) = self.path.as_ref() else {
            return Ok(());
        };
        let Some(dir) = path.parent() else {
            return Ok(());
        };
        fs::create_dir_all(dir).ok();

        self.file.version = STORE_VERSION;
        let json = serde_json::to_string(&self.file).context("serialize store")?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).context("write store")?;
        fs::rename(&tmp, path).context("swap store")?;
        Ok(())
    }
}

fn load_store_file(path: &Path) -> StoreFile {
    let Ok(raw) = fs::read_to_string(path) else {
        return StoreFile::default();
    };
    let file = serde_json::from_str::<StoreFile>(&raw).unwrap_or_default();
    if file.version != STORE_VERSION {
        return StoreFile::default();
    }
    file
}

fn store_path(file_name: &str) -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR).join(file_name));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".cache")
            .join(CACHE_DIR)
            .join(file_name),
    )
}
