//! Wardrobe and inspiration state, persisted as JSON under fixed keys.
//!
//! The storage backend is injected so the same stores work over an in-memory
//! map or a directory of files standing in for browser local storage.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::warn;

pub const WARDROBE_KEY: &str = "szafaAI_wardrobe";
pub const STYLE_PROFILE_KEY: &str = "szafaAI_styleProfile";
pub const STYLE_IMAGES_KEY: &str = "szafaAI_styleImages";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub trait StorageBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl StorageBackend for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key inside `dir`.
#[derive(Debug)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        fs::create_dir_all(dir.as_ref())?;
        Ok(Self { dir: dir.as_ref().to_path_buf() })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        fs::write(self.path(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.path(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// Reads a JSON array of strings; anything else is logged and treated as absent.
fn load_string_list<S: StorageBackend>(storage: &S, key: &str) -> Result<Option<Vec<String>>, StoreError> {
    let Some(raw) = storage.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str::<Vec<String>>(&raw) {
        Ok(list) => Ok(Some(list)),
        Err(e) => {
            warn!(%key, error = %e, "ignoring unreadable stored list");
            Ok(None)
        }
    }
}

/// Ordered list of free-text garment descriptions.
pub struct WardrobeStore<S> {
    storage: S,
    items: Vec<String>,
}

impl<S: StorageBackend> WardrobeStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage, items: Vec::new() }
    }

    /// Replaces the in-memory list with the stored one, if any is readable.
    pub fn load(&mut self) -> Result<(), StoreError> {
        if let Some(items) = load_string_list(&self.storage, WARDROBE_KEY)? {
            self.items = items;
        }
        Ok(())
    }

    pub fn save(&mut self) -> Result<(), StoreError> {
        let raw = serde_json::to_string(&self.items)?;
        self.storage.set(WARDROBE_KEY, &raw)
    }

    pub fn add(&mut self, item: impl Into<String>) -> Result<(), StoreError> {
        self.items.push(item.into());
        self.save()
    }

    /// Removes the item at `index`; out of range is a no-op.
    pub fn remove(&mut self, index: usize) -> Result<Option<String>, StoreError> {
        if index >= self.items.len() {
            return Ok(None);
        }
        let removed = self.items.remove(index);
        self.save()?;
        Ok(Some(removed))
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}

/// Fields of the "add garment" form.
#[derive(Debug, Clone, Default)]
pub struct GarmentForm {
    pub name: String,
    pub color: String,
    pub kind: String,
    pub season: String,
}

impl GarmentForm {
    /// `None` when the name is blank.
    pub fn describe(&self) -> Option<String> {
        let name = self.name.trim();
        if name.is_empty() {
            return None;
        }
        let mut parts = vec![name.to_string()];
        for (label, value) in [("Color", &self.color), ("Type", &self.kind), ("Season", &self.season)] {
            let value = value.trim();
            if !value.is_empty() {
                parts.push(format!("{label}: {value}"));
            }
        }
        Some(parts.join(" | "))
    }
}

/// Style profile text and inspiration images (as data URLs).
pub struct InspirationStore<S> {
    storage: S,
}

impl<S: StorageBackend> InspirationStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn style_profile(&self) -> Result<Option<String>, StoreError> {
        Ok(self.storage.get(STYLE_PROFILE_KEY)?.filter(|p| !p.is_empty()))
    }

    pub fn set_style_profile(&mut self, profile: &str) -> Result<(), StoreError> {
        self.storage.set(STYLE_PROFILE_KEY, profile)
    }

    pub fn images(&self) -> Result<Vec<String>, StoreError> {
        Ok(load_string_list(&self.storage, STYLE_IMAGES_KEY)?.unwrap_or_default())
    }

    /// An empty list removes the key.
    pub fn set_images(&mut self, data_urls: &[String]) -> Result<(), StoreError> {
        if data_urls.is_empty() {
            return self.storage.remove(STYLE_IMAGES_KEY);
        }
        let raw = serde_json::to_string(data_urls)?;
        self.storage.set(STYLE_IMAGES_KEY, &raw)
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.storage.remove(STYLE_IMAGES_KEY)?;
        self.storage.remove(STYLE_PROFILE_KEY)
    }

    pub fn into_storage(self) -> S {
        self.storage
    }
}
