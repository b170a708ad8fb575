//! Save text storage
//!
//! Saves are opaque text blobs addressed by a location name like
//! `savegame_v0` or `presets/arena`. Native builds write files; tests and
//! embedders can keep everything in memory.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Where save text goes
pub trait SaveStorage {
    /// Replace whatever is stored at `name`
    fn write_text(&mut self, name: &str, text: &str) -> Result<()>;

    /// Stored text, or `None` if nothing was ever written
    fn read_text(&self, name: &str) -> Result<Option<String>>;
}

/// Files under a root directory, one `<name>.save` per location
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of a save location
    pub fn path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.save", name))
    }
}

impl SaveStorage for FileStorage {
    fn write_text(&mut self, name: &str, text: &str) -> Result<()> {
        let path = self.path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        if path.exists() {
            fs::remove_file(&path)?;
        }
        fs::write(&path, text)?;
        log::debug!("Wrote {} bytes to {}", text.len(), path.display());
        Ok(())
    }

    fn read_text(&self, name: &str) -> Result<Option<String>> {
        let path = self.path(name);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(&path)?))
    }
}

/// In-memory storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.files.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl SaveStorage for MemoryStorage {
    fn write_text(&mut self, name: &str, text: &str) -> Result<()> {
        self.files.insert(name.to_string(), text.to_string());
        Ok(())
    }

    fn read_text(&self, name: &str) -> Result<Option<String>> {
        Ok(self.files.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_replaces() {
        let mut storage = MemoryStorage::new();
        assert!(storage.read_text("slot").unwrap().is_none());
        storage.write_text("slot", "one").unwrap();
        storage.write_text("slot", "two").unwrap();
        assert_eq!(storage.read_text("slot").unwrap().as_deref(), Some("two"));
        assert_eq!(storage.len(), 1);
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let root = std::env::temp_dir().join(format!("savegraph-test-{}", std::process::id()));
        let mut storage = FileStorage::new(root.clone());

        assert!(storage.read_text("presets/arena").unwrap().is_none());
        storage.write_text("presets/arena", "{}").unwrap();
        storage.write_text("presets/arena", "{\"items\":[]}").unwrap();
        assert_eq!(
            storage.read_text("presets/arena").unwrap().as_deref(),
            Some("{\"items\":[]}")
        );
        assert!(storage.path("presets/arena").ends_with("presets/arena.save"));

        fs::remove_dir_all(&root).unwrap();
    }
}
