//! File-backed key-value store
//!
//! Provides a `FileStore` that keeps each key in its own JSON file inside an
//! XDG-compliant data directory. Writes go to a temporary sibling file that is
//! then renamed over the target, so readers never observe a half-written value.

use directories::ProjectDirs;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, StoreError};

/// Persists records as files in a directory
///
/// Uses `~/.local/share/pantrychef/` on Linux, or the equivalent platform data
/// directory elsewhere.
#[derive(Debug, Clone)]
pub struct FileStore {
    /// Directory where record files are stored
    data_dir: PathBuf,
}

impl FileStore {
    /// Creates a new FileStore in the platform data directory
    ///
    /// Returns `None` if the directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "pantrychef")?;
        let data_dir = project_dirs.data_dir().to_path_buf();
        Some(Self { data_dir })
    }

    /// Creates a new FileStore with a custom directory
    pub fn with_dir(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Directory the store writes into
    pub fn dir(&self) -> &Path {
        &self.data_dir
    }

    /// Returns the path to the record file for the given key
    fn record_path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }

    /// Ensures the data directory exists
    fn ensure_dir(&self) -> io::Result<()> {
        fs::create_dir_all(&self.data_dir)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.record_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.ensure_dir()?;

        let target = self.record_path(key);
        let staging = self.data_dir.join(format!("{}.json.tmp", key));
        fs::write(&staging, value)?;
        fs::rename(&staging, &target)?;
        Ok(())
    }
}
