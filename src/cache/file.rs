//! Directory-backed store that survives process restarts

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use super::store::KeyValueStore;
use crate::checksum::Checksum;
use crate::error::CacheError;

/// One file per key inside a directory
///
/// File names are the SHA-256 of the key, so any key is a safe path. Writes go
/// to a temporary file first and are renamed into place, so readers never see
/// a partial value.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    writes: AtomicU64,
}

impl FileStore {
    /// Open a store rooted at `path`, creating the directory if needed
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let root = path.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            writes: AtomicU64::new(0),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.json", Checksum::from_bytes(key.as_bytes())))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        let target = self.path_for(key);
        let sequence = self.writes.fetch_add(1, Ordering::Relaxed);
        let staging = target.with_extension(format!("{}.{}.tmp", std::process::id(), sequence));
        fs::write(&staging, value)?;
        if let Err(e) = fs::rename(&staging, &target) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }
        Ok(())
    }

    fn contains(&self, key: &str) -> Result<bool, CacheError> {
        Ok(self.path_for(key).is_file())
    }
}
