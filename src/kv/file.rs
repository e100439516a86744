//! FileKeyValueStore - one file per key inside a directory.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use super::KeyValueStore;
use crate::error::StoreError;

/// Directory-backed key-value store.
///
/// Each key maps to `<dir>/<encoded key>.json`. Every write goes to its own
/// temporary file in the same directory that is then renamed over the target,
/// so readers never see a half-written value and concurrent writers never
/// share a temp path. The last rename wins.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Open (and create if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| io_error(&dir, e))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", encode_key(key)))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);

        let mut tmp = NamedTempFile::new_in(&self.dir).map_err(|e| io_error(&self.dir, e))?;
        tmp.write_all(value.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| io_error(&path, e))?;
        tmp.persist(&path).map_err(|e| io_error(&path, e.error))?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }
}

/// Keep `[A-Za-z0-9_-]` as is and hex-escape every other byte as `%XX`.
fn encode_key(key: &str) -> String {
    let mut encoded = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
            encoded.push(byte as char);
        } else {
            encoded.push_str(&format!("%{:02X}", byte));
        }
    }
    encoded
}

fn io_error(path: &Path, err: io::Error) -> StoreError {
    match err.kind() {
        io::ErrorKind::PermissionDenied | io::ErrorKind::NotFound => {
            StoreError::Unavailable(format!("{}: {}", path.display(), err))
        }
        _ => StoreError::Unknown(format!("{}: {}", path.display(), err)),
    }
}
