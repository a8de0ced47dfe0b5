//! File-backed storage: one JSON file per key inside a profile directory.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::storage::{KeyValueStorage, StorageError};

/// Storage backend that keeps each key in `<root>/<key>.json`.
///
/// Writes land in a uniquely named temporary file first and are renamed into
/// place, so a reader never observes a half-written snapshot. There is no
/// locking between processes: the last completed write wins.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    /// Open (creating if needed) a profile directory.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        tracing::debug!(root = %root.display(), "Opened file storage");
        Ok(Self { root })
    }

    /// The profile directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        let tmp = self
            .root
            .join(format!(".{key}.{}.tmp", uuid::Uuid::new_v4().simple()));

        fs::write(&tmp, value)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn temp_root() -> (TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("profile");
        (dir, root)
    }

    #[test]
    fn test_open_creates_directory() {
        let (_dir, root) = temp_root();
        let storage = FileStorage::open(&root).unwrap();
        assert!(storage.root().is_dir());
    }

    #[test]
    fn test_round_trip() {
        let (_dir, root) = temp_root();
        let storage = FileStorage::open(&root).unwrap();

        assert_eq!(storage.get_item("nexis_cart").unwrap(), None);
        storage.set_item("nexis_cart", "[]").unwrap();
        assert_eq!(storage.get_item("nexis_cart").unwrap().as_deref(), Some("[]"));
        assert!(root.join("nexis_cart.json").is_file());

        storage.remove_item("nexis_cart").unwrap();
        assert_eq!(storage.get_item("nexis_cart").unwrap(), None);
        storage.remove_item("nexis_cart").unwrap();
    }

    #[test]
    fn test_no_temp_files_left_behind() {
        let (_dir, root) = temp_root();
        let storage = FileStorage::open(&root).unwrap();
        storage.set_item("k", "1").unwrap();
        storage.set_item("k", "2").unwrap();

        let names: Vec<_> = fs::read_dir(&root)
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("k.json")]);
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let (_dir, root) = temp_root();
        let storage = FileStorage::open(&root).unwrap();

        for key in ["", "../escape", "a/b", ".hidden"] {
            assert!(
                matches!(storage.set_item(key, "x"), Err(StorageError::InvalidKey(_))),
                "key {key:?} should be rejected"
            );
        }
    }
}
