use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::object_storage::{ObjectStorage, StorageError};

/// Filesystem-backed object storage rooted at one directory. Keys are
/// the canonical storage paths; nested prefixes become directories.
pub struct LocalObjectStorage {
    root: PathBuf,
}

impl LocalObjectStorage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(path);
        if relative
            .components()
            .any(|component| !matches!(component, Component::Normal(_)))
        {
            return Err(StorageError::InvalidPath(path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let full = self.resolve(path)?;
        match fs::read(&full).await {
            Ok(bytes) => Ok(bytes),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(error) => Err(StorageError::Io(error.to_string())),
        }
    }

    async fn put(&self, path: &str, bytes: &[u8]) -> Result<(), StorageError> {
        let full = self.resolve(path)?;
        if let Some(parent) = full.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::Io(e.to_string()))?;
        }
        fs::write(&full, bytes)
            .await
            .map_err(|e| StorageError::Io(e.to_string()))
    }

    async fn delete(&self, path: &str) -> Result<bool, StorageError> {
        let full = self.resolve(path)?;
        match fs::remove_file(&full).await {
            Ok(()) => Ok(true),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(error) => Err(StorageError::Io(error.to_string())),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, StorageError> {
        let base = self.resolve(prefix)?;
        if !base.exists() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        collect_files(&base, &mut keys).map_err(|e| StorageError::Io(e.to_string()))?;

        let mut relative: Vec<String> = keys
            .into_iter()
            .filter_map(|file| {
                file.strip_prefix(&self.root)
                    .ok()
                    .map(|p| p.to_string_lossy().replace('\\', "/"))
            })
            .collect();
        relative.sort();
        Ok(relative)
    }
}

fn collect_files(dir: &Path, out: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type()?.is_dir() {
            collect_files(&path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> (tempfile::TempDir, LocalObjectStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalObjectStorage::new(dir.path().to_path_buf());
        (dir, storage)
    }

    #[tokio::test]
    async fn put_get_roundtrip() {
        let (_dir, storage) = storage();
        storage
            .put("documents/w/d/original.txt", b"payload")
            .await
            .unwrap();

        let bytes = storage.get("documents/w/d/original.txt").await.unwrap();
        assert_eq!(bytes, b"payload");
    }

    #[tokio::test]
    async fn missing_objects_are_not_found() {
        let (_dir, storage) = storage();
        let result = storage.get("documents/nothing/here").await;
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_existed() {
        let (_dir, storage) = storage();
        storage.put("a/b/file", b"x").await.unwrap();

        assert!(storage.delete("a/b/file").await.unwrap());
        assert!(!storage.delete("a/b/file").await.unwrap());
    }

    #[tokio::test]
    async fn list_returns_keys_under_the_prefix() {
        let (_dir, storage) = storage();
        storage.put("documents/w/d/original.pdf", b"1").await.unwrap();
        storage.put("documents/w/d/pages/1.txt", b"2").await.unwrap();
        storage.put("documents/w/other/original.txt", b"3").await.unwrap();

        let keys = storage.list("documents/w/d").await.unwrap();
        assert_eq!(
            keys,
            vec![
                "documents/w/d/original.pdf".to_string(),
                "documents/w/d/pages/1.txt".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn traversal_segments_are_rejected() {
        let (_dir, storage) = storage();
        assert!(matches!(
            storage.get("../outside").await,
            Err(StorageError::InvalidPath(_))
        ));
        assert!(matches!(
            storage.put("/absolute/path", b"x").await,
            Err(StorageError::InvalidPath(_))
        ));
    }
}
