// TermiGit - Minimal distributed version control
// Copyright (C) 2025 TermiGit Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published
// by the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.

//! Local filesystem storage backend
//!
//! Keys map directly onto paths below the backend root: `objects/<hash>`
//! becomes `<root>/objects/<hash>`. This is the on-disk layout of a
//! repository's `.termi-git/` directory and of `file://` remotes.
//!
//! Writes are atomic. Data goes to a hidden temporary file in the target
//! directory, is flushed with `sync_all`, and is then renamed into place, so
//! readers never observe a partially written object.

use crate::{StorageBackend, StorageError, StorageResult};
use async_trait::async_trait;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Filesystem-backed [`StorageBackend`]
#[derive(Clone)]
pub struct LocalBackend {
    root: PathBuf,
}

impl LocalBackend {
    /// Create a backend rooted at `root`
    ///
    /// The root directory is created if missing.
    ///
    /// # Errors
    ///
    /// Fails if `root` exists but is not a directory.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use termigit_storage::local::LocalBackend;
    ///
    /// # #[tokio::main]
    /// # async fn main() -> termigit_storage::StorageResult<()> {
    /// let storage = LocalBackend::new(".termi-git").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new<P: AsRef<Path>>(root: P) -> StorageResult<Self> {
        let root = root.as_ref().to_path_buf();

        if !root.exists() {
            fs::create_dir_all(&root).await?;
        } else if !root.is_dir() {
            return Err(StorageError::backend(format!(
                "path exists but is not a directory: {}",
                root.display()
            )));
        }

        Ok(LocalBackend { root })
    }

    /// Root directory of this backend
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a key to its path, rejecting keys that would escape the root
    fn object_path(&self, key: &str) -> StorageResult<PathBuf> {
        if key.is_empty() {
            return Err(StorageError::invalid_key("key cannot be empty"));
        }
        if key.starts_with('/') || key.contains('\\') {
            return Err(StorageError::invalid_key(format!(
                "key must be a relative '/'-separated path: {}",
                key
            )));
        }

        let relative = Path::new(key);
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(StorageError::invalid_key(format!(
                "key contains '.' or '..' components: {}",
                key
            )));
        }

        Ok(self.root.join(relative))
    }

    fn temp_path(path: &Path) -> PathBuf {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        path.with_file_name(format!(".{}.tmp", name))
    }

    /// Collect keys below `dir` whose full key starts with `prefix`
    ///
    /// Walks with an explicit queue instead of recursion. Hidden entries
    /// (temporary files, lock files) are skipped.
    async fn walk(&self, dir: PathBuf, prefix: &str, results: &mut Vec<String>) -> StorageResult<()> {
        let mut queue = vec![dir];

        while let Some(current) = queue.pop() {
            let mut entries = match fs::read_dir(&current).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };

            while let Some(entry) = entries.next_entry().await? {
                let name = entry.file_name();
                if name.to_string_lossy().starts_with('.') {
                    continue;
                }

                let path = entry.path();
                let file_type = entry.file_type().await?;
                if file_type.is_dir() {
                    queue.push(path);
                    continue;
                }

                if let Some(key) = self.key_for(&path) {
                    if key.starts_with(prefix) {
                        results.push(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn key_for(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(parts.join("/"))
    }
}

impl fmt::Debug for LocalBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalBackend")
            .field("root", &self.root)
            .finish()
    }
}

#[async_trait]
impl StorageBackend for LocalBackend {
    async fn get(&self, key: &str) -> StorageResult<Vec<u8>> {
        let path = self.object_path(key)?;

        match fs::read(&path).await {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::not_found(key))
            }
            Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
                Err(StorageError::permission_denied(key))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, key: &str, data: &[u8]) -> StorageResult<()> {
        let path = self.object_path(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let temp_path = Self::temp_path(&path);
        let _ = fs::remove_file(&temp_path).await;

        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(data).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(&temp_path, &path).await?;
        Ok(())
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let path = self.object_path(key)?;
        Ok(fs::try_exists(&path).await?)
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        let path = self.object_path(key)?;

        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn list_objects(&self, prefix: &str) -> StorageResult<Vec<String>> {
        // Start from the deepest directory named by the prefix
        let start = match prefix.rfind('/') {
            Some(idx) => self.object_path(&prefix[..idx])?,
            None => self.root.clone(),
        };

        let mut results = Vec::new();
        self.walk(start, prefix, &mut results).await?;
        results.sort();
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn backend() -> (TempDir, LocalBackend) {
        let temp = TempDir::new().unwrap();
        let storage = LocalBackend::new(temp.path()).await.unwrap();
        (temp, storage)
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let (_temp, storage) = backend().await;

        storage.put("objects/abc123", b"hello").await.unwrap();
        assert_eq!(storage.get("objects/abc123").await.unwrap(), b"hello");
    }

    #[tokio::test]
    async fn test_layout_matches_key() {
        let (temp, storage) = backend().await;

        storage.put("objects/abc123", b"x").await.unwrap();
        storage.put("HEAD", b"abc123").await.unwrap();

        assert!(temp.path().join("objects").join("abc123").is_file());
        assert!(temp.path().join("HEAD").is_file());
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let (_temp, storage) = backend().await;

        let err = storage.get("objects/missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let (_temp, storage) = backend().await;

        storage.put("HEAD", b"one").await.unwrap();
        storage.put("HEAD", b"two").await.unwrap();
        assert_eq!(storage.get("HEAD").await.unwrap(), b"two");
    }

    #[tokio::test]
    async fn test_no_temp_files_left_behind() {
        let (temp, storage) = backend().await;

        storage.put("objects/abc", b"data").await.unwrap();

        let mut names = Vec::new();
        for entry in std::fs::read_dir(temp.path().join("objects")).unwrap() {
            names.push(entry.unwrap().file_name().to_string_lossy().into_owned());
        }
        assert_eq!(names, vec!["abc".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (_temp, storage) = backend().await;

        storage.put("objects/abc", b"data").await.unwrap();
        storage.delete("objects/abc").await.unwrap();
        storage.delete("objects/abc").await.unwrap();
        assert!(!storage.exists("objects/abc").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_objects_with_prefix() {
        let (_temp, storage) = backend().await;

        storage.put("objects/bbb", b"2").await.unwrap();
        storage.put("objects/aaa", b"1").await.unwrap();
        storage.put("HEAD", b"aaa").await.unwrap();
        storage.put("config.json", b"{}").await.unwrap();

        let keys = storage.list_objects("objects/").await.unwrap();
        assert_eq!(keys, vec!["objects/aaa", "objects/bbb"]);

        let all = storage.list_objects("").await.unwrap();
        assert_eq!(all.len(), 4);
    }

    #[tokio::test]
    async fn test_list_objects_missing_directory() {
        let (_temp, storage) = backend().await;
        assert!(storage.list_objects("objects/").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_keys_rejected() {
        let (_temp, storage) = backend().await;

        assert!(storage.get("").await.unwrap_err().is_invalid_key());
        assert!(storage.get("/etc/passwd").await.unwrap_err().is_invalid_key());
        assert!(storage.get("../outside").await.unwrap_err().is_invalid_key());
        assert!(storage.put("objects/../../x", b"x").await.unwrap_err().is_invalid_key());
    }
}
