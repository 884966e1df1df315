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

//! Repository handle
//!
//! A [`Repository`] owns the paths of one working tree and the stores kept
//! under its `.termi-git/` directory. Every user-facing operation lives
//! here. The mutating ones (add, commit, pull, revert) take the
//! [`RepoLock`] for their whole duration.

use crate::checkout::{CheckoutManager, CheckoutReport};
use crate::commit::{build_commit, Commit};
use crate::error::{VcsError, VcsResult};
use crate::head::Head;
use crate::index::Index;
use crate::lock::RepoLock;
use crate::log::History;
use crate::object::ObjectType;
use crate::odb::{ObjectDatabase, OBJECTS_PREFIX};
use crate::oid::{Oid, OID_HEX_LEN};
use crate::sync::{PushReport, SyncEngine, SyncEvent};
use crate::tree::{build_tree, Tree};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use termigit_config::{ConfigLoader, RepoConfig};
use termigit_storage::{open_remote, LocalBackend, S3Config, StorageBackend, StorageError};
use tokio::fs;
use tracing::{debug, info, instrument};

/// Name of the repository directory inside the working tree
pub const REPO_DIR: &str = ".termi-git";

/// Configuration file inside the repository directory
pub const CONFIG_FILE: &str = "config.json";

/// Outcome of a pull
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullReport {
    /// Commit local HEAD now points at
    pub head: Oid,
    /// Objects downloaded from the remote
    pub fetched: Vec<Oid>,
    /// Working directory changes
    pub checkout: CheckoutReport,
}

/// An opened TermiGit repository
#[derive(Debug, Clone)]
pub struct Repository {
    root: PathBuf,
    repo_dir: PathBuf,
    odb: ObjectDatabase,
    index: Index,
    head: Head,
}

impl Repository {
    /// Whether `root` already holds a repository directory
    pub fn exists_at(root: &Path) -> bool {
        root.join(REPO_DIR).exists()
    }

    /// Create a repository in `root`
    ///
    /// # Errors
    ///
    /// [`VcsError::AlreadyInitialized`] if `root/.termi-git` exists.
    #[instrument(skip(config), fields(bucket = %config.remote_bucket))]
    pub async fn init(root: &Path, config: &RepoConfig) -> VcsResult<Self> {
        let repo_dir = root.join(REPO_DIR);
        if repo_dir.exists() {
            return Err(VcsError::AlreadyInitialized(root.to_path_buf()));
        }

        fs::create_dir_all(repo_dir.join(OBJECTS_PREFIX.trim_end_matches('/'))).await?;
        ConfigLoader::new()
            .save(repo_dir.join(CONFIG_FILE), config)
            .await?;

        info!(path = %repo_dir.display(), "Initialized repository");
        Self::open(root).await
    }

    /// Open the repository whose working tree is `root`
    pub async fn open(root: &Path) -> VcsResult<Self> {
        if !root.join(REPO_DIR).is_dir() {
            return Err(VcsError::NotARepository(root.to_path_buf()));
        }

        let root = fs::canonicalize(root).await?;
        let repo_dir = root.join(REPO_DIR);
        let store: Arc<dyn StorageBackend> = Arc::new(LocalBackend::new(&repo_dir).await?);

        debug!(root = %root.display(), "Opened repository");
        Ok(Self {
            odb: ObjectDatabase::new(Arc::clone(&store)),
            index: Index::new(Arc::clone(&store)),
            head: Head::new(store),
            root,
            repo_dir,
        })
    }

    /// Find the repository containing `start`, walking up the parents
    pub async fn discover(start: &Path) -> VcsResult<Self> {
        let start = fs::canonicalize(start).await?;

        for dir in start.ancestors() {
            if dir.join(REPO_DIR).is_dir() {
                return Self::open(dir).await;
            }
        }

        Err(VcsError::NotARepository(start))
    }

    /// Working tree root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The `.termi-git` directory
    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    /// Local object database
    pub fn odb(&self) -> &ObjectDatabase {
        &self.odb
    }

    /// Staging index
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Local HEAD
    pub fn head(&self) -> &Head {
        &self.head
    }

    /// Take the repository lock
    pub fn lock(&self) -> VcsResult<RepoLock> {
        RepoLock::acquire(&self.repo_dir)
    }

    /// Stored configuration with environment overrides applied
    pub async fn config(&self) -> VcsResult<RepoConfig> {
        Ok(ConfigLoader::new()
            .load_with_overrides(self.repo_dir.join(CONFIG_FILE))
            .await?)
    }

    /// Connect to the configured remote
    pub async fn open_remote(&self) -> VcsResult<Arc<dyn StorageBackend>> {
        connect_remote(&self.config().await?).await
    }

    /// Stage a file
    ///
    /// Relative paths are taken from the working tree root. Returns the
    /// repository-relative path (forward slashes) and the blob id.
    ///
    /// # Errors
    ///
    /// [`VcsError::FileNotFound`] if the file does not exist and
    /// [`VcsError::InvalidPath`] if it is a directory or lies outside the
    /// working tree.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub async fn add(&self, path: &Path) -> VcsResult<(String, Oid)> {
        let _lock = self.lock()?;

        let full = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };

        let metadata = match fs::metadata(&full).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(VcsError::FileNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };
        if !metadata.is_file() {
            return Err(VcsError::invalid_path(path, "only regular files can be added"));
        }

        let relative = self.relative_path(&fs::canonicalize(&full).await?, path)?;
        let content = fs::read(&full).await?;
        let oid = self.odb.write_blob(&content).await?;
        self.index.stage(&relative, oid).await?;

        info!(path = %relative, oid = %oid, "Added file");
        Ok((relative, oid))
    }

    fn relative_path(&self, canonical: &Path, shown: &Path) -> VcsResult<String> {
        let relative = canonical
            .strip_prefix(&self.root)
            .map_err(|_| VcsError::invalid_path(shown, "outside the repository"))?;

        if relative.starts_with(REPO_DIR) {
            return Err(VcsError::invalid_path(shown, "inside the repository directory"));
        }

        let mut parts = Vec::new();
        for component in relative.components() {
            match component {
                Component::Normal(part) => parts.push(
                    part.to_str()
                        .ok_or_else(|| VcsError::invalid_path(shown, "path is not valid UTF-8"))?,
                ),
                _ => return Err(VcsError::invalid_path(shown, "unsupported path component")),
            }
        }
        Ok(parts.join("/"))
    }

    /// Record the staged files as a new commit
    ///
    /// Stores the tree, stores the commit with the old HEAD as parent, moves
    /// HEAD and finally clears the index.
    ///
    /// # Errors
    ///
    /// [`VcsError::EmptyIndex`] when nothing is staged; nothing is written.
    #[instrument(skip(self, message))]
    pub async fn commit(&self, message: &str, author: &str) -> VcsResult<(Oid, Commit)> {
        let _lock = self.lock()?;

        let entries = self.index.read_all().await?;
        let (tree_oid, tree_payload) = build_tree(&Tree::from_entries(entries))?;
        self.odb.write_built(tree_oid, ObjectType::Tree, &tree_payload).await?;
        let parent = self.head.get().await?;

        let (oid, payload) = build_commit(tree_oid, parent, author, message)?;
        self.odb.write_built(oid, ObjectType::Commit, &payload).await?;
        let commit = Commit::deserialize(&payload)?;

        self.head.set(&oid).await?;
        self.index.clear().await?;

        info!(commit = %oid, tree = %tree_oid, "Created commit");
        Ok((oid, commit))
    }

    /// Tree of the HEAD commit, empty before the first commit
    pub async fn head_tree(&self) -> VcsResult<Tree> {
        match self.head.get().await? {
            Some(oid) => {
                let commit = Commit::read(&self.odb, &oid).await?;
                Tree::read(&self.odb, &commit.tree).await
            }
            None => Ok(Tree::new()),
        }
    }

    /// Find the single local commit whose id starts with `prefix`
    ///
    /// Matching is case-insensitive. Blobs and trees sharing the prefix are
    /// ignored.
    pub async fn resolve_prefix(&self, prefix: &str) -> VcsResult<Oid> {
        let prefix = prefix.trim();
        if prefix.is_empty()
            || prefix.len() > OID_HEX_LEN
            || !prefix.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(VcsError::CommitNotFound(prefix.to_string()));
        }

        let mut candidates = Vec::new();
        for oid in self.odb.list().await? {
            if !oid.matches_prefix(prefix) {
                continue;
            }
            let (obj_type, _) = self.odb.read(&oid).await?;
            if obj_type == ObjectType::Commit {
                candidates.push(oid);
            }
        }

        match candidates.len() {
            0 => Err(VcsError::CommitNotFound(prefix.to_string())),
            1 => Ok(candidates[0]),
            _ => Err(VcsError::AmbiguousHash {
                prefix: prefix.to_string(),
                candidates,
            }),
        }
    }

    /// Restore the working tree to a previous commit and move HEAD there
    ///
    /// Tracked files absent from the target are deleted, every file of the
    /// target is rewritten. Untracked files are left alone.
    #[instrument(skip(self))]
    pub async fn revert(&self, prefix: &str) -> VcsResult<(Oid, CheckoutReport)> {
        let _lock = self.lock()?;

        let target = self.resolve_prefix(prefix).await?;
        let commit = Commit::read(&self.odb, &target).await?;
        let target_tree = Tree::read(&self.odb, &commit.tree).await?;
        let current_tree = self.head_tree().await?;

        let report = CheckoutManager::new(&self.odb, &self.root)
            .apply(&current_tree, &target_tree)
            .await?;
        self.head.set(&target).await?;

        info!(commit = %target, "Reverted working tree");
        Ok((target, report))
    }

    /// History from HEAD
    pub async fn log(&self) -> VcsResult<History<'_>> {
        Ok(History::new(&self.odb, self.head.get().await?))
    }

    /// Upload HEAD and everything it references to `remote`
    pub async fn push(
        &self,
        remote: Arc<dyn StorageBackend>,
        progress: impl FnMut(SyncEvent<'_>),
    ) -> VcsResult<PushReport> {
        let head = self.head.get().await?;
        SyncEngine::new(&self.odb, remote).push(head, progress).await
    }

    /// Fetch the remote HEAD, check out its tree and move local HEAD there
    #[instrument(skip(self, remote, progress))]
    pub async fn pull(
        &self,
        remote: Arc<dyn StorageBackend>,
        mut progress: impl FnMut(SyncEvent<'_>),
    ) -> VcsResult<PullReport> {
        let _lock = self.lock()?;
        let engine = SyncEngine::new(&self.odb, remote);

        let head = engine.remote_head().await?;
        progress(SyncEvent::RemoteHead(&head));

        let fetched = engine.fetch(head, &mut progress).await?;

        let commit = Commit::read(&self.odb, &head).await?;
        let target_tree = Tree::read(&self.odb, &commit.tree).await?;
        let current_tree = self.head_tree().await?;

        let checkout = CheckoutManager::new(&self.odb, &self.root)
            .apply(&current_tree, &target_tree)
            .await?;
        self.head.set(&head).await?;

        info!(head = %head, fetched = fetched.len(), "Pull complete");
        Ok(PullReport {
            head,
            fetched,
            checkout,
        })
    }
}

/// Storage settings for the remote named in `config`
pub fn remote_config(config: &RepoConfig) -> S3Config {
    S3Config {
        bucket: config.remote_bucket.clone(),
        region: Some(config.region.clone()),
        endpoint: config.endpoint.clone(),
    }
}

/// Open and verify the remote named in `config`
///
/// # Errors
///
/// [`VcsError::BucketUnreachable`] if the bucket (or directory) is missing
/// and [`VcsError::AccessDenied`] if the credentials are rejected.
pub async fn connect_remote(config: &RepoConfig) -> VcsResult<Arc<dyn StorageBackend>> {
    open_remote(remote_config(config))
        .await
        .map_err(|e| remote_error(&config.remote_bucket, e))
}

fn remote_error(bucket: &str, error: StorageError) -> VcsError {
    if error.is_bucket_not_found() {
        VcsError::BucketUnreachable(bucket.to_string())
    } else if error.is_permission_denied() {
        VcsError::AccessDenied(bucket.to_string())
    } else {
        VcsError::Storage(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::INDEX_KEY;
    use tempfile::TempDir;
    use termigit_storage::MockBackend;

    async fn new_repo() -> (TempDir, Repository) {
        let temp = TempDir::new().unwrap();
        let repo = Repository::init(temp.path(), &RepoConfig::new("test-bucket"))
            .await
            .unwrap();
        (temp, repo)
    }

    async fn write_and_add(repo: &Repository, path: &str, content: &[u8]) -> Oid {
        let full = repo.root().join(path);
        std::fs::create_dir_all(full.parent().unwrap()).unwrap();
        std::fs::write(&full, content).unwrap();
        repo.add(Path::new(path)).await.unwrap().1
    }

    #[tokio::test]
    async fn test_init_layout() {
        let (temp, repo) = new_repo().await;

        assert!(temp.path().join(".termi-git/objects").is_dir());
        assert!(temp.path().join(".termi-git/config.json").is_file());
        assert_eq!(repo.config().await.unwrap().remote_bucket, "test-bucket");
        assert_eq!(repo.head().get().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_init_twice() {
        let (temp, _repo) = new_repo().await;
        let err = Repository::init(temp.path(), &RepoConfig::new("test-bucket"))
            .await
            .unwrap_err();
        assert!(matches!(err, VcsError::AlreadyInitialized(_)));
    }

    #[tokio::test]
    async fn test_discover_from_subdirectory() {
        let (temp, repo) = new_repo().await;
        let nested = temp.path().join("a/b");
        std::fs::create_dir_all(&nested).unwrap();

        let found = Repository::discover(&nested).await.unwrap();
        assert_eq!(found.root(), repo.root());
    }

    #[tokio::test]
    async fn test_discover_outside_repository() {
        let temp = TempDir::new().unwrap();
        let err = Repository::discover(temp.path()).await.unwrap_err();
        assert!(err.is_not_a_repository());
    }

    #[tokio::test]
    async fn test_init_add_commit_scenario() {
        let (temp, repo) = new_repo().await;
        std::fs::write(temp.path().join("hello.txt"), b"hello").unwrap();

        let (path, blob) = repo.add(Path::new("hello.txt")).await.unwrap();
        assert_eq!(path, "hello.txt");
        assert_eq!(blob, Oid::for_object(ObjectType::Blob, b"hello"));
        assert_eq!(repo.index().entries().await.unwrap()["hello.txt"], blob);

        let (oid, commit) = repo.commit("first", "alice").await.unwrap();
        assert_eq!(repo.head().get().await.unwrap(), Some(oid));
        assert!(commit.is_initial());
        assert!(!temp.path().join(".termi-git").join(INDEX_KEY).exists());

        let tree = repo.head_tree().await.unwrap();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.get("hello.txt"), Some(&blob));
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let (_temp, repo) = new_repo().await;
        let first = write_and_add(&repo, "a.txt", b"same").await;
        let before = repo.odb().list().await.unwrap();

        let second = repo.add(Path::new("a.txt")).await.unwrap().1;
        assert_eq!(first, second);
        assert_eq!(repo.odb().list().await.unwrap(), before);
        assert_eq!(repo.index().entries().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_add_nested_path_uses_forward_slashes() {
        let (_temp, repo) = new_repo().await;
        write_and_add(&repo, "dir/sub/file.txt", b"x").await;
        assert!(repo
            .index()
            .entries()
            .await
            .unwrap()
            .contains_key("dir/sub/file.txt"));
    }

    #[tokio::test]
    async fn test_add_missing_file() {
        let (_temp, repo) = new_repo().await;
        let err = repo.add(Path::new("nope.txt")).await.unwrap_err();
        assert!(matches!(err, VcsError::FileNotFound(_)));
    }

    #[tokio::test]
    async fn test_add_rejects_outside_and_internal_paths() {
        let (_temp, repo) = new_repo().await;
        let outside = TempDir::new().unwrap();
        let stray = outside.path().join("stray.txt");
        std::fs::write(&stray, b"x").unwrap();

        assert!(matches!(
            repo.add(&stray).await,
            Err(VcsError::InvalidPath { .. })
        ));
        assert!(matches!(
            repo.add(Path::new(".termi-git/config.json")).await,
            Err(VcsError::InvalidPath { .. })
        ));
        assert!(matches!(
            repo.add(Path::new(".termi-git")).await,
            Err(VcsError::InvalidPath { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_commit_writes_nothing() {
        let (temp, repo) = new_repo().await;
        write_and_add(&repo, "a.txt", b"a").await;
        let (first, _) = repo.commit("first", "alice").await.unwrap();
        let objects = repo.odb().list().await.unwrap();

        let err = repo.commit("again", "alice").await.unwrap_err();
        assert!(err.is_empty_index());
        assert_eq!(repo.odb().list().await.unwrap(), objects);
        assert_eq!(repo.head().get().await.unwrap(), Some(first));
        assert!(!temp.path().join(".termi-git/termi-git.lock").exists());
    }

    #[tokio::test]
    async fn test_commit_chain() {
        let (_temp, repo) = new_repo().await;
        write_and_add(&repo, "a.txt", b"1").await;
        let (first, _) = repo.commit("one", "alice").await.unwrap();
        write_and_add(&repo, "a.txt", b"2").await;
        let (second, commit) = repo.commit("two", "alice").await.unwrap();

        assert_eq!(commit.parent, Some(first));
        let entries = repo.log().await.unwrap().collect().await.unwrap();
        assert_eq!(
            entries.iter().map(|e| e.hash).collect::<Vec<_>>(),
            vec![second, first]
        );
    }

    #[tokio::test]
    async fn test_commit_ids_match_built_payloads() {
        let (_temp, repo) = new_repo().await;
        write_and_add(&repo, "a.txt", b"1").await;
        let (oid, commit) = repo.commit("one", "alice").await.unwrap();

        assert_eq!(commit.encode().unwrap().0, oid);
        let (_, payload) = repo.odb().read(&oid).await.unwrap();
        assert_eq!(payload, commit.serialize().unwrap());

        let (tree_oid, _) = build_tree(&repo.head_tree().await.unwrap()).unwrap();
        assert_eq!(tree_oid, commit.tree);
    }

    #[tokio::test]
    async fn test_commit_only_includes_staged_files() {
        let (_temp, repo) = new_repo().await;
        write_and_add(&repo, "a.txt", b"a").await;
        repo.commit("one", "alice").await.unwrap();
        write_and_add(&repo, "b.txt", b"b").await;
        repo.commit("two", "alice").await.unwrap();

        let tree = repo.head_tree().await.unwrap();
        assert!(tree.contains("b.txt"));
        assert!(!tree.contains("a.txt"));
    }

    #[tokio::test]
    async fn test_locked_repository_rejects_mutation() {
        let (_temp, repo) = new_repo().await;
        write_and_add(&repo, "a.txt", b"a").await;

        let _held = repo.lock().unwrap();
        let err = repo.commit("blocked", "alice").await.unwrap_err();
        assert!(matches!(err, VcsError::RepositoryLocked { .. }));
    }

    #[tokio::test]
    async fn test_resolve_prefix() {
        let (_temp, repo) = new_repo().await;
        write_and_add(&repo, "a.txt", b"a").await;
        let (oid, _) = repo.commit("one", "alice").await.unwrap();

        assert_eq!(repo.resolve_prefix(&oid.short()).await.unwrap(), oid);
        assert_eq!(
            repo.resolve_prefix(&oid.to_hex().to_uppercase()).await.unwrap(),
            oid
        );
        for bad in ["", "xyz", "zzzzzzz"] {
            assert!(matches!(
                repo.resolve_prefix(bad).await,
                Err(VcsError::CommitNotFound(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_resolve_prefix_ignores_non_commits() {
        let (_temp, repo) = new_repo().await;
        let blob = write_and_add(&repo, "a.txt", b"a").await;

        let err = repo.resolve_prefix(&blob.to_hex()).await.unwrap_err();
        assert!(matches!(err, VcsError::CommitNotFound(_)));
    }

    #[tokio::test]
    async fn test_resolve_prefix_ambiguous() {
        let (_temp, repo) = new_repo().await;
        let mut commits = Vec::new();
        for i in 0..40 {
            write_and_add(&repo, "a.txt", format!("{i}").as_bytes()).await;
            commits.push(repo.commit("c", "alice").await.unwrap().0);
        }

        // With 40 commits at least two share a first hex digit
        let digit = (0..16)
            .map(|d| format!("{:x}", d))
            .find(|d| commits.iter().filter(|c| c.to_hex().starts_with(d.as_str())).count() > 1)
            .unwrap();

        match repo.resolve_prefix(&digit).await {
            Err(VcsError::AmbiguousHash { candidates, .. }) => assert!(candidates.len() > 1),
            other => panic!("expected ambiguity, got {:?}", other.map(|o| o.to_hex())),
        }
    }

    #[tokio::test]
    async fn test_revert_reconciliation() {
        let (temp, repo) = new_repo().await;
        write_and_add(&repo, "x", b"x").await;
        write_and_add(&repo, "y", b"y").await;
        let (commit_a, _) = repo.commit("A", "alice").await.unwrap();

        std::fs::remove_file(temp.path().join("x")).unwrap();
        write_and_add(&repo, "y", b"y").await;
        write_and_add(&repo, "z", b"z").await;
        repo.commit("B", "alice").await.unwrap();

        std::fs::write(temp.path().join("untracked.txt"), b"keep").unwrap();

        let (reverted, report) = repo.revert(&commit_a.short()).await.unwrap();
        assert_eq!(reverted, commit_a);
        assert_eq!(report.removed, vec!["z".to_string()]);
        assert!(!temp.path().join("z").exists());
        assert_eq!(std::fs::read(temp.path().join("x")).unwrap(), b"x");
        assert_eq!(std::fs::read(temp.path().join("y")).unwrap(), b"y");
        assert!(temp.path().join("untracked.txt").exists());
        assert_eq!(repo.head().get().await.unwrap(), Some(commit_a));
    }

    #[tokio::test]
    async fn test_revert_to_head_is_noop() {
        let (temp, repo) = new_repo().await;
        write_and_add(&repo, "a.txt", b"a").await;
        let (head, _) = repo.commit("A", "alice").await.unwrap();

        let (reverted, report) = repo.revert(&head.to_hex()).await.unwrap();
        assert_eq!(reverted, head);
        assert!(report.removed.is_empty());
        assert_eq!(std::fs::read(temp.path().join("a.txt")).unwrap(), b"a");
    }

    #[tokio::test]
    async fn test_push_pull_roundtrip() {
        let (_origin_dir, origin) = new_repo().await;
        write_and_add(&origin, "a.txt", b"A").await;
        write_and_add(&origin, "docs/b.txt", b"B").await;
        let (head, _) = origin.commit("first", "alice").await.unwrap();

        let remote = MockBackend::new();
        origin.push(Arc::new(remote.clone()), |_| {}).await.unwrap();

        let (clone_dir, clone) = new_repo().await;
        let mut remote_head = None;
        let report = clone
            .pull(Arc::new(remote), |e| {
                if let SyncEvent::RemoteHead(oid) = e {
                    remote_head = Some(*oid)
                }
            })
            .await
            .unwrap();

        assert_eq!(remote_head, Some(head));
        assert_eq!(report.head, head);
        assert_eq!(clone.head().get().await.unwrap(), Some(head));
        assert_eq!(std::fs::read(clone_dir.path().join("a.txt")).unwrap(), b"A");
        assert_eq!(std::fs::read(clone_dir.path().join("docs/b.txt")).unwrap(), b"B");
    }

    #[tokio::test]
    async fn test_pull_removes_files_missing_from_remote() {
        let (_origin_dir, origin) = new_repo().await;
        write_and_add(&origin, "shared.txt", b"remote").await;
        origin.commit("remote", "alice").await.unwrap();
        let remote = MockBackend::new();
        origin.push(Arc::new(remote.clone()), |_| {}).await.unwrap();

        let (local_dir, local) = new_repo().await;
        write_and_add(&local, "local-only.txt", b"mine").await;
        write_and_add(&local, "shared.txt", b"local").await;
        local.commit("local", "bob").await.unwrap();

        let report = local.pull(Arc::new(remote), |_| {}).await.unwrap();
        assert_eq!(report.checkout.removed, vec!["local-only.txt".to_string()]);
        assert!(!local_dir.path().join("local-only.txt").exists());
        assert_eq!(
            std::fs::read(local_dir.path().join("shared.txt")).unwrap(),
            b"remote"
        );
    }

    #[tokio::test]
    async fn test_pull_from_empty_remote() {
        let (_temp, repo) = new_repo().await;
        let err = repo
            .pull(Arc::new(MockBackend::new()), |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, VcsError::RemoteEmpty));
        assert!(!repo.repo_dir().join("termi-git.lock").exists());
    }

    #[tokio::test]
    async fn test_connect_missing_directory_remote() {
        let temp = TempDir::new().unwrap();
        let bucket = format!("file://{}", temp.path().join("missing").display());

        let err = connect_remote(&RepoConfig::new(bucket.clone()))
            .await
            .unwrap_err();
        match err {
            VcsError::BucketUnreachable(b) => assert_eq!(b, bucket),
            other => panic!("unexpected error: {other}"),
        }
    }
}
