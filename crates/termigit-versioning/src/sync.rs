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

//! Push and pull against a remote object store
//!
//! A remote is any [`StorageBackend`] laid out like the local repository
//! directory: `objects/<hex>` holding encoded objects and `HEAD` holding the
//! hex id of the latest pushed commit.
//!
//! Push walks the closure of the local HEAD (commits on the parent chain with
//! their trees and blobs, down to the first commit the remote already has),
//! uploads whatever the remote is missing and writes the remote HEAD last. A push that fails partway leaves extra
//! objects behind but never a HEAD pointing at missing data.
//!
//! Fetch walks only the remote HEAD commit, its tree and the tree's blobs.
//! Every downloaded object is hash-verified before it is stored locally.

use crate::commit::Commit;
use crate::error::{VcsError, VcsResult};
use crate::head::Head;
use crate::object::{self, ObjectType};
use crate::odb::{object_key, ObjectDatabase};
use crate::oid::Oid;
use crate::tree::Tree;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use termigit_storage::StorageBackend;
use tracing::{debug, info};

/// Progress notifications emitted while syncing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEvent<'a> {
    /// Pull resolved the remote HEAD
    RemoteHead(&'a Oid),
    /// Push computed the closure of HEAD
    ObjectsFound(usize),
    /// Push stored an object on the remote
    Uploaded(&'a Oid),
    /// Fetch is downloading an object
    Fetching(&'a Oid),
}

/// Outcome of a push
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushReport {
    /// Commit the remote HEAD now points at
    pub head: Oid,
    /// Size of the closure of HEAD
    pub objects: usize,
    /// Objects actually uploaded
    pub uploaded: usize,
    /// Remote HEAD already matched, nothing was sent
    pub up_to_date: bool,
}

/// Moves objects between a local object database and a remote store
#[derive(Debug)]
pub struct SyncEngine<'a> {
    local: &'a ObjectDatabase,
    remote: ObjectDatabase,
    remote_head: Head,
}

impl<'a> SyncEngine<'a> {
    /// Engine syncing `local` with `remote`
    pub fn new(local: &'a ObjectDatabase, remote: Arc<dyn StorageBackend>) -> Self {
        Self {
            local,
            remote: ObjectDatabase::new(Arc::clone(&remote)),
            remote_head: Head::new(remote),
        }
    }

    /// Commit the remote HEAD points at
    ///
    /// # Errors
    ///
    /// [`VcsError::RemoteEmpty`] if nothing was ever pushed.
    pub async fn remote_head(&self) -> VcsResult<Oid> {
        self.remote_head.get().await?.ok_or(VcsError::RemoteEmpty)
    }

    /// Objects reachable from `head` that the remote may still need
    ///
    /// Follows the parent chain until it reaches a commit the remote already
    /// stores. The remote HEAD is only ever written after a full upload, so
    /// such a commit has its whole history on the remote already. This also
    /// lets a repository that pulled only the latest commit push on top of
    /// it. Each object appears once, in discovery order starting with `head`.
    ///
    /// # Errors
    ///
    /// [`VcsError::ObjectNotFound`] if a commit is missing both locally and
    /// on the remote.
    pub async fn closure(&self, head: Oid) -> VcsResult<Vec<Oid>> {
        let mut visited = HashSet::new();
        let mut order = Vec::new();
        let mut worklist = VecDeque::from([(head, ObjectType::Commit)]);

        while let Some((oid, expected)) = worklist.pop_front() {
            if !visited.insert(oid) {
                continue;
            }
            order.push(oid);

            match expected {
                ObjectType::Commit => {
                    let commit = Commit::read(self.local, &oid).await?;
                    worklist.push_back((commit.tree, ObjectType::Tree));
                    if let Some(parent) = commit.parent {
                        if self.remote.exists(&parent).await? {
                            debug!(commit = %parent, "Remote already has parent history");
                        } else {
                            worklist.push_back((parent, ObjectType::Commit));
                        }
                    }
                }
                ObjectType::Tree => {
                    let tree = Tree::read(self.local, &oid).await?;
                    worklist.extend(tree.blob_ids().map(|b| (*b, ObjectType::Blob)));
                }
                ObjectType::Blob => {
                    if !self.local.exists(&oid).await? {
                        return Err(VcsError::ObjectNotFound(oid));
                    }
                }
            }
        }

        Ok(order)
    }

    /// Upload the closure of `head` and then move the remote HEAD
    ///
    /// # Errors
    ///
    /// [`VcsError::NothingToPush`] when `head` is `None`.
    pub async fn push(
        &self,
        head: Option<Oid>,
        mut progress: impl FnMut(SyncEvent<'_>),
    ) -> VcsResult<PushReport> {
        let head = head.ok_or(VcsError::NothingToPush)?;

        if self.remote_head.get().await? == Some(head) {
            info!(head = %head, "Remote already at local HEAD");
            return Ok(PushReport {
                head,
                objects: 0,
                uploaded: 0,
                up_to_date: true,
            });
        }

        let objects = self.closure(head).await?;
        progress(SyncEvent::ObjectsFound(objects.len()));

        let mut uploaded = 0;
        for oid in &objects {
            if self.remote.exists(oid).await? {
                debug!(oid = %oid, "Remote already has object");
                continue;
            }
            let data = self.local.read_raw(oid).await?;
            self.remote.write_raw(oid, &data).await?;
            uploaded += 1;
            progress(SyncEvent::Uploaded(oid));
        }

        self.remote_head.set(&head).await?;
        info!(head = %head, objects = objects.len(), uploaded, "Push complete");

        Ok(PushReport {
            head,
            objects: objects.len(),
            uploaded,
            up_to_date: false,
        })
    }

    /// Download `head`, its tree and the tree's blobs into the local store
    ///
    /// Objects already present locally are not downloaded again. Returns the
    /// ids that were downloaded.
    ///
    /// # Errors
    ///
    /// [`VcsError::NoSuchRemoteKey`] if the remote lacks a referenced object.
    pub async fn fetch(
        &self,
        head: Oid,
        mut progress: impl FnMut(SyncEvent<'_>),
    ) -> VcsResult<Vec<Oid>> {
        let mut visited = HashSet::new();
        let mut fetched = Vec::new();
        let mut worklist = VecDeque::from([(head, ObjectType::Commit)]);

        while let Some((oid, expected)) = worklist.pop_front() {
            if !visited.insert(oid) {
                continue;
            }

            let payload = if self.local.exists(&oid).await? {
                if expected == ObjectType::Blob {
                    continue;
                }
                self.local.read_typed(&oid, expected).await?
            } else {
                progress(SyncEvent::Fetching(&oid));
                let data = match self.remote.read_raw(&oid).await {
                    Ok(data) => data,
                    Err(VcsError::ObjectNotFound(_)) => {
                        return Err(VcsError::NoSuchRemoteKey(object_key(&oid)));
                    }
                    Err(e) => return Err(e),
                };

                let (actual, payload) = object::decode(&data)?;
                if actual != expected {
                    return Err(VcsError::ObjectTypeMismatch {
                        oid,
                        expected,
                        actual,
                    });
                }
                let payload = payload.to_vec();

                self.local.write_raw(&oid, &data).await?;
                fetched.push(oid);
                payload
            };

            match expected {
                ObjectType::Commit => {
                    let commit = Commit::deserialize(&payload)?;
                    worklist.push_back((commit.tree, ObjectType::Tree));
                }
                ObjectType::Tree => {
                    let tree = Tree::deserialize(&payload)?;
                    worklist.extend(tree.blob_ids().map(|b| (*b, ObjectType::Blob)));
                }
                ObjectType::Blob => {}
            }
        }

        info!(head = %head, fetched = fetched.len(), "Fetch complete");
        Ok(fetched)
    }
}
