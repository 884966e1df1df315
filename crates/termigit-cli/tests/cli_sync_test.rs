// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2025 TermiGit Contributors

//! CLI Push and Pull Tests against a `file://` remote
//!
//! Run: `cargo test --test cli_sync_test`

mod common;

use common::*;
use predicates::prelude::*;

#[test]
fn test_push_uploads_objects_and_head() {
    let (remote, repo) = repo_with_remote();
    repo.add_and_commit("a.txt", b"hello", "first");

    repo.cmd()
        .arg("push")
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 3 objects."))
        .stdout(predicate::str::contains("Push complete. Your remote is up-to-date."));

    assert_eq!(remote.head().map(|h| h.trim().to_string()), repo.head());
    // blob + tree + commit
    assert_eq!(remote.object_count(), 3);
}

#[test]
fn test_push_without_commits_fails() {
    let (remote, repo) = repo_with_remote();

    repo.cmd()
        .arg("push")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No commits found"));

    assert_eq!(remote.head(), None);
}

#[test]
fn test_second_push_is_up_to_date() {
    let (remote, repo) = repo_with_remote();
    repo.add_and_commit("a.txt", b"hello", "first");
    TermigitCommand::push(repo.path());
    let objects = remote.object_count();

    repo.cmd()
        .arg("push")
        .assert()
        .success()
        .stdout(predicate::str::contains("Remote HEAD already at"));
    assert_eq!(remote.object_count(), objects);
}

#[test]
fn test_push_includes_parent_history() {
    let (remote, repo) = repo_with_remote();
    repo.add_and_commit("a.txt", b"1", "one");
    repo.add_and_commit("b.txt", b"2", "two");

    TermigitCommand::push(repo.path());

    // two blobs, two trees, two commits
    assert_eq!(remote.object_count(), 6);
}

#[test]
fn test_pull_into_fresh_clone() {
    let remote = TestRemote::new();
    let alice = TestRepo::initialized(&remote);
    alice.add_and_commit("notes/todo.txt", b"ship it", "add todo");
    TermigitCommand::push(alice.path());

    let bob = TestRepo::initialized(&remote);
    let head = alice.head().unwrap();

    bob.cmd()
        .arg("pull")
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "Remote HEAD is at commit: {}",
            short(&head)
        )))
        .stdout(predicate::str::contains("Fetching object:"))
        .stdout(predicate::str::contains("Pull complete. Your local repository is up-to-date."));

    assert_eq!(bob.read_file("notes/todo.txt"), b"ship it");
    assert_eq!(bob.head(), Some(head));
}

#[test]
fn test_pull_removes_files_deleted_upstream() {
    let remote = TestRemote::new();
    let alice = TestRepo::initialized(&remote);
    alice.write_file("keep.txt", b"k");
    alice.write_file("drop.txt", b"d");
    alice.add("keep.txt");
    alice.add("drop.txt");
    alice.commit("both");
    TermigitCommand::push(alice.path());

    let bob = TestRepo::initialized(&remote);
    TermigitCommand::pull(bob.path());
    assert!(bob.file_exists("drop.txt"));

    // The next commit only contains what was staged since the last one
    alice.add("keep.txt");
    alice.commit("keep only");
    TermigitCommand::push(alice.path());

    bob.cmd()
        .arg("pull")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removing drop.txt"));

    assert!(bob.file_exists("keep.txt"));
    assert!(!bob.file_exists("drop.txt"));
}

#[test]
fn test_pull_from_empty_remote_fails() {
    let (_remote, repo) = repo_with_remote();

    repo.cmd()
        .arg("pull")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Have you pushed yet?"));
}

#[test]
fn test_pulled_history_is_truncated_in_log() {
    let remote = TestRemote::new();
    let alice = TestRepo::initialized(&remote);
    alice.add_and_commit("a.txt", b"1", "one");
    alice.add_and_commit("b.txt", b"2", "two");
    TermigitCommand::push(alice.path());

    let bob = TestRepo::initialized(&remote);
    TermigitCommand::pull(bob.path());

    bob.cmd()
        .arg("log")
        .assert()
        .success()
        .stdout(predicate::str::contains("two"))
        .stdout(predicate::str::contains("has not been pulled"));
}

#[test]
fn test_collaborator_pushes_on_top_of_pulled_history() {
    let remote = TestRemote::new();
    let alice = TestRepo::initialized(&remote);
    alice.add_and_commit("a.txt", b"1", "one");
    alice.add_and_commit("b.txt", b"2", "two");
    TermigitCommand::push(alice.path());
    let alice_head = alice.head().unwrap();

    // Bob only receives the latest commit, not "one"
    let bob = TestRepo::initialized(&remote);
    TermigitCommand::pull(bob.path());
    bob.add_and_commit("c.txt", b"3", "three");

    bob.cmd()
        .arg("push")
        .assert()
        .success()
        .stdout(predicate::str::contains("Push complete. Your remote is up-to-date."));
    let bob_head = bob.head().unwrap();
    assert_eq!(remote.head().map(|h| h.trim().to_string()), Some(bob_head.clone()));

    alice.cmd().arg("pull").assert().success();
    assert_eq!(alice.head(), Some(bob_head));
    assert_eq!(alice.read_file("c.txt"), b"3");
    // "two" tracked only b.txt; bob's commit tracks only c.txt
    assert!(!alice.file_exists("b.txt"));

    alice
        .cmd()
        .args(["log", "--oneline"])
        .assert()
        .success()
        .stdout(predicate::str::contains("three"))
        .stdout(predicate::str::contains(short(&alice_head)));
}
