// SPDX-License-Identifier: AGPL-3.0-only
// Copyright (C) 2025 TermiGit Contributors

//! CLI Add and Commit Command Tests
//!
//! Run: `cargo test --test cli_add_commit_test`

mod common;

use common::*;
use predicates::prelude::*;
use std::fs;

#[test]
fn test_add_stages_file() {
    let (_remote, repo) = repo_with_remote();
    repo.write_file("a.txt", b"hello");

    repo.cmd()
        .args(["add", "a.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added 'a.txt' to the staging area."));

    let index = fs::read_to_string(repo.repo_dir().join("index.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&index).unwrap();
    assert!(json["a.txt"].is_string());
    assert_eq!(json["a.txt"].as_str().unwrap().len(), 64);
}

#[test]
fn test_add_missing_file_fails() {
    let (_remote, repo) = repo_with_remote();

    repo.cmd()
        .args(["add", "missing.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found at 'missing.txt'"));

    assert!(!repo.repo_dir().join("index.json").exists());
}

#[test]
fn test_add_nested_path_uses_forward_slashes() {
    let (_remote, repo) = repo_with_remote();
    repo.write_file("docs/guide/intro.md", b"# Intro");

    repo.cmd().args(["add", "docs/guide/intro.md"]).assert().success();

    let index = fs::read_to_string(repo.repo_dir().join("index.json")).unwrap();
    assert!(index.contains("\"docs/guide/intro.md\""));
}

#[test]
fn test_add_from_subdirectory() {
    let (_remote, repo) = repo_with_remote();
    repo.write_file("sub/file.txt", b"data");

    repo.cmd()
        .current_dir(repo.path().join("sub"))
        .args(["add", "file.txt"])
        .assert()
        .success();

    let index = fs::read_to_string(repo.repo_dir().join("index.json")).unwrap();
    assert!(index.contains("\"sub/file.txt\""));
}

#[test]
fn test_commit_prints_short_hash_and_clears_index() {
    let (_remote, repo) = repo_with_remote();
    repo.write_file("a.txt", b"hello");
    repo.add("a.txt");

    let assert = repo
        .cmd()
        .args(["commit", "first commit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Committed successfully!"));

    let head = repo.head().expect("HEAD written");
    assert_eq!(head.len(), 64);
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains(&format!("[{}] first commit", short(&head))));

    assert!(!repo.repo_dir().join("index.json").exists());
}

#[test]
fn test_commit_with_empty_index() {
    let (_remote, repo) = repo_with_remote();

    repo.cmd()
        .args(["commit", "nothing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to commit, staging area is empty."));

    assert_eq!(repo.head(), None);
}

#[test]
fn test_second_commit_chains_to_first() {
    let (_remote, repo) = repo_with_remote();
    repo.add_and_commit("a.txt", b"1", "one");
    let first = repo.head().unwrap();

    repo.add_and_commit("b.txt", b"2", "two");
    let second = repo.head().unwrap();
    assert_ne!(first, second);

    repo.cmd()
        .args(["log", "--oneline"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("{} two", short(&second))))
        .stdout(predicate::str::contains(format!("{} one", short(&first))));
}

#[test]
fn test_commit_requires_message() {
    let (_remote, repo) = repo_with_remote();
    repo.cmd().arg("commit").assert().failure();
}

#[test]
fn test_quiet_suppresses_output() {
    let (_remote, repo) = repo_with_remote();
    repo.write_file("a.txt", b"x");

    repo.cmd()
        .args(["-q", "add", "a.txt"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}
