// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! Smoke tests for the assembled command tree. Nothing here talks to a
//! server; these exercise help, aliases, completion, and the local
//! profile commands.

mod common;

use common::nimbus;
use predicates::prelude::*;

#[test]
fn version_flag() {
    let dir = tempfile::tempdir().unwrap();
    nimbus(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("nimbus"));
}

#[test]
fn top_level_help_lists_groups() {
    let dir = tempfile::tempdir().unwrap();
    nimbus(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("instance")
                .and(predicate::str::contains("image"))
                .and(predicate::str::contains("key"))
                .and(predicate::str::contains("tag"))
                .and(predicate::str::contains("datacenter"))
                .and(predicate::str::contains("profile")),
        );
}

#[test]
fn group_help_lists_leaves() {
    let dir = tempfile::tempdir().unwrap();
    nimbus(&dir)
        .args(["instance", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("launch")
                .and(predicate::str::contains("terminate"))
                .and(predicate::str::contains("wait")),
        );
}

#[test]
fn group_alias_resolves() {
    let dir = tempfile::tempdir().unwrap();
    nimbus(&dir)
        .args(["inst", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("launch"));

    let dir = tempfile::tempdir().unwrap();
    nimbus(&dir)
        .args(["img", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("list"));
}

#[test]
fn launch_help_includes_registered_examples() {
    let dir = tempfile::tempdir().unwrap();
    nimbus(&dir)
        .args(["instance", "launch", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("EXAMPLES:")
                .and(predicate::str::contains("nimbus instance launch --image")),
        );
}

#[test]
fn profile_set_epilog_is_registered() {
    let dir = tempfile::tempdir().unwrap();
    nimbus(&dir)
        .args(["profile", "set", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("previously active profile"));
}

#[test]
fn unknown_subcommand_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    nimbus(&dir)
        .arg("volcano")
        .assert()
        .failure()
        .stderr(predicate::str::contains("volcano"));
}

#[test]
fn completion_generates_bash_script() {
    let dir = tempfile::tempdir().unwrap();
    nimbus(&dir)
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nimbus"));
}

#[test]
fn profile_lifecycle() {
    let dir = tempfile::tempdir().unwrap();

    nimbus(&dir)
        .args(["profile", "create", "dev", "--region", "us-east-1", "--use"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created profile \"dev\""));

    nimbus(&dir)
        .args(["profile", "current"])
        .assert()
        .success()
        .stdout(predicate::str::contains("dev"));

    nimbus(&dir)
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* dev"));

    nimbus(&dir)
        .args(["profile", "create", "staging", "--endpoint-url", "https://localhost:8443"])
        .assert()
        .success();

    nimbus(&dir)
        .args(["profile", "set", "staging"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Switched to profile \"staging\""));

    // '-' switches back to the previous profile.
    nimbus(&dir)
        .args(["profile", "set", "-"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Switched to profile \"dev\""));

    nimbus(&dir)
        .args(["profile", "delete", "staging", "--force"])
        .assert()
        .success();

    nimbus(&dir)
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("staging").not());
}

#[test]
fn profile_get_renders_fields() {
    let dir = tempfile::tempdir().unwrap();
    nimbus(&dir)
        .args(["profile", "create", "dev", "--region", "eu-west-1"])
        .assert()
        .success();

    nimbus(&dir)
        .args(["--output", "json", "profile", "get", "dev"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"region\": \"eu-west-1\""));
}

#[test]
fn profile_set_unknown_profile_fails() {
    let dir = tempfile::tempdir().unwrap();
    nimbus(&dir)
        .args(["profile", "set", "nope"])
        .assert()
        .failure()
        .code(255)
        .stderr(predicate::str::contains("nimbus: error:"));
}
