// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! Argument validation behavior: every case here must fail before any
//! network traffic, exit 252, and print a single error line to stderr.

mod common;

use common::nimbus;
use predicates::prelude::*;

#[test]
fn launch_missing_required_reports_all_sorted() {
    let dir = tempfile::tempdir().unwrap();
    nimbus(&dir)
        .args(["instance", "launch"])
        .assert()
        .failure()
        .code(252)
        .stderr(predicate::str::contains(
            "missing required parameters for instance.launch: image, package",
        ));
}

#[test]
fn launch_clone_from_conflicts_with_image() {
    let dir = tempfile::tempdir().unwrap();
    nimbus(&dir)
        .args(["instance", "launch", "--clone-from", "i-1", "--image", "base-64"])
        .assert()
        .failure()
        .code(252)
        .stderr(predicate::str::contains(
            "options --clone-from and --image cannot be used together",
        ));
}

#[test]
fn launch_count_out_of_range() {
    let dir = tempfile::tempdir().unwrap();
    nimbus(&dir)
        .args(["instance", "launch", "--image", "i", "--package", "p", "--count", "0"])
        .assert()
        .failure()
        .code(252)
        .stderr(predicate::str::contains(
            "invalid value for --count: 0 is below the minimum of 1",
        ));
}

#[test]
fn launch_rejects_bad_metadata_json() {
    let dir = tempfile::tempdir().unwrap();
    nimbus(&dir)
        .args(["instance", "launch", "--image", "i", "--package", "p", "--metadata", "{nope"])
        .assert()
        .failure()
        .code(252)
        .stderr(predicate::str::contains("not valid JSON"));
}

#[test]
fn launch_rejects_malformed_tag() {
    let dir = tempfile::tempdir().unwrap();
    nimbus(&dir)
        .args(["instance", "launch", "--image", "i", "--package", "p", "--tag", "oops"])
        .assert()
        .failure()
        .code(252)
        .stderr(predicate::str::contains("'oops' is not a KEY=VALUE pair"));
}

#[test]
fn terminate_requires_ids_even_with_force() {
    let dir = tempfile::tempdir().unwrap();
    nimbus(&dir)
        .args(["instance", "terminate", "--force"])
        .assert()
        .failure()
        .code(252)
        .stderr(predicate::str::contains("ids"));
}

#[test]
fn wait_requires_instance_id() {
    let dir = tempfile::tempdir().unwrap();
    nimbus(&dir)
        .args(["instance", "wait"])
        .assert()
        .failure()
        .code(252)
        .stderr(predicate::str::contains(
            "missing required parameters for instance.wait: id",
        ));
}

#[test]
fn instance_list_rejects_unknown_state() {
    let dir = tempfile::tempdir().unwrap();
    nimbus(&dir)
        .args(["instance", "list", "--state", "flying"])
        .assert()
        .failure()
        .code(252)
        .stderr(predicate::str::contains("'flying' is not one of"));
}

#[test]
fn tag_delete_requires_keys_or_all() {
    let dir = tempfile::tempdir().unwrap();
    nimbus(&dir)
        .args(["tag", "delete", "--instance", "i-1"])
        .assert()
        .failure()
        .code(252)
        .stderr(predicate::str::contains("keys (or --all)"));
}

#[test]
fn tag_delete_all_conflicts_with_keys() {
    let dir = tempfile::tempdir().unwrap();
    nimbus(&dir)
        .args(["tag", "delete", "--instance", "i-1", "--all", "env"])
        .assert()
        .failure()
        .code(252)
        .stderr(predicate::str::contains(
            "invalid value for --all: cannot be combined with explicit KEY arguments",
        ));
}

#[test]
fn tag_set_rejects_malformed_pair() {
    let dir = tempfile::tempdir().unwrap();
    nimbus(&dir)
        .args(["tag", "set", "--instance", "i-1", "oops"])
        .assert()
        .failure()
        .code(252)
        .stderr(predicate::str::contains("'oops' is not a KEY=VALUE pair"));
}

#[test]
fn bogus_output_format_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    nimbus(&dir)
        .args(["--output", "xml", "instance", "list"])
        .assert()
        .failure()
        .code(252)
        .stderr(predicate::str::contains(
            "expected one of json, yaml, table, text",
        ));
}

#[test]
fn bogus_page_size_is_usage_error() {
    let dir = tempfile::tempdir().unwrap();
    nimbus(&dir)
        .args(["--page-size", "lots", "instance", "list"])
        .assert()
        .failure()
        .code(252)
        .stderr(predicate::str::contains("'lots' is not a positive integer"));
}

#[test]
fn profile_create_requires_region_or_endpoint() {
    let dir = tempfile::tempdir().unwrap();
    nimbus(&dir)
        .args(["profile", "create", "dev"])
        .assert()
        .failure()
        .code(252)
        .stderr(predicate::str::contains(
            "missing required parameters for profile.create: endpoint-url, region",
        ));
}

#[test]
fn key_delete_requires_names() {
    let dir = tempfile::tempdir().unwrap();
    nimbus(&dir)
        .args(["key", "delete", "--force"])
        .assert()
        .failure()
        .code(252)
        .stderr(predicate::str::contains("names"));
}
