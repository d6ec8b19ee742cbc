// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

use assert_cmd::Command;

/// Command with an isolated config dir and no nimbus env leakage
pub fn nimbus(config_dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("nimbus").expect("binary builds");
    cmd.env_remove("NIMBUS_PROFILE")
        .env_remove("NIMBUS_REGION")
        .env_remove("NIMBUS_ENDPOINT_URL")
        .env_remove("NIMBUS_OUTPUT")
        .env_remove("NIMBUS_TOKEN")
        .env_remove("NIMBUS_TLS_INSECURE")
        .env("NIMBUS_CONFIG_DIR", config_dir.path());
    cmd
}
