// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! Configuration management

pub mod paths;
pub mod profile;

pub use profile::{Config, Profile};

use anyhow::Result;

/// Build an "env" profile from environment variables
pub fn env_profile() -> Result<Profile> {
    let mut profile = Profile::new("env");
    profile.region = std::env::var("NIMBUS_REGION").ok();
    profile.endpoint_url = std::env::var("NIMBUS_ENDPOINT_URL").ok();
    profile.token = std::env::var("NIMBUS_TOKEN").ok();

    if profile.region.is_none() && profile.endpoint_url.is_none() {
        anyhow::bail!("NIMBUS_REGION or NIMBUS_ENDPOINT_URL must be set");
    }

    if let Ok(insecure) = std::env::var("NIMBUS_TLS_INSECURE") {
        profile.insecure = insecure == "1" || insecure.to_lowercase() == "true";
    }

    Ok(profile)
}

/// Resolve which profile to use, if any.
///
/// Priority:
/// 1. CLI --profile argument
/// 2. NIMBUS_PROFILE environment variable
/// 3. "env" if NIMBUS_REGION/NIMBUS_ENDPOINT_URL is set
/// 4. Current profile from config.json
///
/// Unlike profile lookup failures, having no profile at all is not an
/// error: --region/--endpoint-url can carry a command on their own.
pub fn resolve_profile(cli_profile: Option<&str>) -> Result<Option<Profile>> {
    if let Some(name) = cli_profile {
        if name == "env" {
            return env_profile().map(Some);
        }
        return Profile::load(name).map(Some);
    }

    if let Ok(name) = std::env::var("NIMBUS_PROFILE") {
        if name == "env" {
            return env_profile().map(Some);
        }
        return Profile::load(&name).map(Some);
    }

    if std::env::var("NIMBUS_REGION").is_ok() || std::env::var("NIMBUS_ENDPOINT_URL").is_ok() {
        return env_profile().map(Some);
    }

    let config = Config::load()?;
    if let Some(name) = config.current_profile() {
        return Profile::load(name).map(Some);
    }

    Ok(None)
}
