// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! Image types

use super::common::Timestamp;
use serde::{Deserialize, Serialize};

/// Image lifecycle state
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ImageState {
    Creating,
    Active,
    Unactivated,
    Disabled,
    Failed,
}

/// A machine image
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    /// Image ID
    pub id: String,
    /// Image name
    pub name: String,
    /// Image version string
    pub version: String,
    /// Operating system family
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    /// Image type (e.g. "zone-dataset", "zvol")
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    /// Current lifecycle state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ImageState>,
    /// Publication timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Timestamp>,
}
