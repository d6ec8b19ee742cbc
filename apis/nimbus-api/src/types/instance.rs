// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! Instance types

use std::collections::BTreeMap;

use super::common::Timestamp;
use serde::{Deserialize, Serialize};

/// Instance lifecycle state
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum InstanceState {
    Provisioning,
    Running,
    Stopping,
    Stopped,
    Deleted,
    Failed,
}

/// A compute instance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    /// Instance ID
    pub id: String,
    /// Instance name
    pub name: String,
    /// Image ID the instance was launched from
    pub image: String,
    /// Package (instance type) name
    pub package: String,
    /// Current lifecycle state
    pub state: InstanceState,
    /// Primary IP address, once assigned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_ip: Option<String>,
    /// Creation timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<Timestamp>,
    /// Instance tags
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
}

/// Request body for launch-instances
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchInstanceRequest {
    /// Instance name (optional, server assigns one otherwise)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Image ID to launch from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Package name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    /// Existing instance to clone instead of image+package
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clone_from: Option<String>,
    /// Number of instances to launch
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    /// Tags applied at launch
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
    /// Arbitrary metadata document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Value>,
}

/// Request body for terminate-instances / reboot-instances
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TerminateInstancesRequest {
    /// Instance IDs to act on
    pub ids: Vec<String>,
}

/// Request body for set-tags / delete-tags
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagsRequest {
    /// Target instance ID
    pub instance: String,
    /// Tags to set (set-tags)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
    /// Tag keys to delete (delete-tags)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<String>,
    /// Delete every tag on the instance
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub all: bool,
}
