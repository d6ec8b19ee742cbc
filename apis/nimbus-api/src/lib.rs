// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! Nimbus API Types
//!
//! Shared request and response types for the Nimbus cloud APIs. The
//! `compute` service owns instances, images, SSH keys, and tags; the
//! `directory` service publishes datacenter and service endpoint maps.
//!
//! These types are consumed by `nimbus-client` and by the CLI's table
//! projections. The wire format is JSON with camelCase field names.

pub mod types;

pub use types::{
    Datacenters, Image, ImageState, Instance, InstanceState, LaunchInstanceRequest, Services,
    SshKey, TagsRequest, TerminateInstancesRequest, Timestamp,
};
