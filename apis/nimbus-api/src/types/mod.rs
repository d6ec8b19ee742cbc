// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! API type modules

pub mod common;
pub mod image;
pub mod instance;
pub mod key;
pub mod misc;

pub use common::Timestamp;
pub use image::{Image, ImageState};
pub use instance::{
    Instance, InstanceState, LaunchInstanceRequest, TagsRequest, TerminateInstancesRequest,
};
pub use key::SshKey;
pub use misc::{Datacenters, Services};
