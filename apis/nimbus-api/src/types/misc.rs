// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! Directory service types

use std::collections::BTreeMap;

/// Datacenter name to URL mapping
pub type Datacenters = BTreeMap<String, String>;

/// Service name to URL mapping
pub type Services = BTreeMap<String, String>;
