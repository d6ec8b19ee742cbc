// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! Common types shared across services

use chrono::{DateTime, Utc};

/// RFC 3339 timestamp as used by all Nimbus services
pub type Timestamp = DateTime<Utc>;
