// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! Datacenter and service directory commands.
//!
//! Both operations return a flat name → URL map from the directory
//! service; rendering is the two-column key/value projection.

use nimbus_api::{Datacenters, Services};

use crate::command::{BasicCommand, CommandGroup};
use crate::output::{self, Projection};
use crate::registry::{EventPayload, EventRegistry};

pub fn register(registry: &mut EventRegistry) {
    registry.register("building-command-table.main", |_, payload| {
        if let EventPayload::CommandTable(table) = payload {
            table.insert_group(CommandGroup::new("datacenter", "Datacenter directory", &["dc"]));
            table.insert_group(CommandGroup::new("service", "Service directory", &["svc"]));
        }
    });

    registry.register("building-command-table.datacenter", |_, payload| {
        if let EventPayload::CommandTable(table) = payload {
            table.insert_leaf(Box::new(datacenter_list()));
        }
    });

    registry.register("building-command-table.service", |_, payload| {
        if let EventPayload::CommandTable(table) = payload {
            table.insert_leaf(Box::new(service_list()));
        }
    });
}

fn datacenter_list() -> BasicCommand {
    BasicCommand::new("list", "List datacenters", "directory", "list-datacenters")
        .aliases(&["ls"])
        .decode(output::decode_item::<Datacenters>)
        .project(Projection::KeyValue {
            key_header: "NAME",
            value_header: "URL",
        })
}

fn service_list() -> BasicCommand {
    BasicCommand::new("list", "List available services", "directory", "list-services")
        .aliases(&["ls"])
        .decode(output::decode_item::<Services>)
        .project(Projection::KeyValue {
            key_header: "NAME",
            value_header: "URL",
        })
}
