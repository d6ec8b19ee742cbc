// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! Command modules.
//!
//! Each module registers handlers on the event registry; nothing here
//! hardcodes the final command table. `build_command_table` drives the
//! lifecycle: `building-command-table.main` populates the top level,
//! then each group gets `building-command-table.<group>`, then each
//! leaf's argument table gets `building-arg-table.<path>` so plugins
//! can amend it.

pub mod directory;
pub mod image;
pub mod instance;
pub mod key;
pub mod profile;
pub mod tag;

use crate::command::{CommandTable, TableEntry};
use crate::registry::{EventPayload, EventRegistry};

/// Register every built-in command module
pub fn register_all(registry: &mut EventRegistry) {
    instance::register(registry);
    image::register(registry);
    key::register(registry);
    tag::register(registry);
    directory::register(registry);
    profile::register(registry);
}

/// Assemble the full command table by emitting the build events
pub fn build_command_table(registry: &EventRegistry) -> CommandTable {
    let mut table = CommandTable::new();
    registry.emit(
        "building-command-table.main",
        &mut EventPayload::CommandTable(&mut table),
    );

    let group_names = table.names();
    for group_name in group_names {
        let Some(TableEntry::Group(_)) = table.get(&group_name) else {
            continue;
        };
        let mut group_table = CommandTable::new();
        registry.emit(
            &format!("building-command-table.{group_name}"),
            &mut EventPayload::CommandTable(&mut group_table),
        );

        for (leaf_name, entry) in group_table.iter_mut() {
            if let TableEntry::Leaf(command) = entry {
                registry.emit(
                    &format!("building-arg-table.{group_name}.{leaf_name}"),
                    &mut EventPayload::ArgTable(command.arg_table_mut()),
                );
            }
        }

        if let Some(TableEntry::Group(group)) = table.get_mut(&group_name) {
            group.table = group_table;
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::ArgSpec;
    use pretty_assertions::assert_eq;

    #[test]
    fn full_table_has_all_groups() {
        let mut registry = EventRegistry::new();
        register_all(&mut registry);
        let table = build_command_table(&registry);
        assert_eq!(
            table.names(),
            vec!["instance", "image", "key", "tag", "datacenter", "service", "profile"]
        );
    }

    #[test]
    fn instance_group_has_expected_leaves() {
        let mut registry = EventRegistry::new();
        register_all(&mut registry);
        let table = build_command_table(&registry);
        let Some(TableEntry::Group(group)) = table.get("instance") else {
            panic!("instance group missing");
        };
        assert_eq!(
            group.table.names(),
            vec!["list", "get", "launch", "terminate", "reboot", "wait"]
        );
    }

    #[test]
    fn arg_table_events_let_plugins_amend_leaves() {
        let mut registry = EventRegistry::new();
        register_all(&mut registry);
        registry.register("building-arg-table.instance.list", |_, payload| {
            if let EventPayload::ArgTable(table) = payload {
                table.insert(ArgSpec::new("credit-class", "Filter by billing class"));
            }
        });

        let table = build_command_table(&registry);
        let Some(TableEntry::Group(group)) = table.get("instance") else {
            panic!("instance group missing");
        };
        let Some(TableEntry::Leaf(list)) = group.table.get("list") else {
            panic!("instance list missing");
        };
        assert!(list.arg_table().get("credit-class").is_some());
    }
}
