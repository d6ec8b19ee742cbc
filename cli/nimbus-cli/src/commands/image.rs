// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! Image commands

use nimbus_api::Image;
use serde_json::Value;

use crate::args::{ArgSpec, Params, ParsedArgs};
use crate::command::{BasicCommand, CommandGroup};
use crate::errors::CliError;
use crate::output::{self, Column, Projection};
use crate::registry::{EventPayload, EventRegistry};

const LIST_COLUMNS: &[Column] = &[
    Column::truncated("SHORTID", "/id", 8),
    Column::new("NAME", "/name"),
    Column::new("VERSION", "/version"),
    Column::new("TYPE", "/type"),
    Column::new("STATE", "/state"),
    Column::new("PUBLISHED", "/publishedAt"),
];

const GET_COLUMNS: &[Column] = &[
    Column::new("ID", "/id"),
    Column::new("NAME", "/name"),
    Column::new("VERSION", "/version"),
    Column::new("TYPE", "/type"),
    Column::new("OS", "/os"),
    Column::new("STATE", "/state"),
];

pub fn register(registry: &mut EventRegistry) {
    registry.register("building-command-table.main", |_, payload| {
        if let EventPayload::CommandTable(table) = payload {
            table.insert_group(CommandGroup::new("image", "Manage images", &["img"]));
        }
    });

    registry.register("building-command-table.image", |_, payload| {
        if let EventPayload::CommandTable(table) = payload {
            table.insert_leaf(Box::new(list_command()));
            table.insert_leaf(Box::new(get_command()));
        }
    });
}

/// Re-encode `{images: [...]}` through the published image type
fn decode_images(value: &Value) -> Result<Value, CliError> {
    output::decode_items::<Image>(value, "images")
}

fn list_command() -> BasicCommand {
    BasicCommand::new("list", "List available images", "compute", "list-images")
        .aliases(&["ls"])
        .args(vec![
            ArgSpec::new("name", "Filter by name (substring match)"),
            ArgSpec::new("type", "Filter by image type").choices(&["machine", "lx", "zvol"]),
            ArgSpec::new("os", "Filter by operating system"),
        ])
        .params_builder(list_params)
        .decode(decode_images)
        .project(Projection::Columns {
            items_pointer: Some("/images"),
            columns: LIST_COLUMNS,
        })
}

fn list_params(args: &ParsedArgs) -> Result<Params, CliError> {
    let mut params = Params::new();
    for key in ["name", "type", "os"] {
        if let Some(value) = args.get(key) {
            params.insert(key.to_string(), value.clone());
        }
    }
    Ok(params)
}

fn get_command() -> BasicCommand {
    BasicCommand::new("get", "Get image details", "compute", "get-image")
        .args(vec![ArgSpec::new("id", "Image ID").positional().required()])
        .decode(output::decode_item::<Image>)
        .project(Projection::Columns {
            items_pointer: None,
            columns: GET_COLUMNS,
        })
}
