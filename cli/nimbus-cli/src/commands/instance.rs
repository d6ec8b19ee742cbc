// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! Instance management commands

use std::collections::BTreeMap;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use nimbus_api::{Instance, InstanceState, LaunchInstanceRequest, TerminateInstancesRequest};
use nimbus_client::Session;
use serde_json::{Value, json};

use crate::args::{ArgSpec, ArgTable, ArgType, Params, ParsedArgs, params_from};
use crate::command::{BasicCommand, CliCommand, CommandGroup};
use crate::errors::CliError;
use crate::globals::{OutputFormat, ParsedGlobals};
use crate::operation::OperationCaller;
use crate::output::{self, Column, Projection};
use crate::registry::{EventPayload, EventRegistry};

const STATES: &[&str] = &[
    "provisioning",
    "running",
    "stopping",
    "stopped",
    "deleted",
    "failed",
];

const LIST_COLUMNS: &[Column] = &[
    Column::truncated("SHORTID", "/id", 8),
    Column::new("NAME", "/name"),
    Column::truncated("IMAGE", "/image", 8),
    Column::new("STATE", "/state"),
    Column::new("PRIMARYIP", "/primaryIp"),
    Column::new("CREATED", "/created"),
];

const GET_COLUMNS: &[Column] = &[
    Column::new("ID", "/id"),
    Column::new("NAME", "/name"),
    Column::new("STATE", "/state"),
    Column::new("IMAGE", "/image"),
    Column::new("PACKAGE", "/package"),
    Column::new("PRIMARYIP", "/primaryIp"),
];

const LAUNCH_COLUMNS: &[Column] = &[
    Column::new("ID", "/id"),
    Column::new("NAME", "/name"),
    Column::new("STATE", "/state"),
];

pub fn register(registry: &mut EventRegistry) {
    registry.register("building-command-table.main", |_, payload| {
        if let EventPayload::CommandTable(table) = payload {
            table.insert_group(CommandGroup::new("instance", "Manage instances", &["inst"]));
        }
    });

    registry.register("building-command-table.instance", |_, payload| {
        if let EventPayload::CommandTable(table) = payload {
            table.insert_leaf(Box::new(list_command()));
            table.insert_leaf(Box::new(get_command()));
            table.insert_leaf(Box::new(launch_command()));
            table.insert_leaf(Box::new(TerminateCommand::new()));
            table.insert_leaf(Box::new(reboot_command()));
            table.insert_leaf(Box::new(WaitCommand::new()));
        }
    });

    registry.register("doc-examples.instance.launch", |_, payload| {
        if let EventPayload::Doc(sink) = payload {
            sink.push(
                "EXAMPLES",
                "nimbus instance launch --image base-64 --package small --name web0\n\
                 nimbus instance launch --clone-from i-0123abcd --count 3",
            );
        }
    });
}

/// Re-encode `{instances: [...]}` through the published instance type
fn decode_instances(value: &Value) -> Result<Value, CliError> {
    output::decode_items::<Instance>(value, "instances")
}

fn list_command() -> BasicCommand {
    BasicCommand::new("list", "List instances", "compute", "list-instances")
        .aliases(&["ls"])
        .args(vec![
            ArgSpec::new("name", "Filter by name (substring match)"),
            ArgSpec::new("state", "Filter by state").choices(STATES),
            ArgSpec::new("image", "Filter by image ID"),
            ArgSpec::new("tag", "Filter by tag (repeatable)")
                .typed(ArgType::KeyValuePairs)
                .short('t'),
        ])
        .params_builder(list_params)
        .decode(decode_instances)
        .project(Projection::Columns {
            items_pointer: Some("/instances"),
            columns: LIST_COLUMNS,
        })
}

fn list_params(args: &ParsedArgs) -> Result<Params, CliError> {
    let mut params = Params::new();
    for key in ["name", "state", "image"] {
        if let Some(value) = args.get(key) {
            params.insert(key.to_string(), value.clone());
        }
    }
    if let Some(tags) = args.get("tag") {
        params.insert("tags".to_string(), tags.clone());
    }
    Ok(params)
}

fn get_command() -> BasicCommand {
    BasicCommand::new("get", "Get instance details", "compute", "get-instance")
        .args(vec![
            ArgSpec::new("id", "Instance ID").positional().required(),
        ])
        .decode(output::decode_item::<Instance>)
        .project(Projection::Columns {
            items_pointer: None,
            columns: GET_COLUMNS,
        })
}

fn launch_command() -> BasicCommand {
    BasicCommand::new("launch", "Launch instance(s)", "compute", "launch-instances")
        .aliases(&["create"])
        .args(vec![
            ArgSpec::new("name", "Instance name"),
            ArgSpec::new("image", "Image ID to launch from"),
            ArgSpec::new("package", "Package (instance type) name"),
            ArgSpec::new("clone-from", "Clone an existing instance instead"),
            ArgSpec::new("count", "Number of instances to launch")
                .typed(ArgType::Integer)
                .default_value("1")
                .schema(json!({"minimum": 1, "maximum": 10})),
            ArgSpec::new("tag", "Tag to apply at launch (repeatable)")
                .typed(ArgType::KeyValuePairs)
                .short('t'),
            ArgSpec::new("metadata", "Metadata document (inline JSON)").typed(ArgType::Json),
        ])
        .params_builder(launch_params)
        .decode(decode_instances)
        .project(Projection::Columns {
            items_pointer: Some("/instances"),
            columns: LAUNCH_COLUMNS,
        })
}

fn launch_params(args: &ParsedArgs) -> Result<Params, CliError> {
    // --clone-from replaces image+package; mixing them is ambiguous.
    if args.contains("clone-from") {
        for other in ["image", "package"] {
            if args.contains(other) {
                return Err(CliError::mutually_exclusive("clone-from", other));
            }
        }
    } else {
        let missing: Vec<String> = ["image", "package"]
            .iter()
            .filter(|name| !args.contains(name))
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(CliError::missing_parameters("instance.launch", missing));
        }
    }

    let request = LaunchInstanceRequest {
        name: args.str("name").map(str::to_string),
        image: args.str("image").map(str::to_string),
        package: args.str("package").map(str::to_string),
        clone_from: args.str("clone-from").map(str::to_string),
        count: args.integer("count"),
        tags: tag_map(args),
        metadata: args.get("metadata").cloned(),
    };
    params_from(&request)
}

fn tag_map(args: &ParsedArgs) -> BTreeMap<String, String> {
    args.object("tag")
        .map(|object| {
            object
                .iter()
                .filter_map(|(k, v)| v.as_str().map(|v| (k.clone(), v.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

fn reboot_command() -> BasicCommand {
    BasicCommand::new("reboot", "Reboot instance(s)", "compute", "reboot-instances")
        .args(vec![
            ArgSpec::new("ids", "Instance ID(s)")
                .positional()
                .variadic()
                .required(),
        ])
        .params_builder(ids_params)
}

fn ids_params(args: &ParsedArgs) -> Result<Params, CliError> {
    let request = TerminateInstancesRequest {
        ids: args.strings("ids"),
    };
    params_from(&request)
}

/// Terminate needs a confirmation prompt, so it is not a BasicCommand.
struct TerminateCommand {
    arg_table: ArgTable,
}

impl TerminateCommand {
    fn new() -> Self {
        Self {
            arg_table: ArgTable::from_specs(vec![
                ArgSpec::new("ids", "Instance ID(s)")
                    .positional()
                    .variadic()
                    .required(),
                ArgSpec::new("force", "Skip confirmation")
                    .typed(ArgType::Boolean)
                    .short('f'),
            ]),
        }
    }
}

#[async_trait]
impl CliCommand for TerminateCommand {
    fn name(&self) -> &str {
        "terminate"
    }

    fn about(&self) -> &str {
        "Terminate instance(s)"
    }

    fn aliases(&self) -> &[&str] {
        &["rm"]
    }

    fn arg_table(&self) -> &ArgTable {
        &self.arg_table
    }

    fn arg_table_mut(&mut self) -> &mut ArgTable {
        &mut self.arg_table
    }

    async fn run(
        &self,
        args: &ParsedArgs,
        globals: &ParsedGlobals,
        session: &Session,
    ) -> Result<(), CliError> {
        let ids = args.strings("ids");

        if !args.flag("force") {
            let confirmed = dialoguer::Confirm::new()
                .with_prompt(format!("Terminate {} instance(s)?", ids.len()))
                .default(false)
                .interact()
                .map_err(|e| CliError::Other(e.into()))?;
            if !confirmed {
                println!("Aborted.");
                return Ok(());
            }
        }

        let request = TerminateInstancesRequest { ids: ids.clone() };
        let caller = OperationCaller::new(session, globals);
        let response = caller
            .invoke("compute", "terminate-instances", params_from(&request)?)
            .await?;

        match globals.output {
            OutputFormat::Json | OutputFormat::Yaml => {
                output::render(&response, globals.output, &Projection::Raw)?;
            }
            _ => println!("Terminated {} instance(s)", ids.len()),
        }
        Ok(())
    }
}

/// Wait delegates the polling loop to the SDK waiter.
struct WaitCommand {
    arg_table: ArgTable,
}

impl WaitCommand {
    fn new() -> Self {
        Self {
            arg_table: ArgTable::from_specs(vec![
                ArgSpec::new("id", "Instance ID").positional().required(),
                ArgSpec::new("until", "Target state")
                    .choices(STATES)
                    .default_value("running"),
                ArgSpec::new("interval", "Poll interval in seconds")
                    .typed(ArgType::Integer)
                    .default_value("2")
                    .schema(json!({"minimum": 1})),
                ArgSpec::new("max-attempts", "Give up after this many polls")
                    .typed(ArgType::Integer)
                    .default_value("60")
                    .schema(json!({"minimum": 1})),
            ]),
        }
    }
}

#[async_trait]
impl CliCommand for WaitCommand {
    fn name(&self) -> &str {
        "wait"
    }

    fn about(&self) -> &str {
        "Wait for an instance to reach a state"
    }

    fn arg_table(&self) -> &ArgTable {
        &self.arg_table
    }

    fn arg_table_mut(&mut self) -> &mut ArgTable {
        &mut self.arg_table
    }

    async fn run(
        &self,
        args: &ParsedArgs,
        globals: &ParsedGlobals,
        session: &Session,
    ) -> Result<(), CliError> {
        let id = args.str("id").unwrap_or_default().to_string();
        let until = args.str("until").unwrap_or("running");
        let target = InstanceState::from_str(until)
            .map_err(|_| CliError::invalid_parameter("until", format!("unknown state '{until}'")))?;
        let interval = args.integer("interval").unwrap_or(2).max(1) as u64;
        let max_attempts = args.integer("max-attempts").unwrap_or(60).max(1) as u32;

        let caller = OperationCaller::new(session, globals);
        let client = caller.client("compute")?;
        let response = client
            .waiter()
            .interval(Duration::from_secs(interval))
            .max_attempts(max_attempts)
            .wait_for_instance_state(&id, target)
            .await?;

        match globals.output {
            OutputFormat::Json | OutputFormat::Yaml => {
                output::render(&response, globals.output, &Projection::Raw)?;
            }
            _ => println!("Instance {} is {}", id, target),
        }
        Ok(())
    }
}
