// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! Profile management commands.
//!
//! These operate on local configuration only; no remote calls, so none
//! of them go through the operation caller.

use async_trait::async_trait;
use nimbus_client::Session;
use serde_json::json;

use crate::args::{ArgSpec, ArgTable, ArgType, ParsedArgs};
use crate::command::{CliCommand, CommandGroup};
use crate::config::{Config, Profile};
use crate::errors::CliError;
use crate::globals::{OutputFormat, ParsedGlobals};
use crate::output::{self, Projection};
use crate::registry::{EventPayload, EventRegistry};

pub fn register(registry: &mut EventRegistry) {
    registry.register("building-command-table.main", |_, payload| {
        if let EventPayload::CommandTable(table) = payload {
            table.insert_group(CommandGroup::new(
                "profile",
                "Manage connection profiles",
                &[],
            ));
        }
    });

    registry.register("building-command-table.profile", |_, payload| {
        if let EventPayload::CommandTable(table) = payload {
            table.insert_leaf(Box::new(CreateCommand::new()));
            table.insert_leaf(Box::new(ListCommand::new()));
            table.insert_leaf(Box::new(GetCommand::new()));
            table.insert_leaf(Box::new(SetCommand::new()));
            table.insert_leaf(Box::new(DeleteCommand::new()));
            table.insert_leaf(Box::new(CurrentCommand::new()));
        }
    });

    registry.register("doc-epilog.profile.set", |_, payload| {
        if let EventPayload::Doc(sink) = payload {
            sink.push(
                "NOTES",
                "Pass '-' as the name to switch back to the previously active profile.",
            );
        }
    });
}

/// Build a profile from create's arguments.
///
/// Region, endpoint URL, and output format come from the shared global
/// flags (`--region`, `--endpoint-url`, `--output`); only the fields
/// without a global counterpart are local arguments.
fn profile_from_args(args: &ParsedArgs, globals: &ParsedGlobals) -> Result<Profile, CliError> {
    let name = args.str("name").unwrap_or_default();
    if name == "env" || name == "-" {
        return Err(CliError::invalid_parameter(
            "name",
            format!("'{name}' is a reserved profile name"),
        ));
    }

    let mut profile = Profile::new(name);
    profile.region = globals.region.clone();
    profile.endpoint_url = globals.endpoint_url.clone();
    profile.token = args.str("token").map(str::to_string);
    profile.output = Some(globals.output.to_string());
    profile.insecure = args.flag("insecure") || !globals.verify_ssl;

    if profile.region.is_none() && profile.endpoint_url.is_none() {
        return Err(CliError::missing_parameters(
            "profile.create",
            vec!["endpoint-url".to_string(), "region".to_string()],
        ));
    }
    Ok(profile)
}

struct CreateCommand {
    arg_table: ArgTable,
}

impl CreateCommand {
    fn new() -> Self {
        Self {
            arg_table: ArgTable::from_specs(vec![
                ArgSpec::new("name", "Profile name").positional().required(),
                ArgSpec::new("token", "API token"),
                ArgSpec::new("insecure", "Skip TLS certificate verification")
                    .typed(ArgType::Boolean),
                ArgSpec::new("use", "Make this the current profile").typed(ArgType::Boolean),
            ]),
        }
    }
}

#[async_trait]
impl CliCommand for CreateCommand {
    fn name(&self) -> &str {
        "create"
    }

    fn about(&self) -> &str {
        "Create a profile"
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
        _session: &Session,
    ) -> Result<(), CliError> {
        let profile = profile_from_args(args, globals)?;
        profile.save()?;

        if args.flag("use") {
            let mut config = Config::load()?;
            config.set_current_profile(&profile.name);
            config.save()?;
        }
        println!("Created profile \"{}\"", profile.name);
        Ok(())
    }
}

struct ListCommand {
    arg_table: ArgTable,
}

impl ListCommand {
    fn new() -> Self {
        Self {
            arg_table: ArgTable::new(),
        }
    }
}

#[async_trait]
impl CliCommand for ListCommand {
    fn name(&self) -> &str {
        "list"
    }

    fn about(&self) -> &str {
        "List profiles"
    }

    fn aliases(&self) -> &[&str] {
        &["ls"]
    }

    fn arg_table(&self) -> &ArgTable {
        &self.arg_table
    }

    fn arg_table_mut(&mut self) -> &mut ArgTable {
        &mut self.arg_table
    }

    async fn run(
        &self,
        _args: &ParsedArgs,
        globals: &ParsedGlobals,
        _session: &Session,
    ) -> Result<(), CliError> {
        let names = Profile::list_all()?;
        let current = Config::load()?.current_profile().map(str::to_string);

        match globals.output {
            OutputFormat::Json | OutputFormat::Yaml => {
                output::render(&json!(names), globals.output, &Projection::Raw)?;
            }
            _ => {
                for name in &names {
                    let marker = if Some(name) == current.as_ref() { "*" } else { " " };
                    println!("{marker} {name}");
                }
            }
        }
        Ok(())
    }
}

struct GetCommand {
    arg_table: ArgTable,
}

impl GetCommand {
    fn new() -> Self {
        Self {
            arg_table: ArgTable::from_specs(vec![
                ArgSpec::new("name", "Profile name (current profile when omitted)").positional(),
            ]),
        }
    }
}

#[async_trait]
impl CliCommand for GetCommand {
    fn name(&self) -> &str {
        "get"
    }

    fn about(&self) -> &str {
        "Show a profile"
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
        _session: &Session,
    ) -> Result<(), CliError> {
        let name = match args.str("name") {
            Some(name) => name.to_string(),
            None => Config::load()?
                .current_profile()
                .map(str::to_string)
                .ok_or_else(|| anyhow::anyhow!("no current profile set"))?,
        };
        let profile = Profile::load(&name)?;
        let value = serde_json::to_value(&profile)?;
        output::render(
            &value,
            globals.output,
            &Projection::KeyValue {
                key_header: "FIELD",
                value_header: "VALUE",
            },
        )
    }
}

struct SetCommand {
    arg_table: ArgTable,
}

impl SetCommand {
    fn new() -> Self {
        Self {
            arg_table: ArgTable::from_specs(vec![
                ArgSpec::new("name", "Profile name ('-' for the previous one)")
                    .positional()
                    .required(),
            ]),
        }
    }
}

#[async_trait]
impl CliCommand for SetCommand {
    fn name(&self) -> &str {
        "set"
    }

    fn about(&self) -> &str {
        "Set the current profile"
    }

    fn aliases(&self) -> &[&str] {
        &["use"]
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
        _globals: &ParsedGlobals,
        _session: &Session,
    ) -> Result<(), CliError> {
        let mut config = Config::load()?;
        let name = match args.str("name") {
            Some("-") => config
                .old_profile
                .clone()
                .ok_or_else(|| anyhow::anyhow!("no previous profile to switch to"))?,
            Some(name) => name.to_string(),
            None => String::new(),
        };

        // "env" is virtual; everything else must exist on disk.
        if name != "env" {
            Profile::load(&name)?;
        }

        config.set_current_profile(&name);
        config.save()?;
        println!("Switched to profile \"{name}\"");
        Ok(())
    }
}

struct DeleteCommand {
    arg_table: ArgTable,
}

impl DeleteCommand {
    fn new() -> Self {
        Self {
            arg_table: ArgTable::from_specs(vec![
                ArgSpec::new("name", "Profile name").positional().required(),
                ArgSpec::new("force", "Skip confirmation")
                    .typed(ArgType::Boolean)
                    .short('f'),
            ]),
        }
    }
}

#[async_trait]
impl CliCommand for DeleteCommand {
    fn name(&self) -> &str {
        "delete"
    }

    fn about(&self) -> &str {
        "Delete a profile"
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
        _globals: &ParsedGlobals,
        _session: &Session,
    ) -> Result<(), CliError> {
        let name = args.str("name").unwrap_or_default().to_string();

        if !args.flag("force") {
            let confirmed = dialoguer::Confirm::new()
                .with_prompt(format!("Delete profile \"{name}\"?"))
                .default(false)
                .interact()
                .map_err(|e| CliError::Other(e.into()))?;
            if !confirmed {
                println!("Aborted.");
                return Ok(());
            }
        }

        Profile::delete(&name)?;

        let mut config = Config::load()?;
        if config.current_profile() == Some(name.as_str()) {
            config.profile = None;
            config.save()?;
        }
        println!("Deleted profile \"{name}\"");
        Ok(())
    }
}

struct CurrentCommand {
    arg_table: ArgTable,
}

impl CurrentCommand {
    fn new() -> Self {
        Self {
            arg_table: ArgTable::new(),
        }
    }
}

#[async_trait]
impl CliCommand for CurrentCommand {
    fn name(&self) -> &str {
        "current"
    }

    fn about(&self) -> &str {
        "Print the current profile name"
    }

    fn arg_table(&self) -> &ArgTable {
        &self.arg_table
    }

    fn arg_table_mut(&mut self) -> &mut ArgTable {
        &mut self.arg_table
    }

    async fn run(
        &self,
        _args: &ParsedArgs,
        _globals: &ParsedGlobals,
        _session: &Session,
    ) -> Result<(), CliError> {
        match Config::load()?.current_profile() {
            Some(name) => println!("{name}"),
            None => println!("(none)"),
        }
        Ok(())
    }
}
