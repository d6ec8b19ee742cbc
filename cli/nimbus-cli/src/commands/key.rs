// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! SSH key commands

use std::io::Read;

use async_trait::async_trait;
use nimbus_api::SshKey;
use nimbus_client::Session;
use serde_json::{Value, json};

use crate::args::{ArgSpec, ArgTable, ArgType, Params, ParsedArgs};
use crate::command::{BasicCommand, CliCommand, CommandGroup};
use crate::errors::CliError;
use crate::globals::{OutputFormat, ParsedGlobals};
use crate::operation::OperationCaller;
use crate::output::{self, Column, Projection};
use crate::registry::{EventPayload, EventRegistry};

const LIST_COLUMNS: &[Column] = &[
    Column::new("NAME", "/name"),
    Column::new("FINGERPRINT", "/fingerprint"),
    Column::new("CREATED", "/created"),
];

pub fn register(registry: &mut EventRegistry) {
    registry.register("building-command-table.main", |_, payload| {
        if let EventPayload::CommandTable(table) = payload {
            table.insert_group(CommandGroup::new("key", "Manage SSH keys", &[]));
        }
    });

    registry.register("building-command-table.key", |_, payload| {
        if let EventPayload::CommandTable(table) = payload {
            table.insert_leaf(Box::new(list_command()));
            table.insert_leaf(Box::new(AddCommand::new()));
            table.insert_leaf(Box::new(DeleteCommand::new()));
        }
    });

    registry.register("doc-examples.key.add", |_, payload| {
        if let EventPayload::Doc(sink) = payload {
            sink.push(
                "EXAMPLES",
                "nimbus key add ~/.ssh/id_ed25519.pub\n\
                 cat key.pub | nimbus key add --name laptop",
            );
        }
    });
}

/// Re-encode `{keys: [...]}` through the published key type
fn decode_keys(value: &Value) -> Result<Value, CliError> {
    output::decode_items::<SshKey>(value, "keys")
}

fn list_command() -> BasicCommand {
    BasicCommand::new("list", "List SSH keys", "compute", "list-keys")
        .aliases(&["ls"])
        .decode(decode_keys)
        .project(Projection::Columns {
            items_pointer: Some("/keys"),
            columns: LIST_COLUMNS,
        })
}

/// Build the add-key request body from the raw public key material.
///
/// The key name falls back to the comment field of the public key line
/// (`ssh-ed25519 AAAA... user@host` → `user@host`).
fn add_params(name: Option<&str>, material: &str) -> Result<Params, CliError> {
    let material = material.trim();
    if material.is_empty() {
        return Err(CliError::invalid_parameter("file", "public key is empty"));
    }

    let name = match name {
        Some(name) => name.to_string(),
        None => material
            .split_whitespace()
            .nth(2)
            .map(str::to_string)
            .ok_or_else(|| {
                CliError::invalid_parameter(
                    "name",
                    "public key has no comment; pass --name explicitly",
                )
            })?,
    };

    let mut params = Params::new();
    params.insert("name".to_string(), json!(name));
    params.insert("key".to_string(), json!(material));
    Ok(params)
}

/// Reads key material from a file argument or stdin, so it cannot be a
/// BasicCommand.
struct AddCommand {
    arg_table: ArgTable,
}

impl AddCommand {
    fn new() -> Self {
        Self {
            arg_table: ArgTable::from_specs(vec![
                ArgSpec::new("file", "Public key file (reads stdin when omitted)").positional(),
                ArgSpec::new("name", "Key name (defaults to the key comment)").short('n'),
            ]),
        }
    }
}

#[async_trait]
impl CliCommand for AddCommand {
    fn name(&self) -> &str {
        "add"
    }

    fn about(&self) -> &str {
        "Add an SSH public key"
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
        let material = match args.str("file") {
            Some(path) => std::fs::read_to_string(path)?,
            None => {
                let mut buffer = String::new();
                std::io::stdin().read_to_string(&mut buffer)?;
                buffer
            }
        };

        let params = add_params(args.str("name"), &material)?;
        let caller = OperationCaller::new(session, globals);
        let mut response = caller.invoke("compute", "add-key", params).await?;
        if !response.is_null() {
            response = output::decode_item::<SshKey>(&response)?;
        }
        output::render(
            &response,
            globals.output,
            &Projection::Columns {
                items_pointer: None,
                columns: LIST_COLUMNS,
            },
        )
    }
}

struct DeleteCommand {
    arg_table: ArgTable,
}

impl DeleteCommand {
    fn new() -> Self {
        Self {
            arg_table: ArgTable::from_specs(vec![
                ArgSpec::new("names", "Key name(s)")
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
impl CliCommand for DeleteCommand {
    fn name(&self) -> &str {
        "delete"
    }

    fn about(&self) -> &str {
        "Delete SSH key(s)"
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
        let names = args.strings("names");

        if !args.flag("force") {
            let confirmed = dialoguer::Confirm::new()
                .with_prompt(format!("Delete {} key(s)?", names.len()))
                .default(false)
                .interact()
                .map_err(|e| CliError::Other(e.into()))?;
            if !confirmed {
                println!("Aborted.");
                return Ok(());
            }
        }

        let caller = OperationCaller::new(session, globals);
        for name in &names {
            let mut params = Params::new();
            params.insert("name".to_string(), json!(name));
            let response = caller.invoke("compute", "delete-key", params).await?;
            if matches!(globals.output, OutputFormat::Json | OutputFormat::Yaml) {
                output::render(&response, globals.output, &Projection::Raw)?;
            }
        }
        if !matches!(globals.output, OutputFormat::Json | OutputFormat::Yaml) {
            println!("Deleted {} key(s)", names.len());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn add_defaults_name_from_comment() {
        let params = add_params(None, "ssh-ed25519 AAAAC3Nza user@laptop\n").unwrap();
        assert_eq!(
            serde_json::Value::Object(params),
            json!({"name": "user@laptop", "key": "ssh-ed25519 AAAAC3Nza user@laptop"})
        );
    }

    #[test]
    fn add_explicit_name_wins() {
        let params = add_params(Some("work"), "ssh-rsa AAAAB3Nza user@laptop").unwrap();
        assert_eq!(params.get("name"), Some(&json!("work")));
    }

    #[test]
    fn add_requires_name_when_no_comment() {
        let err = add_params(None, "ssh-rsa AAAAB3Nza").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for --name: public key has no comment; pass --name explicitly"
        );
    }

    #[test]
    fn add_rejects_empty_material() {
        let err = add_params(Some("x"), "   \n").unwrap_err();
        assert!(matches!(err, CliError::InvalidParameter { .. }));
    }

    #[test]
    fn list_rows_follow_the_published_key_schema() {
        let raw = json!({"keys": [{
            "name": "laptop",
            "key": "ssh-ed25519 AAAA",
            "fingerprint": "SHA256:abc",
            "backendRevision": 7
        }]});
        assert_eq!(
            decode_keys(&raw).unwrap(),
            json!({"keys": [{
                "name": "laptop",
                "key": "ssh-ed25519 AAAA",
                "fingerprint": "SHA256:abc"
            }]})
        );
    }
}
