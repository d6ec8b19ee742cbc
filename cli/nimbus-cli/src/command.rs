// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! Command table and the declarative command type.
//!
//! The CLI is a two-level table: top-level groups (`instance`, `image`,
//! ...) own a table of leaf commands. Tables are populated by handlers on
//! the event registry, never by hardcoded lists. Most leaves are a
//! [`BasicCommand`]: an argument table, a params-builder hook, an
//! operation binding, and an output projection — the generic caller does
//! the rest.

use async_trait::async_trait;
use indexmap::IndexMap;
use nimbus_client::Session;

use crate::args::{ArgSpec, ArgTable, Params, ParsedArgs};
use crate::errors::CliError;
use crate::globals::ParsedGlobals;
use crate::operation::OperationCaller;
use crate::output::{self, Projection};

/// A dispatchable leaf command
#[async_trait]
pub trait CliCommand: Send + Sync {
    fn name(&self) -> &str;
    fn about(&self) -> &str;
    fn aliases(&self) -> &[&str] {
        &[]
    }
    fn arg_table(&self) -> &ArgTable;
    fn arg_table_mut(&mut self) -> &mut ArgTable;

    async fn run(
        &self,
        args: &ParsedArgs,
        globals: &ParsedGlobals,
        session: &Session,
    ) -> Result<(), CliError>;
}

/// A named group of subcommands
pub struct CommandGroup {
    pub name: &'static str,
    pub about: &'static str,
    pub aliases: &'static [&'static str],
    pub table: CommandTable,
}

impl CommandGroup {
    pub fn new(name: &'static str, about: &'static str, aliases: &'static [&'static str]) -> Self {
        Self {
            name,
            about,
            aliases,
            table: CommandTable::new(),
        }
    }
}

/// Either a group or a leaf
pub enum TableEntry {
    Group(CommandGroup),
    Leaf(Box<dyn CliCommand>),
}

/// Ordered name → command mapping
#[derive(Default)]
pub struct CommandTable {
    entries: IndexMap<String, TableEntry>,
}

impl CommandTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_leaf(&mut self, command: Box<dyn CliCommand>) {
        self.entries
            .insert(command.name().to_string(), TableEntry::Leaf(command));
    }

    pub fn insert_group(&mut self, group: CommandGroup) {
        self.entries
            .insert(group.name.to_string(), TableEntry::Group(group));
    }

    pub fn get(&self, name: &str) -> Option<&TableEntry> {
        self.entries.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut TableEntry> {
        self.entries.get_mut(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &TableEntry)> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut TableEntry)> {
        self.entries.iter_mut()
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Params-builder hook: validate/transform parsed args into request params
pub type ParamsBuilder = fn(&ParsedArgs) -> Result<Params, CliError>;

/// Response hook: re-encode the response through its typed schema
pub type ResponseDecoder = fn(&serde_json::Value) -> Result<serde_json::Value, CliError>;

fn passthrough(args: &ParsedArgs) -> Result<Params, CliError> {
    Ok(args.to_params())
}

/// Declarative command: arg table in, one remote operation out.
///
/// `run` builds the parameter map via the hook, invokes the bound
/// operation through the generic caller, and renders the response with
/// the command's projection.
pub struct BasicCommand {
    name: &'static str,
    about: &'static str,
    service: &'static str,
    operation: &'static str,
    aliases: &'static [&'static str],
    arg_table: ArgTable,
    build_params: ParamsBuilder,
    decode: Option<ResponseDecoder>,
    projection: Projection,
}

impl BasicCommand {
    pub fn new(
        name: &'static str,
        about: &'static str,
        service: &'static str,
        operation: &'static str,
    ) -> Self {
        Self {
            name,
            about,
            service,
            operation,
            aliases: &[],
            arg_table: ArgTable::new(),
            build_params: passthrough,
            decode: None,
            projection: Projection::Raw,
        }
    }

    pub fn args(mut self, specs: Vec<ArgSpec>) -> Self {
        self.arg_table = ArgTable::from_specs(specs);
        self
    }

    pub fn aliases(mut self, aliases: &'static [&'static str]) -> Self {
        self.aliases = aliases;
        self
    }

    pub fn params_builder(mut self, build_params: ParamsBuilder) -> Self {
        self.build_params = build_params;
        self
    }

    pub fn decode(mut self, decode: ResponseDecoder) -> Self {
        self.decode = Some(decode);
        self
    }

    pub fn project(mut self, projection: Projection) -> Self {
        self.projection = projection;
        self
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn operation(&self) -> &'static str {
        self.operation
    }
}

#[async_trait]
impl CliCommand for BasicCommand {
    fn name(&self) -> &str {
        self.name
    }

    fn about(&self) -> &str {
        self.about
    }

    fn aliases(&self) -> &[&str] {
        self.aliases
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
        let params = (self.build_params)(args)?;
        let caller = OperationCaller::new(session, globals);
        let mut response = caller.invoke(self.service, self.operation, params).await?;
        // Empty (204) responses have no document to decode.
        if let Some(decode) = self.decode {
            if !response.is_null() {
                response = decode(&response)?;
            }
        }
        output::render(&response, globals.output, &self.projection)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_preserves_insertion_order() {
        let mut table = CommandTable::new();
        table.insert_leaf(Box::new(BasicCommand::new("list", "", "compute", "list-x")));
        table.insert_leaf(Box::new(BasicCommand::new("get", "", "compute", "get-x")));
        table.insert_group(CommandGroup::new("tag", "Tags", &[]));
        assert_eq!(table.names(), vec!["list", "get", "tag"]);
    }

    #[test]
    fn default_params_builder_is_passthrough() {
        let command = BasicCommand::new("get", "Get", "compute", "get-instance")
            .args(vec![ArgSpec::new("id", "Instance ID").positional().required()]);
        let params = testing::params_for(&command, &["i-123"]).unwrap();
        assert_eq!(params.get("id"), Some(&serde_json::Value::from("i-123")));
    }
}
