// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! Nimbus cloud CLI.
//!
//! The clap command tree is not hardcoded: command modules register
//! handlers on the event registry, the registry builds the command
//! table, and the table is rendered into clap builder commands. Dispatch
//! walks the same table.

mod args;
mod command;
mod commands;
mod config;
mod errors;
mod globals;
mod help;
mod operation;
mod output;
mod registry;

use clap::builder::styling::{AnsiColor, Styles};
use clap_complete::Shell;
use nimbus_client::Session;

use crate::command::{CliCommand, CommandTable, TableEntry};
use crate::errors::CliError;
use crate::registry::EventRegistry;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Yellow.on_default())
        .usage(AnsiColor::Yellow.on_default())
        .literal(AnsiColor::Green.on_default())
}

fn leaf_to_clap(
    leaf: &dyn CliCommand,
    full_name: &str,
    registry: &EventRegistry,
) -> clap::Command {
    let mut cmd = clap::Command::new(leaf.name().to_string())
        .about(leaf.about().to_string())
        .args(leaf.arg_table().to_clap_args());
    for alias in leaf.aliases() {
        cmd = cmd.visible_alias(alias.to_string());
    }
    if let Some(sections) = help::extra_sections(leaf, full_name, registry) {
        cmd = cmd.after_help(sections);
    }
    cmd
}

/// Render the command table into the clap command tree
fn build_cli(table: &CommandTable, registry: &EventRegistry) -> clap::Command {
    let mut root = clap::Command::new("nimbus")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Command-line client for the Nimbus cloud APIs")
        .styles(styles())
        .args(globals::global_args())
        .subcommand_required(true)
        .arg_required_else_help(true);

    for (name, entry) in table.iter() {
        match entry {
            TableEntry::Leaf(leaf) => {
                root = root.subcommand(leaf_to_clap(leaf.as_ref(), name, registry));
            }
            TableEntry::Group(group) => {
                let mut group_cmd = clap::Command::new(group.name.to_string())
                    .about(group.about.to_string())
                    .subcommand_required(true)
                    .arg_required_else_help(true);
                for alias in group.aliases {
                    group_cmd = group_cmd.visible_alias(alias.to_string());
                }
                for (leaf_name, leaf_entry) in group.table.iter() {
                    if let TableEntry::Leaf(leaf) = leaf_entry {
                        let full_name = format!("{name}.{leaf_name}");
                        group_cmd =
                            group_cmd.subcommand(leaf_to_clap(leaf.as_ref(), &full_name, registry));
                    }
                }
                root = root.subcommand(group_cmd);
            }
        }
    }

    root.subcommand(
        clap::Command::new("completion")
            .about("Generate shell completion scripts")
            .arg(
                clap::Arg::new("shell")
                    .required(true)
                    .value_parser(clap::value_parser!(Shell)),
            ),
    )
}

fn init_tracing(debug: bool) {
    if !debug {
        return;
    }
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("nimbus=debug")),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<(), CliError> {
    let mut registry = EventRegistry::new();
    commands::register_all(&mut registry);
    let table = commands::build_command_table(&registry);

    let cli = build_cli(&table, &registry);
    let matches = cli.clone().get_matches();

    let Some((group_name, group_matches)) = matches.subcommand() else {
        // subcommand_required makes this unreachable; keep clap's help.
        return Ok(());
    };

    if group_name == "completion" {
        if let Some(shell) = group_matches.get_one::<Shell>("shell").copied() {
            let mut cli = cli;
            clap_complete::generate(shell, &mut cli, "nimbus", &mut std::io::stdout());
        }
        return Ok(());
    }

    let (leaf, full_name, leaf_matches) = match table.get(group_name) {
        Some(TableEntry::Leaf(leaf)) => (leaf.as_ref(), group_name.to_string(), group_matches),
        Some(TableEntry::Group(group)) => {
            let Some((leaf_name, leaf_matches)) = group_matches.subcommand() else {
                return Ok(());
            };
            match group.table.get(leaf_name) {
                Some(TableEntry::Leaf(leaf)) => (
                    leaf.as_ref(),
                    format!("{group_name}.{leaf_name}"),
                    leaf_matches,
                ),
                _ => {
                    return Err(CliError::Other(anyhow::anyhow!(
                        "unknown command: {group_name} {leaf_name}"
                    )));
                }
            }
        }
        None => {
            return Err(CliError::Other(anyhow::anyhow!(
                "unknown command: {group_name}"
            )));
        }
    };

    init_tracing(leaf_matches.get_flag("debug"));

    let profile = config::resolve_profile(
        leaf_matches.get_one::<String>("profile").map(String::as_str),
    )?;
    let globals = globals::ParsedGlobals::from_matches(leaf_matches, profile.as_ref())?;

    let token = profile
        .as_ref()
        .and_then(|p| p.token.clone())
        .or_else(|| std::env::var("NIMBUS_TOKEN").ok());
    let session = Session::new(token);

    let parsed = leaf.arg_table().extract(leaf_matches, &full_name)?;
    leaf.run(&parsed, &globals, &session).await
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("nimbus: error: {err}");
        std::process::exit(err.exit_code());
    }
}
