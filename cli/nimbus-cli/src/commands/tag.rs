// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! Instance tag commands

use nimbus_api::TagsRequest;

use crate::args::{ArgSpec, ArgType, Params, ParsedArgs, params_from};
use crate::command::{BasicCommand, CommandGroup};
use crate::errors::CliError;
use crate::output::Projection;
use crate::registry::{EventPayload, EventRegistry};

pub fn register(registry: &mut EventRegistry) {
    registry.register("building-command-table.main", |_, payload| {
        if let EventPayload::CommandTable(table) = payload {
            table.insert_group(CommandGroup::new("tag", "Manage instance tags", &[]));
        }
    });

    registry.register("building-command-table.tag", |_, payload| {
        if let EventPayload::CommandTable(table) = payload {
            table.insert_leaf(Box::new(list_command()));
            table.insert_leaf(Box::new(set_command()));
            table.insert_leaf(Box::new(delete_command()));
        }
    });
}

fn list_command() -> BasicCommand {
    BasicCommand::new("list", "List tags on an instance", "compute", "list-tags")
        .aliases(&["ls"])
        .args(vec![
            ArgSpec::new("instance", "Instance ID").required().short('i'),
        ])
        .project(Projection::KeyValue {
            key_header: "KEY",
            value_header: "VALUE",
        })
}

fn set_command() -> BasicCommand {
    BasicCommand::new("set", "Set tags on an instance", "compute", "set-tags")
        .args(vec![
            ArgSpec::new("instance", "Instance ID").required().short('i'),
            ArgSpec::new("tags", "KEY=VALUE pair(s) to set")
                .typed(ArgType::KeyValuePairs)
                .positional()
                .variadic()
                .required(),
        ])
        .params_builder(set_params)
        .project(Projection::KeyValue {
            key_header: "KEY",
            value_header: "VALUE",
        })
}

fn set_params(args: &ParsedArgs) -> Result<Params, CliError> {
    let mut request = TagsRequest {
        instance: args.str("instance").unwrap_or_default().to_string(),
        ..Default::default()
    };
    if let Some(tags) = args.object("tags") {
        for (key, value) in tags {
            if let Some(value) = value.as_str() {
                request.tags.insert(key.clone(), value.to_string());
            }
        }
    }
    params_from(&request)
}

fn delete_command() -> BasicCommand {
    BasicCommand::new("delete", "Delete tags from an instance", "compute", "delete-tags")
        .aliases(&["rm"])
        .args(vec![
            ArgSpec::new("instance", "Instance ID").required().short('i'),
            ArgSpec::new("keys", "Tag key(s) to delete").positional().variadic(),
            ArgSpec::new("all", "Delete every tag on the instance").typed(ArgType::Boolean),
        ])
        .params_builder(delete_params)
}

fn delete_params(args: &ParsedArgs) -> Result<Params, CliError> {
    let keys = args.strings("keys");
    let all = args.flag("all");

    // Exactly one of explicit keys or --all.
    if all && !keys.is_empty() {
        return Err(CliError::invalid_parameter(
            "all",
            "cannot be combined with explicit KEY arguments",
        ));
    }
    if !all && keys.is_empty() {
        return Err(CliError::missing_parameters(
            "tag.delete",
            vec!["keys (or --all)".to_string()],
        ));
    }

    let request = TagsRequest {
        instance: args.str("instance").unwrap_or_default().to_string(),
        keys,
        all,
        ..Default::default()
    };
    params_from(&request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::testing::params_for;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn set_builds_tags_request() {
        let params = params_for(
            &set_command(),
            &["--instance", "i-1", "env=prod", "team=infra"],
        )
        .unwrap();
        assert_eq!(
            serde_json::Value::Object(params),
            json!({
                "instance": "i-1",
                "tags": {"env": "prod", "team": "infra"}
            })
        );
    }

    #[test]
    fn set_rejects_malformed_pair() {
        let err = params_for(&set_command(), &["--instance", "i-1", "oops"]).unwrap_err();
        assert!(matches!(err, CliError::InvalidParameter { .. }));
    }

    #[test]
    fn delete_with_keys() {
        let params = params_for(&delete_command(), &["--instance", "i-1", "env", "team"]).unwrap();
        assert_eq!(
            serde_json::Value::Object(params),
            json!({"instance": "i-1", "keys": ["env", "team"]})
        );
    }

    #[test]
    fn delete_all() {
        let params = params_for(&delete_command(), &["--instance", "i-1", "--all"]).unwrap();
        assert_eq!(
            serde_json::Value::Object(params),
            json!({"instance": "i-1", "all": true})
        );
    }

    #[test]
    fn delete_requires_keys_or_all() {
        let err = params_for(&delete_command(), &["--instance", "i-1"]).unwrap_err();
        assert_eq!(err.exit_code(), crate::errors::EXIT_USAGE);
    }

    #[test]
    fn delete_all_excludes_explicit_keys() {
        let err =
            params_for(&delete_command(), &["--instance", "i-1", "--all", "env"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for --all: cannot be combined with explicit KEY arguments"
        );
        assert_eq!(err.exit_code(), crate::errors::EXIT_USAGE);
    }

    #[test]
    fn list_requires_instance() {
        let err = params_for(&list_command(), &[]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing required parameters for list: instance"
        );
    }
}
