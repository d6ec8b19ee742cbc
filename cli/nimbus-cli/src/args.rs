// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! Declarative argument tables.
//!
//! A command declares its arguments as a table of [`ArgSpec`]s; the
//! framework turns the table into clap arguments and later extracts a
//! JSON value per argument from the parse result. Required-ness, choices,
//! and schema checks are enforced here rather than by clap so that
//! violations surface through the CLI error hierarchy (exit 252) with all
//! missing names reported at once.

use clap::{Arg, ArgAction, ArgMatches};
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::errors::CliError;

/// Request parameter map built from parsed arguments
pub type Params = Map<String, Value>;

/// How an argument's raw string values are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArgType {
    #[default]
    String,
    Integer,
    /// Presence flag, no value
    Boolean,
    /// Repeatable, collected into a JSON array of strings
    List,
    /// Repeatable `key=value` pairs, collected into a JSON object
    KeyValuePairs,
    /// Single value parsed as an inline JSON document
    Json,
}

/// One argument descriptor
#[derive(Debug, Clone)]
pub struct ArgSpec {
    pub name: &'static str,
    pub help: &'static str,
    pub arg_type: ArgType,
    pub required: bool,
    pub positional: bool,
    pub variadic: bool,
    pub default: Option<&'static str>,
    pub choices: &'static [&'static str],
    /// Shallow schema: `minimum`/`maximum` for integers
    pub schema: Option<Value>,
    pub short: Option<char>,
}

impl ArgSpec {
    pub fn new(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            help,
            arg_type: ArgType::String,
            required: false,
            positional: false,
            variadic: false,
            default: None,
            choices: &[],
            schema: None,
            short: None,
        }
    }

    pub fn typed(mut self, arg_type: ArgType) -> Self {
        self.arg_type = arg_type;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn positional(mut self) -> Self {
        self.positional = true;
        self
    }

    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    pub fn default_value(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    pub fn choices(mut self, choices: &'static [&'static str]) -> Self {
        self.choices = choices;
        self
    }

    pub fn schema(mut self, schema: Value) -> Self {
        self.schema = Some(schema);
        self
    }

    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    fn to_clap(&self) -> Arg {
        let mut arg = Arg::new(self.name).help(self.help);
        if self.positional {
            if self.variadic {
                arg = arg.num_args(1..).action(ArgAction::Append);
            }
        } else {
            arg = arg.long(self.name);
            if let Some(short) = self.short {
                arg = arg.short(short);
            }
            arg = match self.arg_type {
                ArgType::Boolean => arg.action(ArgAction::SetTrue),
                ArgType::List | ArgType::KeyValuePairs => arg
                    .action(ArgAction::Append)
                    .value_name(self.value_name_hint()),
                _ => arg.action(ArgAction::Set).value_name(self.value_name_hint()),
            };
        }
        arg
    }

    fn value_name_hint(&self) -> String {
        match self.arg_type {
            ArgType::KeyValuePairs => "KEY=VALUE".to_string(),
            ArgType::Json => "JSON".to_string(),
            _ => self.name.replace('-', "_").to_uppercase(),
        }
    }
}

/// Extracted argument values, keyed by spec name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArgs(Params);

impl ParsedArgs {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    /// Boolean flags are only present when set
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn list(&self, name: &str) -> Option<&Vec<Value>> {
        self.get(name).and_then(Value::as_array)
    }

    pub fn strings(&self, name: &str) -> Vec<String> {
        self.list(name)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn object(&self, name: &str) -> Option<&Params> {
        self.get(name).and_then(Value::as_object)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// The raw name → value map, for passthrough commands
    pub fn to_params(&self) -> Params {
        self.0.clone()
    }
}

/// Ordered argument table for one command
#[derive(Debug, Clone, Default)]
pub struct ArgTable {
    specs: IndexMap<&'static str, ArgSpec>,
}

impl ArgTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_specs(specs: Vec<ArgSpec>) -> Self {
        let mut table = Self::new();
        for spec in specs {
            table.insert(spec);
        }
        table
    }

    /// Add or replace a spec (plugins may override framework defaults)
    pub fn insert(&mut self, spec: ArgSpec) {
        self.specs.insert(spec.name, spec);
    }

    pub fn remove(&mut self, name: &str) -> Option<ArgSpec> {
        self.specs.shift_remove(name)
    }

    pub fn get(&self, name: &str) -> Option<&ArgSpec> {
        self.specs.get(name)
    }

    pub fn specs(&self) -> impl Iterator<Item = &ArgSpec> {
        self.specs.values()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Render the table as clap arguments, in declaration order
    pub fn to_clap_args(&self) -> Vec<Arg> {
        self.specs().map(ArgSpec::to_clap).collect()
    }

    /// Pull values out of a clap parse result, applying defaults and
    /// framework-side validation.
    pub fn extract(&self, matches: &ArgMatches, object_name: &str) -> Result<ParsedArgs, CliError> {
        let mut values = Params::new();
        let mut missing: Vec<String> = Vec::new();

        for spec in self.specs() {
            match extract_one(spec, matches)? {
                Some(value) => {
                    values.insert(spec.name.to_string(), value);
                }
                None => {
                    if let Some(default) = spec.default {
                        values.insert(spec.name.to_string(), convert_scalar(spec, default)?);
                    } else if spec.required {
                        missing.push(spec.name.to_string());
                    }
                }
            }
        }

        if !missing.is_empty() {
            return Err(CliError::missing_parameters(object_name, missing));
        }
        Ok(ParsedArgs(values))
    }
}

fn extract_one(spec: &ArgSpec, matches: &ArgMatches) -> Result<Option<Value>, CliError> {
    match spec.arg_type {
        ArgType::Boolean => Ok(matches.get_flag(spec.name).then_some(Value::Bool(true))),
        ArgType::List => Ok(raw_many(spec, matches).map(|raw| {
            Value::Array(raw.into_iter().map(Value::from).collect())
        })),
        ArgType::KeyValuePairs => match raw_many(spec, matches) {
            None => Ok(None),
            Some(raw) => {
                let mut object = Params::new();
                for pair in raw {
                    let (key, value) = pair.split_once('=').ok_or_else(|| {
                        CliError::invalid_parameter(
                            spec.name,
                            format!("'{pair}' is not a KEY=VALUE pair"),
                        )
                    })?;
                    object.insert(key.to_string(), Value::from(value));
                }
                Ok(Some(Value::Object(object)))
            }
        },
        _ => {
            // String/Integer/Json; variadic positionals come through as a list
            if spec.variadic {
                return Ok(raw_many(spec, matches).map(|raw| {
                    Value::Array(raw.into_iter().map(Value::from).collect())
                }));
            }
            match matches.get_one::<String>(spec.name) {
                None => Ok(None),
                Some(raw) => convert_scalar(spec, raw).map(Some),
            }
        }
    }
}

fn raw_many(spec: &ArgSpec, matches: &ArgMatches) -> Option<Vec<String>> {
    matches
        .get_many::<String>(spec.name)
        .map(|raw| raw.cloned().collect())
}

fn convert_scalar(spec: &ArgSpec, raw: &str) -> Result<Value, CliError> {
    if !spec.choices.is_empty() && !spec.choices.contains(&raw) {
        return Err(CliError::invalid_parameter(
            spec.name,
            format!("'{raw}' is not one of: {}", spec.choices.join(", ")),
        ));
    }

    match spec.arg_type {
        ArgType::Integer => {
            let value: i64 = raw.parse().map_err(|_| {
                CliError::invalid_parameter(spec.name, format!("'{raw}' is not an integer"))
            })?;
            check_integer_schema(spec, value)?;
            Ok(Value::from(value))
        }
        ArgType::Json => serde_json::from_str(raw).map_err(|err| {
            CliError::invalid_parameter(spec.name, format!("not valid JSON: {err}"))
        }),
        _ => Ok(Value::from(raw)),
    }
}

/// Serialize a typed request body into a parameter map
pub fn params_from<T: serde::Serialize>(request: &T) -> Result<Params, CliError> {
    match serde_json::to_value(request)? {
        Value::Object(map) => Ok(map),
        _ => Ok(Params::new()),
    }
}

fn check_integer_schema(spec: &ArgSpec, value: i64) -> Result<(), CliError> {
    let Some(schema) = &spec.schema else {
        return Ok(());
    };
    if let Some(min) = schema.get("minimum").and_then(Value::as_i64) {
        if value < min {
            return Err(CliError::invalid_parameter(
                spec.name,
                format!("{value} is below the minimum of {min}"),
            ));
        }
    }
    if let Some(max) = schema.get("maximum").and_then(Value::as_i64) {
        if value > max {
            return Err(CliError::invalid_parameter(
                spec.name,
                format!("{value} is above the maximum of {max}"),
            ));
        }
    }
    Ok(())
}
