// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! Global CLI options shared by every command.
//!
//! Resolution order for each option: CLI flag, then environment variable,
//! then the active profile, then the built-in default.

use std::str::FromStr;

use clap::{Arg, ArgAction, ArgMatches};
use nimbus_client::ClientConfig;

use crate::config::Profile;
use crate::errors::CliError;

/// Output rendering format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Yaml,
    #[default]
    Table,
    Text,
}

/// Parsed global options
#[derive(Debug, Clone, Default)]
pub struct ParsedGlobals {
    pub profile: Option<String>,
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub verify_ssl: bool,
    pub paginate: bool,
    pub output: OutputFormat,
    pub page_size: Option<u64>,
    pub max_items: Option<u64>,
    pub debug: bool,
}

/// Global argument definitions, attached to the root command
pub fn global_args() -> Vec<Arg> {
    vec![
        Arg::new("profile")
            .long("profile")
            .short('p')
            .global(true)
            .env("NIMBUS_PROFILE")
            .value_name("NAME")
            .help("Profile to use"),
        Arg::new("region")
            .long("region")
            .short('r')
            .global(true)
            .env("NIMBUS_REGION")
            .value_name("REGION")
            .help("Region to send requests to"),
        Arg::new("endpoint-url")
            .long("endpoint-url")
            .global(true)
            .env("NIMBUS_ENDPOINT_URL")
            .value_name("URL")
            .help("Override the service endpoint URL"),
        Arg::new("no-verify-ssl")
            .long("no-verify-ssl")
            .global(true)
            .action(ArgAction::SetTrue)
            .help("Skip TLS certificate verification"),
        Arg::new("no-paginate")
            .long("no-paginate")
            .global(true)
            .action(ArgAction::SetTrue)
            .help("Return only the first page of list results"),
        Arg::new("output")
            .long("output")
            .short('o')
            .global(true)
            .env("NIMBUS_OUTPUT")
            .value_name("FORMAT")
            .help("Output format: json, yaml, table, or text"),
        Arg::new("page-size")
            .long("page-size")
            .global(true)
            .value_name("N")
            .help("Number of items to request per page"),
        Arg::new("max-items")
            .long("max-items")
            .global(true)
            .value_name("N")
            .help("Cap the total number of items returned by list commands"),
        Arg::new("debug")
            .long("debug")
            .global(true)
            .action(ArgAction::SetTrue)
            .help("Enable debug logging"),
    ]
}

fn parse_u64(matches: &ArgMatches, name: &str) -> Result<Option<u64>, CliError> {
    match matches.get_one::<String>(name) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<u64>()
            .map(Some)
            .map_err(|_| CliError::invalid_parameter(name, format!("'{raw}' is not a positive integer"))),
    }
}

impl ParsedGlobals {
    /// Build globals from the leaf command's matches plus profile defaults
    pub fn from_matches(matches: &ArgMatches, profile: Option<&Profile>) -> Result<Self, CliError> {
        let output = match matches
            .get_one::<String>("output")
            .cloned()
            .or_else(|| profile.and_then(|p| p.output.clone()))
        {
            None => OutputFormat::default(),
            Some(raw) => OutputFormat::from_str(&raw).map_err(|_| {
                CliError::invalid_parameter("output", "expected one of json, yaml, table, text")
            })?,
        };

        let region = matches
            .get_one::<String>("region")
            .cloned()
            .or_else(|| profile.and_then(|p| p.region.clone()));
        let endpoint_url = matches
            .get_one::<String>("endpoint-url")
            .cloned()
            .or_else(|| profile.and_then(|p| p.endpoint_url.clone()));

        let insecure_profile = profile.is_some_and(|p| p.insecure);

        Ok(Self {
            profile: matches.get_one::<String>("profile").cloned(),
            region,
            endpoint_url,
            verify_ssl: !(matches.get_flag("no-verify-ssl") || insecure_profile),
            paginate: !matches.get_flag("no-paginate"),
            output,
            page_size: parse_u64(matches, "page-size")?,
            max_items: parse_u64(matches, "max-items")?,
            debug: matches.get_flag("debug"),
        })
    }

    /// Connection options for client creation
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            region: self.region.clone(),
            endpoint_url: self.endpoint_url.clone(),
            verify: self.verify_ssl,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn matches_for(argv: &[&str]) -> ArgMatches {
        clap::Command::new("test")
            .args(global_args())
            .try_get_matches_from(std::iter::once("test").chain(argv.iter().copied()))
            .unwrap()
    }

    #[test_case("json", OutputFormat::Json)]
    #[test_case("yaml", OutputFormat::Yaml)]
    #[test_case("table", OutputFormat::Table)]
    #[test_case("text", OutputFormat::Text)]
    fn output_format_parses(raw: &str, expected: OutputFormat) {
        let globals =
            ParsedGlobals::from_matches(&matches_for(&["--output", raw]), None).unwrap();
        assert_eq!(globals.output, expected);
    }

    #[test]
    fn bad_output_format_is_a_usage_error() {
        let err =
            ParsedGlobals::from_matches(&matches_for(&["--output", "xml"]), None).unwrap_err();
        assert_eq!(err.exit_code(), crate::errors::EXIT_USAGE);
    }

    #[test]
    fn defaults() {
        let globals = ParsedGlobals::from_matches(&matches_for(&[]), None).unwrap();
        assert_eq!(globals.output, OutputFormat::Table);
        assert!(globals.paginate);
        assert!(globals.verify_ssl);
        assert_eq!(globals.page_size, None);
    }

    #[test]
    fn flags_override_profile_defaults() {
        let mut profile = Profile::new("test");
        profile.region = Some("eu-central-1".to_string());
        profile.output = Some("json".to_string());

        let globals = ParsedGlobals::from_matches(
            &matches_for(&["--region", "us-west-1"]),
            Some(&profile),
        )
        .unwrap();
        assert_eq!(globals.region.as_deref(), Some("us-west-1"));
        assert_eq!(globals.output, OutputFormat::Json);
    }

    #[test]
    fn page_size_must_be_numeric() {
        let err = ParsedGlobals::from_matches(&matches_for(&["--page-size", "lots"]), None)
            .unwrap_err();
        assert!(matches!(err, CliError::InvalidParameter { .. }));
    }
}
