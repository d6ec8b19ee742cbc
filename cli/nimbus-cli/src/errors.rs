// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! CLI error hierarchy and exit-code mapping.
//!
//! Validation failures (bad or missing arguments) exit 252; everything
//! else, including remote API errors, exits 255. All errors surface as a
//! single stderr line.

use nimbus_client::ApiError;
use thiserror::Error;

/// Exit code for argument validation failures
pub const EXIT_USAGE: i32 = 252;

/// Exit code for all other failures
pub const EXIT_FAILURE: i32 = 255;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("missing required parameters for {object_name}: {}", .missing.join(", "))]
    MissingParameters {
        object_name: String,
        missing: Vec<String>,
    },

    #[error("options --{first} and --{second} cannot be used together")]
    MutuallyExclusiveOptions { first: String, second: String },

    #[error("invalid value for --{param}: {reason}")]
    InvalidParameter { param: String, reason: String },

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to render output: {0}")]
    Render(#[from] serde_json::Error),

    #[error("unexpected response document: {0}")]
    Decode(serde_json::Error),

    #[error("failed to render output: {0}")]
    RenderYaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Missing-parameter error with a stable (sorted) parameter list
    pub fn missing_parameters(object_name: &str, mut missing: Vec<String>) -> Self {
        missing.sort();
        Self::MissingParameters {
            object_name: object_name.to_string(),
            missing,
        }
    }

    pub fn mutually_exclusive(first: &str, second: &str) -> Self {
        Self::MutuallyExclusiveOptions {
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    pub fn invalid_parameter(param: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.to_string(),
            reason: reason.into(),
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingParameters { .. }
            | Self::MutuallyExclusiveOptions { .. }
            | Self::InvalidParameter { .. } => EXIT_USAGE,
            _ => EXIT_FAILURE,
        }
    }
}
