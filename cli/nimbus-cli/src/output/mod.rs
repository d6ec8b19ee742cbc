// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! Output formatting utilities

pub mod json;
pub mod table;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::CliError;
use crate::globals::OutputFormat;

/// One table column: header plus a JSON pointer into each row value
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    pub pointer: &'static str,
    /// Truncate the rendered cell (short IDs)
    pub max_width: Option<usize>,
}

impl Column {
    pub const fn new(header: &'static str, pointer: &'static str) -> Self {
        Self {
            header,
            pointer,
            max_width: None,
        }
    }

    pub const fn truncated(header: &'static str, pointer: &'static str, width: usize) -> Self {
        Self {
            header,
            pointer,
            max_width: Some(width),
        }
    }
}

/// How a response document maps onto rows for table/text output.
///
/// JSON and YAML output always print the full document; the projection
/// only affects the human-readable formats.
#[derive(Debug, Clone, Copy)]
pub enum Projection {
    /// No tabular shape: fall back to pretty JSON
    Raw,
    /// Rows taken from an array (or a single object), cells by pointer
    Columns {
        items_pointer: Option<&'static str>,
        columns: &'static [Column],
    },
    /// A string → string map rendered as two sorted columns
    KeyValue {
        key_header: &'static str,
        value_header: &'static str,
    },
}

/// Re-encode a response document through its typed schema.
///
/// Commands with a published response type run their documents through
/// here before rendering: a document that does not match the type is a
/// hard error instead of a table of "-" cells, and projections point
/// into a stable field set.
pub fn decode_item<T: DeserializeOwned + Serialize>(value: &Value) -> Result<Value, CliError> {
    let typed: T = serde_json::from_value(value.clone()).map_err(CliError::Decode)?;
    Ok(serde_json::to_value(&typed)?)
}

/// Like [`decode_item`], for `{items_key: [...]}` list documents
pub fn decode_items<T: DeserializeOwned + Serialize>(
    value: &Value,
    items_key: &str,
) -> Result<Value, CliError> {
    let items: Vec<T> = match value.get(items_key) {
        Some(items) => serde_json::from_value(items.clone()).map_err(CliError::Decode)?,
        None => Vec::new(),
    };
    let mut out = serde_json::Map::new();
    out.insert(items_key.to_string(), serde_json::to_value(&items)?);
    Ok(Value::Object(out))
}

/// Render a response document in the requested format
pub fn render(value: &Value, format: OutputFormat, projection: &Projection) -> Result<(), CliError> {
    // Operations without a response body have nothing to print.
    if value.is_null() {
        return Ok(());
    }
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Yaml => json::print_yaml(value),
        OutputFormat::Table => table::print_projected(value, projection, true),
        OutputFormat::Text => table::print_projected(value, projection, false),
    }
}
