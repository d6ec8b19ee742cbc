// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! Table and text output formatting

use comfy_table::{Table, presets::NOTHING};
use serde_json::Value;

use super::{Column, Projection, json};
use crate::errors::CliError;

/// Create a new table with headers
pub fn create_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(NOTHING);
    table.set_header(headers);
    table
}

/// Format a table and print it
pub fn print_table(table: Table) {
    println!("{table}");
}

/// Render a document through a projection.
///
/// `with_headers` selects table output; without it, rows are printed as
/// tab-separated text for scripting.
pub fn print_projected(
    value: &Value,
    projection: &Projection,
    with_headers: bool,
) -> Result<(), CliError> {
    match projection {
        Projection::Raw => json::print_json(value),
        Projection::KeyValue {
            key_header,
            value_header,
        } => {
            let mut rows: Vec<(String, String)> = value
                .as_object()
                .map(|object| {
                    object
                        .iter()
                        .map(|(k, v)| (k.clone(), display_value(v)))
                        .collect()
                })
                .unwrap_or_default();
            rows.sort();
            emit(
                &[key_header, value_header],
                rows.into_iter().map(|(k, v)| vec![k, v]).collect(),
                with_headers,
            );
            Ok(())
        }
        Projection::Columns {
            items_pointer,
            columns,
        } => {
            let root = items_pointer
                .and_then(|pointer| value.pointer(pointer))
                .unwrap_or(value);
            let items: Vec<&Value> = match root {
                Value::Array(items) => items.iter().collect(),
                other => vec![other],
            };
            let rows = items
                .iter()
                .map(|item| columns.iter().map(|col| cell(item, col)).collect())
                .collect();
            let headers: Vec<&str> = columns.iter().map(|col| col.header).collect();
            emit(&headers, rows, with_headers);
            Ok(())
        }
    }
}

fn emit(headers: &[&str], rows: Vec<Vec<String>>, with_headers: bool) {
    if with_headers {
        let mut table = create_table(headers);
        for row in rows {
            table.add_row(row);
        }
        print_table(table);
    } else {
        for row in rows {
            println!("{}", row.join("\t"));
        }
    }
}

fn cell(item: &Value, column: &Column) -> String {
    let mut text = item
        .pointer(column.pointer)
        .map(display_value)
        .unwrap_or_else(|| "-".to_string());
    // Truncate on characters; byte-indexed truncation panics mid-codepoint.
    if let Some(width) = column.max_width {
        if text.chars().count() > width {
            text = text.chars().take(width).collect();
        }
    }
    text
}

fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cell_resolves_pointers_and_truncates() {
        let item = json!({"id": "0123456789abcdef", "nested": {"state": "running"}});
        assert_eq!(cell(&item, &Column::truncated("SHORTID", "/id", 8)), "01234567");
        assert_eq!(cell(&item, &Column::new("STATE", "/nested/state")), "running");
        assert_eq!(cell(&item, &Column::new("MISSING", "/nope")), "-");
    }

    #[test]
    fn cell_truncates_multibyte_values_on_character_boundaries() {
        let item = json!({"id": "日本語のID値です"});
        assert_eq!(
            cell(&item, &Column::truncated("SHORTID", "/id", 8)),
            "日本語のID値で"
        );
        // Values at or under the width pass through untouched.
        assert_eq!(cell(&item, &Column::truncated("ID", "/id", 16)), "日本語のID値です");
    }

    #[test]
    fn display_value_renders_scalars() {
        assert_eq!(display_value(&json!("x")), "x");
        assert_eq!(display_value(&json!(3)), "3");
        assert_eq!(display_value(&json!(null)), "-");
        assert_eq!(display_value(&json!(true)), "true");
    }
}
