// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! Help-doc event generation.
//!
//! When a leaf command is assembled, the framework walks its argument
//! table and emits documentation events; registered handlers contribute
//! extra sections (examples, per-option notes, epilogs) into a [`DocSink`].
//! The rendered sink becomes the command's plain-text "after help". Clap
//! owns usage/option rendering; this layer only adds the sections clap
//! cannot know about.

use crate::command::CliCommand;
use crate::registry::{EventPayload, EventRegistry};

/// Collected help sections, in emission order
#[derive(Debug, Default)]
pub struct DocSink {
    sections: Vec<(String, String)>,
}

impl DocSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a titled section
    pub fn push(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.sections.push((title.into(), body.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Render all sections as indented plain text
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (title, body) in &self.sections {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(title);
            out.push_str(":\n");
            for line in body.lines() {
                out.push_str("  ");
                out.push_str(line);
                out.push('\n');
            }
        }
        out
    }
}

/// Emit the doc events for one command and render the contributed sections.
///
/// Returns `None` when no handler added anything, so commands without
/// registered examples keep clap's default help untouched.
pub fn extra_sections(
    command: &dyn CliCommand,
    full_name: &str,
    registry: &EventRegistry,
) -> Option<String> {
    let mut sink = DocSink::new();

    for spec in command.arg_table().specs() {
        registry.emit(
            &format!("doc-option.{full_name}.{}", spec.name),
            &mut EventPayload::Doc(&mut sink),
        );
    }
    registry.emit(
        &format!("doc-examples.{full_name}"),
        &mut EventPayload::Doc(&mut sink),
    );
    registry.emit(
        &format!("doc-epilog.{full_name}"),
        &mut EventPayload::Doc(&mut sink),
    );

    if sink.is_empty() {
        None
    } else {
        Some(sink.render())
    }
}
