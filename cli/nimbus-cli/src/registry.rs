// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! Event registry for command and documentation plugins.
//!
//! Command modules do not hardcode themselves into the dispatcher; they
//! register handlers for well-known lifecycle events and the framework
//! emits those events while assembling the CLI:
//!
//! - `building-command-table.main` — populate the top-level command table
//! - `building-command-table.<group>` — populate a group's subcommands
//! - `building-arg-table.<command>` — amend a command's argument table
//! - `doc-option.<command>.<arg>`, `doc-examples.<command>`,
//!   `doc-epilog.<command>` — contribute help sections
//!
//! Patterns match an event exactly, or by prefix with a trailing `.*`.
//! Handlers fire in registration order.

use crate::args::ArgTable;
use crate::command::CommandTable;
use crate::help::DocSink;

/// Mutable state passed to event handlers
pub enum EventPayload<'a> {
    CommandTable(&'a mut CommandTable),
    ArgTable(&'a mut ArgTable),
    Doc(&'a mut DocSink),
}

type Handler = Box<dyn Fn(&str, &mut EventPayload<'_>) + Send + Sync>;

/// Ordered pattern → handler registry
#[derive(Default)]
pub struct EventRegistry {
    handlers: Vec<(String, Handler)>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for an event pattern
    pub fn register<F>(&mut self, pattern: impl Into<String>, handler: F)
    where
        F: Fn(&str, &mut EventPayload<'_>) + Send + Sync + 'static,
    {
        self.handlers.push((pattern.into(), Box::new(handler)));
    }

    /// Fire all matching handlers in registration order.
    ///
    /// Returns how many handlers ran.
    pub fn emit(&self, event: &str, payload: &mut EventPayload<'_>) -> usize {
        let mut fired = 0;
        for (pattern, handler) in &self.handlers {
            if pattern_matches(pattern, event) {
                handler(event, payload);
                fired += 1;
            }
        }
        fired
    }
}

fn pattern_matches(pattern: &str, event: &str) -> bool {
    if let Some(prefix) = pattern.strip_suffix(".*") {
        event
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('.'))
    } else {
        pattern == event
    }
}
