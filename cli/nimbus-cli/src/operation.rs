// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! Generic "invoke remote operation" caller.
//!
//! Every remote-facing command funnels through here: create a client for
//! the bound service from the session and global options, then either
//! drive the pagination shim (list operations, unless --no-paginate) or
//! make the single call.

use nimbus_client::{Client, Session};
use serde_json::Value;
use tracing::debug;

use crate::args::Params;
use crate::errors::CliError;
use crate::globals::ParsedGlobals;

pub struct OperationCaller<'a> {
    session: &'a Session,
    globals: &'a ParsedGlobals,
}

impl<'a> OperationCaller<'a> {
    pub fn new(session: &'a Session, globals: &'a ParsedGlobals) -> Self {
        Self { session, globals }
    }

    /// Create a client for a service using the resolved global options
    pub fn client(&self, service: &str) -> Result<Client, CliError> {
        Ok(self
            .session
            .create_client(service, &self.globals.client_config())?)
    }

    /// Call `operation` on `service` and return the response document
    pub async fn invoke(
        &self,
        service: &str,
        operation: &str,
        params: Params,
    ) -> Result<Value, CliError> {
        let client = self.client(service)?;

        let response = if self.globals.paginate && client.can_paginate(operation) {
            debug!(service, operation, "invoking paginated operation");
            client
                .paginate(
                    operation,
                    &params,
                    self.globals.page_size,
                    self.globals.max_items,
                )
                .await?
        } else {
            debug!(service, operation, "invoking operation");
            client.call(operation, &params).await?
        };

        Ok(response)
    }
}
