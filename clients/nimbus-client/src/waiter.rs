// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! Polling waiter for asynchronous resource state changes.
//!
//! CloudAPI-style provisioning is eventually consistent: launch returns
//! before the instance runs. The waiter re-invokes a get operation until a
//! field (addressed by JSON pointer) reaches the target value, fails fast
//! on terminal failure states, and gives up after a bounded number of
//! attempts.

use std::time::Duration;

use nimbus_api::InstanceState;
use nimbus_pagination::Params;
use serde_json::Value;
use tracing::debug;

use crate::{ApiError, Client};

/// Default poll interval
pub const DEFAULT_WAIT_INTERVAL: Duration = Duration::from_secs(2);

/// Default attempt bound (with the default interval: two minutes)
pub const DEFAULT_WAIT_ATTEMPTS: u32 = 60;

/// A bounded poll loop over one client
pub struct Waiter<'a> {
    client: &'a Client,
    interval: Duration,
    max_attempts: u32,
}

impl<'a> Waiter<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            interval: DEFAULT_WAIT_INTERVAL,
            max_attempts: DEFAULT_WAIT_ATTEMPTS,
        }
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Poll `operation` until the field at `pointer` equals `target`.
    ///
    /// Returns the final response document. A value matching any of
    /// `failure_states` aborts with [`ApiError::WaitFailed`]; exhausting the
    /// attempt budget yields [`ApiError::WaitTimeout`].
    pub async fn wait_for_state(
        &self,
        operation: &str,
        params: &Params,
        pointer: &str,
        target: &str,
        failure_states: &[&str],
    ) -> Result<Value, ApiError> {
        for attempt in 1..=self.max_attempts {
            let response = self.client.call(operation, params).await?;
            let state = response.pointer(pointer).and_then(Value::as_str);
            debug!(operation, attempt, state, target, "waiter poll");

            match state {
                Some(state) if state == target => return Ok(response),
                Some(state) if failure_states.contains(&state) => {
                    return Err(ApiError::WaitFailed {
                        operation: operation.to_string(),
                        state: state.to_string(),
                    });
                }
                _ => {}
            }

            if attempt < self.max_attempts {
                tokio::time::sleep(self.interval).await;
            }
        }

        Err(ApiError::WaitTimeout {
            operation: operation.to_string(),
            target: target.to_string(),
        })
    }

    /// Wait for an instance to reach `target`, failing fast on `failed`
    pub async fn wait_for_instance_state(
        &self,
        instance_id: &str,
        target: InstanceState,
    ) -> Result<Value, ApiError> {
        let mut params = Params::new();
        params.insert("id".to_string(), Value::from(instance_id));
        let failed = InstanceState::Failed.to_string();
        self.wait_for_state(
            "get-instance",
            &params,
            "/state",
            &target.to_string(),
            &[failed.as_str()],
        )
        .await
    }
}
