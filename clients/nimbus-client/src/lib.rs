// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! Nimbus API Client Library
//!
//! Thin typed access to the Nimbus cloud APIs. A [`Session`] hands out
//! per-service [`Client`]s; each client method call maps 1:1 to a remote
//! operation. Requests are plain JSON-over-HTTPS with a bearer token; there
//! is no retry or request-signing machinery here by design.
//!
//! ## Usage
//!
//! ```ignore
//! use nimbus_client::{ClientConfig, Session};
//!
//! let session = Session::new(Some("my-token".to_string()));
//! let config = ClientConfig {
//!     region: Some("us-west-1".to_string()),
//!     endpoint_url: None,
//!     verify: true,
//! };
//! let client = session.create_client("compute", &config)?;
//!
//! let instances = client.call("list-instances", &params).await?;
//! ```
//!
//! List operations can be driven through the pagination shim:
//!
//! ```ignore
//! if client.can_paginate("list-instances") {
//!     let merged = client.paginate("list-instances", &params, Some(100), None).await?;
//! }
//! ```

pub mod waiter;

pub use waiter::{DEFAULT_WAIT_ATTEMPTS, DEFAULT_WAIT_INTERVAL, Waiter};

use nimbus_pagination::{PageSpec, Params, Strategy};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Errors surfaced by the client.
///
/// `Api` carries the remote error code and message verbatim; everything else
/// is a local failure before or after the wire.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("remote operation {operation} failed ({status} {code}): {message}")]
    Api {
        operation: String,
        status: u16,
        code: String,
        message: String,
    },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid endpoint URL: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error("unexpected response body for {operation}: {source}")]
    Body {
        operation: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no region configured and no endpoint URL override given")]
    MissingRegion,

    #[error("timed out waiting for {operation} to report state '{target}'")]
    WaitTimeout { operation: String, target: String },

    #[error("gave up waiting for {operation}: resource entered state '{state}'")]
    WaitFailed { operation: String, state: String },
}

/// Error body shape returned by all Nimbus services
#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: String,
    message: String,
}

/// Per-client connection options, resolved by the caller from CLI flags,
/// environment, and profile.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub verify: bool,
}

/// An authenticated session, the factory for per-service clients
#[derive(Debug, Clone, Default)]
pub struct Session {
    token: Option<String>,
}

impl Session {
    pub fn new(token: Option<String>) -> Self {
        Self { token }
    }

    /// Build a session from the `NIMBUS_TOKEN` environment variable
    pub fn from_env() -> Self {
        Self::new(std::env::var("NIMBUS_TOKEN").ok())
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Create a client for `service` ("compute", "directory", ...).
    ///
    /// The endpoint is the explicit `endpoint_url` override when given,
    /// otherwise derived from the region.
    pub fn create_client(&self, service: &str, config: &ClientConfig) -> Result<Client, ApiError> {
        let endpoint = match (&config.endpoint_url, &config.region) {
            (Some(url), _) => url.clone(),
            (None, Some(region)) => default_endpoint(service, region),
            (None, None) => return Err(ApiError::MissingRegion),
        };

        let mut base = Url::parse(&endpoint)?;
        // Url::join drops the last path segment unless the base ends in '/'.
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }

        let http = reqwest::Client::builder()
            .danger_accept_invalid_certs(!config.verify)
            .build()?;

        Ok(Client {
            service: service.to_string(),
            base,
            http,
            token: self.token.clone(),
        })
    }
}

/// Default endpoint for a service in a region
pub fn default_endpoint(service: &str, region: &str) -> String {
    format!("https://{service}.{region}.api.nimbus.cloud")
}

/// A client bound to one service endpoint
#[derive(Debug, Clone)]
pub struct Client {
    service: String,
    base: Url,
    http: reqwest::Client,
    token: Option<String>,
}

impl Client {
    /// Service name this client was created for
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Resolved base URL
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Invoke a remote operation with a JSON parameter map.
    ///
    /// Empty (204) responses come back as `Value::Null`.
    pub async fn call(&self, operation: &str, params: &Params) -> Result<Value, ApiError> {
        let url = self.base.join(&format!("v1/{operation}"))?;
        debug!(service = %self.service, operation, %url, "calling remote operation");

        let mut request = self.http.post(url).json(&Value::Object(params.clone()));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let (code, message) = match serde_json::from_str::<ErrorBody>(&body) {
                Ok(err) => (err.code, err.message),
                Err(_) => ("UnknownError".to_string(), body.trim().to_string()),
            };
            return Err(ApiError::Api {
                operation: operation.to_string(),
                status: status.as_u16(),
                code,
                message,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|source| ApiError::Body {
            operation: operation.to_string(),
            source,
        })
    }

    /// Whether the operation has pagination metadata
    pub fn can_paginate(&self, operation: &str) -> bool {
        page_spec(operation).is_some()
    }

    /// Fetch all pages of a list operation and merge them.
    ///
    /// Falls back to a single [`call`](Self::call) for operations without
    /// pagination metadata.
    pub async fn paginate(
        &self,
        operation: &str,
        params: &Params,
        page_size: Option<u64>,
        max_items: Option<u64>,
    ) -> Result<Value, ApiError> {
        let Some(spec) = page_spec(operation) else {
            return self.call(operation, params).await;
        };
        nimbus_pagination::fetch_all(spec, params, page_size, max_items, |page| {
            let client = self.clone();
            let operation = operation.to_string();
            async move { client.call(&operation, &page).await }
        })
        .await
    }

    /// Start building a waiter over this client
    pub fn waiter(&self) -> Waiter<'_> {
        Waiter::new(self)
    }
}

/// Pagination metadata per list operation.
///
/// Compute list endpoints use cursor tokens; the older image catalog takes
/// limit/offset. Directory listings are small and unpaginated.
static PAGINATED_OPERATIONS: &[(&str, PageSpec)] = &[
    (
        "list-instances",
        PageSpec {
            strategy: Strategy::Cursor {
                request_token: "marker",
                response_token: "nextMarker",
            },
            items_key: "instances",
            limit_key: "limit",
        },
    ),
    (
        "list-keys",
        PageSpec {
            strategy: Strategy::Cursor {
                request_token: "marker",
                response_token: "nextMarker",
            },
            items_key: "keys",
            limit_key: "limit",
        },
    ),
    (
        "list-images",
        PageSpec {
            strategy: Strategy::Offset { offset_key: "offset" },
            items_key: "images",
            limit_key: "limit",
        },
    ),
];

/// Look up pagination metadata for an operation
pub fn page_spec(operation: &str) -> Option<&'static PageSpec> {
    PAGINATED_OPERATIONS
        .iter()
        .find(|(name, _)| *name == operation)
        .map(|(_, spec)| spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test]
    fn default_endpoint_derives_from_region() {
        assert_eq!(
            default_endpoint("compute", "us-west-1"),
            "https://compute.us-west-1.api.nimbus.cloud"
        );
    }

    #[test]
    fn create_client_requires_region_or_endpoint() {
        let session = Session::new(None);
        let result = session.create_client("compute", &ClientConfig::default());
        assert!(matches!(result, Err(ApiError::MissingRegion)));
    }

    #[test]
    fn create_client_normalizes_trailing_slash() {
        let session = Session::new(None);
        let config = ClientConfig {
            region: None,
            endpoint_url: Some("https://example.com/nimbus".to_string()),
            verify: true,
        };
        let client = session.create_client("compute", &config).unwrap();
        assert_eq!(client.base_url().path(), "/nimbus/");
        assert_eq!(
            client.base_url().join("v1/list-instances").unwrap().as_str(),
            "https://example.com/nimbus/v1/list-instances"
        );
    }

    #[test]
    fn endpoint_override_beats_region() {
        let session = Session::new(None);
        let config = ClientConfig {
            region: Some("us-west-1".to_string()),
            endpoint_url: Some("https://localhost:8443".to_string()),
            verify: false,
        };
        let client = session.create_client("compute", &config).unwrap();
        assert_eq!(client.base_url().host_str(), Some("localhost"));
    }

    #[test_case("list-instances", true)]
    #[test_case("list-images", true)]
    #[test_case("list-keys", true)]
    #[test_case("get-instance", false)]
    #[test_case("list-datacenters", false)]
    fn pagination_metadata(operation: &str, expected: bool) {
        assert_eq!(page_spec(operation).is_some(), expected);
    }

    #[test]
    fn api_error_renders_one_line() {
        let err = ApiError::Api {
            operation: "get-instance".to_string(),
            status: 404,
            code: "ResourceNotFound".to_string(),
            message: "no such instance".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "remote operation get-instance failed (404 ResourceNotFound): no such instance"
        );
    }
}
