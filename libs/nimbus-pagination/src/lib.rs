// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright 2025 Edgecast Cloud LLC.

//! Generic pagination helper for Nimbus list endpoints.
//!
//! List operations across the Nimbus APIs paginate in one of two ways:
//! newer endpoints return an opaque continuation token, older ones take a
//! numeric offset. [`fetch_all`] hides the difference behind a single
//! "fetch every page and merge the items array" call. The caller supplies
//! an async closure that performs one request given the per-page
//! parameters; this crate never touches HTTP itself.
//!
//! ```ignore
//! let spec = PageSpec {
//!     strategy: Strategy::Cursor { request_token: "marker", response_token: "nextMarker" },
//!     items_key: "instances",
//!     limit_key: "limit",
//! };
//! let merged = fetch_all(&spec, &params, Some(100), None, |page| {
//!     let client = client.clone();
//!     async move { client.call("list-instances", &page).await }
//! })
//! .await?;
//! ```

use std::future::Future;

use serde_json::{Map, Value};

/// Request parameter map, as sent to a list endpoint
pub type Params = Map<String, Value>;

/// Default page size for offset pagination when the caller does not pick one.
///
/// Offset endpoints give no end-of-results token, so a limit must always be
/// sent: the final page is detected by coming back shorter than the limit.
pub const DEFAULT_OFFSET_PAGE_SIZE: u64 = 100;

/// How an endpoint paginates
#[derive(Debug, Clone, Copy)]
pub enum Strategy {
    /// Opaque continuation token: send `request_token`, read `response_token`
    Cursor {
        request_token: &'static str,
        response_token: &'static str,
    },
    /// Numeric offset into the result set
    Offset { offset_key: &'static str },
}

/// Pagination description for one list operation
#[derive(Debug, Clone, Copy)]
pub struct PageSpec {
    pub strategy: Strategy,
    /// Response key holding the page's items array
    pub items_key: &'static str,
    /// Request key for the per-page limit
    pub limit_key: &'static str,
}

/// Fetch every page of a list operation and merge the items arrays.
///
/// Returns a single `{items_key: [...]}` document. Item order across pages
/// is preserved. `max_items` truncates the merged array exactly; a repeated
/// cursor token ends iteration rather than looping.
pub async fn fetch_all<E, F, Fut>(
    spec: &PageSpec,
    params: &Params,
    page_size: Option<u64>,
    max_items: Option<u64>,
    mut fetch: F,
) -> Result<Value, E>
where
    F: FnMut(Params) -> Fut,
    Fut: Future<Output = Result<Value, E>>,
{
    let mut merged: Vec<Value> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut offset: u64 = 0;

    // Offset endpoints always need an explicit limit, see DEFAULT_OFFSET_PAGE_SIZE.
    let limit = match spec.strategy {
        Strategy::Offset { .. } => Some(page_size.unwrap_or(DEFAULT_OFFSET_PAGE_SIZE)),
        Strategy::Cursor { .. } => page_size,
    };

    loop {
        let mut page_params = params.clone();
        if let Some(limit) = limit {
            page_params.insert(spec.limit_key.to_string(), Value::from(limit));
        }
        match spec.strategy {
            Strategy::Cursor { request_token, .. } => {
                if let Some(token) = &cursor {
                    page_params.insert(request_token.to_string(), Value::from(token.clone()));
                }
            }
            Strategy::Offset { offset_key } => {
                if offset > 0 {
                    page_params.insert(offset_key.to_string(), Value::from(offset));
                }
            }
        }

        let response = fetch(page_params).await?;
        let items = match response.get(spec.items_key).and_then(Value::as_array) {
            Some(items) => items.clone(),
            None => break,
        };
        let page_len = items.len() as u64;
        merged.extend(items);

        if let Some(max) = max_items {
            if merged.len() as u64 >= max {
                merged.truncate(max as usize);
                break;
            }
        }

        match spec.strategy {
            Strategy::Cursor { response_token, .. } => {
                let next = response
                    .get(response_token)
                    .and_then(Value::as_str)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string);
                match next {
                    // A server echoing the same token back would loop forever.
                    Some(token) if cursor.as_deref() == Some(token.as_str()) => break,
                    Some(token) => cursor = Some(token),
                    None => break,
                }
            }
            Strategy::Offset { .. } => {
                if page_len == 0 {
                    break;
                }
                if let Some(limit) = limit {
                    if page_len < limit {
                        break;
                    }
                }
                offset += page_len;
            }
        }
    }

    let mut out = Map::new();
    out.insert(spec.items_key.to_string(), Value::Array(merged));
    Ok(Value::Object(out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::convert::Infallible;
    use std::rc::Rc;

    const CURSOR_SPEC: PageSpec = PageSpec {
        strategy: Strategy::Cursor {
            request_token: "marker",
            response_token: "nextMarker",
        },
        items_key: "instances",
        limit_key: "limit",
    };

    const OFFSET_SPEC: PageSpec = PageSpec {
        strategy: Strategy::Offset { offset_key: "offset" },
        items_key: "images",
        limit_key: "limit",
    };

    /// Build a fetch closure that pops canned pages and records the
    /// parameters each page was requested with.
    fn canned(
        pages: Vec<Value>,
    ) -> (
        impl FnMut(Params) -> std::future::Ready<Result<Value, Infallible>>,
        Rc<RefCell<Vec<Params>>>,
    ) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen2 = Rc::clone(&seen);
        let mut queue: VecDeque<Value> = pages.into();
        let fetch = move |p: Params| {
            seen2.borrow_mut().push(p);
            let page = queue.pop_front().unwrap_or_else(|| json!({}));
            std::future::ready(Ok(page))
        };
        (fetch, seen)
    }

    #[tokio::test]
    async fn cursor_merges_pages_in_order() {
        let (fetch, seen) = canned(vec![
            json!({"instances": [1, 2], "nextMarker": "m1"}),
            json!({"instances": [3], "nextMarker": "m2"}),
            json!({"instances": [4]}),
        ]);
        let merged = fetch_all(&CURSOR_SPEC, &Params::new(), None, None, fetch)
            .await
            .unwrap();
        assert_eq!(merged, json!({"instances": [1, 2, 3, 4]}));

        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert!(!seen[0].contains_key("marker"));
        assert_eq!(seen[1].get("marker"), Some(&json!("m1")));
        assert_eq!(seen[2].get("marker"), Some(&json!("m2")));
    }

    #[tokio::test]
    async fn cursor_sends_page_size_as_limit() {
        let (fetch, seen) = canned(vec![json!({"instances": []})]);
        fetch_all(&CURSOR_SPEC, &Params::new(), Some(25), None, fetch)
            .await
            .unwrap();
        assert_eq!(seen.borrow()[0].get("limit"), Some(&json!(25)));
    }

    #[tokio::test]
    async fn repeated_cursor_token_stops_iteration() {
        let (fetch, seen) = canned(vec![
            json!({"instances": [1], "nextMarker": "same"}),
            json!({"instances": [2], "nextMarker": "same"}),
            json!({"instances": [3], "nextMarker": "same"}),
        ]);
        let merged = fetch_all(&CURSOR_SPEC, &Params::new(), None, None, fetch)
            .await
            .unwrap();
        assert_eq!(merged, json!({"instances": [1, 2]}));
        assert_eq!(seen.borrow().len(), 2);
    }

    #[tokio::test]
    async fn max_items_truncates_exactly() {
        let (fetch, _) = canned(vec![
            json!({"instances": [1, 2, 3], "nextMarker": "m1"}),
            json!({"instances": [4, 5, 6], "nextMarker": "m2"}),
        ]);
        let merged = fetch_all(&CURSOR_SPEC, &Params::new(), None, Some(4), fetch)
            .await
            .unwrap();
        assert_eq!(merged, json!({"instances": [1, 2, 3, 4]}));
    }

    #[tokio::test]
    async fn offset_advances_until_short_page() {
        let (fetch, seen) = canned(vec![
            json!({"images": ["a", "b"]}),
            json!({"images": ["c"]}),
        ]);
        let merged = fetch_all(&OFFSET_SPEC, &Params::new(), Some(2), None, fetch)
            .await
            .unwrap();
        assert_eq!(merged, json!({"images": ["a", "b", "c"]}));

        let seen = seen.borrow();
        assert!(!seen[0].contains_key("offset"));
        assert_eq!(seen[1].get("offset"), Some(&json!(2)));
        assert_eq!(seen[1].get("limit"), Some(&json!(2)));
    }

    #[tokio::test]
    async fn offset_defaults_a_limit() {
        let (fetch, seen) = canned(vec![json!({"images": []})]);
        fetch_all(&OFFSET_SPEC, &Params::new(), None, None, fetch)
            .await
            .unwrap();
        assert_eq!(
            seen.borrow()[0].get("limit"),
            Some(&json!(DEFAULT_OFFSET_PAGE_SIZE))
        );
    }

    #[tokio::test]
    async fn missing_items_key_yields_empty_result() {
        let (fetch, _) = canned(vec![json!({"unexpected": true})]);
        let merged = fetch_all(&CURSOR_SPEC, &Params::new(), None, None, fetch)
            .await
            .unwrap();
        assert_eq!(merged, json!({"instances": []}));
    }

    #[tokio::test]
    async fn fetch_errors_propagate() {
        let mut calls = 0;
        let result = fetch_all(&CURSOR_SPEC, &Params::new(), None, None, |_p| {
            calls += 1;
            std::future::ready(Err::<Value, String>("boom".to_string()))
        })
        .await;
        assert_eq!(result, Err("boom".to_string()));
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn original_params_are_sent_on_every_page() {
        let mut base = Params::new();
        base.insert("state".to_string(), json!("running"));
        let (fetch, seen) = canned(vec![
            json!({"instances": [1], "nextMarker": "m1"}),
            json!({"instances": [2]}),
        ]);
        fetch_all(&CURSOR_SPEC, &base, None, None, fetch)
            .await
            .unwrap();
        for page in seen.borrow().iter() {
            assert_eq!(page.get("state"), Some(&json!("running")));
        }
    }
}
