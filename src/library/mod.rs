//! # Photos Library Integration Module
//!
//! This module implements the client side of the Google Photos Library
//! API: the aggregation loops that drive the paginated search, batch-get
//! and album listing endpoints until enough items have been collected or
//! the remote runs out of pages.
//!
//! ## Overview
//!
//! The Library API returns results in server-chosen pages linked by an
//! opaque continuation token. Each aggregation run owns its token
//! exclusively: the token returned by one page call is threaded into the
//! next call's parameters and never stored outside the running loop.
//!
//! ```text
//! Orchestrator (management::queue)
//!          ↓
//! Aggregation loops
//!     ├── search (filters / albumId, threshold + token driven)
//!     ├── batch-get (mediaItemIds, token driven)
//!     └── list albums (token driven)
//!          ↓
//! HTTP layer (reqwest, JSON)
//!          ↓
//! Photos Library API
//! ```
//!
//! ## Error handling
//!
//! Every network call is followed by a single normalization step that
//! produces the canonical [`ApiError`](crate::types::ApiError) shape
//! before any business logic looks at the result. A structured error body
//! from the remote is surfaced verbatim; everything else (non-JSON error
//! bodies, connect failures, decode failures) is synthesized from the
//! status or the transport error. A failed page aborts the whole
//! aggregation; no retries are attempted and accumulated items travel
//! back as informational context only.
//!
//! ## Termination
//!
//! The loops terminate when the continuation token is exhausted, which
//! the remote contract guarantees. No page-count ceiling or request
//! timeout is imposed on top of the transport's own behavior.

mod albums;
mod items;
mod search;

pub use albums::AlbumAggregate;
pub use search::MediaItemAggregate;

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::{
    config,
    types::{ApiError, ErrorBody},
};

/// Client for the Photos Library API. Cheap to construct per request;
/// carries the base URL so tests can point it at a local fixture.
pub struct LibraryClient {
    base_url: String,
    http: Client,
}

impl LibraryClient {
    pub fn new() -> Self {
        Self::with_base_url(config::photos_api_url())
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        LibraryClient {
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Default for LibraryClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalizes the outcome of one page request. Exactly one of three
/// things comes back: the decoded page, the remote's structured error, or
/// an error synthesized from the status or transport failure.
pub(crate) async fn decode_page<T: DeserializeOwned>(
    outcome: Result<reqwest::Response, reqwest::Error>,
) -> Result<T, ApiError> {
    let response = outcome.map_err(ApiError::from_transport)?;

    let status = response.status();
    if !status.is_success() {
        return Err(match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => ApiError::from_status(status),
        });
    }

    response.json::<T>().await.map_err(ApiError::from_transport)
}
