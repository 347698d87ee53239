//! Catalog feed client and parser.
//!
//! # Architecture
//!
//! The feed is a spreadsheet-backed HTTP endpoint returning gviz-framed
//! JSON: a fixed-length textual wrapper around a `{"table": {"rows": ...}}`
//! document. Fetching ([`FeedClient`]) and parsing ([`parse_feed`]) are
//! separate so the parser stays a pure transform; the catalog store decides
//! how to install the result.
//!
//! Column order varies between deployments (name-first vs id-first), so the
//! positional mapping is configuration ([`ColumnMap`]), not a constant.

mod client;
mod columns;
mod parser;

pub use client::FeedClient;
pub use columns::{ColumnMap, ColumnMapError, Field};
pub use parser::parse_feed;

use thiserror::Error;

/// Errors that can occur while fetching or parsing the catalog feed.
#[derive(Debug, Error)]
pub enum FeedError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Feed endpoint returned a non-success status.
    #[error("feed endpoint returned {0}")]
    Status(reqwest::StatusCode),

    /// Response is shorter than its fixed-length wrapper.
    #[error("feed response too short for its wrapper: {len} bytes, wrapper needs {wrapper}")]
    Wrapper { len: usize, wrapper: usize },

    /// Payload between the wrapper markers is not valid JSON.
    #[error("feed payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
