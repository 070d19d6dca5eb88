// Copyright (c) 2026 REMS contributors.
// Licensed under the MIT license.

//! HTTP client layer for the exporter
//!
//! A lightweight client on top of reqwest. Everything a page loads goes
//! through this layer, which is what makes whole-run header injection
//! possible further up in the network pipeline.

mod client;
mod request;
mod response;

pub use client::{HttpClient, HttpClientConfig};
pub use request::Request;
pub use response::Response;

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Common HTTP headers
pub mod headers {
    pub const ACCEPT: &str = "accept";
    pub const CONTENT_TYPE: &str = "content-type";
    pub const USER_AGENT: &str = "user-agent";
    pub const REFERER: &str = "referer";

    /// API key header injected into every intercepted request
    pub const X_REMS_API_KEY: &str = "x-rems-api-key";
    /// User identity header injected into every intercepted request
    pub const X_REMS_USER_ID: &str = "x-rems-user-id";
}
