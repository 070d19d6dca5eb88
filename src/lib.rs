// Copyright (c) 2026 REMS contributors.
// Licensed under the MIT license.

//! # rems-print - Headless print-to-PDF for REMS reports
//!
//! A pure Rust headless browser that loads an authenticated report page and
//! prints it to an A4 PDF. No Chrome/Chromium dependency - uses boa_engine
//! for JavaScript execution.
//!
//! ## Features
//!
//! - Credential injection: `x-rems-api-key` / `x-rems-user-id` on every
//!   outgoing request, subresources included
//! - Request logging: method and URL of each request the page makes
//! - Console forwarding: page console output and uncaught script errors
//!   are replayed in order, and never fail the export
//! - Network-idle navigation: returns once the page has stopped loading
//! - A4 PDF export via printpdf
//!
//! ## Example
//!
//! ```rust,no_run
//! use rems_print::{export, ExportParams};
//! use std::path::PathBuf;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let params = ExportParams {
//!         user: "alice".into(),
//!         api_key: "secret".into(),
//!         url: "https://rems.example.com/report/42".into(),
//!         output_file: PathBuf::from("report.pdf"),
//!     };
//!
//!     let summary = export(&params).await?;
//!     println!("wrote {} bytes", summary.pdf_bytes);
//!     Ok(())
//! }
//! ```

pub mod browser;
pub mod dom;
pub mod error;
pub mod exporter;
pub mod http;
pub mod js;
pub mod network;

// Re-exports for convenience

// Export flow
pub use exporter::{export, ExportParams, ExportSummary};

// Browser and Page
pub use browser::{Browser, BrowserConfig, Page, PageConfig};

// PDF
pub use browser::{PdfGenerator, PrintToPdfOptions, TextPdfGenerator};

// DOM
pub use dom::{Document, Element, Node};

// Errors
pub use error::{Error, Result};

// HTTP
pub use http::{HttpClient, Request, Response};

// JavaScript
pub use js::{ConsoleLevel, ConsoleMessage, JsRuntime, JsRuntimeConfig, PageEvent};

// Network
pub use network::{
    CredentialInjector, IdleConfig, InFlightGuard, InterceptAction, InterceptorChain,
    NetworkEvent, NetworkPipeline, RequestInterceptor, RequestKind, RequestLogger,
};

/// rems-print version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
