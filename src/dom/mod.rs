// Copyright (c) 2026 REMS contributors.
// Licensed under the MIT license.

//! DOM engine for HTML parsing
//!
//! A read-only document model built on top of html5ever. The exporter only
//! ever walks the tree (subresource discovery, text extraction), so there
//! is no mutation API and no CSS selector engine; lookups are by tag name.

mod document;
mod element;
mod node;
mod parser;

pub use document::Document;
pub use element::Element;
pub use node::{Node, NodeId, NodeType};
pub use parser::{parse_html, parse_html_with_url};
