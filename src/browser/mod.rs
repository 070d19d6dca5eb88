// Copyright (c) 2026 REMS contributors.
// Licensed under the MIT license.

//! Headless browser: pages, navigation and PDF export

mod browser;
mod config;
mod page;
mod pdf;

pub use browser::Browser;
pub use config::{BrowserConfig, PageConfig};
pub use page::Page;
pub use pdf::{PdfGenerator, PrintToPdfOptions, TextPdfGenerator};
