// Copyright (c) 2026 REMS contributors.
// Licensed under the MIT license.

//! Print-to-PDF export flow
//!
//! Ties the pieces together: launch a browser, attach the credential and
//! logging interceptors, load the page, replay what its scripts said, and
//! write the PDF. The browser is released when the [`Browser`] value drops,
//! on success and failure alike.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::browser::{Browser, PdfGenerator, PrintToPdfOptions, TextPdfGenerator};
use crate::error::{Error, Result};
use crate::js::PageEvent;
use crate::network::{CredentialInjector, RequestLogger};

/// Everything one export run needs
#[derive(Debug, Clone)]
pub struct ExportParams {
    /// Value for the `x-rems-user-id` header
    pub user: String,
    /// Value for the `x-rems-api-key` header
    pub api_key: String,
    /// Page to print
    pub url: String,
    /// Where the PDF goes
    pub output_file: PathBuf,
}

impl ExportParams {
    /// Parse positional arguments: `<user> <apiKey> <url> <outputFile>`
    pub fn from_args(args: &[String]) -> Result<Self> {
        if args.len() != 4 {
            return Err(Error::Arguments(format!(
                "expected 4 arguments (user, api key, url, output file), got {}",
                args.len()
            )));
        }
        for (name, value) in ["user", "api key", "url", "output file"].iter().zip(args) {
            if value.trim().is_empty() {
                return Err(Error::Arguments(format!("{} must not be empty", name)));
            }
        }

        Ok(Self {
            user: args[0].clone(),
            api_key: args[1].clone(),
            url: args[2].clone(),
            output_file: PathBuf::from(&args[3]),
        })
    }
}

/// What an export run produced
#[derive(Debug)]
pub struct ExportSummary {
    /// URL the page ended up on after redirects
    pub final_url: String,
    /// PDF size in bytes
    pub pdf_bytes: usize,
    /// Requests the page made, document included
    pub requests: usize,
    /// Console messages the page emitted
    pub console_messages: usize,
    /// Uncaught errors the page raised
    pub page_errors: usize,
}

/// Run one export: load the page, print it to PDF
///
/// Any failure is returned to the caller, which decides the process exit
/// code. The output file is only written when PDF generation succeeds, so
/// a failed run never leaves a truncated PDF behind.
pub async fn export(params: &ExportParams) -> Result<ExportSummary> {
    let browser = Browser::launch().await?;

    browser
        .network()
        .add_interceptor(CredentialInjector::new(&params.user, &params.api_key));
    browser.network().add_interceptor(RequestLogger::default());

    let page = browser.new_page().await?;
    let response = page.navigate(&params.url).await?;

    // Replay console output and uncaught errors in the order the page
    // produced them
    for event in page.page_events() {
        match event {
            PageEvent::Console(msg) => {
                info!(level = ?msg.level, "page console: {}", msg.message);
            }
            PageEvent::Error(msg) => {
                warn!("page error: {}", msg);
            }
        }
    }

    let document = page.document().ok_or_else(|| {
        Error::pdf(format!(
            "response from {} is not an HTML document",
            response.url
        ))
    })?;

    let generator = TextPdfGenerator::new();
    let pdf = generator.generate_pdf(&document, &PrintToPdfOptions::a4())?;
    std::fs::write(&params.output_file, &pdf)?;

    info!(file = %params.output_file.display(), "generated pdf");

    Ok(ExportSummary {
        final_url: response.url.to_string(),
        pdf_bytes: pdf.len(),
        requests: browser.network().event_count(),
        console_messages: page.console_messages().len(),
        page_errors: page.page_errors().len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_params_from_args() {
        let params = ExportParams::from_args(&args(&[
            "alice",
            "secret",
            "https://example.com/report",
            "out.pdf",
        ]))
        .unwrap();

        assert_eq!(params.user, "alice");
        assert_eq!(params.api_key, "secret");
        assert_eq!(params.url, "https://example.com/report");
        assert_eq!(params.output_file, PathBuf::from("out.pdf"));
    }

    #[test]
    fn test_params_wrong_arity() {
        let err = ExportParams::from_args(&args(&["alice", "secret"])).unwrap_err();
        assert!(matches!(err, Error::Arguments(_)));
    }

    #[test]
    fn test_params_empty_value_rejected() {
        let err =
            ExportParams::from_args(&args(&["alice", "", "https://example.com", "out.pdf"]))
                .unwrap_err();
        assert!(matches!(err, Error::Arguments(_)));
        assert!(err.to_string().contains("api key"));
    }
}
