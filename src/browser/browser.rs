// Copyright (c) 2026 REMS contributors.
// Licensed under the MIT license.

//! Browser implementation

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

use super::config::{BrowserConfig, PageConfig};
use super::page::Page;
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig};
use crate::network::NetworkPipeline;

/// Lightweight headless browser
///
/// All pages share one HTTP client and one network pipeline, so cookies
/// and registered interceptors apply to every request the browser makes.
/// Dropping the browser closes it; no external process is left behind.
pub struct Browser {
    /// Browser configuration
    config: BrowserConfig,
    /// HTTP client (shared across pages)
    client: HttpClient,
    /// Network pipeline (shared across pages)
    network: NetworkPipeline,
    /// Active pages
    pages: Arc<RwLock<Vec<Arc<Page>>>>,
    /// Page counter
    page_counter: AtomicU64,
    /// Whether browser is closed
    closed: Arc<RwLock<bool>>,
}

impl Browser {
    /// Create a new browser instance
    pub async fn new(config: BrowserConfig) -> Result<Self> {
        let mut default_headers = HeaderMap::new();
        for (name, value) in &config.default_headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::Config(format!("invalid header name {:?}: {}", name, e)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| Error::Config(format!("invalid header value: {}", e)))?;
            default_headers.insert(name, value);
        }

        let http_config = HttpClientConfig {
            user_agent: config.user_agent.clone(),
            timeout: config.timeout,
            accept_invalid_certs: config.ignore_https_errors,
            proxy: config.proxy.clone(),
            ..Default::default()
        };
        let http_config = if default_headers.is_empty() {
            http_config
        } else {
            HttpClientConfig {
                default_headers,
                ..http_config
            }
        };

        let client = HttpClient::with_config(http_config)?;
        let network = NetworkPipeline::new(client.clone());

        debug!(user_agent = %config.user_agent, "browser launched");

        Ok(Self {
            config,
            client,
            network,
            pages: Arc::new(RwLock::new(Vec::new())),
            page_counter: AtomicU64::new(0),
            closed: Arc::new(RwLock::new(false)),
        })
    }

    /// Create browser with default config
    pub async fn launch() -> Result<Self> {
        Self::new(BrowserConfig::default()).await
    }

    /// Create a new page
    pub async fn new_page(&self) -> Result<Arc<Page>> {
        self.new_page_with_config(PageConfig::default()).await
    }

    /// Create a new page with custom config
    pub async fn new_page_with_config(&self, config: PageConfig) -> Result<Arc<Page>> {
        if *self.closed.read() {
            return Err(Error::BrowserClosed);
        }

        let pages = self.pages.read();
        if pages.len() >= self.config.max_pages {
            return Err(Error::Config(format!(
                "Maximum pages ({}) reached",
                self.config.max_pages
            )));
        }
        drop(pages);

        let page_id = self.page_counter.fetch_add(1, Ordering::Relaxed);
        let page = Page::new(
            format!("page_{}", page_id),
            config,
            self.network.clone(),
            self.config.javascript_enabled,
        );

        let page = Arc::new(page);
        self.pages.write().push(page.clone());

        Ok(page)
    }

    /// Get all pages
    pub fn pages(&self) -> Vec<Arc<Page>> {
        self.pages.read().clone()
    }

    /// Close a specific page
    pub fn close_page(&self, page_id: &str) {
        self.pages.write().retain(|p| p.id() != page_id);
    }

    /// Close all pages
    pub fn close_all_pages(&self) {
        self.pages.write().clear();
    }

    /// Get the network pipeline
    pub fn network(&self) -> &NetworkPipeline {
        &self.network
    }

    /// Get HTTP client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Get browser config
    pub fn config(&self) -> &BrowserConfig {
        &self.config
    }

    /// Check if browser is closed
    pub fn is_closed(&self) -> bool {
        *self.closed.read()
    }

    /// Close the browser
    pub fn close(&self) {
        let mut closed = self.closed.write();
        if !*closed {
            *closed = true;
            debug!("browser closed");
        }
        drop(closed);
        self.close_all_pages();
    }

    /// Get all captured network events
    pub fn network_events(&self) -> Vec<crate::network::NetworkEvent> {
        self.network.events()
    }
}

impl Drop for Browser {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_browser_creation() {
        let browser = Browser::launch().await.unwrap();
        assert!(!browser.is_closed());
    }

    #[tokio::test]
    async fn test_page_creation() {
        let browser = Browser::launch().await.unwrap();
        let _page = browser.new_page().await.unwrap();
        assert_eq!(browser.pages().len(), 1);
    }

    #[tokio::test]
    async fn test_browser_close() {
        let browser = Browser::launch().await.unwrap();
        let _ = browser.new_page().await.unwrap();
        browser.close();
        assert!(browser.is_closed());
        assert!(browser.pages().is_empty());
    }

    #[tokio::test]
    async fn test_closed_browser_rejects_pages() {
        let browser = Browser::launch().await.unwrap();
        browser.close();
        assert!(browser.new_page().await.is_err());
    }
}
