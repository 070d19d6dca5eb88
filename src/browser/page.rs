// Copyright (c) 2026 REMS contributors.
// Licensed under the MIT license.

//! Page implementation
//!
//! A page owns the document it loaded plus the JavaScript runtime that ran
//! the document's inline scripts. Script failures are diagnostics, never
//! navigation failures.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, warn};
use url::Url;

use super::config::PageConfig;
use crate::dom::Document;
use crate::error::{Error, Result};
use crate::http::{Request, Response};
use crate::js::{ConsoleMessage, JsRuntime, PageEvent};
use crate::network::{NetworkPipeline, RequestKind};

/// A browser page
pub struct Page {
    /// Page ID
    id: String,
    /// Page configuration
    config: PageConfig,
    /// Network pipeline, shared with the owning browser
    network: NetworkPipeline,
    /// JavaScript runtime
    js_runtime: Option<JsRuntime>,
    /// Current URL
    url: Arc<RwLock<Option<Url>>>,
    /// Current document
    document: Arc<RwLock<Option<Document>>>,
    /// Last response
    last_response: Arc<RwLock<Option<Response>>>,
}

impl Page {
    /// Create a new page
    pub(crate) fn new(
        id: String,
        config: PageConfig,
        network: NetworkPipeline,
        js_enabled: bool,
    ) -> Self {
        let js_runtime = if js_enabled && config.execute_js {
            Some(JsRuntime::default_runtime())
        } else {
            None
        };

        Self {
            id,
            config,
            network,
            js_runtime,
            url: Arc::new(RwLock::new(None)),
            document: Arc::new(RwLock::new(None)),
            last_response: Arc::new(RwLock::new(None)),
        }
    }

    /// Get page ID
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Navigate to a URL and wait for the network to go idle
    ///
    /// The document is fetched through the pipeline, so every registered
    /// interceptor sees it, as well as every subresource request the
    /// document triggers. Returns once the idle condition from the page
    /// config holds, or fails on the idle timeout.
    pub async fn navigate(&self, url: &str) -> Result<Response> {
        let mut request = Request::get(url)?.timeout(self.config.timeout);
        for (name, value) in &self.config.extra_headers {
            request = request.header(name, value);
        }

        let response = self.network.execute(request, RequestKind::Document).await?;

        if !response.is_success() {
            return Err(Error::navigation_failed(
                url,
                Some(response.status_code()),
                format!("server returned {}", response.status),
            ));
        }

        *self.url.write() = Some(response.url.clone());

        if response.is_html() {
            let html = response.text_lossy();
            let doc = crate::dom::parse_html_with_url(&html, Some(response.url.clone()))?;

            if self.config.load_subresources {
                self.fetch_subresources(&doc);
            }

            // Inline scripts run to surface console output and page errors;
            // a throwing script does not fail the navigation
            if let Some(ref js) = self.js_runtime {
                js.set_url(response.url.to_string());
                for script in doc.scripts() {
                    if script.src().is_none() {
                        let content = script.text_content();
                        if !content.trim().is_empty() {
                            if let Err(e) = js.execute(&content) {
                                debug!(page = %self.id, "inline script failed: {}", e);
                            }
                        }
                    }
                }
            }

            *self.document.write() = Some(doc);
        }

        *self.last_response.write() = Some(response.clone());

        self.network.wait_for_idle(&self.config.idle).await?;

        Ok(response)
    }

    /// Fetch the document's subresources concurrently
    ///
    /// Each fetch goes through the shared pipeline, which keeps the
    /// in-flight count that the idle wait observes. The slot is reserved
    /// here, before the task is spawned, so the idle wait can never see an
    /// empty network while fetches are still scheduled. Failures are
    /// logged and recorded as network events, nothing more.
    fn fetch_subresources(&self, doc: &Document) {
        for (url, kind) in doc.subresource_urls() {
            let pipeline = self.network.clone();
            let timeout = self.config.timeout;
            let page_id = self.id.clone();
            let pending = self.network.begin_request();

            tokio::spawn(async move {
                let request = match Request::get(url.as_str()) {
                    Ok(r) => r.timeout(timeout),
                    Err(e) => {
                        warn!(page = %page_id, url = %url, "skipping subresource: {}", e);
                        return;
                    }
                };
                if let Err(e) = pipeline.execute(request, kind).await {
                    debug!(page = %page_id, url = %url, "subresource failed: {}", e);
                }
                drop(pending);
            });
        }
    }

    /// Get current URL
    pub fn url(&self) -> Option<String> {
        self.url.read().as_ref().map(|u| u.to_string())
    }

    /// Get current document
    pub fn document(&self) -> Option<Document> {
        self.document.read().clone()
    }

    /// Get last response
    pub fn response(&self) -> Option<Response> {
        self.last_response.read().clone()
    }

    /// Get page title
    pub fn title(&self) -> Option<String> {
        self.document.read().as_ref().map(|d| d.title())
    }

    /// Get page content (HTML)
    pub fn content(&self) -> Option<String> {
        self.document.read().as_ref().map(|d| d.outer_html())
    }

    /// Console messages and uncaught errors, in emission order
    pub fn page_events(&self) -> Vec<PageEvent> {
        self.js_runtime
            .as_ref()
            .map(|js| js.events())
            .unwrap_or_default()
    }

    /// Console output from page scripts
    pub fn console_messages(&self) -> Vec<ConsoleMessage> {
        self.js_runtime
            .as_ref()
            .map(|js| js.console_messages())
            .unwrap_or_default()
    }

    /// Uncaught errors from page scripts
    pub fn page_errors(&self) -> Vec<String> {
        self.js_runtime
            .as_ref()
            .map(|js| js.page_errors())
            .unwrap_or_default()
    }

    /// Execute JavaScript in the page's runtime
    pub fn evaluate(&self, script: &str) -> Result<()> {
        let js = self
            .js_runtime
            .as_ref()
            .ok_or_else(|| Error::js("JavaScript is disabled"))?;
        js.execute(script)
    }

    /// Get page configuration
    pub fn config(&self) -> &PageConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpClient;

    #[test]
    fn test_page_creation() {
        let client = HttpClient::new().unwrap();
        let network = NetworkPipeline::new(client);
        let page = Page::new("test".to_string(), PageConfig::default(), network, true);
        assert_eq!(page.id(), "test");
        assert!(page.document().is_none());
    }

    #[test]
    fn test_page_js_disabled() {
        let client = HttpClient::new().unwrap();
        let network = NetworkPipeline::new(client);
        let page = Page::new("test".to_string(), PageConfig::default(), network, false);
        assert!(page.evaluate("1 + 1").is_err());
        assert!(page.page_events().is_empty());
    }
}
