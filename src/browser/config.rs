// Copyright (c) 2026 REMS contributors.
// Licensed under the MIT license.

//! Browser and Page configuration

use std::time::Duration;

use crate::http::DEFAULT_USER_AGENT;
use crate::network::IdleConfig;

/// Browser configuration
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// User agent string
    pub user_agent: String,
    /// Default timeout for requests
    pub timeout: Duration,
    /// Accept invalid TLS certificates
    pub ignore_https_errors: bool,
    /// Enable JavaScript execution
    pub javascript_enabled: bool,
    /// Proxy URL
    pub proxy: Option<String>,
    /// Maximum concurrent pages
    pub max_pages: usize,
    /// Default headers
    pub default_headers: Vec<(String, String)>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            ignore_https_errors: false,
            javascript_enabled: true,
            proxy: None,
            max_pages: 10,
            default_headers: vec![],
        }
    }
}

impl BrowserConfig {
    /// Create a new browser config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Ignore HTTPS errors
    pub fn ignore_https_errors(mut self, ignore: bool) -> Self {
        self.ignore_https_errors = ignore;
        self
    }

    /// Enable/disable JavaScript
    pub fn javascript_enabled(mut self, enabled: bool) -> Self {
        self.javascript_enabled = enabled;
        self
    }

    /// Set proxy
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Add default header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }
}

/// Page configuration
#[derive(Debug, Clone)]
pub struct PageConfig {
    /// Page timeout
    pub timeout: Duration,
    /// Execute JavaScript
    pub execute_js: bool,
    /// Load scripts, stylesheets and images referenced by the document
    pub load_subresources: bool,
    /// Network-idle parameters for navigation
    pub idle: IdleConfig,
    /// Extra HTTP headers for this page
    pub extra_headers: Vec<(String, String)>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            execute_js: true,
            load_subresources: true,
            idle: IdleConfig::default(),
            extra_headers: vec![],
        }
    }
}

impl PageConfig {
    /// Create a new page config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable/disable JS execution
    pub fn execute_js(mut self, execute: bool) -> Self {
        self.execute_js = execute;
        self
    }

    /// Enable/disable subresource loading
    pub fn load_subresources(mut self, load: bool) -> Self {
        self.load_subresources = load;
        self
    }

    /// Set the network-idle parameters
    pub fn idle(mut self, idle: IdleConfig) -> Self {
        self.idle = idle;
        self
    }

    /// Add extra header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_config() {
        let config = BrowserConfig::new()
            .user_agent("Custom Agent")
            .timeout(Duration::from_secs(60));

        assert_eq!(config.user_agent, "Custom Agent");
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_page_config() {
        let config = PageConfig::new().execute_js(false).load_subresources(false);
        assert!(!config.execute_js);
        assert!(!config.load_subresources);
        assert_eq!(config.idle.max_connections, 0);
    }
}
