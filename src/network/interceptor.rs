// Copyright (c) 2026 REMS contributors.
// Licensed under the MIT license.

//! Request interceptor trait and the exporter's two built-in interceptors
//!
//! Modeled on the Chrome DevTools Protocol Fetch domain: interceptors see
//! every outgoing request before it reaches the network and may modify or
//! abort it. The chain runs in priority order, and every interceptor fires
//! for every request it accepts.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use std::sync::Arc;

use crate::error::Result;
use crate::http::{headers, Request, Response};

/// Request interceptor trait
///
/// # Example
///
/// ```rust,no_run
/// use rems_print::network::{RequestInterceptor, InterceptAction};
/// use rems_print::http::Request;
/// use async_trait::async_trait;
///
/// struct BlockTrackers;
///
/// #[async_trait]
/// impl RequestInterceptor for BlockTrackers {
///     async fn before_request(&self, req: &mut Request) -> InterceptAction {
///         if req.url.host_str() == Some("tracker.example") {
///             return InterceptAction::Abort("blocked".into());
///         }
///         InterceptAction::Continue
///     }
/// }
/// ```
#[async_trait]
pub trait RequestInterceptor: Send + Sync {
    /// Called before a request is sent
    ///
    /// Can modify the request or abort it entirely.
    async fn before_request(&self, request: &mut Request) -> InterceptAction {
        let _ = request;
        InterceptAction::Continue
    }

    /// Called after a response is received
    async fn after_response(&self, request: &Request, response: &mut Response) -> Result<()> {
        let _ = (request, response);
        Ok(())
    }

    /// Called when a request fails
    async fn on_error(&self, request: &Request, error: &crate::error::Error) {
        let _ = (request, error);
    }

    /// Filter - return true if this interceptor should handle the request
    fn should_intercept(&self, request: &Request) -> bool {
        let _ = request;
        true
    }

    /// Priority - higher priority interceptors run first
    fn priority(&self) -> i32 {
        0
    }
}

/// Action to take after interception
#[derive(Debug, Clone)]
pub enum InterceptAction {
    /// Continue with the (possibly modified) request
    Continue,
    /// Abort the request with an error
    Abort(String),
}

/// Header entry for request modification
#[derive(Debug, Clone)]
pub struct HeaderEntry {
    pub name: String,
    pub value: String,
}

impl HeaderEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Injects the caller's credentials into every outgoing request
///
/// Carries the fixed `x-rems-api-key` and `x-rems-user-id` headers. Rather
/// than mutating the request's header set in place, it builds a fresh map
/// from the existing headers plus the credential headers and swaps it in,
/// so a partially applied merge is never observable.
pub struct CredentialInjector {
    headers: Vec<HeaderEntry>,
}

impl CredentialInjector {
    /// Create an injector for the given user identity and API key
    pub fn new(user: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            headers: vec![
                HeaderEntry::new(headers::X_REMS_API_KEY, api_key),
                HeaderEntry::new(headers::X_REMS_USER_ID, user),
            ],
        }
    }

    /// Add an extra header to inject
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(HeaderEntry::new(name, value));
        self
    }

    fn merged_headers(&self, existing: &HeaderMap) -> HeaderMap {
        let mut merged = existing.clone();
        for header in &self.headers {
            if let (Ok(name), Ok(value)) = (
                header.name.parse::<reqwest::header::HeaderName>(),
                header.value.parse::<reqwest::header::HeaderValue>(),
            ) {
                merged.insert(name, value);
            }
        }
        merged
    }
}

#[async_trait]
impl RequestInterceptor for CredentialInjector {
    async fn before_request(&self, request: &mut Request) -> InterceptAction {
        request.headers = self.merged_headers(&request.headers);
        InterceptAction::Continue
    }

    fn priority(&self) -> i32 {
        100 // Run credential injection early
    }
}

/// Logs every request's method and URL
pub struct RequestLogger {
    /// Log response status lines too
    pub log_responses: bool,
    /// Filter by URL substring
    pub url_filter: Option<String>,
}

impl Default for RequestLogger {
    fn default() -> Self {
        Self {
            log_responses: false,
            url_filter: None,
        }
    }
}

#[async_trait]
impl RequestInterceptor for RequestLogger {
    fn should_intercept(&self, request: &Request) -> bool {
        if let Some(ref filter) = self.url_filter {
            request.url.as_str().contains(filter)
        } else {
            true
        }
    }

    async fn before_request(&self, request: &mut Request) -> InterceptAction {
        tracing::info!(
            method = %request.method,
            url = %request.url,
            "request"
        );
        InterceptAction::Continue
    }

    async fn after_response(&self, request: &Request, response: &mut Response) -> Result<()> {
        if self.log_responses {
            tracing::info!(
                url = %request.url,
                status = %response.status,
                time_ms = response.response_time_ms,
                "response"
            );
        }
        Ok(())
    }

    fn priority(&self) -> i32 {
        -100 // Run logging last
    }
}

/// Interceptor chain - manages multiple interceptors
#[derive(Clone)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
}

impl Default for InterceptorChain {
    fn default() -> Self {
        Self::new()
    }
}

impl InterceptorChain {
    /// Create a new empty chain
    pub fn new() -> Self {
        Self {
            interceptors: Vec::new(),
        }
    }

    /// Add an interceptor
    pub fn add<I: RequestInterceptor + 'static>(&mut self, interceptor: I) {
        self.interceptors.push(Arc::new(interceptor));
        // Sort by priority (highest first)
        self.interceptors
            .sort_by(|a, b| b.priority().cmp(&a.priority()));
    }

    /// Number of registered interceptors
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    /// Whether the chain is empty
    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }

    /// Process request through all interceptors
    pub async fn process_request(&self, request: &mut Request) -> InterceptAction {
        for interceptor in &self.interceptors {
            if !interceptor.should_intercept(request) {
                continue;
            }

            match interceptor.before_request(request).await {
                InterceptAction::Continue => continue,
                action => return action,
            }
        }
        InterceptAction::Continue
    }

    /// Process response through all interceptors
    pub async fn process_response(&self, request: &Request, response: &mut Response) -> Result<()> {
        for interceptor in &self.interceptors {
            if !interceptor.should_intercept(request) {
                continue;
            }
            interceptor.after_response(request, response).await?;
        }
        Ok(())
    }

    /// Notify interceptors of an error
    pub async fn notify_error(&self, request: &Request, error: &crate::error::Error) {
        for interceptor in &self.interceptors {
            if interceptor.should_intercept(request) {
                interceptor.on_error(request, error).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_credential_injector_adds_both_headers() {
        let injector = CredentialInjector::new("alice", "secret-key");
        let mut request = Request::get("https://example.com/page").unwrap();

        let action = injector.before_request(&mut request).await;
        assert!(matches!(action, InterceptAction::Continue));

        assert_eq!(
            request.headers.get("x-rems-api-key").unwrap(),
            "secret-key"
        );
        assert_eq!(request.headers.get("x-rems-user-id").unwrap(), "alice");
    }

    #[tokio::test]
    async fn test_credential_injector_keeps_existing_headers() {
        let injector = CredentialInjector::new("alice", "secret-key");
        let mut request = Request::get("https://example.com")
            .unwrap()
            .header("x-existing", "kept");

        injector.before_request(&mut request).await;

        assert_eq!(request.headers.get("x-existing").unwrap(), "kept");
        assert_eq!(request.headers.len(), 3);
    }

    #[test]
    fn test_interceptor_chain_orders_by_priority() {
        let mut chain = InterceptorChain::new();
        chain.add(RequestLogger::default());
        chain.add(CredentialInjector::new("u", "k"));

        assert_eq!(chain.len(), 2);
        // Injector has priority 100, logger -100; injector must run first
        assert_eq!(chain.interceptors[0].priority(), 100);
    }

    #[tokio::test]
    async fn test_chain_abort_short_circuits() {
        struct Abort;
        #[async_trait]
        impl RequestInterceptor for Abort {
            async fn before_request(&self, _request: &mut Request) -> InterceptAction {
                InterceptAction::Abort("denied".to_string())
            }
            fn priority(&self) -> i32 {
                50
            }
        }

        let mut chain = InterceptorChain::new();
        chain.add(Abort);
        let mut request = Request::get("https://example.com").unwrap();
        let action = chain.process_request(&mut request).await;
        assert!(matches!(action, InterceptAction::Abort(_)));
    }
}
