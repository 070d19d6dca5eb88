// Copyright (c) 2026 REMS contributors.
// Licensed under the MIT license.

//! Network pipeline: interception, event capture and idle tracking
//!
//! Invariant: a request only reaches the HTTP client after the full
//! interceptor chain has processed it. The pipeline also counts in-flight
//! requests and remembers the last completion instant, which is what the
//! network-idle wait observes.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use super::event::{NetworkEvent, RequestInfo, RequestKind, ResponseInfo};
use super::interceptor::{InterceptAction, InterceptorChain, RequestInterceptor};
use crate::error::{Error, Result};
use crate::http::{HttpClient, Request, Response};

/// Network-idle heuristic parameters
///
/// Navigation is considered finished once no more than `max_connections`
/// requests are in flight for a continuous `quiet_window`.
#[derive(Debug, Clone)]
pub struct IdleConfig {
    /// Maximum in-flight connections that still count as idle
    pub max_connections: usize,
    /// How long the connection count must stay at or below the maximum
    pub quiet_window: Duration,
    /// Hard deadline for reaching the idle condition
    pub timeout: Duration,
}

impl Default for IdleConfig {
    fn default() -> Self {
        Self {
            max_connections: 0,
            quiet_window: Duration::from_millis(500),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Holds an in-flight slot for a request that has been scheduled but not
/// yet issued
///
/// The idle heuristic must see scheduled subresource fetches before their
/// tasks get a chance to run, otherwise a quiet window can open between
/// scheduling and execution. The slot is released when the guard drops.
pub struct InFlightGuard {
    in_flight: Arc<AtomicUsize>,
    last_activity: Arc<RwLock<Instant>>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        *self.last_activity.write() = Instant::now();
    }
}

/// Executes requests through the interceptor chain and records the traffic
pub struct NetworkPipeline {
    /// HTTP client
    client: HttpClient,
    /// Interceptor chain
    chain: Arc<RwLock<InterceptorChain>>,
    /// Captured events
    events: Arc<RwLock<Vec<NetworkEvent>>>,
    /// Event counter for ID generation
    event_counter: Arc<AtomicU64>,
    /// Requests currently in flight
    in_flight: Arc<AtomicUsize>,
    /// Instant of the most recent request start or completion
    last_activity: Arc<RwLock<Instant>>,
    /// Maximum events to store
    max_events: usize,
}

impl NetworkPipeline {
    /// Create a new pipeline
    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            chain: Arc::new(RwLock::new(InterceptorChain::new())),
            events: Arc::new(RwLock::new(Vec::new())),
            event_counter: Arc::new(AtomicU64::new(0)),
            in_flight: Arc::new(AtomicUsize::new(0)),
            last_activity: Arc::new(RwLock::new(Instant::now())),
            max_events: 1000,
        }
    }

    /// Register an interceptor
    pub fn add_interceptor<I: RequestInterceptor + 'static>(&self, interceptor: I) {
        self.chain.write().add(interceptor);
    }

    /// Number of registered interceptors
    pub fn interceptor_count(&self) -> usize {
        self.chain.read().len()
    }

    /// Reserve an in-flight slot before a request is handed to a task
    ///
    /// Call this synchronously at scheduling time and keep the guard alive
    /// until the request has completed.
    pub fn begin_request(&self) -> InFlightGuard {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        *self.last_activity.write() = Instant::now();
        InFlightGuard {
            in_flight: self.in_flight.clone(),
            last_activity: self.last_activity.clone(),
        }
    }

    /// Execute a request with interception
    pub async fn execute(&self, mut request: Request, kind: RequestKind) -> Result<Response> {
        let start = Instant::now();
        let event_id = self.next_event_id();

        self.in_flight.fetch_add(1, Ordering::SeqCst);
        *self.last_activity.write() = Instant::now();

        // Snapshot the chain so no lock is held across await points
        let chain = self.chain.read().clone();

        let action = chain.process_request(&mut request).await;
        if let InterceptAction::Abort(reason) = action {
            self.finish_request();
            let event = NetworkEvent::new(event_id, kind, Self::request_info(&request))
                .with_error(format!("aborted: {}", reason))
                .with_duration(start.elapsed());
            self.store_event(event);
            return Err(Error::network(format!(
                "request to {} aborted: {}",
                request.url, reason
            )));
        }

        // Capture the post-interception request, headers included
        let request_info = Self::request_info(&request);
        let logged_request = request.clone();

        let result = self.client.execute(request).await;
        let duration = start.elapsed();
        self.finish_request();

        let mut event = NetworkEvent::new(event_id, kind, request_info);
        match result {
            Ok(mut response) => {
                // A response interceptor failure still leaves a trace in
                // the event log
                if let Err(e) = chain.process_response(&logged_request, &mut response).await {
                    event = event.with_error(e.to_string()).with_duration(duration);
                    self.store_event(event);
                    return Err(e);
                }

                event = event
                    .with_response(ResponseInfo {
                        status: response.status.as_u16(),
                        content_type: response.content_type().map(String::from),
                        body_len: response.body_len(),
                    })
                    .with_duration(duration);
                self.store_event(event);

                Ok(response)
            }
            Err(e) => {
                chain.notify_error(&logged_request, &e).await;

                event = event.with_error(e.to_string()).with_duration(duration);
                self.store_event(event);

                Err(e)
            }
        }
    }

    /// Wait until the network-idle condition holds
    ///
    /// Fails with a timeout error when the condition is not reached before
    /// the configured deadline.
    pub async fn wait_for_idle(&self, config: &IdleConfig) -> Result<()> {
        let start = Instant::now();

        loop {
            let in_flight = self.in_flight.load(Ordering::SeqCst);
            let quiet_for = self.last_activity.read().elapsed();

            if in_flight <= config.max_connections && quiet_for >= config.quiet_window {
                return Ok(());
            }

            if start.elapsed() >= config.timeout {
                return Err(Error::timeout(
                    "network idle",
                    config.timeout.as_millis() as u64,
                ));
            }

            tokio::time::sleep(Duration::from_millis(25)).await;
        }
    }

    /// Requests currently in flight
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Get all captured events
    pub fn events(&self) -> Vec<NetworkEvent> {
        self.events.read().clone()
    }

    /// Get event count
    pub fn event_count(&self) -> usize {
        self.events.read().len()
    }

    /// Clear all events
    pub fn clear(&self) {
        self.events.write().clear();
    }

    /// Export events as JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.events())
    }

    /// Get HTTP client reference
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    fn request_info(request: &Request) -> RequestInfo {
        RequestInfo {
            url: request.url.to_string(),
            method: request.method.to_string(),
            headers: request
                .headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
                .collect(),
        }
    }

    fn finish_request(&self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        *self.last_activity.write() = Instant::now();
    }

    fn next_event_id(&self) -> String {
        let n = self.event_counter.fetch_add(1, Ordering::Relaxed) + 1;
        format!("evt_{}", n)
    }

    fn store_event(&self, event: NetworkEvent) {
        let mut events = self.events.write();
        if events.len() >= self.max_events {
            events.remove(0);
        }
        events.push(event);
    }
}

impl Clone for NetworkPipeline {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            chain: self.chain.clone(),
            events: self.events.clone(),
            event_counter: self.event_counter.clone(),
            in_flight: self.in_flight.clone(),
            last_activity: self.last_activity.clone(),
            max_events: self.max_events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::CredentialInjector;

    #[tokio::test]
    async fn test_pipeline_creation() {
        let client = HttpClient::new().unwrap();
        let pipeline = NetworkPipeline::new(client);
        assert_eq!(pipeline.event_count(), 0);
        assert_eq!(pipeline.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_interceptor_registration() {
        let client = HttpClient::new().unwrap();
        let pipeline = NetworkPipeline::new(client);
        pipeline.add_interceptor(CredentialInjector::new("u", "k"));
        assert_eq!(pipeline.interceptor_count(), 1);
    }

    #[tokio::test]
    async fn test_idle_when_nothing_in_flight() {
        let client = HttpClient::new().unwrap();
        let pipeline = NetworkPipeline::new(client);

        let config = IdleConfig {
            max_connections: 0,
            quiet_window: Duration::from_millis(10),
            timeout: Duration::from_secs(1),
        };
        pipeline.wait_for_idle(&config).await.unwrap();
    }

    #[tokio::test]
    async fn test_pending_request_holds_off_idle() {
        let client = HttpClient::new().unwrap();
        let pipeline = NetworkPipeline::new(client);

        let guard = pipeline.begin_request();
        assert_eq!(pipeline.in_flight(), 1);

        let config = IdleConfig {
            max_connections: 0,
            quiet_window: Duration::from_millis(10),
            timeout: Duration::from_millis(100),
        };
        let result = pipeline.wait_for_idle(&config).await;
        assert!(matches!(result, Err(Error::Timeout { .. })));

        drop(guard);
        assert_eq!(pipeline.in_flight(), 0);
        pipeline.wait_for_idle(&config).await.unwrap();
    }

    #[tokio::test]
    async fn test_response_interceptor_failure_records_event() {
        use async_trait::async_trait;
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        struct RejectAll;

        #[async_trait]
        impl RequestInterceptor for RejectAll {
            async fn after_response(
                &self,
                _request: &Request,
                _response: &mut Response,
            ) -> Result<()> {
                Err(Error::network("response rejected"))
            }
        }

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let pipeline = NetworkPipeline::new(client);
        pipeline.add_interceptor(RejectAll);

        let request = Request::get(&server.uri()).unwrap();
        let result = pipeline.execute(request, RequestKind::Document).await;

        assert!(result.is_err());
        assert_eq!(pipeline.event_count(), 1);
        assert!(pipeline.events()[0]
            .error
            .as_deref()
            .unwrap()
            .contains("response rejected"));
        assert_eq!(pipeline.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_failed_request_records_event() {
        let client = HttpClient::new().unwrap();
        let pipeline = NetworkPipeline::new(client);

        // Reserved TEST-NET address, connection should fail fast
        let request = Request::get("http://192.0.2.1:9/").unwrap()
            .timeout(Duration::from_millis(200));
        let result = pipeline.execute(request, RequestKind::Document).await;

        assert!(result.is_err());
        assert_eq!(pipeline.event_count(), 1);
        assert!(pipeline.events()[0].error.is_some());
        assert_eq!(pipeline.in_flight(), 0);
    }
}
