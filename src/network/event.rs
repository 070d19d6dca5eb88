// Copyright (c) 2026 REMS contributors.
// Licensed under the MIT license.

//! Network event types

use std::collections::HashMap;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

/// One captured network request, with its response or error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkEvent {
    /// Event ID
    pub id: String,
    /// What kind of resource this request loaded
    pub kind: RequestKind,
    /// Timestamp
    pub timestamp: SystemTime,
    /// Request information
    pub request: RequestInfo,
    /// Response information (if available)
    pub response: Option<ResponseInfo>,
    /// Duration
    pub duration: Option<Duration>,
    /// Error message if failed
    pub error: Option<String>,
}

/// Kind of resource a request loads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestKind {
    /// Direct navigation
    Document,
    /// Script tag
    Script,
    /// Link stylesheet
    Stylesheet,
    /// Image
    Image,
    /// Other resource
    Other,
}

/// Request information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestInfo {
    /// Request URL
    pub url: String,
    /// HTTP method
    pub method: String,
    /// Request headers as sent (after interception)
    pub headers: HashMap<String, String>,
}

/// Response information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseInfo {
    /// Status code
    pub status: u16,
    /// Content type
    pub content_type: Option<String>,
    /// Body length in bytes
    pub body_len: usize,
}

impl NetworkEvent {
    /// Create a new event for a request that has not completed yet
    pub fn new(id: String, kind: RequestKind, request: RequestInfo) -> Self {
        Self {
            id,
            kind,
            timestamp: SystemTime::now(),
            request,
            response: None,
            duration: None,
            error: None,
        }
    }

    /// Attach response information
    pub fn with_response(mut self, response: ResponseInfo) -> Self {
        self.response = Some(response);
        self
    }

    /// Attach an error
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Attach the request duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Whether the request completed with a 2xx status
    pub fn is_success(&self) -> bool {
        self.response
            .as_ref()
            .map(|r| (200..300).contains(&r.status))
            .unwrap_or(false)
    }
}
