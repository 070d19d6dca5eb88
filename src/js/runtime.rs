// Copyright (c) 2026 REMS contributors.
// Licensed under the MIT license.

//! JavaScript runtime implementation using boa_engine

use std::sync::Arc;

use boa_engine::{Context, Source};
use parking_lot::RwLock;

use crate::error::{Error, Result};

/// JavaScript runtime configuration
#[derive(Debug, Clone)]
pub struct JsRuntimeConfig {
    /// Console output capture
    pub capture_console: bool,
}

impl Default for JsRuntimeConfig {
    fn default() -> Self {
        Self {
            capture_console: true,
        }
    }
}

/// Console message emitted by a page script
#[derive(Debug, Clone)]
pub struct ConsoleMessage {
    pub level: ConsoleLevel,
    pub message: String,
}

/// Console log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleLevel {
    Log,
    Info,
    Warn,
    Error,
    Debug,
}

impl ConsoleLevel {
    fn parse(s: &str) -> Self {
        match s {
            "info" => ConsoleLevel::Info,
            "warn" => ConsoleLevel::Warn,
            "error" => ConsoleLevel::Error,
            "debug" => ConsoleLevel::Debug,
            _ => ConsoleLevel::Log,
        }
    }
}

/// Something the page emitted while its scripts ran
///
/// Kept as a single ordered stream so console output and uncaught errors
/// can be replayed in the order the page produced them.
#[derive(Debug, Clone)]
pub enum PageEvent {
    /// A console.* call
    Console(ConsoleMessage),
    /// An uncaught script error (diagnostic only, never fatal)
    Error(String),
}

/// Prelude installed before each script: a console that records into a
/// buffer the runtime reads back after evaluation, plus the handful of
/// browser globals pages touch during render.
const PRELUDE: &str = r#"
var __console_buffer = [];
var console = (function() {
    function record(level) {
        return function() {
            var parts = [];
            for (var i = 0; i < arguments.length; i++) {
                parts.push(String(arguments[i]));
            }
            __console_buffer.push([level, parts.join(" ")]);
        };
    }
    return {
        log: record("log"),
        info: record("info"),
        warn: record("warn"),
        error: record("error"),
        debug: record("debug"),
    };
})();
function setTimeout() { return 0; }
function setInterval() { return 0; }
function clearTimeout() {}
function clearInterval() {}
var window = globalThis;
var self = globalThis;
"#;

/// JavaScript runtime with console and error capture
pub struct JsRuntime {
    config: JsRuntimeConfig,
    /// Ordered log of console messages and uncaught errors
    events: Arc<RwLock<Vec<PageEvent>>>,
    /// Current document URL
    current_url: Arc<RwLock<Option<String>>>,
}

impl JsRuntime {
    /// Create a new JavaScript runtime
    pub fn new(config: JsRuntimeConfig) -> Self {
        Self {
            config,
            events: Arc::new(RwLock::new(Vec::new())),
            current_url: Arc::new(RwLock::new(None)),
        }
    }

    /// Create a runtime with default config
    pub fn default_runtime() -> Self {
        Self::new(JsRuntimeConfig::default())
    }

    /// Set the current URL for context
    pub fn set_url(&self, url: impl Into<String>) {
        *self.current_url.write() = Some(url.into());
    }

    /// Execute JavaScript code
    ///
    /// An evaluation error is recorded as a [`PageEvent::Error`] and also
    /// returned; callers treating in-page errors as non-fatal should record
    /// the failure and move on. Console output emitted before the error is
    /// kept either way.
    pub fn execute(&self, code: &str) -> Result<()> {
        // A fresh context per execution; scripts on one page do not share
        // state here, which is enough for render-and-print workloads
        let mut context = Context::default();

        context
            .eval(Source::from_bytes(PRELUDE))
            .map_err(|e| Error::js(format!("prelude failed: {}", e)))?;
        Self::install_navigator(&mut context)?;
        self.install_location(&mut context)?;

        let result = context.eval(Source::from_bytes(code));

        if self.config.capture_console {
            self.drain_console(&mut context);
        }

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let message = e.to_string();
                self.events.write().push(PageEvent::Error(message.clone()));
                Err(Error::js(message))
            }
        }
    }

    /// Get the ordered event log
    pub fn events(&self) -> Vec<PageEvent> {
        self.events.read().clone()
    }

    /// Get captured console messages, in emission order
    pub fn console_messages(&self) -> Vec<ConsoleMessage> {
        self.events
            .read()
            .iter()
            .filter_map(|e| match e {
                PageEvent::Console(msg) => Some(msg.clone()),
                PageEvent::Error(_) => None,
            })
            .collect()
    }

    /// Get captured uncaught errors, in emission order
    pub fn page_errors(&self) -> Vec<String> {
        self.events
            .read()
            .iter()
            .filter_map(|e| match e {
                PageEvent::Error(msg) => Some(msg.clone()),
                PageEvent::Console(_) => None,
            })
            .collect()
    }

    /// Clear the event log
    pub fn clear(&self) {
        self.events.write().clear();
    }

    /// Define the `navigator` global
    fn install_navigator(context: &mut Context) -> Result<()> {
        let script = format!(
            "var navigator = {{ userAgent: {} }};",
            serde_json::to_string(crate::http::DEFAULT_USER_AGENT)?
        );
        context
            .eval(Source::from_bytes(&script))
            .map_err(|e| Error::js(format!("navigator setup failed: {}", e)))?;
        Ok(())
    }

    /// Define the `location` global from the current URL
    fn install_location(&self, context: &mut Context) -> Result<()> {
        let url = self.current_url.read().clone().unwrap_or_default();
        if url.is_empty() {
            return Ok(());
        }

        let parsed = match url::Url::parse(&url) {
            Ok(p) => p,
            Err(_) => return Ok(()),
        };

        // Values go through serde_json so arbitrary URLs cannot break out
        // of the string literal
        let script = format!(
            "var location = {{ href: {}, protocol: {}, host: {}, pathname: {} }};\n\
             window.location = location;",
            serde_json::to_string(parsed.as_str())?,
            serde_json::to_string(&format!("{}:", parsed.scheme()))?,
            serde_json::to_string(parsed.host_str().unwrap_or(""))?,
            serde_json::to_string(parsed.path())?,
        );

        context
            .eval(Source::from_bytes(&script))
            .map_err(|e| Error::js(format!("location setup failed: {}", e)))?;
        Ok(())
    }

    /// Read the console buffer back out of the context
    fn drain_console(&self, context: &mut Context) {
        let Ok(value) = context.eval(Source::from_bytes("JSON.stringify(__console_buffer)"))
        else {
            return;
        };
        let Ok(json) = value.to_string(context) else {
            return;
        };

        let entries: Vec<(String, String)> =
            serde_json::from_str(&json.to_std_string_escaped()).unwrap_or_default();

        let mut events = self.events.write();
        for (level, message) in entries {
            events.push(PageEvent::Console(ConsoleMessage {
                level: ConsoleLevel::parse(&level),
                message,
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_execution() {
        let runtime = JsRuntime::default_runtime();
        runtime.execute("1 + 2").unwrap();
    }

    #[test]
    fn test_console_capture() {
        let runtime = JsRuntime::default_runtime();
        runtime.execute("console.log('test message')").unwrap();
        let output = runtime.console_messages();
        assert_eq!(output.len(), 1);
        assert_eq!(output[0].message, "test message");
        assert_eq!(output[0].level, ConsoleLevel::Log);
    }

    #[test]
    fn test_console_multiple_arguments() {
        let runtime = JsRuntime::default_runtime();
        runtime.execute("console.warn('a', 1, true)").unwrap();
        let output = runtime.console_messages();
        assert_eq!(output[0].message, "a 1 true");
        assert_eq!(output[0].level, ConsoleLevel::Warn);
    }

    #[test]
    fn test_uncaught_error_recorded() {
        let runtime = JsRuntime::default_runtime();
        let result = runtime.execute("throw new Error('boom')");
        assert!(result.is_err());

        let errors = runtime.page_errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("boom"));
    }

    #[test]
    fn test_output_before_error_is_kept() {
        let runtime = JsRuntime::default_runtime();
        runtime.execute("console.log('one')").unwrap();
        let _ = runtime.execute("console.warn('two'); nope()");

        let events = runtime.events();
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], PageEvent::Console(m) if m.message == "one"));
        assert!(matches!(&events[1], PageEvent::Console(m) if m.message == "two"));
        assert!(matches!(&events[2], PageEvent::Error(_)));
    }

    #[test]
    fn test_location_global() {
        let runtime = JsRuntime::default_runtime();
        runtime.set_url("https://example.com/reports/1");
        runtime
            .execute("console.log(location.host, location.pathname)")
            .unwrap();
        assert_eq!(
            runtime.console_messages()[0].message,
            "example.com /reports/1"
        );
    }
}
