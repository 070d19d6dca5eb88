// Copyright (c) 2026 REMS contributors.
// Licensed under the MIT license.

//! JavaScript runtime using boa_engine
//!
//! Executes the page's inline scripts and captures what the page would
//! have printed: console output and uncaught script errors. Neither
//! affects control flow; they exist so the exporter can forward them.

mod runtime;

pub use runtime::{ConsoleLevel, ConsoleMessage, JsRuntime, JsRuntimeConfig, PageEvent};
