// Copyright (c) 2026 REMS contributors.
// Licensed under the MIT license.

//! Network interception and monitoring
//!
//! Every request a page makes flows through the [`NetworkPipeline`], which
//! runs the interceptor chain, records an event per request, and tracks
//! in-flight activity for the network-idle heuristic.

mod event;
mod interceptor;
mod pipeline;

pub use event::{NetworkEvent, RequestInfo, RequestKind, ResponseInfo};
pub use interceptor::{
    CredentialInjector, HeaderEntry, InterceptAction, InterceptorChain, RequestInterceptor,
    RequestLogger,
};
pub use pipeline::{IdleConfig, InFlightGuard, NetworkPipeline};
