//! Request logging and metrics.
//!
//! Every request produces one `Request` log event before the handler runs
//! and one counter increment plus one latency observation after it returns.
//! The response passes through untouched.
//!
//! # Log Fields
//!
//! | Field | Source |
//! |-------|--------|
//! | `method` | request method |
//! | `remote_addr` | peer address recorded by the server |
//! | `url` | URI path |
//! | `query` | raw query string |
//! | `proto` | HTTP version |
//! | `host` | `Host` header, else URI authority |
//! | `referer` | `Referer` header |
//! | `user_agent` | `User-Agent` header |
//! | `content_length` | `Content-Length` header, else collected body size |
//! | `request_uri` | path and query |
//!
//! # Example
//!
//! ```rust,ignore
//! use courier_middleware::{stages::InstrumentationMiddleware, Pipeline};
//!
//! let pipeline = Pipeline::builder()
//!     .stage(InstrumentationMiddleware::new(metrics.clone()))
//!     .build();
//! ```

use crate::middleware::{BoxFuture, Middleware, Next};
use crate::types::{Request, Response};
use courier_core::RequestExt;
use courier_telemetry::MetricsRegistry;
use http::header::{CONTENT_LENGTH, HOST, REFERER, USER_AGENT};
use http::HeaderName;
use std::sync::Arc;
use std::time::Instant;

/// Logs request metadata and records request count and latency.
#[derive(Debug, Clone)]
pub struct InstrumentationMiddleware {
    metrics: Arc<MetricsRegistry>,
}

impl InstrumentationMiddleware {
    /// Creates the middleware around a shared registry.
    #[must_use]
    pub fn new(metrics: Arc<MetricsRegistry>) -> Self {
        Self { metrics }
    }
}

fn header<'r>(request: &'r Request, name: &HeaderName) -> &'r str {
    request
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

fn content_length(request: &Request) -> u64 {
    request
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .unwrap_or(request.body().len() as u64)
}

fn log_request(request: &Request) {
    let uri = request.uri();
    let host = match header(request, &HOST) {
        "" => uri.host().unwrap_or(""),
        host => host,
    };
    let remote_addr = request
        .remote_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_default();

    tracing::info!(
        method = %request.method(),
        remote_addr = %remote_addr,
        url = uri.path(),
        query = uri.query().unwrap_or(""),
        proto = ?request.version(),
        host = host,
        referer = header(request, &REFERER),
        user_agent = header(request, &USER_AGENT),
        content_length = content_length(request),
        request_uri = uri.path_and_query().map_or("/", |pq| pq.as_str()),
        "Request"
    );
}

impl Middleware for InstrumentationMiddleware {
    fn name(&self) -> &'static str {
        "instrumentation"
    }

    fn process<'a>(&'a self, request: Request, next: Next<'a>) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            log_request(&request);

            let method = request.method().clone();
            let endpoint = request.uri().path().to_string();
            let start = Instant::now();

            let response = next.run(request).await;

            self.metrics
                .record_request(method.as_str(), &endpoint, start.elapsed());
            response
        })
    }
}
