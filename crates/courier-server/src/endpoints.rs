//! Built-in endpoints.

use bytes::Bytes;
use courier_middleware::{Request, Response, WireHandler};
use courier_telemetry::{MetricsRegistry, PROMETHEUS_CONTENT_TYPE};
use http::header::{HeaderValue, CONTENT_TYPE};
use http_body_util::Full;
use std::sync::Arc;

/// Serves the registry in Prometheus text format.
///
/// Mount it at `GET /metrics`.
pub fn metrics_handler(metrics: Arc<MetricsRegistry>) -> WireHandler {
    Arc::new(move |_request: Request| {
        let metrics = Arc::clone(&metrics);
        Box::pin(async move {
            let mut response = Response::new(Full::new(Bytes::from(metrics.render())));
            response.headers_mut().insert(
                CONTENT_TYPE,
                HeaderValue::from_static(PROMETHEUS_CONTENT_TYPE),
            );
            response
        })
    })
}
