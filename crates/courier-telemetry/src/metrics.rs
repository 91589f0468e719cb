//! Prometheus metrics for Courier.
//!
//! The registry owns its own recorder instead of installing a global one,
//! so several registries (one per test, for instance) can coexist.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `http_requests_total` | Counter | `method`, `endpoint` | Total requests |
//! | `http_request_duration_seconds` | Histogram | `method`, `endpoint` | Request latency |
//!
//! # Example
//!
//! ```rust
//! use courier_telemetry::metrics::{MetricsConfig, MetricsRegistry};
//! use std::time::Duration;
//!
//! let registry = MetricsRegistry::new(&MetricsConfig::default()).unwrap();
//! registry.record_request("GET", "/qr/hello", Duration::from_millis(12));
//!
//! let text = registry.render();
//! assert!(text.contains("http_requests_total"));
//! ```

use crate::error::TelemetryError;
use crate::TelemetryResult;
use metrics::{Key, KeyName, Label, Level, Metadata, Recorder, SharedString, Unit};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder};
use std::fmt;
use std::time::Duration;

/// Request counter name.
pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";

/// Request latency histogram name.
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";

/// Content type of the Prometheus text exposition format.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// The Prometheus client default latency buckets, in seconds.
pub const DEFAULT_DURATION_BUCKETS: [f64; 11] = [
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Metrics configuration.
#[derive(Debug, Clone)]
pub struct MetricsConfig {
    /// Whether metrics are recorded. A disabled registry renders nothing.
    pub enabled: bool,

    /// Histogram buckets for request duration.
    pub duration_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            duration_buckets: DEFAULT_DURATION_BUCKETS.to_vec(),
        }
    }
}

/// Counter and histogram sink keyed by name and labels.
///
/// Shared across request tasks behind an `Arc`; updates are atomic.
pub struct MetricsRegistry {
    recorder: PrometheusRecorder,
    handle: PrometheusHandle,
    enabled: bool,
}

impl fmt::Debug for MetricsRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricsRegistry")
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

impl MetricsRegistry {
    /// Builds a registry and describes the standard metrics.
    ///
    /// # Errors
    ///
    /// Returns `TelemetryError::MetricsInit` if the buckets are empty.
    pub fn new(config: &MetricsConfig) -> TelemetryResult<Self> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(HTTP_REQUEST_DURATION_SECONDS.to_string()),
                &config.duration_buckets,
            )
            .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?
            .build_recorder();
        let handle = recorder.handle();

        let registry = Self {
            recorder,
            handle,
            enabled: config.enabled,
        };
        registry.describe_standard_metrics();
        Ok(registry)
    }

    fn describe_standard_metrics(&self) {
        self.recorder.describe_counter(
            KeyName::from_const_str(HTTP_REQUESTS_TOTAL),
            None,
            SharedString::const_str("Total number of HTTP requests"),
        );
        self.recorder.describe_histogram(
            KeyName::from_const_str(HTTP_REQUEST_DURATION_SECONDS),
            Some(Unit::Seconds),
            SharedString::const_str("Duration of HTTP requests"),
        );
    }

    /// Increments the counter `name` for the given label set by one.
    pub fn increment(&self, name: &'static str, labels: &[(&'static str, &str)]) {
        if !self.enabled {
            return;
        }
        self.recorder
            .register_counter(&key(name, labels), &metadata())
            .increment(1);
    }

    /// Records `value` into the histogram `name` for the given label set.
    pub fn observe(&self, name: &'static str, labels: &[(&'static str, &str)], value: f64) {
        if !self.enabled {
            return;
        }
        self.recorder
            .register_histogram(&key(name, labels), &metadata())
            .record(value);
    }

    /// Records a completed request.
    ///
    /// Updates the following metrics:
    /// - `http_requests_total` (incremented)
    /// - `http_request_duration_seconds` (observed, in seconds)
    pub fn record_request(&self, method: &str, endpoint: &str, duration: Duration) {
        let labels = [("method", method), ("endpoint", endpoint)];
        self.increment(HTTP_REQUESTS_TOTAL, &labels);
        self.observe(HTTP_REQUEST_DURATION_SECONDS, &labels, duration.as_secs_f64());
    }

    /// Renders all metrics in Prometheus text format.
    #[must_use]
    pub fn render(&self) -> String {
        if !self.enabled {
            return String::new();
        }
        self.handle.render()
    }
}

fn key(name: &'static str, labels: &[(&'static str, &str)]) -> Key {
    let labels: Vec<Label> = labels
        .iter()
        .map(|(k, v)| Label::new(*k, (*v).to_string()))
        .collect();
    Key::from_parts(name, labels)
}

fn metadata() -> Metadata<'static> {
    Metadata::new(module_path!(), Level::INFO, Some(module_path!()))
}
