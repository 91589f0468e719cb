//! Logging and metrics for Courier.
//!
//! - **Logging**: structured JSON (or pretty) output through `tracing`
//! - **Metrics**: a Prometheus registry owned by the application, rendered
//!   on demand for the `/metrics` endpoint
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `http_requests_total` | Counter | `method`, `endpoint` | Total request count |
//! | `http_request_duration_seconds` | Histogram | `method`, `endpoint` | Request latency |
//!
//! # Example
//!
//! ```rust,ignore
//! use courier_telemetry::{init_telemetry, TelemetryConfig};
//! use std::sync::Arc;
//!
//! let config = TelemetryConfig::builder().service_name("courier").build();
//! let metrics = Arc::new(init_telemetry(&config)?);
//! ```
//!
//! # Metrics Endpoint
//!
//! ```text
//! # HELP http_requests_total Total number of HTTP requests
//! # TYPE http_requests_total counter
//! http_requests_total{method="GET",endpoint="/qr/hello"} 3
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod logging;
pub mod metrics;

pub use crate::config::{TelemetryConfig, TelemetryConfigBuilder};
pub use crate::error::TelemetryError;
pub use crate::logging::{init_logging, LogConfig, LogFormat};
pub use crate::metrics::{MetricsConfig, MetricsRegistry, PROMETHEUS_CONTENT_TYPE};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

/// Installs logging and builds the metrics registry.
///
/// # Errors
///
/// Returns `TelemetryError` if either subsystem fails to initialize.
pub fn init_telemetry(config: &TelemetryConfig) -> TelemetryResult<MetricsRegistry> {
    init_logging(&config.logging)?;
    let registry = MetricsRegistry::new(&config.metrics)?;

    tracing::info!(
        service = %config.service_name,
        log_format = %config.logging.format,
        metrics_enabled = config.metrics.enabled,
        "Telemetry initialized"
    );

    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_without_logging() {
        let config = TelemetryConfig::builder().without_logging().build();
        let registry = init_telemetry(&config).unwrap();
        assert!(!registry.render().contains("http_requests_total{"));
    }

    #[test]
    fn test_init_rejects_bad_buckets() {
        let config = TelemetryConfig::builder()
            .without_logging()
            .metrics(MetricsConfig {
                enabled: true,
                duration_buckets: Vec::new(),
            })
            .build();
        assert!(matches!(
            init_telemetry(&config),
            Err(TelemetryError::MetricsInit(_))
        ));
    }
}
