//! Route table of the `courier` binary.
//!
//! | Route | Handler |
//! |-------|---------|
//! | `GET /metrics` | Prometheus text exposition |
//! | `GET /qr/{content}` | PNG QR code, 300×300 |
//! | `GET /qr/{content}/{size}` | PNG QR code, `size`×`size` |
//! | anything else | static files from `--dir` |
//!
//! QR routes accept `?level=L|M|Q|H` and
//! `?mode=auto|numeric|alphanumeric|unicode`.

use crate::config::Settings;
use courier_core::{
    handler_fn, EncodingMode, ErrorCorrectionLevel, HandlerResult, QrSpec, Request, RequestExt,
    Response, DEFAULT_QR_SIZE,
};
use courier_middleware::stages::InstrumentationMiddleware;
use courier_middleware::Pipeline;
use courier_server::handler::send_qr_code;
use courier_server::{metrics_handler, Router, Server, StaticFiles};
use courier_telemetry::MetricsRegistry;
use http::StatusCode;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

/// Largest accepted QR image edge, in pixels.
pub const MAX_QR_SIZE: i64 = 4096;

/// Renders the `content` path parameter as a QR code.
pub async fn qr_code(request: Request) -> HandlerResult {
    let content = request.param("content");
    if content.is_empty() {
        return Ok(Response::error(StatusCode::BAD_REQUEST, "missing QR content"));
    }

    let size = request.param_int_or("size", i64::from(DEFAULT_QR_SIZE));
    let Some(size) = u32::try_from(size).ok().filter(|s| i64::from(*s) <= MAX_QR_SIZE) else {
        return Ok(Response::error(
            StatusCode::BAD_REQUEST,
            format!("size must be between 1 and {MAX_QR_SIZE}"),
        ));
    };

    let options = match QrOptions::from_request(&request) {
        Ok(options) => options,
        Err(err) => {
            return Ok(Response::error(
                StatusCode::BAD_REQUEST,
                format!("invalid query: {err}"),
            ))
        }
    };

    let mut spec = QrSpec::new(content).with_size(size, size);
    if let Some(level) = options.level {
        match level.parse::<ErrorCorrectionLevel>() {
            Ok(level) => spec = spec.with_level(level),
            Err(err) => return Ok(Response::error(StatusCode::BAD_REQUEST, err)),
        }
    }
    if let Some(mode) = options.mode {
        match mode.parse::<EncodingMode>() {
            Ok(mode) => spec = spec.with_mode(mode),
            Err(err) => return Ok(Response::error(StatusCode::BAD_REQUEST, err)),
        }
    }

    Ok(Response::qr(spec))
}

/// Query string options of the QR routes. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
struct QrOptions {
    level: Option<String>,
    mode: Option<String>,
}

impl QrOptions {
    fn from_request(request: &Request) -> Result<Self, serde_urlencoded::de::Error> {
        request
            .uri()
            .query()
            .map_or_else(|| Ok(Self::default()), serde_urlencoded::from_str)
    }
}

/// Builds the route table.
pub fn router(dir: &Path, metrics: Arc<MetricsRegistry>) -> Router {
    let qr = send_qr_code(handler_fn(qr_code));

    let mut router = Router::new();
    router
        .get("/metrics", metrics_handler(metrics))
        .get("/qr/{content}", qr.clone())
        .get("/qr/{content}/{size}", qr)
        .fallback(StaticFiles::new(dir).into_handler());
    router
}

/// Builds the middleware applied to every request.
pub fn pipeline(metrics: Arc<MetricsRegistry>) -> Pipeline {
    Pipeline::builder()
        .stage(InstrumentationMiddleware::new(metrics))
        .build()
}

/// Assembles the server for `settings`.
pub fn build_server(settings: &Settings, metrics: Arc<MetricsRegistry>) -> Server {
    Server::builder()
        .http_addr(settings.bind_addr())
        .router(router(&settings.dir, Arc::clone(&metrics)))
        .pipeline(pipeline(metrics))
        .build()
}
