//! # Courier
//!
//! A small HTTP response dispatch layer: business handlers compute a
//! [`Response`](courier_core::Response) value, and a send strategy writes it
//! to the wire as raw bytes, JSON, or a PNG QR code.
//!
//! ```text
//! Request → Instrumentation → Router → Handler → Strategy → wire
//! ```
//!
//! ## Crates
//!
//! | Module | Crate | Contents |
//! |--------|-------|----------|
//! | [`core`] | `courier-core` | response model, errors, handler trait, path params |
//! | [`send`] | `courier-send` | send strategies, wire writer, QR rendering |
//! | [`middleware`] | `courier-middleware` | middleware chain, request instrumentation |
//! | [`telemetry`] | `courier-telemetry` | logging setup, Prometheus registry |
//! | [`server`] | `courier-server` | HTTP server, router, static files, adapter |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use courier::prelude::*;
//!
//! async fn hello(_request: Request) -> HandlerResult {
//!     Ok(Response::json(&serde_json::json!({ "hello": "world" }))?)
//! }
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut router = Router::new();
//!     router.get("/hello", send_json(handler_fn(hello)));
//!
//!     Server::builder()
//!         .http_addr("0.0.0.0:8080")
//!         .router(router)
//!         .build()
//!         .run()
//!         .await?;
//!     Ok(())
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/courier/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod app;
pub mod config;

pub use courier_core as core;
pub use courier_middleware as middleware;
pub use courier_send as send;
pub use courier_server as server;
pub use courier_telemetry as telemetry;

/// Common imports for writing handlers.
pub mod prelude {
    pub use courier_core::{
        handler_fn, ErrorBody, Handler, HandlerResult, ListBody, QrSpec, Request, RequestExt,
        Response,
    };
    pub use courier_server::handler::{send_file, send_json, send_qr_code, send_template};
    pub use courier_server::{Router, Server, StaticFiles};
}
