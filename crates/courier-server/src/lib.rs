//! # Courier Server
//!
//! HTTP server infrastructure for Courier:
//!
//! - HTTP/1.1 via Hyper, one task per connection
//! - Method and path routing with `{name}` parameters
//! - The handler adapter pairing business handlers with send strategies
//! - Static file serving with an `index.html` fallback
//! - A Prometheus `/metrics` endpoint
//! - Graceful shutdown on SIGINT/SIGTERM
//!
//! ## Example
//!
//! ```rust,ignore
//! use courier_core::{handler_fn, Request, HandlerResult, Response, QrSpec, RequestExt};
//! use courier_server::{handler::send_qr_code, Router, Server, StaticFiles};
//!
//! async fn qr(request: Request) -> HandlerResult {
//!     Ok(Response::qr(QrSpec::new(request.param("content"))))
//! }
//!
//! let mut router = Router::new();
//! router.get("/qr/{content}", send_qr_code(handler_fn(qr)));
//! router.fallback(StaticFiles::new("./public").into_handler());
//!
//! Server::builder()
//!     .http_addr("0.0.0.0:8080")
//!     .router(router)
//!     .build()
//!     .run()
//!     .await?;
//! ```

#![doc(html_root_url = "https://docs.rs/courier-server/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod config;
pub mod endpoints;
pub mod handler;
pub mod router;
pub mod server;
pub mod shutdown;
pub mod static_files;

pub use config::{ServerConfig, ServerConfigBuilder};
pub use endpoints::metrics_handler;
pub use handler::{adapt, send_file, send_json, send_qr_code, send_template, write_response};
pub use router::{Resolution, Router};
pub use server::{Server, ServerBuilder, ServerError};
pub use shutdown::{ConnectionToken, ConnectionTracker, ShutdownSignal};
pub use static_files::{StaticFileError, StaticFiles};
