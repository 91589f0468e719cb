//! # Courier Middleware
//!
//! Middleware chain for Courier wire handlers.
//!
//! A [`Pipeline`] is an ordered list of [`Middleware`] stages wrapped around
//! a [`WireHandler`]. Each stage receives the request and a [`Next`]
//! continuation for the rest of the chain.
//!
//! ## Built-in stages
//!
//! | Stage | Purpose |
//! |-------|---------|
//! | [`InstrumentationMiddleware`](stages::InstrumentationMiddleware) | request log event, `http_requests_total`, `http_request_duration_seconds` |
//!
//! ## Example
//!
//! ```rust,ignore
//! use courier_middleware::{stages::InstrumentationMiddleware, Pipeline};
//! use std::sync::Arc;
//!
//! let pipeline = Arc::new(
//!     Pipeline::builder()
//!         .stage(InstrumentationMiddleware::new(Arc::clone(&metrics)))
//!         .build(),
//! );
//! let handler = pipeline.wrap(inner_handler);
//! ```

#![doc(html_root_url = "https://docs.rs/courier-middleware/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod middleware;
pub mod pipeline;
pub mod stages;
pub mod types;

pub use middleware::{BoxFuture, Middleware, Next};
pub use pipeline::{Pipeline, PipelineBuilder};
pub use types::{Request, Response, ResponseExt, WireHandler};
