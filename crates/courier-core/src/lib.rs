//! # Courier Core
//!
//! Response model and handler contract for the Courier response dispatch layer.
//!
//! A business handler computes a [`Response`] (or fails with an
//! [`anyhow::Error`]). A send strategy from `courier-send` then turns that
//! response into bytes on the wire. This crate holds the types both sides
//! agree on:
//!
//! - [`Response`] - status code plus an optional [`Body`]
//! - [`Body`] - the closed set of payloads a handler may produce
//! - [`ErrorBody`] - canonical `{"message": "..."}` error shape
//! - [`QrSpec`] - parameters describing a QR code image
//! - [`ListBody`] - paginated list envelope
//! - [`SendError`] / [`SendFailure`] - what can go wrong while sending
//! - [`Handler`] - the business handler contract
//! - [`RequestExt`] - string-typed path parameter helpers
//!
//! ## Example
//!
//! ```rust
//! use courier_core::{Body, Response};
//! use http::StatusCode;
//!
//! let ok = Response::bytes("hello");
//! assert_eq!(ok.status, StatusCode::OK);
//!
//! let failed = Response::error(StatusCode::NOT_FOUND, "not found");
//! assert!(matches!(failed.body, Some(Body::Error(_))));
//! ```

#![doc(html_root_url = "https://docs.rs/courier-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod handler;
mod list;
mod params;
mod qr;
mod response;

pub use error::{SendError, SendFailure, SendResult};
pub use handler::{handler_fn, FnHandler, Handler, HandlerResult, Request};
pub use list::ListBody;
pub use params::{Params, RemoteAddr, RequestExt};
pub use qr::{EncodingMode, ErrorCorrectionLevel, ParseQrOptionError, QrSpec, DEFAULT_QR_SIZE};
pub use response::{Body, BodyKind, ErrorBody, Response, TemplateRef};
