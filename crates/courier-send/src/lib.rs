//! # Courier Send
//!
//! Send strategies: each one serializes a single kind of
//! [`Response`](courier_core::Response) body onto a [`ResponseWriter`].
//!
//! | Strategy | Accepts (status < 400) | Content type |
//! |----------|------------------------|--------------|
//! | [`send_file`] | `Bytes` | `application/json` |
//! | [`send_json`] | `Json`, `List`, `Error` | `application/json` |
//! | [`send_qr_code`] | `Qr` | `image/png` |
//! | [`send_template`] | anything | always `501 Not Implemented` |
//!
//! Every strategy requires an `Error` body when the status is 400 or above.
//!
//! ## Failure handling
//!
//! When a strategy fails before the status line is written it sends a
//! plain-text fallback (500, or 501 for templates) and reports
//! [`SendFailure::Responded`]. If even the fallback cannot be written the
//! failure is [`SendFailure::Unwritten`] and the caller may try once more.
//!
//! ## Example
//!
//! ```rust
//! use courier_core::Response;
//! use courier_send::{BufferedWriter, Strategy};
//!
//! let mut writer = BufferedWriter::new();
//! Strategy::Json
//!     .send(Response::error(http::StatusCode::NOT_FOUND, "not found"), &mut writer)
//!     .unwrap();
//! assert_eq!(writer.body(), br#"{"message":"not found"}"#);
//! ```

#![doc(html_root_url = "https://docs.rs/courier-send/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod file;
mod json;
pub mod qr;
mod template;
mod writer;

use courier_core::{Body, ErrorBody, Response, SendError, SendFailure, SendResult};
use http::header::{HeaderValue, CONTENT_TYPE};
use http::StatusCode;

pub use file::send_file;
pub use json::send_json;
pub use qr::send_qr_code;
pub use template::send_template;
pub use writer::{write_plain_error, BufferedWriter, ResponseWriter, TEXT_PLAIN_UTF8};

/// Content type of JSON and raw byte responses.
pub const APPLICATION_JSON: &str = "application/json";

/// Content type of QR code images.
pub const IMAGE_PNG: &str = "image/png";

/// The available send strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Raw bytes, see [`send_file`].
    File,
    /// JSON documents, see [`send_json`].
    Json,
    /// PNG QR codes, see [`send_qr_code`].
    QrCode,
    /// Templates, see [`send_template`].
    Template,
}

impl Strategy {
    /// Writes `response` with this strategy.
    pub fn send(self, response: Response, writer: &mut dyn ResponseWriter) -> SendResult {
        match self {
            Self::File => send_file(response, writer),
            Self::Json => send_json(response, writer),
            Self::QrCode => send_qr_code(response, writer),
            Self::Template => send_template(response, writer),
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Json => "json",
            Self::QrCode => "qr_code",
            Self::Template => "template",
        }
    }
}

/// Statuses at or above 400 must carry an error body.
fn is_error_status(status: StatusCode) -> bool {
    status.as_u16() >= 400
}

/// Reports `err`, writing a plain-text fallback if nothing went out yet.
pub(crate) fn fail(writer: &mut dyn ResponseWriter, err: SendError) -> SendFailure {
    if writer.head_written() {
        return SendFailure::Responded(err);
    }
    match write_plain_error(writer, err.status_code(), &err.to_string()) {
        Ok(()) => SendFailure::Responded(err),
        Err(_) if writer.head_written() => SendFailure::Responded(err),
        Err(_) => SendFailure::Unwritten(err),
    }
}

/// Writes a complete response with the given content type.
pub(crate) fn respond(
    writer: &mut dyn ResponseWriter,
    status: StatusCode,
    content_type: &'static str,
    payload: &[u8],
) -> SendResult {
    writer
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    if let Err(err) = writer.write_head(status) {
        return Err(fail(writer, SendError::Write(err)));
    }
    writer
        .write_all(payload)
        .map_err(|err| SendFailure::Responded(SendError::Write(err)))
}

/// Echoes an error body as plain text with its own status.
///
/// Succeeds on the wire but reports [`SendError::Client`] so the caller can
/// log that the handler's error reached the client.
pub(crate) fn echo_error(
    writer: &mut dyn ResponseWriter,
    status: StatusCode,
    body: ErrorBody,
) -> SendResult {
    match write_plain_error(writer, status, &body.message) {
        Ok(()) => Err(SendFailure::Responded(SendError::Client(body.message))),
        Err(err) => Err(fail(writer, SendError::Write(err))),
    }
}

/// Splits off the body, failing with [`SendError::EmptyBody`] when absent.
pub(crate) fn take_body(
    response: Response,
    writer: &mut dyn ResponseWriter,
) -> Result<(StatusCode, Body), SendFailure> {
    match response.body {
        Some(body) => Ok((response.status, body)),
        None => Err(fail(writer, SendError::EmptyBody)),
    }
}
