//! The wire writer abstraction.
//!
//! A [`ResponseWriter`] is a status/header/body sink that remembers whether
//! the status line went out. Send strategies only ever talk to this trait,
//! so they can be exercised without a socket.

use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_LENGTH, CONTENT_TYPE, X_CONTENT_TYPE_OPTIONS};
use http::{HeaderMap, StatusCode};
use http_body_util::Full;
use std::io::{self, Write};

/// Content type of plain-text error responses.
pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

/// A sink for one HTTP response.
///
/// Headers may be changed until [`write_head`](Self::write_head) is called.
/// Writing body bytes before the head implies `200 OK`.
pub trait ResponseWriter: Write {
    /// Headers that will be sent with the status line.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Sends the status line and the current headers.
    fn write_head(&mut self, status: StatusCode) -> io::Result<()>;

    /// Returns `true` once a status line was sent.
    fn head_written(&self) -> bool;
}

/// Writes a plain-text error: `message` followed by a newline.
///
/// Mirrors the conventional plain-text error shape: UTF-8 text content
/// type, `nosniff`, no stale content length.
pub fn write_plain_error(
    writer: &mut dyn ResponseWriter,
    status: StatusCode,
    message: &str,
) -> io::Result<()> {
    let headers = writer.headers_mut();
    headers.remove(CONTENT_LENGTH);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN_UTF8));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    writer.write_head(status)?;
    writer.write_all(message.as_bytes())?;
    writer.write_all(b"\n")
}

/// A [`ResponseWriter`] that buffers the whole response in memory.
///
/// Headers are frozen when the head is written; later edits through
/// [`headers_mut`](ResponseWriter::headers_mut) are ignored, as they would
/// be on a real connection.
///
/// # Example
///
/// ```rust
/// use courier_send::{BufferedWriter, ResponseWriter};
/// use http::StatusCode;
/// use std::io::Write;
///
/// let mut writer = BufferedWriter::new();
/// writer.write_head(StatusCode::CREATED).unwrap();
/// writer.write_all(b"done").unwrap();
///
/// let response = writer.into_response();
/// assert_eq!(response.status(), StatusCode::CREATED);
/// ```
#[derive(Debug, Default)]
pub struct BufferedWriter {
    headers: HeaderMap,
    head: Option<(StatusCode, HeaderMap)>,
    body: Vec<u8>,
}

impl BufferedWriter {
    /// Creates an empty writer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The status that was written, if any.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        self.head.as_ref().map(|(status, _)| *status)
    }

    /// Headers as sent, or as pending if the head was not written yet.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.head
            .as_ref()
            .map_or(&self.headers, |(_, headers)| headers)
    }

    /// Body bytes written so far.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Converts the buffer into a wire response.
    ///
    /// A writer that never wrote a head produces `200 OK` with whatever
    /// headers were pending.
    #[must_use]
    pub fn into_response(self) -> http::Response<Full<Bytes>> {
        let (status, headers) = self
            .head
            .unwrap_or((StatusCode::OK, self.headers));
        let mut response = http::Response::new(Full::new(Bytes::from(self.body)));
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        response
    }
}

impl Write for BufferedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.head.is_none() {
            self.write_head(StatusCode::OK)?;
        }
        self.body.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl ResponseWriter for BufferedWriter {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn write_head(&mut self, status: StatusCode) -> io::Result<()> {
        if self.head.is_some() {
            return Err(io::Error::other("response head already written"));
        }
        self.head = Some((status, self.headers.clone()));
        Ok(())
    }

    fn head_written(&self) -> bool {
        self.head.is_some()
    }
}
