//! Common types used throughout the middleware chain.

use crate::middleware::BoxFuture;
use bytes::Bytes;
use http::header::{HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use http_body_util::Full;
use std::sync::Arc;

/// The HTTP request type seen by middleware: body already collected.
pub type Request = courier_core::Request;

/// The HTTP response type produced by wire-level handlers.
pub type Response = http::Response<Full<Bytes>>;

/// A type-erased wire-level handler.
///
/// Produced by the handler adapter and by the server's own endpoints;
/// cheap to clone and share across connection tasks.
pub type WireHandler = Arc<dyn Fn(Request) -> BoxFuture<'static, Response> + Send + Sync>;

/// Extension trait for building plain-text responses.
pub trait ResponseExt {
    /// Creates a `text/plain` response with the given status and message.
    fn plain(status: StatusCode, message: &str) -> Response;
}

impl ResponseExt for Response {
    fn plain(status: StatusCode, message: &str) -> Response {
        let mut response = http::Response::new(Full::new(Bytes::from(format!("{message}\n"))));
        *response.status_mut() = status;
        response.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_plain_response() {
        let response = Response::plain(StatusCode::NOT_FOUND, "404 page not found");
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body.as_ref(), b"404 page not found\n");
    }
}
