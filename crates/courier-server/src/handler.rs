//! The handler adapter.
//!
//! Joins a business [`Handler`] with a send [`Strategy`] into a
//! [`WireHandler`]. The adapter owns every failure path:
//!
//! | Situation | Wire result |
//! |-----------|-------------|
//! | handler returns `Err(e)` | `500`, error body with `e`'s message |
//! | strategy fails after responding | whatever the strategy wrote |
//! | strategy fails before writing | plain-text `500` fallback |
//!
//! Failures are logged and never propagated.
//!
//! # Example
//!
//! ```rust,ignore
//! use courier_core::{handler_fn, Request, HandlerResult, Response};
//! use courier_server::handler::send_json;
//!
//! async fn health(_request: Request) -> HandlerResult {
//!     Ok(Response::json(&serde_json::json!({ "status": "ok" }))?)
//! }
//!
//! router.get("/health", send_json(handler_fn(health)));
//! ```

use courier_core::{Handler, Request, Response, SendResult};
use courier_middleware::{Response as WireResponse, ResponseExt, WireHandler};
use courier_send::{BufferedWriter, Strategy};
use http::StatusCode;
use std::sync::Arc;

/// Adapts `handler` to the wire using `strategy`.
pub fn adapt<H: Handler>(handler: H, strategy: Strategy) -> WireHandler {
    let handler = Arc::new(handler);
    Arc::new(move |request: Request| {
        let handler = Arc::clone(&handler);
        Box::pin(async move {
            let path = request.uri().path().to_string();
            let response = match handler.handle(request).await {
                Ok(response) => response,
                Err(err) => {
                    tracing::error!(path = %path, error = %err, "Handler failed");
                    Response::error(StatusCode::INTERNAL_SERVER_ERROR, err)
                }
            };
            write_response(response, strategy)
        })
    })
}

/// Writes `response` with `strategy` into a buffered wire response.
pub fn write_response(response: Response, strategy: Strategy) -> WireResponse {
    let mut writer = BufferedWriter::new();
    let result = strategy.send(response, &mut writer);
    settle(result, writer, strategy)
}

fn settle(result: SendResult, writer: BufferedWriter, strategy: Strategy) -> WireResponse {
    let Err(failure) = result else {
        return writer.into_response();
    };

    let err = failure.error();
    if err.is_client() {
        tracing::warn!(strategy = strategy.name(), error = %err, "Error response sent");
    } else {
        tracing::error!(strategy = strategy.name(), error = %failure, "Failed to send response");
    }

    if failure.has_responded() {
        writer.into_response()
    } else {
        WireResponse::plain(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
    }
}

/// Sends the handler's raw bytes.
pub fn send_file<H: Handler>(handler: H) -> WireHandler {
    adapt(handler, Strategy::File)
}

/// Sends the handler's response as JSON.
pub fn send_json<H: Handler>(handler: H) -> WireHandler {
    adapt(handler, Strategy::Json)
}

/// Renders the handler's QR specification as a PNG.
pub fn send_qr_code<H: Handler>(handler: H) -> WireHandler {
    adapt(handler, Strategy::QrCode)
}

/// Renders the handler's template reference.
pub fn send_template<H: Handler>(handler: H) -> WireHandler {
    adapt(handler, Strategy::Template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use courier_core::{handler_fn, HandlerResult, QrSpec, SendError, SendFailure};
    use http::header::CONTENT_TYPE;
    use http_body_util::BodyExt;

    fn request() -> Request {
        http::Request::builder()
            .uri("/orders/7")
            .body(Bytes::new())
            .unwrap()
    }

    async fn body(response: WireResponse) -> Bytes {
        response.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_handler_error_becomes_json_500() {
        let handler = send_json(handler_fn(|_request: Request| async {
            Err::<Response, _>(anyhow::anyhow!("database unavailable"))
        }));

        let response = handler(request()).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json: serde_json::Value = serde_json::from_slice(&body(response).await).unwrap();
        assert_eq!(json, serde_json::json!({ "message": "database unavailable" }));
    }

    #[tokio::test]
    async fn test_error_response_status_is_kept() {
        let handler = send_json(handler_fn(|_request: Request| async {
            Ok(Response::error(StatusCode::NOT_FOUND, "not found"))
        }));

        let response = handler(request()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body(response).await.as_ref(), br#"{"message":"not found"}"#);
    }

    #[tokio::test]
    async fn test_file_success() {
        let handler = send_file(handler_fn(|_request: Request| async {
            Ok(Response::bytes(&b"\x00\x01raw"[..]))
        }));

        let response = handler(request()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(body(response).await.as_ref(), b"\x00\x01raw");
    }

    #[tokio::test]
    async fn test_empty_body_does_not_panic() {
        let handler = send_qr_code(handler_fn(|_request: Request| async {
            Ok(Response::empty(StatusCode::OK))
        }));

        let response = handler(request()).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_qr_code_png() {
        let handler = send_qr_code(handler_fn(|_request: Request| async {
            Ok(Response::qr(QrSpec::new("hello")))
        }));

        let response = handler(request()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "image/png");
        assert!(body(response).await.starts_with(b"\x89PNG"));
    }

    #[tokio::test]
    async fn test_template_is_not_implemented() {
        let handler = send_template(handler_fn(|_request: Request| async {
            Ok(Response::template("home", serde_json::json!({})))
        }));

        let response = handler(request()).await;
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn test_struct_handler() {
        struct Greeting {
            name: &'static str,
        }

        impl Handler for Greeting {
            async fn handle(&self, _request: Request) -> HandlerResult {
                Ok(Response::json(&serde_json::json!({ "hello": self.name }))?)
            }
        }

        let response = adapt(Greeting { name: "courier" }, Strategy::Json)(request()).await;
        assert_eq!(body(response).await.as_ref(), br#"{"hello":"courier"}"#);
    }

    #[tokio::test]
    async fn test_unwritten_failure_gets_fallback() {
        let writer = BufferedWriter::new();
        let failure = SendFailure::Unwritten(SendError::Encoding("broken pipe".into()));

        let response = settle(Err(failure), writer, Strategy::Json);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body(response).await.as_ref(), b"Internal Server Error\n");
    }

    #[tokio::test]
    async fn test_responded_failure_keeps_written_response() {
        let response = write_response(
            Response::with_status(StatusCode::BAD_REQUEST, courier_core::Body::Bytes(Bytes::new())),
            Strategy::File,
        );
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let text = String::from_utf8(body(response).await.to_vec()).unwrap();
        assert!(text.starts_with("response body is not an error"));
    }
}
