//! Template responses, which are not supported.

use crate::{echo_error, fail, is_error_status, take_body, write_plain_error, ResponseWriter};
use courier_core::{Body, Response, SendError, SendFailure, SendResult};
use http::StatusCode;

/// Answers `501 Not Implemented` for any template response.
///
/// No rendering engine is wired in, so a template body is never turned
/// into a successful response.
pub fn send_template(response: Response, writer: &mut dyn ResponseWriter) -> SendResult {
    let (status, body) = take_body(response, writer)?;

    if is_error_status(status) {
        return match body {
            Body::Error(err) => echo_error(writer, status, err),
            other => Err(fail(writer, SendError::mismatch("an error", &other))),
        };
    }

    let err = SendError::Unimplemented("template");
    match write_plain_error(writer, StatusCode::NOT_IMPLEMENTED, &err.to_string()) {
        Ok(()) => Err(SendFailure::Responded(err)),
        Err(_) => Err(fail(writer, err)),
    }
}
