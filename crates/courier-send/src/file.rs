//! Raw byte responses.

use crate::{fail, is_error_status, respond, take_body, ResponseWriter, APPLICATION_JSON};
use bytes::Bytes;
use courier_core::{Body, Response, SendError, SendResult};

/// Writes a [`Body::Bytes`] payload verbatim.
///
/// Error statuses write the [`Body::Error`] message as the raw body. Both
/// branches declare `application/json`, which existing clients rely on.
pub fn send_file(response: Response, writer: &mut dyn ResponseWriter) -> SendResult {
    let (status, body) = take_body(response, writer)?;

    let payload = match body {
        Body::Error(err) if is_error_status(status) => Bytes::from(err.message),
        Body::Bytes(bytes) if !is_error_status(status) => bytes,
        other if is_error_status(status) => {
            return Err(fail(writer, SendError::mismatch("an error", &other)));
        }
        other => return Err(fail(writer, SendError::mismatch("bytes", &other))),
    };

    respond(writer, status, APPLICATION_JSON, &payload)
}
