//! JSON responses.

use crate::{fail, is_error_status, respond, take_body, ResponseWriter, APPLICATION_JSON};
use courier_core::{Body, Response, SendError, SendResult};

/// Serializes the body as compact JSON.
///
/// Success statuses accept [`Body::Json`], [`Body::List`] and
/// [`Body::Error`]. Error statuses accept only [`Body::Error`], written as
/// `{"message": "..."}`.
pub fn send_json(response: Response, writer: &mut dyn ResponseWriter) -> SendResult {
    let (status, body) = take_body(response, writer)?;

    let encoded = match &body {
        Body::Error(err) => serde_json::to_vec(err),
        Body::Json(value) if !is_error_status(status) => serde_json::to_vec(value),
        Body::List(list) if !is_error_status(status) => serde_json::to_vec(list),
        other if is_error_status(status) => {
            return Err(fail(writer, SendError::mismatch("an error", other)));
        }
        other => {
            return Err(fail(
                writer,
                SendError::mismatch("JSON, a list or an error", other),
            ));
        }
    };

    match encoded {
        Ok(payload) => respond(writer, status, APPLICATION_JSON, &payload),
        Err(err) => Err(fail(writer, SendError::Encoding(err.to_string()))),
    }
}
