//! Errors raised while writing a [`Response`](crate::Response) to the wire.
//!
//! Every send strategy returns a [`SendResult`]. The error itself says what
//! went wrong; the [`SendFailure`] wrapper says whether anything reached the
//! client before it did.

use crate::{Body, BodyKind};
use http::StatusCode;
use thiserror::Error;

/// Result type returned by send strategies.
pub type SendResult = Result<(), SendFailure>;

/// Reasons a response could not be sent as requested.
#[derive(Error, Debug)]
pub enum SendError {
    /// The response carried no body.
    #[error("response body is empty")]
    EmptyBody,

    /// The body variant does not fit the strategy or the status code.
    #[error("response body is not {expected} (found {found})")]
    BodyTypeMismatch {
        /// What the strategy accepts.
        expected: &'static str,
        /// What the handler produced.
        found: BodyKind,
    },

    /// Serializing or encoding the payload failed.
    #[error("encoding failed: {0}")]
    Encoding(String),

    /// The QR symbol could not be scaled to the requested size.
    #[error("scaling failed: {0}")]
    Scaling(String),

    /// Writing to the connection failed.
    #[error("write failed: {0}")]
    Write(#[from] std::io::Error),

    /// An error body was echoed to the client with its own status.
    #[error("{0}")]
    Client(String),

    /// The strategy is intentionally not supported.
    #[error("{0} responses are not implemented")]
    Unimplemented(&'static str),
}

impl SendError {
    /// Builds a [`SendError::BodyTypeMismatch`] for the given body.
    #[must_use]
    pub const fn mismatch(expected: &'static str, found: &Body) -> Self {
        Self::BodyTypeMismatch {
            expected,
            found: found.kind(),
        }
    }

    /// Returns the status used for the plain-text fallback.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Unimplemented(_) => StatusCode::NOT_IMPLEMENTED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns `true` for errors that only echo a client-facing error body.
    #[must_use]
    pub const fn is_client(&self) -> bool {
        matches!(self, Self::Client(_))
    }
}

/// A [`SendError`] tagged with the state of the wire.
#[derive(Error, Debug)]
pub enum SendFailure {
    /// A status line already reached the writer; nothing more should be sent.
    #[error("{0}")]
    Responded(SendError),

    /// Nothing was written; the caller may still send a fallback.
    #[error("{0} (nothing written)")]
    Unwritten(SendError),
}

impl SendFailure {
    /// Returns the underlying error.
    #[must_use]
    pub const fn error(&self) -> &SendError {
        match self {
            Self::Responded(err) | Self::Unwritten(err) => err,
        }
    }

    /// Consumes the failure and returns the underlying error.
    #[must_use]
    pub fn into_error(self) -> SendError {
        match self {
            Self::Responded(err) | Self::Unwritten(err) => err,
        }
    }

    /// Returns `true` if the client already received a status line.
    #[must_use]
    pub const fn has_responded(&self) -> bool {
        matches!(self, Self::Responded(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorBody;

    #[test]
    fn test_empty_body_message() {
        assert_eq!(SendError::EmptyBody.to_string(), "response body is empty");
    }

    #[test]
    fn test_mismatch_names_both_kinds() {
        let body = Body::Error(ErrorBody::new("x"));
        let err = SendError::mismatch("bytes", &body);
        assert_eq!(err.to_string(), "response body is not bytes (found error)");
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            SendError::Unimplemented("template").status_code(),
            StatusCode::NOT_IMPLEMENTED
        );
        assert_eq!(
            SendError::Scaling("too small".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone");
        let err: SendError = io.into();
        assert!(matches!(err, SendError::Write(_)));
    }

    #[test]
    fn test_failure_accessors() {
        let failure = SendFailure::Responded(SendError::Client("nope".into()));
        assert!(failure.has_responded());
        assert!(failure.error().is_client());
        assert!(matches!(failure.into_error(), SendError::Client(m) if m == "nope"));

        let failure = SendFailure::Unwritten(SendError::EmptyBody);
        assert!(!failure.has_responded());
        assert_eq!(failure.to_string(), "response body is empty (nothing written)");
    }
}
