//! The response envelope produced by business handlers.

use crate::{ListBody, QrSpec, SendError};
use bytes::Bytes;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical error payload, serialized as `{"message": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub message: String,
}

impl ErrorBody {
    /// Creates an error body from anything displayable.
    pub fn new(message: impl fmt::Display) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// A named template plus the data it would be rendered with.
///
/// No rendering engine exists; the template send strategy always answers
/// `501 Not Implemented`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRef {
    /// Template name.
    pub name: String,
    /// Rendering context.
    pub context: serde_json::Value,
}

/// The payload carried by a [`Response`].
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// An error message, required whenever the status is 400 or above.
    Error(ErrorBody),
    /// Raw bytes written verbatim.
    Bytes(Bytes),
    /// An arbitrary JSON document.
    Json(serde_json::Value),
    /// A paginated list.
    List(ListBody),
    /// Parameters for a generated QR code image.
    Qr(QrSpec),
    /// A template reference.
    Template(TemplateRef),
}

impl Body {
    /// Returns the kind tag of this body.
    #[must_use]
    pub const fn kind(&self) -> BodyKind {
        match self {
            Self::Error(_) => BodyKind::Error,
            Self::Bytes(_) => BodyKind::Bytes,
            Self::Json(_) => BodyKind::Json,
            Self::List(_) => BodyKind::List,
            Self::Qr(_) => BodyKind::Qr,
            Self::Template(_) => BodyKind::Template,
        }
    }
}

/// Discriminant of [`Body`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    /// [`Body::Error`]
    Error,
    /// [`Body::Bytes`]
    Bytes,
    /// [`Body::Json`]
    Json,
    /// [`Body::List`]
    List,
    /// [`Body::Qr`]
    Qr,
    /// [`Body::Template`]
    Template,
}

impl BodyKind {
    /// Returns a short lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Bytes => "bytes",
            Self::Json => "json",
            Self::List => "list",
            Self::Qr => "qr",
            Self::Template => "template",
        }
    }
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status code plus optional body, built once per request and consumed by
/// exactly one send strategy.
///
/// Send strategies require [`Body::Error`] whenever `status >= 400`.
///
/// # Example
///
/// ```rust
/// use courier_core::{Body, Response};
/// use http::StatusCode;
///
/// let response = Response::json(&serde_json::json!({"id": 7})).unwrap();
/// assert_eq!(response.status, StatusCode::OK);
/// assert!(matches!(response.body, Some(Body::Json(_))));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// HTTP status code.
    pub status: StatusCode,
    /// Response payload. `None` is reported as an empty body at send time.
    pub body: Option<Body>,
}

impl Response {
    /// Creates a `200 OK` response with the given body.
    #[must_use]
    pub const fn new(body: Body) -> Self {
        Self {
            status: StatusCode::OK,
            body: Some(body),
        }
    }

    /// Creates a response with an explicit status.
    #[must_use]
    pub const fn with_status(status: StatusCode, body: Body) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    /// Creates a response without a body.
    #[must_use]
    pub const fn empty(status: StatusCode) -> Self {
        Self { status, body: None }
    }

    /// Creates an error response whose message is `err.to_string()`.
    pub fn error(status: StatusCode, err: impl fmt::Display) -> Self {
        Self::with_status(status, Body::Error(ErrorBody::new(err)))
    }

    /// Creates a `200 OK` raw bytes response.
    pub fn bytes(data: impl Into<Bytes>) -> Self {
        Self::new(Body::Bytes(data.into()))
    }

    /// Creates a `200 OK` JSON response from any serializable value.
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, SendError> {
        let value = serde_json::to_value(value).map_err(|e| SendError::Encoding(e.to_string()))?;
        Ok(Self::new(Body::Json(value)))
    }

    /// Creates a `200 OK` paginated list response.
    #[must_use]
    pub const fn list(list: ListBody) -> Self {
        Self::new(Body::List(list))
    }

    /// Creates a `200 OK` QR code response.
    #[must_use]
    pub const fn qr(spec: QrSpec) -> Self {
        Self::new(Body::Qr(spec))
    }

    /// Creates a `200 OK` template response.
    pub fn template(name: impl Into<String>, context: serde_json::Value) -> Self {
        Self::new(Body::Template(TemplateRef {
            name: name.into(),
            context,
        }))
    }

    /// Returns `true` for 4xx and 5xx statuses.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status.is_client_error() || self.status.is_server_error()
    }
}
