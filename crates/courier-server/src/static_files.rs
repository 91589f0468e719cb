//! Static file serving for single-page applications.
//!
//! `/` and every path without a file extension resolve to `/index.html`
//! under the root, so client-side routes load the application shell.
//! Everything else maps onto the file of the same relative path.
//!
//! # Security
//!
//! - Any `..` component is rejected with `403 Forbidden`
//! - Resolved paths are canonicalized and must stay inside the root
//! - Only `GET` and `HEAD` are allowed
//!
//! # Example
//!
//! ```rust,ignore
//! use courier_server::{Router, StaticFiles};
//!
//! let mut router = Router::new();
//! router.fallback(StaticFiles::new("./public").into_handler());
//! ```

use crate::router::percent_decode;
use bytes::Bytes;
use courier_middleware::{Request, Response, ResponseExt, WireHandler};
use http::header::{self, HeaderMap, HeaderValue};
use http::{Method, StatusCode};
use http_body_util::Full;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;

/// File served for `/` and extensionless paths.
pub const INDEX_FILE: &str = "index.html";

/// Errors that can occur when serving static files.
#[derive(Debug, Error)]
pub enum StaticFileError {
    /// The requested file was not found.
    #[error("file not found: {0}")]
    NotFound(String),

    /// The path escapes the root.
    #[error("forbidden path: {0}")]
    Forbidden(String),

    /// Only `GET` and `HEAD` are served.
    #[error("method not allowed")]
    MethodNotAllowed,

    /// I/O error while reading the file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StaticFileError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "404 page not found",
            Self::Forbidden(_) => "403 Forbidden",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::Io(_) => "500 Internal Server Error",
        }
    }
}

/// Serves files below a root directory.
#[derive(Debug, Clone)]
pub struct StaticFiles {
    root: PathBuf,
}

impl StaticFiles {
    /// Creates a file server rooted at `root`.
    #[must_use]
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Serves `request`.
    ///
    /// Honors `If-Modified-Since` with `304 Not Modified`. `HEAD` gets the
    /// headers of the corresponding `GET` and an empty body.
    pub async fn serve(&self, request: &Request) -> Result<Response, StaticFileError> {
        let method = request.method();
        if method != Method::GET && method != Method::HEAD {
            return Err(StaticFileError::MethodNotAllowed);
        }

        let path = self.resolve_path(request.uri().path()).await?;
        let metadata = tokio::fs::metadata(&path).await?;
        if !metadata.is_file() {
            return Err(StaticFileError::NotFound(request.uri().path().to_string()));
        }

        let modified = metadata.modified().ok();
        if let Some(modified) = modified {
            if not_modified_since(request.headers(), modified) {
                let mut response = Response::new(Full::new(Bytes::new()));
                *response.status_mut() = StatusCode::NOT_MODIFIED;
                set_last_modified(response.headers_mut(), modified);
                return Ok(response);
            }
        }

        let body = if method == Method::HEAD {
            Bytes::new()
        } else {
            Bytes::from(tokio::fs::read(&path).await?)
        };

        let mut response = Response::new(Full::new(body));
        let headers = response.headers_mut();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(detect_mime_type(&path)),
        );
        headers.insert(header::CONTENT_LENGTH, HeaderValue::from(metadata.len()));
        if let Some(modified) = modified {
            set_last_modified(headers, modified);
        }
        Ok(response)
    }

    /// Maps a request path onto a canonical file path inside the root.
    async fn resolve_path(&self, request_path: &str) -> Result<PathBuf, StaticFileError> {
        let decoded = percent_decode(request_path);

        if Path::new(&decoded)
            .components()
            .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(StaticFileError::Forbidden(request_path.to_string()));
        }

        let relative = if decoded == "/" || Path::new(&decoded).extension().is_none() {
            INDEX_FILE
        } else {
            decoded.trim_start_matches('/')
        };

        let not_found = || StaticFileError::NotFound(request_path.to_string());
        let root = tokio::fs::canonicalize(&self.root)
            .await
            .map_err(|_| not_found())?;
        let canonical = tokio::fs::canonicalize(root.join(relative))
            .await
            .map_err(|_| not_found())?;

        if !canonical.starts_with(&root) {
            return Err(StaticFileError::Forbidden(request_path.to_string()));
        }
        Ok(canonical)
    }

    /// Wraps the file server as a wire handler.
    ///
    /// Errors become plain-text responses with the matching status.
    #[must_use]
    pub fn into_handler(self) -> WireHandler {
        let files = Arc::new(self);
        Arc::new(move |request: Request| {
            let files = Arc::clone(&files);
            Box::pin(async move {
                match files.serve(&request).await {
                    Ok(response) => response,
                    Err(err) => {
                        match &err {
                            StaticFileError::Io(_) => {
                                tracing::error!(path = request.uri().path(), error = %err, "Static file read failed");
                            }
                            _ => {
                                tracing::debug!(path = request.uri().path(), error = %err, "Static file rejected");
                            }
                        }
                        Response::plain(err.status_code(), err.public_message())
                    }
                }
            })
        })
    }
}

fn not_modified_since(headers: &HeaderMap, modified: SystemTime) -> bool {
    let Some(since) = headers
        .get(header::IF_MODIFIED_SINCE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| httpdate::parse_http_date(v).ok())
    else {
        return false;
    };
    // HTTP dates have one-second resolution.
    httpdate::HttpDate::from(modified) <= httpdate::HttpDate::from(since)
}

fn set_last_modified(headers: &mut HeaderMap, modified: SystemTime) {
    if let Ok(value) = HeaderValue::from_str(&httpdate::fmt_http_date(modified)) {
        headers.insert(header::LAST_MODIFIED, value);
    }
}

/// Returns the content type for a file, by extension.
#[must_use]
pub fn detect_mime_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match extension.as_str() {
        // Text
        "html" | "htm" => "text/html; charset=utf-8",
        "css" => "text/css; charset=utf-8",
        "js" | "mjs" => "text/javascript; charset=utf-8",
        "json" | "map" => "application/json",
        "webmanifest" => "application/manifest+json",
        "xml" => "application/xml",
        "txt" => "text/plain; charset=utf-8",
        "csv" => "text/csv; charset=utf-8",

        // Images
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "avif" => "image/avif",

        // Fonts
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",

        // Other
        "pdf" => "application/pdf",
        "wasm" => "application/wasm",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "mp3" => "audio/mpeg",

        _ => "application/octet-stream",
    }
}
