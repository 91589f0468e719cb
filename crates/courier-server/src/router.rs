//! Request routing and path matching.
//!
//! Routes are `(method, pattern)` pairs. Patterns are `/`-separated
//! segments; a `{name}` segment captures one path segment into the
//! request's [`Params`]. Routes are tried in registration order and the
//! first match wins.
//!
//! When nothing matches, the fallback handler (if any) runs; without one
//! the router answers `404 page not found`. A path that matches some route
//! under a different method gets `405 Method Not Allowed`.
//!
//! # Example
//!
//! ```rust,ignore
//! use courier_server::Router;
//! use http::Method;
//!
//! let mut router = Router::new();
//! router.route(Method::GET, "/qr/{content}", qr_handler);
//! router.route(Method::GET, "/qr/{content}/{size}", qr_handler);
//! router.fallback(static_files.into_handler());
//! ```

use courier_core::Params;
use courier_middleware::{Request, Response, ResponseExt, WireHandler};
use http::{Method, StatusCode};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathSegment {
    Literal(String),
    Param(String),
}

fn parse_segments(pattern: &str) -> Vec<PathSegment> {
    pattern
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| match s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => PathSegment::Param(name.to_string()),
            None => PathSegment::Literal(s.to_string()),
        })
        .collect()
}

struct Route {
    method: Method,
    pattern: String,
    segments: Vec<PathSegment>,
    handler: WireHandler,
}

impl Route {
    fn match_path(&self, path: &str) -> Option<Params> {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = Params::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                PathSegment::Literal(literal) if literal == part => {}
                PathSegment::Literal(_) => return None,
                PathSegment::Param(name) => params.push(name.clone(), percent_decode(part)),
            }
        }
        Some(params)
    }
}

/// Outcome of [`Router::resolve`].
pub enum Resolution {
    /// A route matched.
    Found {
        /// The route's handler.
        handler: WireHandler,
        /// Captured path parameters.
        params: Params,
    },
    /// The path matched a route registered for another method.
    MethodNotAllowed,
    /// No route matched.
    NotFound,
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found { params, .. } => f.debug_struct("Found").field("params", params).finish(),
            Self::MethodNotAllowed => f.write_str("MethodNotAllowed"),
            Self::NotFound => f.write_str("NotFound"),
        }
    }
}

/// Method and path based request router.
#[derive(Default)]
pub struct Router {
    routes: Vec<Route>,
    fallback: Option<WireHandler>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let routes: Vec<String> = self
            .routes
            .iter()
            .map(|r| format!("{} {}", r.method, r.pattern))
            .collect();
        f.debug_struct("Router")
            .field("routes", &routes)
            .field("fallback", &self.fallback.is_some())
            .finish()
    }
}

impl Router {
    /// Creates an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `handler` for `method` requests matching `pattern`.
    pub fn route(&mut self, method: Method, pattern: &str, handler: WireHandler) -> &mut Self {
        self.routes.push(Route {
            method,
            pattern: pattern.to_string(),
            segments: parse_segments(pattern),
            handler,
        });
        self
    }

    /// Registers a `GET` route.
    pub fn get(&mut self, pattern: &str, handler: WireHandler) -> &mut Self {
        self.route(Method::GET, pattern, handler)
    }

    /// Sets the handler for requests no route matches.
    pub fn fallback(&mut self, handler: WireHandler) -> &mut Self {
        self.fallback = Some(handler);
        self
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Finds the handler for a request.
    #[must_use]
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution {
        let mut path_matched = false;
        for route in &self.routes {
            if let Some(params) = route.match_path(path) {
                if route.method == *method {
                    return Resolution::Found {
                        handler: route.handler.clone(),
                        params,
                    };
                }
                path_matched = true;
            }
        }

        if path_matched {
            Resolution::MethodNotAllowed
        } else {
            Resolution::NotFound
        }
    }

    /// Routes `request` to its handler and returns the response.
    ///
    /// Captured parameters are stored in the request extensions, where
    /// [`RequestExt`](courier_core::RequestExt) finds them.
    pub async fn dispatch(&self, mut request: Request) -> Response {
        match self.resolve(request.method(), request.uri().path()) {
            Resolution::Found { handler, params } => {
                request.extensions_mut().insert(params);
                handler(request).await
            }
            Resolution::MethodNotAllowed => {
                Response::plain(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
            }
            Resolution::NotFound => match &self.fallback {
                Some(fallback) => fallback(request).await,
                None => Response::plain(StatusCode::NOT_FOUND, "404 page not found"),
            },
        }
    }
}

/// Decodes `%XX` escapes. Malformed escapes are kept as they are and
/// invalid UTF-8 is replaced.
pub(crate) fn percent_decode(input: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(input.as_bytes())).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use courier_core::RequestExt;
    use http_body_util::BodyExt;
    use std::sync::Arc;

    fn echo(tag: &'static str) -> WireHandler {
        Arc::new(move |request: Request| {
            Box::pin(async move {
                let pairs: Vec<String> = request
                    .params()
                    .map(|p| p.iter().map(|(k, v)| format!("{k}={v}")).collect())
                    .unwrap_or_default();
                Response::plain(StatusCode::OK, &format!("{tag} {}", pairs.join(",")))
            })
        })
    }

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn request(method: Method, uri: &str) -> Request {
        http::Request::builder()
            .method(method)
            .uri(uri)
            .body(Bytes::new())
            .unwrap()
    }

    #[test]
    fn test_parse_segments() {
        assert_eq!(
            parse_segments("/qr/{content}/png"),
            vec![
                PathSegment::Literal("qr".into()),
                PathSegment::Param("content".into()),
                PathSegment::Literal("png".into()),
            ]
        );
        assert!(parse_segments("/").is_empty());
    }

    #[test]
    fn test_resolve_literal_and_params() {
        let mut router = Router::new();
        router.get("/metrics", echo("metrics"));
        router.get("/qr/{content}/{size}", echo("qr"));

        assert!(matches!(
            router.resolve(&Method::GET, "/metrics"),
            Resolution::Found { ref params, .. } if params.is_empty()
        ));

        match router.resolve(&Method::GET, "/qr/hello/200") {
            Resolution::Found { params, .. } => {
                assert_eq!(params.get("content"), Some("hello"));
                assert_eq!(params.get("size"), Some("200"));
            }
            other => panic!("expected a match, got {other:?}"),
        }
    }

    #[test]
    fn test_segment_count_must_match() {
        let mut router = Router::new();
        router.get("/qr/{content}", echo("qr"));

        assert!(matches!(
            router.resolve(&Method::GET, "/qr"),
            Resolution::NotFound
        ));
        assert!(matches!(
            router.resolve(&Method::GET, "/qr/a/b"),
            Resolution::NotFound
        ));
        assert!(matches!(
            router.resolve(&Method::GET, "/qr/a/"),
            Resolution::Found { .. }
        ));
    }

    #[test]
    fn test_method_mismatch() {
        let mut router = Router::new();
        router.get("/metrics", echo("metrics"));
        assert_eq!(router.route_count(), 1);

        assert!(matches!(
            router.resolve(&Method::POST, "/metrics"),
            Resolution::MethodNotAllowed
        ));
    }

    #[test]
    fn test_params_are_percent_decoded() {
        let mut router = Router::new();
        router.get("/qr/{content}", echo("qr"));

        match router.resolve(&Method::GET, "/qr/hello%20world%2F%zz") {
            Resolution::Found { params, .. } => {
                assert_eq!(params.get("content"), Some("hello world/%zz"));
            }
            other => panic!("expected a match, got {other:?}"),
        }
    }

    #[test]
    fn test_percent_decode_edges() {
        assert_eq!(percent_decode("caf%C3%A9"), "café");
        assert_eq!(percent_decode("ends%41"), "endsA");
        assert_eq!(percent_decode("trailing%4"), "trailing%4");
        assert_eq!(percent_decode("bad%FF"), "bad\u{FFFD}");
    }

    #[tokio::test]
    async fn test_dispatch_inserts_params() {
        let mut router = Router::new();
        router.get("/qr/{content}", echo("qr"));

        let response = router.dispatch(request(Method::GET, "/qr/abc")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "qr content=abc\n");
    }

    #[tokio::test]
    async fn test_dispatch_not_found_without_fallback() {
        let router = Router::new();
        let response = router.dispatch(request(Method::GET, "/nope")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, "404 page not found\n");
    }

    #[tokio::test]
    async fn test_dispatch_uses_fallback() {
        let mut router = Router::new();
        router.get("/metrics", echo("metrics"));
        router.fallback(echo("static"));

        let response = router.dispatch(request(Method::GET, "/app/index.html")).await;
        assert_eq!(body_text(response).await, "static \n");
    }

    #[tokio::test]
    async fn test_dispatch_method_not_allowed() {
        let mut router = Router::new();
        router.get("/metrics", echo("metrics"));
        router.fallback(echo("static"));

        let response = router.dispatch(request(Method::DELETE, "/metrics")).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
