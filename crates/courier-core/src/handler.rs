//! The business handler contract.
//!
//! A [`Handler`] receives a fully buffered request and computes a
//! [`Response`]. It never touches the wire; the handler adapter in
//! `courier-server` pairs it with a send strategy.

use crate::Response;
use bytes::Bytes;
use std::future::Future;

/// A request with its body collected into memory.
pub type Request = http::Request<Bytes>;

/// What a business handler returns.
///
/// An `Err` is turned into a `500` error response by the adapter.
pub type HandlerResult = anyhow::Result<Response>;

/// A business handler.
///
/// # Example
///
/// ```rust,ignore
/// use courier_core::{Handler, HandlerResult, Request, Response};
///
/// struct Hello;
///
/// impl Handler for Hello {
///     async fn handle(&self, _request: Request) -> HandlerResult {
///         Ok(Response::bytes("hello"))
///     }
/// }
/// ```
pub trait Handler: Send + Sync + 'static {
    /// Computes the response for `request`.
    fn handle(&self, request: Request) -> impl Future<Output = HandlerResult> + Send;
}

/// Adapts an async function into a [`Handler`].
///
/// # Example
///
/// ```rust,ignore
/// use courier_core::{handler_fn, Request, HandlerResult, Response};
///
/// async fn ping(_request: Request) -> HandlerResult {
///     Ok(Response::bytes("pong"))
/// }
///
/// let handler = handler_fn(ping);
/// ```
#[derive(Debug, Clone)]
pub struct FnHandler<F> {
    func: F,
}

impl<F> FnHandler<F> {
    /// Wraps `func`.
    #[must_use]
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F, Fut> Handler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send,
{
    fn handle(&self, request: Request) -> impl Future<Output = HandlerResult> + Send {
        (self.func)(request)
    }
}

/// Shorthand for [`FnHandler::new`].
#[must_use]
pub const fn handler_fn<F, Fut>(func: F) -> FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HandlerResult> + Send,
{
    FnHandler::new(func)
}
