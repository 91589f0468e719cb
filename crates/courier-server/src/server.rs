//! The HTTP server.
//!
//! Accepts HTTP/1.1 connections, buffers each request body, records the
//! peer address, and hands the request to the middleware pipeline wrapped
//! around the router. Every request goes through the pipeline, including
//! ones that end in a 404.
//!
//! # Example
//!
//! ```rust,ignore
//! use courier_server::{Router, Server};
//!
//! let server = Server::builder()
//!     .http_addr("0.0.0.0:8080")
//!     .router(router)
//!     .pipeline(pipeline)
//!     .build();
//!
//! // Serves until SIGINT or SIGTERM.
//! server.run().await?;
//! ```

use crate::config::{ServerConfig, ServerConfigBuilder};
use crate::router::Router;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};
use bytes::Bytes;
use courier_core::RemoteAddr;
use courier_middleware::{Pipeline, Request, Response, ResponseExt, WireHandler};
use http::StatusCode;
use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};

/// Errors from running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    /// The listening socket could not be bound.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// The configured address.
        addr: String,
        /// The underlying error.
        source: std::io::Error,
    },

    /// I/O error during server operation.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// An HTTP server.
pub struct Server {
    config: ServerConfig,
    entry: WireHandler,
    route_count: usize,
    stages: Vec<&'static str>,
}

impl fmt::Debug for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Server")
            .field("config", &self.config)
            .field("route_count", &self.route_count)
            .field("stages", &self.stages)
            .finish_non_exhaustive()
    }
}

impl Server {
    /// Creates a server builder.
    #[must_use]
    pub fn builder() -> ServerBuilder {
        ServerBuilder::new()
    }

    /// Returns the server configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Runs `request` through the pipeline and router.
    pub async fn handle(&self, request: Request) -> Response {
        (self.entry)(request).await
    }

    /// Binds the configured address and serves until SIGINT or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` if the address cannot be bound.
    pub async fn run(self) -> Result<(), ServerError> {
        self.run_with_shutdown(ShutdownSignal::with_os_signals())
            .await
    }

    /// Binds the configured address and serves until `shutdown` fires.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Bind` if the address cannot be bound.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr = self.config.http_addr().to_string();
        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        self.serve(listener, shutdown).await
    }

    /// Serves connections from `listener` until `shutdown` fires, then
    /// waits up to the shutdown timeout for open connections to finish.
    ///
    /// # Errors
    ///
    /// Returns `ServerError::Io` if the listener's address is unavailable.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        tracing::info!(
            addr = %local_addr,
            routes = self.route_count,
            stages = ?self.stages,
            "Server listening"
        );

        let server = Arc::new(self);
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, remote_addr)) => {
                            let server = Arc::clone(&server);
                            let token = tracker.acquire();
                            let shutdown = shutdown.clone();

                            tokio::spawn(async move {
                                if let Err(e) = server.handle_connection(stream, remote_addr, shutdown).await {
                                    tracing::debug!(remote_addr = %remote_addr, error = %e, "Connection error");
                                }
                                drop(token);
                            });
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to accept connection");
                        }
                    }
                }

                () = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, stopping server");
                    break;
                }
            }
        }

        drain(&tracker, server.config.shutdown_timeout()).await;
        tracing::info!("Server stopped");
        Ok(())
    }

    async fn handle_connection(
        self: &Arc<Self>,
        stream: TcpStream,
        remote_addr: SocketAddr,
        shutdown: ShutdownSignal,
    ) -> Result<(), hyper::Error> {
        let server = Arc::clone(self);
        let service = service_fn(move |request: hyper::Request<Incoming>| {
            let server = Arc::clone(&server);
            async move { server.handle_request(request, remote_addr).await }
        });

        let conn = http1::Builder::new()
            .keep_alive(self.config.keep_alive())
            .serve_connection(TokioIo::new(stream), service);
        tokio::pin!(conn);

        tokio::select! {
            result = conn.as_mut() => result,
            () = shutdown.recv() => {
                // Finish the request in flight, then close.
                conn.as_mut().graceful_shutdown();
                conn.await
            }
        }
    }

    async fn handle_request(
        &self,
        request: hyper::Request<Incoming>,
        remote_addr: SocketAddr,
    ) -> Result<Response, Infallible> {
        let (mut parts, body) = request.into_parts();
        let body = match collect_body(body).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(remote_addr = %remote_addr, error = %e, "Failed to read request body");
                return Ok(Response::plain(StatusCode::BAD_REQUEST, "400 Bad Request"));
            }
        };

        parts.extensions.insert(RemoteAddr(remote_addr));
        Ok(self.handle(Request::from_parts(parts, body)).await)
    }
}

async fn collect_body(body: Incoming) -> Result<Bytes, hyper::Error> {
    Ok(body.collect().await?.to_bytes())
}

async fn drain(tracker: &ConnectionTracker, timeout: Duration) {
    tracing::info!(
        timeout = ?timeout,
        connections = tracker.active_connections(),
        "Waiting for connections to close"
    );

    tokio::select! {
        () = tracker.wait_for_drain() => {
            tracing::info!("All connections closed");
        }
        () = tokio::time::sleep(timeout) => {
            tracing::warn!(
                connections = tracker.active_connections(),
                "Shutdown timeout reached, dropping connections"
            );
        }
    }
}

/// Builder for [`Server`].
#[derive(Debug, Default)]
pub struct ServerBuilder {
    config: ServerConfigBuilder,
    router: Router,
    pipeline: Pipeline,
}

impl ServerBuilder {
    /// Creates a builder with the default configuration, an empty router
    /// and no middleware.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole configuration. Later field setters apply on top.
    #[must_use]
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config.into();
        self
    }

    /// Sets the bind address.
    #[must_use]
    pub fn http_addr(mut self, addr: impl Into<String>) -> Self {
        self.config = self.config.http_addr(addr);
        self
    }

    /// Sets the graceful shutdown timeout.
    #[must_use]
    pub fn shutdown_timeout(mut self, timeout: Duration) -> Self {
        self.config = self.config.shutdown_timeout(timeout);
        self
    }

    /// Sets the router.
    #[must_use]
    pub fn router(mut self, router: Router) -> Self {
        self.router = router;
        self
    }

    /// Sets the middleware pipeline wrapped around the router.
    #[must_use]
    pub fn pipeline(mut self, pipeline: Pipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    /// Builds the server.
    #[must_use]
    pub fn build(self) -> Server {
        let config = self.config.build();
        let route_count = self.router.route_count();
        let stages = self.pipeline.stage_names();

        let router = Arc::new(self.router);
        let dispatch: WireHandler = Arc::new(move |request: Request| {
            let router = Arc::clone(&router);
            Box::pin(async move { router.dispatch(request).await })
        });
        let entry = Arc::new(self.pipeline).wrap(dispatch);

        Server {
            config,
            entry,
            route_count,
            stages,
        }
    }
}
