//! Ordered middleware pipeline.
//!
//! Stages run in the order they were added; the wire handler runs last.
//!
//! ```text
//! request → stage 1 → stage 2 → … → wire handler
//! response ← stage 1 ← stage 2 ← … ←
//! ```

use crate::middleware::{Middleware, Next};
use crate::types::{Request, Response, WireHandler};
use std::sync::Arc;

/// A boxed middleware stage.
pub type BoxedMiddleware = Arc<dyn Middleware>;

/// An immutable, ordered list of middleware stages.
#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Vec<BoxedMiddleware>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish()
    }
}

impl Pipeline {
    /// Creates a pipeline builder.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Runs `request` through every stage and then `handler`.
    pub async fn process(&self, request: Request, handler: WireHandler) -> Response {
        let next = self.build_chain(move |request| handler(request));
        next.run(request).await
    }

    /// Wraps `handler` so that every call goes through this pipeline.
    #[must_use]
    pub fn wrap(self: &Arc<Self>, handler: WireHandler) -> WireHandler {
        let pipeline = Arc::clone(self);
        Arc::new(move |request| {
            let pipeline = Arc::clone(&pipeline);
            let handler = Arc::clone(&handler);
            Box::pin(async move { pipeline.process(request, handler).await })
        })
    }

    fn build_chain<'a, H>(&'a self, handler: H) -> Next<'a>
    where
        H: FnOnce(Request) -> crate::BoxFuture<'static, Response> + Send + 'a,
    {
        let mut next = Next::handler(handler);
        for middleware in self.stages.iter().rev() {
            next = Next::new(middleware.as_ref(), next);
        }
        next
    }

    /// Returns stage names in execution order.
    #[must_use]
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|m| m.name()).collect()
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }
}

/// Builder for [`Pipeline`].
#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<BoxedMiddleware>,
}

impl PipelineBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a stage.
    #[must_use]
    pub fn stage<M: Middleware>(mut self, middleware: M) -> Self {
        self.stages.push(Arc::new(middleware));
        self
    }

    /// Builds the pipeline.
    #[must_use]
    pub fn build(self) -> Pipeline {
        Pipeline {
            stages: self.stages,
        }
    }
}
