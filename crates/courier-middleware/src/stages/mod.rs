//! Built-in middleware stages.

mod instrumentation;

pub use instrumentation::InstrumentationMiddleware;
