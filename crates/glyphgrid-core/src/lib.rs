#![forbid(unsafe_code)]

//! Core: grid geometry, bounds validation, input payloads, and logging.

pub mod bounds;
pub mod event;
pub mod geometry;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
