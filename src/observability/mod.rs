//! Observability: structured logging through `tracing`.
//!
//! Output format, level and filter directives come from
//! `[observability.logging]`; `RUST_LOG` takes precedence when set.

mod tracing_init;

pub use tracing_init::*;
