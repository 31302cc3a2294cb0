//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! prerender pipeline produces:
//!     → logging.rs (structured log events, optionally to a dedicated sink)
//!     → metrics.rs (per-outcome counters)
//!
//! Consumers:
//!     → Log output (stdout via tracing-subscriber)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging through `tracing`
//! - Request ID flows through logs via the trace layer
//! - Metrics are cheap counter increments, no-ops without a recorder

pub mod logging;
pub mod metrics;
