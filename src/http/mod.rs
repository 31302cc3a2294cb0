//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing, timeout)
//!     → prerender middleware (classify)
//!         → wrapped application, or
//!         → rendering service relay
//!     → Send to client
//! ```

pub mod server;

pub use server::{default_app, HttpServer};
