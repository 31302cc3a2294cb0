//! Prerender gate: serve prerendered pages to crawlers.
//!
//! Requests from search-engine and link-preview bots are answered by an
//! external rendering service; every other request goes to the wrapped
//! application unchanged.
//!
//! ```no_run
//! use axum::{routing::get, Router};
//! use prerender_gate::config::{PrerenderConfig, TimeoutConfig};
//! use prerender_gate::prerender::{with_prerender, PrerenderState};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PrerenderConfig::builder()
//!     .with_env()
//!     .token("my-token")
//!     .build()?;
//! let state = PrerenderState::with_timeouts(config, &TimeoutConfig::default())?;
//! let app: Router = with_prerender(Router::new().route("/", get(|| async { "app" })), state);
//! # let _ = app;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod prerender;

pub use config::PrerenderConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
