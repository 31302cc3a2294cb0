//! Crawler detection and prerendered-page relay.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → request.rs (borrowed view: method, URI, headers, connection host)
//!     → classifier.rs (intercept or pass through)
//!         pass through → wrapped application
//!         intercept    → url_builder.rs (canonical URL → service URL)
//!                      → relay.rs (outbound GET, no redirect following)
//!                      → response to the client
//! ```
//!
//! # Design Decisions
//! - Classification and URL building are pure functions over the config
//! - Redirects from the rendering service are a typed outcome, not an error
//! - The rendered body is buffered before the client sees a status line

pub mod classifier;
pub mod error;
pub mod middleware;
pub mod relay;
pub mod request;
pub mod url_builder;

pub use classifier::should_prerender;
pub use error::{BuildError, PrerenderError};
pub use middleware::{prerender_middleware, with_prerender, PrerenderState};
pub use relay::{RenderClient, RenderOutcome};
pub use request::InboundRequest;
pub use url_builder::build_api_url;
