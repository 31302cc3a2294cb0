//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults (defaults.rs) or TOML file (loader.rs)
//!     → env.rs (PRERENDER_* environment overrides)
//!     → builder.rs (explicit caller overrides, always last)
//!     → validation.rs (semantic checks)
//!     → PrerenderConfig (validated, immutable)
//!     → shared via Arc with every request
//! ```
//!
//! # Design Decisions
//! - Config is immutable once built; there is no per-request mutation
//! - Precedence is fixed by the builder, not by call order
//! - Bot and extension entries are normalized to lowercase at build time

pub mod builder;
pub mod defaults;
pub mod env;
pub mod loader;
pub mod schema;
pub mod validation;

pub use builder::PrerenderConfigBuilder;
pub use loader::{load_config, ConfigError};
pub use schema::{AppConfig, BasicAuth, ObservabilityConfig, PrerenderConfig, ServerConfig, TimeoutConfig};
