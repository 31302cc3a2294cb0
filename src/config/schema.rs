//! Configuration schema definitions.
//!
//! This module defines the configuration structure for the middleware and
//! for the standalone server binary. All file-backed types derive Serde
//! traits for deserialization from TOML.

use serde::{Deserialize, Serialize};
use tracing::Dispatch;

use crate::config::defaults;

/// Root configuration for the standalone server.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration.
    pub server: ServerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Prerender settings, before environment and CLI overrides.
    pub prerender: PrerenderConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Timeout configuration for the rendering service call and inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout to the rendering service, in seconds.
    pub connect_secs: u64,

    /// Total time allowed for one inbound request, in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// HTTP basic credentials presented to the rendering service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct BasicAuth {
    pub username: String,
    pub password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Credentials are only sent when at least one half is set.
    pub fn is_set(&self) -> bool {
        !self.username.is_empty() || !self.password.is_empty()
    }
}

/// Prerender middleware configuration.
///
/// Built once at startup (see [`PrerenderConfigBuilder`](crate::config::PrerenderConfigBuilder))
/// and shared read-only across all requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PrerenderConfig {
    /// Substrings matched case-insensitively against the User-Agent.
    pub bot_user_agents: Vec<String>,

    /// Substrings matched case-insensitively against the request path.
    /// A match suppresses prerendering.
    pub ignored_extensions: Vec<String>,

    /// Base URL of the rendering service.
    pub service_url: String,

    /// Token sent as `X-Prerender-Token`.
    pub token: Option<String>,

    /// Basic credentials for the rendering service.
    pub basic_auth: Option<BasicAuth>,

    /// Sink for internal diagnostics. When unset, events go to whatever
    /// subscriber is current, and are dropped if there is none.
    #[serde(skip)]
    pub logger: Option<Dispatch>,
}

impl Default for PrerenderConfig {
    fn default() -> Self {
        Self {
            bot_user_agents: defaults::crawler_user_agents(),
            ignored_extensions: defaults::extensions_to_ignore(),
            service_url: defaults::DEFAULT_SERVICE_URL.to_string(),
            token: None,
            basic_auth: None,
            logger: None,
        }
    }
}

impl PrerenderConfig {
    /// Start a builder from the built-in defaults.
    pub fn builder() -> crate::config::PrerenderConfigBuilder {
        crate::config::PrerenderConfigBuilder::new()
    }

    /// Lowercase every bot and extension entry, dropping empty ones.
    ///
    /// An empty entry would match every request.
    pub(crate) fn normalize(&mut self) {
        fn lower(list: &mut Vec<String>) {
            *list = list
                .iter()
                .map(|s| s.to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
        }
        lower(&mut self.bot_user_agents);
        lower(&mut self.ignored_extensions);

        if self.token.as_deref() == Some("") {
            self.token = None;
        }
        if matches!(&self.basic_auth, Some(auth) if !auth.is_set()) {
            self.basic_auth = None;
        }
    }
}
