//! Error taxonomy for the prerender pipeline.
//!
//! Every variant ends at the boundary of the request that produced it and
//! is surfaced to the client as a 500. A redirect from the rendering
//! service is not an error; see [`RenderOutcome`](crate::prerender::RenderOutcome).

use thiserror::Error;

/// Failure to reconstruct the original absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("malformed request URI: {0}")]
    MalformedUri(String),

    #[error("undetectable host")]
    UndetectableHost,

    #[error("invalid host: {0}")]
    InvalidHost(String),
}

#[derive(Debug, Error)]
pub enum PrerenderError {
    #[error(transparent)]
    Build(#[from] BuildError),

    /// Connection or protocol failure talking to the rendering service.
    #[error("rendering service request failed: {0}")]
    UpstreamTransport(#[source] reqwest::Error),

    /// The rendering service response body could not be read to the end.
    #[error("failed to read rendering service body: {0}")]
    BodyRead(#[source] reqwest::Error),
}

impl PrerenderError {
    /// Label used for metrics and structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PrerenderError::Build(_) => "build",
            PrerenderError::UpstreamTransport(_) => "upstream_transport",
            PrerenderError::BodyRead(_) => "body_read",
        }
    }
}
