//! Axum middleware tying the pipeline together.
//!
//! Pass-through requests reach the wrapped application untouched.
//! Intercepted requests never do.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    Router,
};

use crate::config::{PrerenderConfig, TimeoutConfig};
use crate::observability::{logging, metrics};
use crate::prerender::classifier::should_prerender;
use crate::prerender::error::PrerenderError;
use crate::prerender::relay::{RenderClient, RenderOutcome};
use crate::prerender::request::InboundRequest;
use crate::prerender::url_builder::build_api_url;

/// Shared, read-only state for the middleware.
#[derive(Debug, Clone)]
pub struct PrerenderState {
    pub config: Arc<PrerenderConfig>,
    pub client: RenderClient,
    /// Host to fall back on when the request names none; set by the embedder.
    pub connection_host: Option<Arc<str>>,
}

impl PrerenderState {
    pub fn new(config: PrerenderConfig, client: RenderClient) -> Self {
        Self {
            config: Arc::new(config),
            client,
            connection_host: None,
        }
    }

    /// Build the state with a rendering client using the given timeouts.
    pub fn with_timeouts(config: PrerenderConfig, timeouts: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(config, RenderClient::new(timeouts)?))
    }

    pub fn connection_host(mut self, host: impl Into<Arc<str>>) -> Self {
        self.connection_host = Some(host.into());
        self
    }
}

/// Wrap `app` so crawler requests are answered by the rendering service.
pub fn with_prerender<S>(app: Router<S>, state: PrerenderState) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    app.layer(middleware::from_fn_with_state(state, prerender_middleware))
}

pub async fn prerender_middleware(
    State(state): State<PrerenderState>,
    req: Request,
    next: Next,
) -> Response {
    let intercept = {
        let view = InboundRequest::new(&req, state.connection_host.as_deref());
        if should_prerender(&state.config, &view) {
            Some(build_api_url(&state.config, &view).map(|url| (url, view.user_agent().to_owned())))
        } else {
            None
        }
    };

    let (api_url, user_agent) = match intercept {
        None => {
            metrics::record_outcome("pass_through");
            return next.run(req).await;
        }
        Some(Ok(target)) => target,
        Some(Err(e)) => return failure(&state.config, req.uri(), PrerenderError::Build(e)),
    };

    logging::with_sink(state.config.logger.as_ref(), || {
        tracing::debug!(uri = %req.uri(), api_url = %api_url, "prerender");
    });

    match state.client.fetch(&state.config, &api_url, &user_agent).await {
        Ok(outcome) => {
            match &outcome {
                RenderOutcome::Rendered { status, .. } => {
                    metrics::record_outcome("rendered");
                    logging::with_sink(state.config.logger.as_ref(), || {
                        tracing::debug!(uri = %req.uri(), status = %status, "prerendered page served");
                    });
                }
                RenderOutcome::Redirected { status, .. } => {
                    metrics::record_outcome("redirected");
                    logging::with_sink(state.config.logger.as_ref(), || {
                        tracing::debug!(uri = %req.uri(), upstream_status = %status, "rendering service redirected");
                    });
                }
            }
            outcome.into_response()
        }
        Err(e) => failure(&state.config, req.uri(), e),
    }
}

fn failure(config: &PrerenderConfig, uri: &axum::http::Uri, error: PrerenderError) -> Response {
    metrics::record_outcome(error.kind());
    logging::with_sink(config.logger.as_ref(), || {
        tracing::error!(uri = %uri, kind = error.kind(), error = %error, "prerender error");
    });
    StatusCode::INTERNAL_SERVER_ERROR.into_response()
}
