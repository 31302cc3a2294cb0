//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Wrap the application Router with the prerender middleware
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve on a listener with graceful shutdown

use std::time::Duration;

use axum::{http::StatusCode, Router};
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::TimeoutConfig;
use crate::lifecycle::Shutdown;
use crate::prerender::{with_prerender, PrerenderState};

/// Application used when nothing else is wrapped: every path is a 404.
pub fn default_app() -> Router {
    Router::new().fallback(|| async { StatusCode::NOT_FOUND })
}

/// HTTP server running an application behind the prerender middleware.
pub struct HttpServer {
    app: Router,
    state: PrerenderState,
    request_timeout: Duration,
}

impl HttpServer {
    pub fn new(app: Router, state: PrerenderState, timeouts: &TimeoutConfig) -> Self {
        Self {
            app,
            state,
            request_timeout: Duration::from_secs(timeouts.request_secs),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(app: Router, state: PrerenderState, request_timeout: Duration) -> Router {
        with_prerender(app, state)
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(TimeoutLayer::new(request_timeout))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// Run the server until `shutdown` is triggered.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            service_url = %self.state.config.service_url,
            "HTTP server starting"
        );

        // The bind address is never a host source.
        let router = Self::build_router(self.app, self.state, self.request_timeout);

        axum::serve(listener, router)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
