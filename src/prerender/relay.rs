//! Outbound call to the rendering service.
//!
//! # Responsibilities
//! - Issue one GET per intercepted request, never retried
//! - Forward the original User-Agent, the token and basic credentials
//! - Observe redirects instead of following them
//! - Read the full body and release the upstream response in every case
//!
//! # Design Decisions
//! - The reqwest client is built with `redirect::Policy::none()`, so a 30x
//!   arrives as an ordinary response and is classified by status here
//! - Redirects collapse to 301 toward the client; the original code and
//!   body are dropped
//! - The body is buffered before anything is written to the client, so a
//!   failed read still yields a clean 500

use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, HeaderName, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::config::defaults::X_PRERENDER_TOKEN;
use crate::config::{PrerenderConfig, TimeoutConfig};
use crate::prerender::error::PrerenderError;

/// What the rendering service answered.
#[derive(Debug)]
pub enum RenderOutcome {
    /// A non-redirect response, body fully read.
    Rendered {
        status: StatusCode,
        headers: HeaderMap,
        body: Bytes,
    },
    /// The service tried to redirect; the redirect was not followed.
    Redirected {
        status: StatusCode,
        headers: HeaderMap,
    },
}

/// HTTP client for the rendering service.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Debug, Clone)]
pub struct RenderClient {
    client: reqwest::Client,
}

impl RenderClient {
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.request_secs))
            .build()?;
        Ok(Self { client })
    }

    /// Wrap an existing client. It must not follow redirects.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fetch the prerendered page.
    ///
    /// Dropping the returned future aborts the outbound request.
    pub async fn fetch(
        &self,
        config: &PrerenderConfig,
        api_url: &str,
        user_agent: &str,
    ) -> Result<RenderOutcome, PrerenderError> {
        let mut request = self.client.get(api_url).header(header::USER_AGENT, user_agent);

        if let Some(token) = &config.token {
            request = request.header(X_PRERENDER_TOKEN, token);
        }
        if let Some(auth) = config.basic_auth.as_ref().filter(|a| a.is_set()) {
            request = request.basic_auth(&auth.username, Some(&auth.password));
        }

        let response = request.send().await.map_err(PrerenderError::UpstreamTransport)?;
        let status = response.status();

        if is_followable_redirect(status, response.headers()) {
            return Ok(RenderOutcome::Redirected {
                status,
                headers: response.headers().clone(),
            });
        }

        let headers = response.headers().clone();
        // Consumes the response; the connection is released on success and on error.
        let body = response.bytes().await.map_err(PrerenderError::BodyRead)?;

        Ok(RenderOutcome::Rendered { status, headers, body })
    }
}

/// Statuses a redirect-following client would chase.
fn is_followable_redirect(status: StatusCode, headers: &HeaderMap) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    ) && headers.contains_key(header::LOCATION)
}

/// Headers describing the upstream connection or its framing. The server
/// recomputes these for the relayed body.
fn is_connection_header(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-connection"
            | "transfer-encoding"
            | "te"
            | "trailer"
            | "upgrade"
            | "content-length"
    )
}

impl IntoResponse for RenderOutcome {
    fn into_response(self) -> Response {
        match self {
            RenderOutcome::Rendered { status, headers, body } => {
                let mut response = Response::new(Body::from(body));
                *response.status_mut() = status;
                let out = response.headers_mut();
                for (name, value) in headers.iter() {
                    if !is_connection_header(name) {
                        out.append(name.clone(), value.clone());
                    }
                }
                response
            }
            RenderOutcome::Redirected { headers, .. } => {
                let mut response = Response::new(Body::empty());
                *response.status_mut() = StatusCode::MOVED_PERMANENTLY;
                let out = response.headers_mut();
                // One value per name, the last one seen
                for (name, value) in headers.iter() {
                    if !is_connection_header(name) {
                        out.insert(name.clone(), value.clone());
                    }
                }
                response
            }
        }
    }
}
