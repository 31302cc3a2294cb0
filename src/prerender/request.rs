//! Borrowed view over the parts of an inbound request the pipeline reads.

use axum::http::{header, HeaderMap, Method, Request, Uri};

/// The inbound request as seen by the classifier and the URL builder.
///
/// Only borrows from the request; nothing is copied until an outbound
/// request is actually built.
#[derive(Debug, Clone, Copy)]
pub struct InboundRequest<'a> {
    pub method: &'a Method,
    pub uri: &'a Uri,
    pub headers: &'a HeaderMap,
    /// Host the connection was accepted on, last resort for host resolution.
    pub connection_host: Option<&'a str>,
}

impl<'a> InboundRequest<'a> {
    pub fn new<B>(req: &'a Request<B>, connection_host: Option<&'a str>) -> Self {
        Self {
            method: req.method(),
            uri: req.uri(),
            headers: req.headers(),
            connection_host,
        }
    }

    /// Header value as text; absent or non-UTF-8 values read as empty.
    pub fn header_str(&self, name: impl header::AsHeaderName) -> &'a str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
    }

    pub fn user_agent(&self) -> &'a str {
        self.header_str(header::USER_AGENT)
    }

    pub fn path(&self) -> &'a str {
        self.uri.path()
    }

    pub fn query(&self) -> Option<&'a str> {
        self.uri.query()
    }
}
