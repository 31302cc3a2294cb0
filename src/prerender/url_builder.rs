//! Reconstructs the original absolute URL and wraps it into the rendering
//! service URL.
//!
//! ```text
//! GET /article?id=1  Host: example.com  X-Forwarded-Proto: https,10.0.0.1
//!     → https://example.com/article?id=1
//!     → <service_url>/https%3A%2F%2Fexample.com%2Farticle%3Fid%3D1
//! ```

use url::{form_urlencoded, Url};

use crate::config::PrerenderConfig;
use crate::prerender::error::BuildError;
use crate::prerender::request::InboundRequest;

const CF_VISITOR: &str = "cf-visitor";
const CF_HTTPS: &str = r#""scheme":"https""#;
const X_FORWARDED_PROTO: &str = "x-forwarded-proto";
const X_FORWARDED_HTTPS: &str = "https,";

/// Build the rendering service URL for this request.
///
/// Pure: the same request and config always produce the same string.
pub fn build_api_url(config: &PrerenderConfig, req: &InboundRequest<'_>) -> Result<String, BuildError> {
    let original = original_url(req)?;

    let mut api_url = config.service_url.clone();
    if !api_url.ends_with('/') {
        api_url.push('/');
    }
    api_url.extend(form_urlencoded::byte_serialize(original.as_str().as_bytes()));
    Ok(api_url)
}

/// The absolute URL the client originally asked for.
pub fn original_url(req: &InboundRequest<'_>) -> Result<Url, BuildError> {
    let path_and_query = req
        .uri
        .path_and_query()
        .filter(|pq| pq.as_str().starts_with('/'))
        .ok_or_else(|| BuildError::MalformedUri(req.uri.to_string()))?;

    let host = resolve_host(req).ok_or(BuildError::UndetectableHost)?;
    let scheme = resolve_scheme(req);

    // Host is parsed on its own so it can never contribute path or query.
    let delimiter = |c: char| matches!(c, '/' | '?' | '#' | '@' | '\\') || c.is_whitespace() || c.is_control();
    if host.contains(delimiter) {
        return Err(BuildError::InvalidHost(host.to_string()));
    }
    let mut url = Url::parse(&format!("{scheme}://{host}/"))
        .map_err(|e| BuildError::InvalidHost(format!("{host}: {e}")))?;

    url.set_path(path_and_query.path());
    url.set_query(path_and_query.query());
    Ok(url)
}

/// Host header, then the request URI's authority, then the connection host.
pub fn resolve_host<'a>(req: &InboundRequest<'a>) -> Option<&'a str> {
    let header = req.header_str(axum::http::header::HOST);
    if !header.is_empty() {
        return Some(header);
    }

    let uri_host = req
        .uri
        .authority()
        .map(|a| a.as_str().rsplit('@').next().unwrap_or_default())
        .unwrap_or_default();
    if !uri_host.is_empty() {
        return Some(uri_host);
    }

    req.connection_host.filter(|h| !h.is_empty())
}

/// `https` when a CDN or proxy says the client used TLS, `http` otherwise.
pub fn resolve_scheme(req: &InboundRequest<'_>) -> &'static str {
    if req.header_str(CF_VISITOR).contains(CF_HTTPS)
        || req.header_str(X_FORWARDED_PROTO).starts_with(X_FORWARDED_HTTPS)
    {
        "https"
    } else {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn config(service_url: &str) -> PrerenderConfig {
        PrerenderConfig::builder().service_url(service_url).build().unwrap()
    }

    fn request(uri: &str, headers: &[(&str, &str)]) -> Request<()> {
        let mut builder = Request::builder().uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(()).unwrap()
    }

    #[test]
    fn test_builds_encoded_service_url() {
        let req = request("/article", &[("Host", "host")]);
        let url = build_api_url(&config("http://render:3000/"), &InboundRequest::new(&req, None)).unwrap();
        assert_eq!(url, "http://render:3000/http%3A%2F%2Fhost%2Farticle");
    }

    #[test]
    fn test_adds_single_separator() {
        let req = request("/article", &[("Host", "host")]);
        let view = InboundRequest::new(&req, None);
        let without = build_api_url(&config("http://render:3000"), &view).unwrap();
        let with = build_api_url(&config("http://render:3000/"), &view).unwrap();
        assert_eq!(without, with);
        assert!(!with.contains("3000//"));
    }

    #[test]
    fn test_query_is_part_of_encoded_url() {
        let req = request("/search?q=rust&_escaped_fragment_=", &[("Host", "example.com")]);
        let url = build_api_url(&config("http://render/"), &InboundRequest::new(&req, None)).unwrap();
        assert_eq!(
            url,
            "http://render/http%3A%2F%2Fexample.com%2Fsearch%3Fq%3Drust%26_escaped_fragment_%3D"
        );
    }

    #[test]
    fn test_host_precedence() {
        // Host header beats URI authority beats connection host
        let req = request("http://b/page", &[("Host", "a")]);
        assert_eq!(resolve_host(&InboundRequest::new(&req, Some("c"))), Some("a"));

        let req = request("http://b/page", &[]);
        assert_eq!(resolve_host(&InboundRequest::new(&req, Some("c"))), Some("b"));

        let req = request("/page", &[]);
        assert_eq!(resolve_host(&InboundRequest::new(&req, Some("c"))), Some("c"));
    }

    #[test]
    fn test_undetectable_host() {
        let req = request("/page", &[]);
        let err = build_api_url(&config("http://render/"), &InboundRequest::new(&req, None)).unwrap_err();
        assert_eq!(err, BuildError::UndetectableHost);
        assert_eq!(err.to_string(), "undetectable host");

        let err = build_api_url(&config("http://render/"), &InboundRequest::new(&req, Some(""))).unwrap_err();
        assert_eq!(err, BuildError::UndetectableHost);
    }

    #[test]
    fn test_host_cannot_rewrite_path_or_query() {
        for host in ["example.com#", "evil.com/x?", "user@evil.com", "a b"] {
            let req = request("/article?id=1", &[("Host", host)]);
            let err = original_url(&InboundRequest::new(&req, None)).unwrap_err();
            assert!(
                matches!(err, BuildError::InvalidHost(_)),
                "host {host:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_unparsable_host_is_a_host_error() {
        let req = request("/article?id=1", &[("Host", "example.com:port")]);
        let err = original_url(&InboundRequest::new(&req, None)).unwrap_err();
        assert!(matches!(err, BuildError::InvalidHost(ref h) if h.starts_with("example.com:port")));
        assert!(!err.to_string().contains("/article"));
    }

    #[test]
    fn test_path_and_query_survive_reconstruction() {
        let req = request("/a/b%20c?x=1&y=%2F", &[("Host", "Example.com:8080")]);
        let url = original_url(&InboundRequest::new(&req, None)).unwrap();
        assert_eq!(url.as_str(), "http://example.com:8080/a/b%20c?x=1&y=%2F");
    }

    #[test]
    fn test_asterisk_uri_is_malformed() {
        let req = request("*", &[("Host", "example.com")]);
        let err = build_api_url(&config("http://render/"), &InboundRequest::new(&req, None)).unwrap_err();
        assert!(matches!(err, BuildError::MalformedUri(_)));
    }

    #[test]
    fn test_scheme_defaults_to_http() {
        let req = request("/", &[("Host", "example.com")]);
        assert_eq!(resolve_scheme(&InboundRequest::new(&req, None)), "http");
    }

    #[test]
    fn test_cf_visitor_upgrades_scheme() {
        let req = request("/", &[("Host", "example.com"), ("Cf-Visitor", r#"{"scheme":"https"}"#)]);
        let view = InboundRequest::new(&req, None);
        assert_eq!(resolve_scheme(&view), "https");
        assert_eq!(original_url(&view).unwrap().as_str(), "https://example.com/");

        let req = request("/", &[("Cf-Visitor", r#"{"scheme":"http"}"#)]);
        assert_eq!(resolve_scheme(&InboundRequest::new(&req, None)), "http");
    }

    #[test]
    fn test_forwarded_proto_requires_list_form() {
        let req = request("/", &[("X-Forwarded-Proto", "https,1.2.3.4")]);
        assert_eq!(resolve_scheme(&InboundRequest::new(&req, None)), "https");

        // Only the "https," prefix is recognized
        let req = request("/", &[("X-Forwarded-Proto", "https")]);
        assert_eq!(resolve_scheme(&InboundRequest::new(&req, None)), "http");
    }

    #[test]
    fn test_build_is_deterministic() {
        let req = request(
            "/a/b?c=d",
            &[("Host", "example.com:8080"), ("X-Forwarded-Proto", "https,10.0.0.1")],
        );
        let config = config("http://render/");
        let view = InboundRequest::new(&req, Some("127.0.0.1:3000"));
        assert_eq!(
            build_api_url(&config, &view).unwrap(),
            build_api_url(&config, &view).unwrap()
        );
    }
}
