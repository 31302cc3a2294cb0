//! Decides whether a request should be served a prerendered page.
//!
//! # Rules (in precedence order)
//! 1. Empty User-Agent → pass through
//! 2. Method other than GET → pass through
//! 3. Candidate if any of: `_escaped_fragment_` in the query, a known bot
//!    substring in the User-Agent, a non-empty `X-Bufferbot` header
//! 4. Path containing an ignored extension → pass through, even for bots
//! 5. Otherwise the candidate flag decides
//!
//! # Design Decisions
//! - Matching is case-insensitive substring containment, not exact or glob
//! - Only the path is checked for extensions, never the query string

use axum::http::Method;

use crate::config::defaults::{ESCAPED_FRAGMENT, X_BUFFERBOT};
use crate::config::PrerenderConfig;
use crate::prerender::request::InboundRequest;

pub fn should_prerender(config: &PrerenderConfig, req: &InboundRequest<'_>) -> bool {
    let user_agent = req.user_agent();
    if user_agent.is_empty() {
        return false;
    }
    if *req.method != Method::GET {
        return false;
    }

    let wants_prerender = has_escaped_fragment(req.query())
        || is_bot(config, user_agent)
        || !req.header_str(X_BUFFERBOT).is_empty();

    if contains_ignored_extension(config, req.path()) {
        return false;
    }

    wants_prerender
}

pub fn is_bot(config: &PrerenderConfig, user_agent: &str) -> bool {
    contains_any(&user_agent.to_lowercase(), &config.bot_user_agents)
}

pub fn contains_ignored_extension(config: &PrerenderConfig, path: &str) -> bool {
    contains_any(&path.to_lowercase(), &config.ignored_extensions)
}

fn has_escaped_fragment(query: Option<&str>) -> bool {
    query
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).any(|(key, _)| key == ESCAPED_FRAGMENT))
        .unwrap_or(false)
}

// Entries are lowercased when the config is built.
fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle.as_str()))
}
