//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the rendering service URL is an absolute http(s) URL
//! - Validate value ranges (timeouts > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is a pure function over the config
//! - Runs before config is accepted into the system

use url::Url;

use crate::config::schema::{AppConfig, PrerenderConfig, TimeoutConfig};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("service_url {url:?} is not a valid URL: {reason}")]
    InvalidServiceUrl { url: String, reason: String },

    #[error("service_url {0:?} must use http or https")]
    UnsupportedScheme(String),

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

pub fn validate_prerender(config: &PrerenderConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_service_url(&config.service_url, &mut errors);
    finish(errors)
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    check_service_url(&config.prerender.service_url, &mut errors);
    check_timeouts(&config.timeouts, &mut errors);
    finish(errors)
}

fn check_service_url(raw: &str, errors: &mut Vec<ValidationError>) {
    match Url::parse(raw) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(_) => errors.push(ValidationError::UnsupportedScheme(raw.to_string())),
        Err(e) => errors.push(ValidationError::InvalidServiceUrl {
            url: raw.to_string(),
            reason: e.to_string(),
        }),
    }
}

fn check_timeouts(timeouts: &TimeoutConfig, errors: &mut Vec<ValidationError>) {
    if timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("request_secs"));
    }
}

fn finish(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
