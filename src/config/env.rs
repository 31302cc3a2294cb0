//! Environment overrides for the prerender configuration.
//!
//! # Variables
//! - `PRERENDER_SERVICE_URL`: rendering service base URL
//! - `PRERENDER_TOKEN`: rendering service token
//! - `PRERENDER_USERNAME` / `PRERENDER_PASSWORD`: basic credentials,
//!   applied as a pair when either is non-empty
//!
//! Empty variables are treated as unset.

use crate::config::schema::{BasicAuth, PrerenderConfig};

pub const PRERENDER_SERVICE_URL: &str = "PRERENDER_SERVICE_URL";
pub const PRERENDER_TOKEN: &str = "PRERENDER_TOKEN";
pub const PRERENDER_USERNAME: &str = "PRERENDER_USERNAME";
pub const PRERENDER_PASSWORD: &str = "PRERENDER_PASSWORD";

/// Overrides collected from the environment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    pub service_url: Option<String>,
    pub token: Option<String>,
    pub basic_auth: Option<BasicAuth>,
}

impl EnvOverrides {
    /// Read overrides from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read overrides through an arbitrary lookup function.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let username = get(PRERENDER_USERNAME);
        let password = get(PRERENDER_PASSWORD);
        let basic_auth = if username.is_some() || password.is_some() {
            Some(BasicAuth::new(
                username.unwrap_or_default(),
                password.unwrap_or_default(),
            ))
        } else {
            None
        };

        Self {
            service_url: get(PRERENDER_SERVICE_URL),
            token: get(PRERENDER_TOKEN),
            basic_auth,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.service_url.is_none() && self.token.is_none() && self.basic_auth.is_none()
    }

    pub(crate) fn apply(&self, config: &mut PrerenderConfig) {
        if let Some(url) = &self.service_url {
            config.service_url = url.clone();
        }
        if let Some(token) = &self.token {
            config.token = Some(token.clone());
        }
        if let Some(auth) = &self.basic_auth {
            config.basic_auth = Some(auth.clone());
        }
    }
}
