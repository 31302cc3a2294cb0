//! Builder for [`PrerenderConfig`].
//!
//! Three layers are merged at [`build`](PrerenderConfigBuilder::build),
//! lowest precedence first:
//!
//! ```text
//! base (built-in defaults or a loaded file)
//!     → environment overrides (only if requested)
//!     → explicit overrides set on the builder
//! ```
//!
//! Explicit overrides win no matter when they are set relative to
//! `with_env`.

use tracing::Dispatch;

use crate::config::env::EnvOverrides;
use crate::config::loader::ConfigError;
use crate::config::schema::{BasicAuth, PrerenderConfig};
use crate::config::validation::validate_prerender;

#[derive(Debug, Clone, Default)]
struct ExplicitOverrides {
    bot_user_agents: Option<Vec<String>>,
    ignored_extensions: Option<Vec<String>>,
    service_url: Option<String>,
    token: Option<String>,
    basic_auth: Option<BasicAuth>,
    logger: Option<Dispatch>,
}

#[derive(Debug, Clone, Default)]
pub struct PrerenderConfigBuilder {
    base: PrerenderConfig,
    env: EnvOverrides,
    explicit: ExplicitOverrides,
}

impl PrerenderConfigBuilder {
    /// Start from the built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an already loaded configuration, e.g. the `[prerender]`
    /// section of a file.
    pub fn from_base(base: PrerenderConfig) -> Self {
        Self {
            base,
            ..Self::default()
        }
    }

    /// Apply `PRERENDER_*` variables from the process environment.
    pub fn with_env(self) -> Self {
        self.with_env_overrides(EnvOverrides::from_env())
    }

    /// Apply environment overrides through a custom lookup.
    pub fn with_env_lookup<F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        self.with_env_overrides(EnvOverrides::from_lookup(lookup))
    }

    pub fn with_env_overrides(mut self, env: EnvOverrides) -> Self {
        self.env = env;
        self
    }

    /// Replace the bot User-Agent list.
    pub fn bots<I, S>(mut self, user_agents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.explicit.bot_user_agents = Some(user_agents.into_iter().map(Into::into).collect());
        self
    }

    /// Replace the ignored extension list.
    pub fn ignored_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.explicit.ignored_extensions = Some(extensions.into_iter().map(Into::into).collect());
        self
    }

    pub fn service_url(mut self, url: impl Into<String>) -> Self {
        self.explicit.service_url = Some(url.into());
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.explicit.token = Some(token.into());
        self
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.explicit.basic_auth = Some(BasicAuth::new(username, password));
        self
    }

    /// Route internal diagnostics to a dedicated subscriber.
    pub fn logger(mut self, dispatch: Dispatch) -> Self {
        self.explicit.logger = Some(dispatch);
        self
    }

    /// Merge the layers, normalize and validate.
    pub fn build(self) -> Result<PrerenderConfig, ConfigError> {
        let mut config = self.base;
        self.env.apply(&mut config);

        let explicit = self.explicit;
        if let Some(bots) = explicit.bot_user_agents {
            config.bot_user_agents = bots;
        }
        if let Some(exts) = explicit.ignored_extensions {
            config.ignored_extensions = exts;
        }
        if let Some(url) = explicit.service_url {
            config.service_url = url;
        }
        if let Some(token) = explicit.token {
            config.token = Some(token);
        }
        if let Some(auth) = explicit.basic_auth {
            config.basic_auth = Some(auth);
        }
        if let Some(logger) = explicit.logger {
            config.logger = Some(logger);
        }

        config.normalize();
        validate_prerender(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}
