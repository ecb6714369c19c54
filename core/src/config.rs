//! Client configuration.
//!
//! The base URL is the wiki root (for Confluence Cloud,
//! `https://<site>.atlassian.net/wiki`); request paths such as
//! `rest/api/content` are joined onto it.

use url::Url;

use crate::auth::Auth;
use crate::error::ConfigError;

pub const BASE_URL_VAR: &str = "CONFLUENCE_BASE_URL";
pub const USERNAME_VAR: &str = "CONFLUENCE_USERNAME";
pub const API_TOKEN_VAR: &str = "CONFLUENCE_API_TOKEN";
pub const BEARER_TOKEN_VAR: &str = "CONFLUENCE_BEARER_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Validated wiki root without a trailing slash.
    pub base_url: String,
    pub auth: Option<Auth>,
}

impl ClientConfig {
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: validate_base_url(base_url)?,
            auth: None,
        })
    }

    pub fn with_auth(mut self, auth: Auth) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Read configuration from `CONFLUENCE_*` environment variables.
    ///
    /// Basic auth (`CONFLUENCE_USERNAME` + `CONFLUENCE_API_TOKEN`) takes
    /// precedence over `CONFLUENCE_BEARER_TOKEN`. No credentials is valid and
    /// yields an anonymous client.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(BASE_URL_VAR).ok_or(ConfigError::MissingVar(BASE_URL_VAR))?;
        let config = Self::new(&base_url)?;

        let auth = match (lookup(USERNAME_VAR), lookup(API_TOKEN_VAR)) {
            (Some(username), Some(token)) => Some(Auth::basic(username, token)),
            (Some(_), None) => return Err(ConfigError::MissingVar(API_TOKEN_VAR)),
            (None, _) => lookup(BEARER_TOKEN_VAR).map(Auth::bearer),
        };

        Ok(match auth {
            Some(auth) => config.with_auth(auth),
            None => config,
        })
    }
}

fn validate_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|source| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        source,
    })?;
    if url.cannot_be_a_base() || url.query().is_some() || url.fragment().is_some() {
        return Err(ConfigError::UnsupportedBaseUrl(raw.to_string()));
    }
    Ok(trimmed.to_string())
}
