//! Client configuration.
//!
//! Selects the API environment and root collection, the request timeout,
//! the `User-Agent`, and optionally a pre-issued bearer token. Defaults point
//! to the production Family Tree. Override via environment variables or
//! explicit construction for sandbox and test servers.

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::state::AccessToken;

/// Which API deployment to talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    #[default]
    Production,
    /// The integration sandbox used for client development.
    Sandbox,
}

impl Environment {
    /// Base URL of the platform API.
    pub fn api_base(&self) -> &'static str {
        match self {
            Self::Production => "https://api.familysearch.org",
            Self::Sandbox => "https://api-integ.familysearch.org",
        }
    }

    /// Root of the Family Tree collection.
    pub fn family_tree_uri(&self) -> Result<Url, ConfigError> {
        self.platform_path("/platform/collections/tree")
    }

    /// Root of the platform collection that lists every other collection.
    pub fn platform_uri(&self) -> Result<Url, ConfigError> {
        self.platform_path("/platform/collection")
    }

    fn platform_path(&self, path: &str) -> Result<Url, ConfigError> {
        let raw = format!("{}{path}", self.api_base());
        Url::parse(&raw).map_err(|e| ConfigError::InvalidUrl(raw, e.to_string()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Sandbox => "sandbox",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "sandbox" | "integration" | "integ" => Ok(Self::Sandbox),
            _ => Err(ConfigError::UnknownEnvironment(s.to_string())),
        }
    }
}

/// Configuration for a [`GedcomxClient`](crate::GedcomxClient).
///
/// Custom `Debug` implementation redacts the access token.
#[derive(Clone)]
pub struct ClientConfig {
    pub environment: Environment,
    /// Root collection read by the entry point.
    pub collection_url: Url,
    /// Bearer token to start with, if one was issued out of band.
    pub access_token: Option<AccessToken>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("environment", &self.environment)
            .field("collection_url", &self.collection_url.as_str())
            .field("access_token", &self.access_token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

fn default_user_agent() -> String {
    format!("gx-client/{}", env!("CARGO_PKG_VERSION"))
}

impl ClientConfig {
    /// A configuration rooted at an explicit collection.
    pub fn new(collection_url: Url) -> Self {
        Self {
            environment: Environment::default(),
            collection_url,
            access_token: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: default_user_agent(),
        }
    }

    /// A configuration rooted at the Family Tree of `environment`.
    pub fn for_environment(environment: Environment) -> Result<Self, ConfigError> {
        Ok(Self {
            environment,
            ..Self::new(environment.family_tree_uri()?)
        })
    }

    pub fn with_access_token(mut self, token: impl Into<AccessToken>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `GEDCOMX_ENVIRONMENT` (default: `production`; or `sandbox`)
    /// - `GEDCOMX_COLLECTION_URL` (default: the environment's Family Tree root)
    /// - `GEDCOMX_ACCESS_TOKEN` (optional)
    /// - `GEDCOMX_TIMEOUT_SECS` (default: 30)
    /// - `GEDCOMX_USER_AGENT` (default: `gx-client/<version>`)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let environment = match lookup("GEDCOMX_ENVIRONMENT") {
            Some(raw) => raw.parse()?,
            None => Environment::default(),
        };
        let collection_url = match lookup("GEDCOMX_COLLECTION_URL") {
            Some(raw) => Url::parse(&raw)
                .map_err(|e| ConfigError::InvalidUrl("GEDCOMX_COLLECTION_URL".to_string(), e.to_string()))?,
            None => environment.family_tree_uri()?,
        };
        Ok(Self {
            environment,
            collection_url,
            access_token: lookup("GEDCOMX_ACCESS_TOKEN")
                .filter(|t| !t.is_empty())
                .map(AccessToken::new),
            timeout_secs: lookup("GEDCOMX_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
            user_agent: lookup("GEDCOMX_USER_AGENT").unwrap_or_else(default_user_agent),
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error("unknown environment {0:?}, expected `production` or `sandbox`")]
    UnknownEnvironment(String),
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn defaults_to_production_tree() {
        let cfg = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(cfg.environment, Environment::Production);
        assert_eq!(cfg.collection_url.as_str(), "https://api.familysearch.org/platform/collections/tree");
        assert_eq!(cfg.timeout_secs, 30);
        assert!(cfg.access_token.is_none());
        assert!(cfg.user_agent.starts_with("gx-client/"));
    }

    #[test]
    fn sandbox_and_overrides() {
        let cfg = ClientConfig::from_lookup(lookup(&[
            ("GEDCOMX_ENVIRONMENT", "Sandbox"),
            ("GEDCOMX_TIMEOUT_SECS", "5"),
            ("GEDCOMX_ACCESS_TOKEN", "tok"),
        ]))
        .unwrap();
        assert_eq!(cfg.environment, Environment::Sandbox);
        assert_eq!(cfg.collection_url.host_str(), Some("api-integ.familysearch.org"));
        assert_eq!(cfg.timeout_secs, 5);
        assert_eq!(cfg.access_token.as_ref().map(AccessToken::secret), Some("tok"));

        let cfg = ClientConfig::from_lookup(lookup(&[("GEDCOMX_COLLECTION_URL", "http://127.0.0.1:9000/tree")])).unwrap();
        assert_eq!(cfg.collection_url.as_str(), "http://127.0.0.1:9000/tree");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[("GEDCOMX_ENVIRONMENT", "staging")])),
            Err(ConfigError::UnknownEnvironment(_))
        ));
        assert!(matches!(
            ClientConfig::from_lookup(lookup(&[("GEDCOMX_COLLECTION_URL", "not a url")])),
            Err(ConfigError::InvalidUrl(ref var, _)) if var == "GEDCOMX_COLLECTION_URL"
        ));
    }

    #[test]
    fn debug_redacts_token() {
        let cfg = ClientConfig::for_environment(Environment::Sandbox)
            .unwrap()
            .with_access_token("super-secret");
        let debug = format!("{cfg:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
