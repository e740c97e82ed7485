//! # Error Types
//!
//! Errors raised while building requests ([`HttpError`]) and while moving
//! them over the wire ([`TransportError`]). Transport errors are surfaced
//! unchanged by the state engine; nothing here is retried.

use thiserror::Error;

/// Error building an HTTP request or reading a response.
#[derive(Error, Debug)]
pub enum HttpError {
    /// A header value contained characters not allowed on the wire.
    #[error("invalid value for header {name}: {source}")]
    InvalidHeaderValue {
        /// Header the value was destined for.
        name: String,
        /// Underlying parse failure.
        source: reqwest::header::InvalidHeaderValue,
    },

    /// A header name was not a valid token.
    #[error("invalid header name {name}: {source}")]
    InvalidHeaderName {
        /// The rejected name.
        name: String,
        /// Underlying parse failure.
        source: reqwest::header::InvalidHeaderName,
    },

    /// A link href or template expansion was not a valid URL.
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        /// The rejected URL text.
        url: String,
        /// Underlying parse failure.
        source: url::ParseError,
    },

    /// A templated link was followed without expanding its template.
    #[error("link `{rel}` has neither an href nor a template")]
    UnresolvableLink {
        /// Rel of the offending link.
        rel: String,
    },

    /// JSON body (de)serialization failed.
    #[error("JSON body error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failure reported by a [`Transport`](crate::Transport) implementation.
///
/// Connection, DNS, TLS and timeout failures all land here. The engine wraps
/// it with the method and URL of the request that failed and otherwise
/// propagates it untouched.
#[derive(Error, Debug)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl TransportError {
    /// Create a transport error with a message only.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Create a transport error wrapping an underlying cause.
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// The human-readable failure message.
    pub fn message(&self) -> &str {
        &self.message
    }
}
