//! # Client Errors
//!
//! Every fallible operation on a state returns [`GedcomxError`]. The
//! variants follow the failure taxonomy of a hypermedia client:
//!
//! - transport failures propagate unchanged ([`GedcomxError::Transport`]);
//! - a 4xx/5xx response is a normal state, turned into an error only on
//!   request by `if_successful` ([`GedcomxError::Status`]);
//! - a required link that the server did not send is a contract violation
//!   ([`GedcomxError::MissingLink`]);
//! - a failed token exchange is [`GedcomxError::Authentication`];
//! - asking the factory for a state it cannot build is a programming error
//!   ([`GedcomxError::UnregisteredState`], [`GedcomxError::StateMismatch`]).
//!
//! Nothing is retried, and no variant represents a partially built state.

use gx_core::{HttpError, Method, Response, StatusCode, TransportError};
use thiserror::Error;

use crate::config::ConfigError;
use crate::kind::StateName;

/// Errors from the hypermedia client.
#[derive(Error, Debug)]
pub enum GedcomxError {
    /// The transport failed to complete the exchange.
    #[error("{method} {url}: transport failure: {source}")]
    Transport {
        method: Method,
        url: String,
        #[source]
        source: TransportError,
    },

    /// The server answered with a client or server error status.
    #[error("{method} {uri} returned {status}")]
    Status {
        method: Method,
        uri: String,
        status: StatusCode,
        response: Box<Response>,
    },

    /// A link the operation requires is absent from the state.
    #[error("resource {uri} has no `{rel}` link")]
    MissingLink { rel: String, uri: String },

    /// The OAuth2 token exchange failed. Carries the token endpoint response
    /// when there was one.
    #[error("authentication failed: {reason}")]
    Authentication {
        reason: String,
        response: Option<Box<Response>>,
    },

    /// The factory has no builder for a state name.
    #[error("no state builder registered for {0}")]
    UnregisteredState(StateName),

    /// The builder registered for a name produced a different state type.
    #[error("builder for {name} produced {actual}, expected {expected}")]
    StateMismatch {
        name: StateName,
        expected: &'static str,
        actual: &'static str,
    },

    /// The response body could not be parsed as the state's entity.
    #[error("failed to parse {kind} entity from {uri}: {source}")]
    EntityParse {
        kind: StateName,
        uri: String,
        #[source]
        source: serde_json::Error,
    },

    /// A request or response body could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A request could not be built.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// Client configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl GedcomxError {
    /// The response attached to this error, if any.
    pub fn response(&self) -> Option<&Response> {
        match self {
            Self::Status { response, .. } => Some(response),
            Self::Authentication { response, .. } => response.as_deref(),
            _ => None,
        }
    }

    /// The HTTP status attached to this error, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.response().map(Response::status)
    }
}

/// Result alias for client operations.
pub type Result<T, E = GedcomxError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use gx_core::Url;

    fn response(status: u16) -> Response {
        Response::new(
            StatusCode::from_u16(status).unwrap(),
            Url::parse("https://api.example/token").unwrap(),
        )
    }

    #[test]
    fn status_error_exposes_response() {
        let err = GedcomxError::Status {
            method: Method::GET,
            uri: "https://api.example/persons/P1".into(),
            status: StatusCode::NOT_FOUND,
            response: Box::new(response(404)),
        };
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.to_string(), "GET https://api.example/persons/P1 returned 404 Not Found");
    }

    #[test]
    fn authentication_error_may_lack_response() {
        let err = GedcomxError::Authentication {
            reason: "no token link".into(),
            response: None,
        };
        assert!(err.response().is_none());
        let err = GedcomxError::Authentication {
            reason: "rejected".into(),
            response: Some(Box::new(response(400))),
        };
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn missing_link_names_rel_and_uri() {
        let err = GedcomxError::MissingLink {
            rel: "relationships".into(),
            uri: "https://api.example/collections/tree".into(),
        };
        assert_eq!(
            err.to_string(),
            "resource https://api.example/collections/tree has no `relationships` link"
        );
    }

    #[test]
    fn unregistered_state_names_state() {
        let err = GedcomxError::UnregisteredState(StateName::ChangeHistory);
        assert_eq!(err.to_string(), "no state builder registered for ChangeHistoryState");
    }
}
