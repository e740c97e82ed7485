//! # State Transition Options
//!
//! An option modifies a freshly built request right before it is sent:
//! a header, a query parameter, or a precondition. Options are stateless
//! and reusable, perform no I/O, and are applied in the order given.
//!
//! Every transition takes `options: &[&dyn StateTransitionOption]`:
//!
//! ```ignore
//! let person = collection.read_person_for_current_user(&[
//!     &HeaderParameter::lang("fr"),
//!     &QueryParameter::generations(4),
//! ])?;
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use gx_core::{header, HttpError, Request};

use crate::kind::StateKind;
use crate::state::ApplicationState;

/// A request modifier applied before sending.
pub trait StateTransitionOption: fmt::Debug + Send + Sync {
    fn apply(&self, request: &mut Request) -> Result<(), HttpError>;
}

// ─── Headers ─────────────────────────────────────────────────────────

/// Sets (or appends) a request header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderParameter {
    name: String,
    value: String,
    replace: bool,
}

impl HeaderParameter {
    /// Replace any existing value of `name`.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            replace: true,
        }
    }

    /// Add a value of `name`, keeping existing ones.
    pub fn append(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            replace: false,
            ..Self::new(name, value)
        }
    }

    /// Preferred response language (`Accept-Language`).
    pub fn lang(language: impl Into<String>) -> Self {
        Self::new(header::ACCEPT_LANGUAGE.as_str(), language)
    }

    /// Language of the submitted entity (`Content-Language`).
    pub fn locale(language: impl Into<String>) -> Self {
        Self::new(header::CONTENT_LANGUAGE.as_str(), language)
    }

    /// Conditional read (`If-None-Match`).
    pub fn if_none_match(etag: impl Into<String>) -> Self {
        Self::new(header::IF_NONE_MATCH.as_str(), etag)
    }
}

impl StateTransitionOption for HeaderParameter {
    fn apply(&self, request: &mut Request) -> Result<(), HttpError> {
        if self.replace {
            request.set_header(&self.name, &self.value)
        } else {
            request.append_header(&self.name, &self.value)
        }
    }
}

// ─── Query parameters ────────────────────────────────────────────────

/// Sets (or appends) a query parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParameter {
    name: String,
    value: String,
    replace: bool,
}

impl QueryParameter {
    pub const ACCESS_TOKEN: &'static str = "access_token";
    pub const COUNT: &'static str = "count";
    pub const GENERATIONS: &'static str = "generations";
    pub const SEARCH_QUERY: &'static str = "q";
    pub const START: &'static str = "start";
    pub const PERSON_DETAILS: &'static str = "personDetails";
    pub const MARRIAGE_DETAILS: &'static str = "marriageDetails";
    pub const SPOUSE: &'static str = "spouse";

    /// Replace any existing value of `name`.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            replace: true,
        }
    }

    /// Add a value of `name`, keeping existing ones.
    pub fn append(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            replace: false,
            ..Self::new(name, value)
        }
    }

    pub fn access_token(token: impl Into<String>) -> Self {
        Self::new(Self::ACCESS_TOKEN, token)
    }

    /// Page size.
    pub fn count(count: u32) -> Self {
        Self::new(Self::COUNT, count.to_string())
    }

    /// Index of the first result of a page.
    pub fn start(start: u32) -> Self {
        Self::new(Self::START, start.to_string())
    }

    /// Depth of an ancestry or descendancy query.
    pub fn generations(generations: u32) -> Self {
        Self::new(Self::GENERATIONS, generations.to_string())
    }

    pub fn search_query(query: impl Into<String>) -> Self {
        Self::new(Self::SEARCH_QUERY, query)
    }

    /// Include person details in a pedigree result.
    pub fn person_details() -> Self {
        Self::new(Self::PERSON_DETAILS, "true")
    }

    /// Include marriage details in a pedigree result.
    pub fn marriage_details() -> Self {
        Self::new(Self::MARRIAGE_DETAILS, "true")
    }

    /// Restrict a descendancy query to the family with one spouse.
    pub fn spouse(person_id: impl Into<String>) -> Self {
        Self::new(Self::SPOUSE, person_id)
    }
}

impl StateTransitionOption for QueryParameter {
    fn apply(&self, request: &mut Request) -> Result<(), HttpError> {
        if self.replace {
            request.set_query_param(&self.name, &self.value);
        } else {
            request.append_query_param(&self.name, &self.value);
        }
        Ok(())
    }
}

// ─── Preconditions ───────────────────────────────────────────────────

/// Optimistic-concurrency preconditions: `If-Match` and
/// `If-Unmodified-Since`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Preconditions {
    etag: Option<String>,
    last_modified: Option<DateTime<Utc>>,
}

impl Preconditions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn if_match(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }

    pub fn if_unmodified_since(mut self, last_modified: DateTime<Utc>) -> Self {
        self.last_modified = Some(last_modified);
        self
    }

    /// Preconditions from a state's `ETag` and `Last-Modified`.
    pub fn from_state<K: StateKind>(state: &ApplicationState<K>) -> Self {
        Self {
            etag: state.etag().map(str::to_string),
            last_modified: state.last_modified(),
        }
    }
}

impl StateTransitionOption for Preconditions {
    fn apply(&self, request: &mut Request) -> Result<(), HttpError> {
        if let Some(etag) = &self.etag {
            request.set_header(header::IF_MATCH.as_str(), etag)?;
        }
        if let Some(last_modified) = &self.last_modified {
            let http_date = last_modified.format("%a, %d %b %Y %H:%M:%S GMT").to_string();
            request.set_header(header::IF_UNMODIFIED_SINCE.as_str(), &http_date)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind;
    use crate::state::tests::read;
    use chrono::TimeZone;
    use gx_core::{Method, MockResponse, MockTransport, Url};
    use serde_json::json;

    fn request(url: &str) -> Request {
        Request::new(Method::GET, Url::parse(url).unwrap())
    }

    fn apply_all(request: &mut Request, options: &[&dyn StateTransitionOption]) {
        for option in options {
            option.apply(request).unwrap();
        }
    }

    #[test]
    fn header_options_replace_or_append() {
        let mut req = request("https://api.example/p");
        apply_all(
            &mut req,
            &[
                &HeaderParameter::lang("en"),
                &HeaderParameter::lang("fr"),
                &HeaderParameter::append("X-Trace", "a"),
                &HeaderParameter::append("X-Trace", "b"),
            ],
        );
        assert_eq!(req.header("accept-language"), Some("fr"));
        assert_eq!(req.headers().get_all("x-trace").iter().count(), 2);
    }

    #[test]
    fn query_options_apply_in_order() {
        let mut req = request("https://api.example/ancestry?person=P1");
        apply_all(
            &mut req,
            &[&QueryParameter::generations(4), &QueryParameter::generations(8), &QueryParameter::person_details()],
        );
        assert_eq!(req.url().query(), Some("person=P1&generations=8&personDetails=true"));
    }

    #[test]
    fn preconditions_set_conditional_headers() {
        let mut req = request("https://api.example/p");
        let when = Utc.with_ymd_and_hms(2015, 3, 9, 14, 5, 0).unwrap();
        apply_all(&mut req, &[&Preconditions::new().if_match("\"v3\"").if_unmodified_since(when)]);
        assert_eq!(req.header("if-match"), Some("\"v3\""));
        assert_eq!(req.header("if-unmodified-since"), Some("Mon, 09 Mar 2015 14:05:00 GMT"));
    }

    #[test]
    fn preconditions_copy_validators_from_a_state() {
        let mock = MockTransport::new();
        let url = "https://api.example/persons/P1";
        mock.on(
            Method::GET,
            url,
            MockResponse::ok()
                .header("ETag", "\"v7\"")
                .header("Last-Modified", "Wed, 21 Oct 2015 07:28:00 GMT")
                .json(json!({ "persons": [{ "id": "P1" }] })),
        );
        let state = read::<kind::Person>(&mock, url);

        let mut req = request(url);
        Preconditions::from_state(&state).apply(&mut req).unwrap();
        assert_eq!(req.header("if-match"), Some("\"v7\""));
        assert_eq!(req.header("if-unmodified-since"), Some("Wed, 21 Oct 2015 07:28:00 GMT"));
    }

    #[test]
    fn empty_preconditions_are_a_no_op() {
        let mut req = request("https://api.example/p");
        Preconditions::new().apply(&mut req).unwrap();
        assert!(req.headers().is_empty());
    }

    #[test]
    fn invalid_header_surfaces_error() {
        let mut req = request("https://api.example/p");
        assert!(HeaderParameter::new("Bad Name", "x").apply(&mut req).is_err());
    }
}
