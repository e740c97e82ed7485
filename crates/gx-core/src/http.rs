//! # HTTP Exchange Model
//!
//! The request/response pair a state is built from, and the [`Transport`]
//! seam that moves a request over the wire. The engine only ever needs to
//! build a request (method, URL, headers, body) and `send` it; pooling,
//! redirects, TLS and timeouts belong to the transport implementation.
//!
//! Method, status and header types are re-exported from `reqwest` so the
//! production transport converts without copying through a parallel type
//! family.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::error::{HttpError, TransportError};
use crate::media;

pub use reqwest::header;
pub use reqwest::{Method, StatusCode};

use header::{HeaderMap, HeaderName, HeaderValue};

fn header_name(name: &str) -> Result<HeaderName, HttpError> {
    HeaderName::from_bytes(name.as_bytes()).map_err(|source| HttpError::InvalidHeaderName {
        name: name.to_string(),
        source,
    })
}

fn header_value(name: &str, value: &str) -> Result<HeaderValue, HttpError> {
    HeaderValue::from_str(value).map_err(|source| HttpError::InvalidHeaderValue {
        name: name.to_string(),
        source,
    })
}

// ─── Request ─────────────────────────────────────────────────────────

/// An HTTP request as built by a state and handed to a [`Transport`].
///
/// Once a state has been constructed from a request, that request is never
/// modified again; every transition builds a fresh one.
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<Vec<u8>>,
}

impl Request {
    /// Create a request with no headers and no body.
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// The request method.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The full request URL, query included.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// All request headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A header value as text, if present and visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The request body, if one was set.
    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    /// Set a header, replacing any existing values.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), HttpError> {
        let value = header_value(name, value)?;
        self.headers.insert(header_name(name)?, value);
        Ok(())
    }

    /// Add a header value without removing existing ones.
    pub fn append_header(&mut self, name: &str, value: &str) -> Result<(), HttpError> {
        let value = header_value(name, value)?;
        self.headers.append(header_name(name)?, value);
        Ok(())
    }

    /// Remove every value of a header.
    pub fn remove_header(&mut self, name: &str) {
        self.headers.remove(name);
    }

    /// Builder-style [`set_header`](Self::set_header).
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, HttpError> {
        self.set_header(name, value)?;
        Ok(self)
    }

    /// Set the `Accept` header.
    pub fn set_accept(&mut self, media_type: &str) -> Result<(), HttpError> {
        self.set_header(header::ACCEPT.as_str(), media_type)
    }

    /// Set the `Content-Type` header.
    pub fn set_content_type(&mut self, media_type: &str) -> Result<(), HttpError> {
        self.set_header(header::CONTENT_TYPE.as_str(), media_type)
    }

    /// Set `Authorization: Bearer <token>`.
    pub fn set_bearer_token(&mut self, token: &str) -> Result<(), HttpError> {
        self.set_header(header::AUTHORIZATION.as_str(), &format!("Bearer {token}"))
    }

    /// Set a raw body.
    pub fn set_body(&mut self, body: Vec<u8>) {
        self.body = Some(body);
    }

    /// Serialize `value` as the JSON body. The content type is left to the
    /// caller, since GEDCOM X and FamilySearch use their own JSON media types.
    pub fn set_json_body<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), HttpError> {
        self.body = Some(serde_json::to_vec(value)?);
        Ok(())
    }

    /// Encode `pairs` as an `application/x-www-form-urlencoded` body and set
    /// the matching content type.
    pub fn set_form_body<'a, I>(&mut self, pairs: I) -> Result<(), HttpError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (name, value) in pairs {
            serializer.append_pair(name, value);
        }
        self.body = Some(serializer.finish().into_bytes());
        self.set_content_type(media::FORM_URLENCODED)
    }

    /// Append a query parameter, keeping existing values of the same name.
    pub fn append_query_param(&mut self, name: &str, value: &str) {
        self.url.query_pairs_mut().append_pair(name, value);
    }

    /// Set a query parameter, dropping existing values of the same name.
    pub fn set_query_param(&mut self, name: &str, value: &str) {
        let kept: Vec<(String, String)> = self
            .url
            .query_pairs()
            .filter(|(n, _)| n != name)
            .map(|(n, v)| (n.into_owned(), v.into_owned()))
            .collect();
        self.url.set_query(None);
        let mut pairs = self.url.query_pairs_mut();
        pairs.extend_pairs(kept.iter().map(|(n, v)| (n.as_str(), v.as_str())));
        pairs.append_pair(name, value);
    }
}

// ─── Response ────────────────────────────────────────────────────────

/// An HTTP response as returned by a [`Transport`].
///
/// The body is fully buffered; states parse it eagerly at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    status: StatusCode,
    url: Url,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl Response {
    /// Create a response with no headers and an empty body.
    pub fn new(status: StatusCode, url: Url) -> Self {
        Self {
            status,
            url,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    /// Create a response from already-converted parts.
    pub fn from_parts(status: StatusCode, url: Url, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            url,
            headers,
            body,
        }
    }

    /// Builder-style header addition (appends, so repeated `Link` headers
    /// are preserved).
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self, HttpError> {
        let value = header_value(name, value)?;
        self.headers.append(header_name(name)?, value);
        Ok(self)
    }

    /// Builder-style body replacement.
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// The response status.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The URL the response was served from (after transport redirects).
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// All response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// First value of a header as text.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Every value of a header as text, in arrival order.
    pub fn header_values(&self, name: &str) -> Vec<&str> {
        self.headers
            .get_all(name)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }

    /// The raw body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// The body decoded as UTF-8, lossily.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, HttpError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// The `Location` header.
    pub fn location(&self) -> Option<&str> {
        self.header(header::LOCATION.as_str())
    }

    /// The `ETag` header.
    pub fn etag(&self) -> Option<&str> {
        self.header(header::ETAG.as_str())
    }

    /// The `Last-Modified` header parsed as an HTTP date.
    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.header(header::LAST_MODIFIED.as_str())
            .and_then(|v| DateTime::parse_from_rfc2822(v).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }
}

// ─── Transport ───────────────────────────────────────────────────────

/// The wire collaborator: sends one request and returns its response.
///
/// Implementations must be `Send + Sync` so a single transport can be shared
/// by every state of a session behind an `Arc`. The trait is object-safe so
/// the production transport and [`MockTransport`](crate::MockTransport) are
/// interchangeable at runtime. A non-2xx status is a successful exchange and
/// must be returned as a `Response`, not as an error.
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Send `request` and block until the full response has been read.
    fn send(&self, request: &Request) -> Result<Response, TransportError>;
}
