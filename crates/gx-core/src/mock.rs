//! # Mock Transport
//!
//! [`MockTransport`] is a scripted, in-memory [`Transport`] for tests and
//! offline development. Responses are registered per `(method, url)` route
//! and served in FIFO order; the last response of a route is sticky, so a
//! single registration answers any number of identical requests. Every
//! request is recorded, which lets tests assert both what was sent and that
//! nothing was sent at all.
//!
//! Routes match on the full URL first and then on the URL with its query
//! and fragment stripped. An unmatched request fails with a
//! [`TransportError`], the same way a refused connection would.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use url::Url;

use crate::error::TransportError;
use crate::http::{Method, Request, Response, StatusCode, Transport};

/// A canned response for [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct MockResponse {
    status: u16,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl MockResponse {
    /// A response with the given status and an empty body.
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// `200 OK` with an empty body.
    pub fn ok() -> Self {
        Self::new(200)
    }

    /// Set a JSON body.
    pub fn json(mut self, value: serde_json::Value) -> Self {
        self.body = value.to_string().into_bytes();
        self
    }

    /// Set a raw body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Add a response header. Repeated names are kept.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    fn into_response(self, url: Url) -> Result<Response, TransportError> {
        let status = StatusCode::from_u16(self.status)
            .map_err(|e| TransportError::with_source("mock response has invalid status", e))?;
        let mut response = Response::new(status, url).with_body(self.body);
        for (name, value) in &self.headers {
            response = response
                .with_header(name, value)
                .map_err(|e| TransportError::with_source("mock response has invalid header", e))?;
        }
        Ok(response)
    }
}

#[derive(Debug, Default)]
struct MockState {
    routes: HashMap<(Method, String), VecDeque<MockResponse>>,
    requests: Vec<Request>,
}

/// Scripted in-memory transport. Clones share routes and the request log.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

fn route_key(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => parsed.to_string(),
        Err(_) => url.to_string(),
    }
}

fn without_query(url: &Url) -> String {
    let mut bare = url.clone();
    bare.set_query(None);
    bare.set_fragment(None);
    bare.to_string()
}

impl MockTransport {
    /// An empty transport with no routes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `response` for `method url`.
    pub fn on(&self, method: Method, url: &str, response: MockResponse) -> &Self {
        self.state
            .lock()
            .routes
            .entry((method, route_key(url)))
            .or_default()
            .push_back(response);
        self
    }

    /// Every request sent so far, oldest first.
    pub fn requests(&self) -> Vec<Request> {
        self.state.lock().requests.clone()
    }

    /// Number of requests sent so far.
    pub fn request_count(&self) -> usize {
        self.state.lock().requests.len()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<Request> {
        self.state.lock().requests.last().cloned()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &Request) -> Result<Response, TransportError> {
        let mut state = self.state.lock();
        state.requests.push(request.clone());

        let method = request.method().clone();
        let url = request.url();
        let candidates = [url.to_string(), without_query(url)];
        let queue = candidates
            .into_iter()
            .find(|key| state.routes.contains_key(&(method.clone(), key.clone())))
            .and_then(|key| state.routes.get_mut(&(method.clone(), key)));

        let canned = match queue {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };
        drop(state);

        match canned {
            Some(canned) => canned.into_response(url.clone()),
            None => Err(TransportError::new(format!("no mock route for {method} {url}"))),
        }
    }
}
