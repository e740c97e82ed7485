//! The production [`Transport`]: a blocking reqwest client.
//!
//! Redirects are not followed, so `Location` headers reach the state engine
//! and become `self` links. Non-2xx statuses are returned as responses, not
//! errors. Only connection, TLS, timeout and body-read failures become
//! [`TransportError`]s.

use std::time::Duration;

use gx_core::{Request, Response, Transport, TransportError};
use reqwest::blocking::Client;
use reqwest::redirect::Policy;

use crate::config::{ClientConfig, ConfigError};

/// Sends requests with `reqwest::blocking`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: Client,
}

impl ReqwestTransport {
    /// Build a transport with the configured timeout and `User-Agent`.
    pub fn new(config: &ClientConfig) -> Result<Self, ConfigError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
        Ok(Self { http })
    }

    /// Wrap an already-configured client.
    pub fn from_client(http: Client) -> Self {
        Self { http }
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: &Request) -> Result<Response, TransportError> {
        let mut builder = self
            .http
            .request(request.method().clone(), request.url().clone())
            .headers(request.headers().clone());
        if let Some(body) = request.body() {
            builder = builder.body(body.to_vec());
        }

        let response = builder.send().map_err(|e| {
            let message = if e.is_timeout() {
                format!("{} {} timed out", request.method(), request.url())
            } else if e.is_connect() {
                format!("{} {}: connection failed", request.method(), request.url())
            } else {
                format!("{} {}: request failed", request.method(), request.url())
            };
            TransportError::with_source(message, e)
        })?;

        let status = response.status();
        let url = response.url().clone();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .map_err(|e| TransportError::with_source(format!("failed to read body from {url}"), e))?;
        Ok(Response::from_parts(status, url, headers, body.to_vec()))
    }
}
