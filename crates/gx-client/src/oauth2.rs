//! # OAuth2 Flows
//!
//! Every grant funnels into [`ApplicationState::authenticate_via_oauth2`]:
//!
//! 1. resolve the `http://oauth.net/core/2.0/endpoint/token` link (absent is
//!    a [`GedcomxError::MissingLink`]);
//! 2. POST the grant form with `Accept: application/json`;
//! 3. on 2xx read `access_token`, falling back to the legacy `token` field.
//!
//! Success consumes the state and hands it back carrying the token, so the
//! only token change in the engine is visible in the signature. A non-2xx
//! answer, or a 2xx without either token field, is a
//! [`GedcomxError::Authentication`] carrying the token response.
//!
//! Credentials and tokens are never logged.

use gx_core::{media, rel, Method, Response, Url};
use serde::Deserialize;

use crate::error::{GedcomxError, Result};
use crate::kind::StateKind;
use crate::state::{AccessToken, ApplicationState};

pub const GRANT_PASSWORD: &str = "password";
pub const GRANT_AUTHORIZATION_CODE: &str = "authorization_code";
pub const GRANT_CLIENT_CREDENTIALS: &str = "client_credentials";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    token: Option<String>,
}

fn read_token(response: &Response) -> Option<String> {
    let parsed: TokenResponse = serde_json::from_slice(response.body()).ok()?;
    parsed
        .access_token
        .or(parsed.token)
        .filter(|t| !t.is_empty())
}

impl<K: StateKind> ApplicationState<K> {
    /// Resource-owner password grant. Confidential clients pass their
    /// `client_secret`.
    pub fn authenticate_via_oauth2_password(
        self,
        username: &str,
        password: &str,
        client_id: &str,
        client_secret: Option<&str>,
    ) -> Result<Self> {
        let mut form = vec![
            ("grant_type", GRANT_PASSWORD),
            ("username", username),
            ("password", password),
            ("client_id", client_id),
        ];
        form.extend(client_secret.map(|secret| ("client_secret", secret)));
        self.authenticate_via_oauth2(&form)
    }

    /// Authorization-code grant, completing a redirect from
    /// [`oauth2_authorization_uri`](Self::oauth2_authorization_uri).
    pub fn authenticate_via_oauth2_auth_code(
        self,
        code: &str,
        redirect_uri: &str,
        client_id: &str,
        client_secret: Option<&str>,
    ) -> Result<Self> {
        let mut form = vec![
            ("grant_type", GRANT_AUTHORIZATION_CODE),
            ("code", code),
            ("redirect_uri", redirect_uri),
            ("client_id", client_id),
        ];
        form.extend(client_secret.map(|secret| ("client_secret", secret)));
        self.authenticate_via_oauth2(&form)
    }

    /// Client-credentials grant.
    pub fn authenticate_via_oauth2_client_credentials(self, client_id: &str, client_secret: &str) -> Result<Self> {
        self.authenticate_via_oauth2(&[
            ("grant_type", GRANT_CLIENT_CREDENTIALS),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ])
    }

    /// POST `form` to the token endpoint and return this state carrying the
    /// issued token.
    pub fn authenticate_via_oauth2(self, form: &[(&str, &str)]) -> Result<Self> {
        let token_url = self.require_link(rel::OAUTH2_TOKEN)?.url()?;
        let grant_type = form
            .iter()
            .find(|(name, _)| *name == "grant_type")
            .map(|(_, value)| *value)
            .unwrap_or("unspecified");

        let mut request = self.create_request(Method::POST, token_url);
        request.set_accept(media::JSON)?;
        request.set_form_body(form.iter().copied())?;
        let exchange = self.invoke(request, &[])?;
        let response = exchange.response;
        let status = response.status();

        if !status.is_success() {
            tracing::warn!(
                grant_type,
                url = %response.url(),
                status = status.as_u16(),
                "OAuth2 token request rejected"
            );
            return Err(GedcomxError::Authentication {
                reason: format!("token endpoint returned {status}"),
                response: Some(Box::new(response)),
            });
        }

        let Some(token) = read_token(&response) else {
            tracing::warn!(
                grant_type,
                url = %response.url(),
                status = status.as_u16(),
                "OAuth2 token response carried no token"
            );
            return Err(GedcomxError::Authentication {
                reason: "token response has neither `access_token` nor `token`".to_string(),
                response: Some(Box::new(response)),
            });
        };

        tracing::info!(grant_type, state = K::NAME.as_str(), "OAuth2 authentication succeeded");
        Ok(self.with_access_token(Some(AccessToken::new(token))))
    }

    /// This state carrying a token obtained out of band.
    pub fn authenticate_with_access_token(self, token: impl Into<AccessToken>) -> Self {
        self.with_access_token(Some(token.into()))
    }

    /// This state without a token.
    pub fn unauthenticate(self) -> Self {
        self.with_access_token(None)
    }

    /// The URL to send a user to for the authorization-code grant.
    pub fn oauth2_authorization_uri(
        &self,
        client_id: &str,
        redirect_uri: &str,
        extra: &[(&str, &str)],
    ) -> Result<Url> {
        let mut url = self.require_link(rel::OAUTH2_AUTHORIZE)?.url()?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("response_type", "code")
                .append_pair("client_id", client_id)
                .append_pair("redirect_uri", redirect_uri);
            for (name, value) in extra {
                query.append_pair(name, value);
            }
        }
        Ok(url)
    }
}
