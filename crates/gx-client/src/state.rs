//! # Application State Engine
//!
//! [`ApplicationState<K>`] is one snapshot of a resource: the exact request
//! that was sent, the exact response that came back, the entity parsed from
//! it, the merged link table, and the bearer token in force. It is built
//! once per exchange and never changes afterwards. Every transition builds a
//! new request, sends it, and returns a new state.
//!
//! ## Construction
//!
//! 1. The entity is parsed only when the request was not `HEAD`, the kind's
//!    status predicate accepts the status, and the body is non-empty. A parse
//!    failure fails construction; there is no degraded state.
//! 2. The link table is merged in increasing priority: a `self` link from
//!    `Location`, RFC 5988 `Link` headers, the entity's links, the scope
//!    object's links.
//!
//! ## Transitions
//!
//! - Generic verbs (`get`, `head`, `options`, `delete`, `put`) and pagination
//!   (`read_next_page`, ...) rebuild the same kind directly, keeping the
//!   entity-status policy the state was built with.
//! - Everything else goes through the shared [`StateFactory`] so that an
//!   overridden builder applies to every caller.
//! - Options are applied to the fresh request in slice order right before
//!   it is sent.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use gx_core::{header, link_header, media, rel, Link, Links, Method, Request, Response, StatusCode, Transport, Url};
use gx_model::{Gedcomx, HasLinks};
use zeroize::Zeroizing;

use crate::error::{GedcomxError, Result};
use crate::factory::StateFactory;
use crate::kind::StateKind;
use crate::options::StateTransitionOption;

/// Decides from the status whether a response carries an entity.
pub type EntityPolicy = fn(StatusCode) -> bool;

// ─── Access token ────────────────────────────────────────────────────

/// An OAuth2 bearer token. Zeroed on drop and redacted from `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(Zeroizing::new(token.into()))
    }

    /// The raw token, for building an `Authorization` header.
    pub fn secret(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

impl From<String> for AccessToken {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}

impl From<&str> for AccessToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

// ─── Context and exchange ────────────────────────────────────────────

/// The collaborators shared by every state of a session.
#[derive(Clone)]
pub struct StateContext {
    transport: Arc<dyn Transport>,
    factory: Arc<StateFactory>,
}

impl StateContext {
    pub fn new(transport: Arc<dyn Transport>, factory: Arc<StateFactory>) -> Self {
        Self { transport, factory }
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    pub fn factory(&self) -> &Arc<StateFactory> {
        &self.factory
    }
}

impl fmt::Debug for StateContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateContext")
            .field("transport", &self.transport)
            .field("collection_uri", &self.factory.collection_uri().as_str())
            .finish()
    }
}

/// One completed HTTP exchange, the raw material of a state.
#[derive(Debug, Clone)]
pub struct Exchange {
    pub context: StateContext,
    pub request: Request,
    pub response: Response,
    pub access_token: Option<AccessToken>,
}

// ─── ApplicationState ────────────────────────────────────────────────

/// A hypermedia resource state of kind `K`.
pub struct ApplicationState<K: StateKind> {
    context: StateContext,
    request: Request,
    response: Response,
    access_token: Option<AccessToken>,
    entity: Option<K::Entity>,
    links: Links,
    entity_policy: EntityPolicy,
    kind: PhantomData<fn() -> K>,
}

impl<K: StateKind> Clone for ApplicationState<K> {
    fn clone(&self) -> Self {
        Self {
            context: self.context.clone(),
            request: self.request.clone(),
            response: self.response.clone(),
            access_token: self.access_token.clone(),
            entity: self.entity.clone(),
            links: self.links.clone(),
            entity_policy: self.entity_policy,
            kind: PhantomData,
        }
    }
}

impl<K: StateKind> fmt::Debug for ApplicationState<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(K::NAME.as_str())
            .field("method", self.request.method())
            .field("uri", &self.request.url().as_str())
            .field("status", &self.response.status())
            .field("authenticated", &self.access_token.is_some())
            .field("entity", &self.entity)
            .field("links", &self.links.len())
            .finish()
    }
}

fn build_links<K: StateKind>(response: &Response, entity: Option<&K::Entity>) -> Links {
    let mut links = Links::new();
    if let Some(location) = response.location() {
        let href = response
            .url()
            .join(location)
            .map(String::from)
            .unwrap_or_else(|_| location.to_string());
        links.insert(Link::new(rel::SELF, href));
    }
    let header_links = link_header::parse_all(response.header_values(header::LINK.as_str()), response.url());
    links.merge(&header_links);
    if let Some(entity) = entity {
        links.merge(entity.links());
        if let Some(scope) = K::scope(entity) {
            links.merge(scope.links());
        }
    }
    links
}

impl<K: StateKind> ApplicationState<K> {
    /// Build a state with the kind's default entity-status policy.
    pub fn new(exchange: Exchange) -> Result<Self> {
        Self::with_policy(exchange, K::entity_expected)
    }

    /// Build a state with an explicit entity-status policy.
    pub fn with_policy(exchange: Exchange, entity_policy: EntityPolicy) -> Result<Self> {
        let Exchange {
            context,
            request,
            response,
            access_token,
        } = exchange;

        let entity = if request.method() != Method::HEAD
            && entity_policy(response.status())
            && !response.body().is_empty()
        {
            let entity = K::load_entity(&response).map_err(|source| GedcomxError::EntityParse {
                kind: K::NAME,
                uri: response.url().to_string(),
                source,
            })?;
            Some(entity)
        } else {
            None
        };
        let links = build_links::<K>(&response, entity.as_ref());

        Ok(Self {
            context,
            request,
            response,
            access_token,
            entity,
            links,
            entity_policy,
            kind: PhantomData,
        })
    }

    /// Same kind, same policy, new exchange.
    pub(crate) fn reconstruct(&self, exchange: Exchange) -> Result<Self> {
        Self::with_policy(exchange, self.entity_policy)
    }

    /// Copy of this state with the token replaced.
    pub(crate) fn with_access_token(mut self, token: Option<AccessToken>) -> Self {
        self.access_token = token;
        self
    }

    // ─── Accessors ───────────────────────────────────────────────────

    pub fn name(&self) -> crate::kind::StateName {
        K::NAME
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    /// The parsed entity, absent for `HEAD`, empty bodies and statuses the
    /// kind does not parse.
    pub fn entity(&self) -> Option<&K::Entity> {
        self.entity.as_ref()
    }

    pub fn links(&self) -> &Links {
        &self.links
    }

    pub fn access_token(&self) -> Option<&AccessToken> {
        self.access_token.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    pub fn context(&self) -> &StateContext {
        &self.context
    }

    pub fn factory(&self) -> &Arc<StateFactory> {
        &self.context.factory
    }

    pub fn etag(&self) -> Option<&str> {
        self.response.etag()
    }

    pub fn last_modified(&self) -> Option<DateTime<Utc>> {
        self.response.last_modified()
    }

    /// Look up a link by rel.
    pub fn link(&self, rel: &str) -> Option<&Link> {
        self.links.get(rel)
    }

    /// A link that must be present.
    pub fn require_link(&self, rel: &str) -> Result<&Link> {
        self.link(rel).ok_or_else(|| GedcomxError::MissingLink {
            rel: rel.to_string(),
            uri: self.self_uri().to_string(),
        })
    }

    /// The `self` link's href, else the URL of the request that built this
    /// state.
    pub fn self_uri(&self) -> Url {
        self.link(rel::SELF)
            .and_then(|l| l.url().ok())
            .unwrap_or_else(|| self.request.url().clone())
    }

    /// The href of `rel` if present, else [`self_uri`](Self::self_uri).
    pub fn target_uri(&self, rel: &str) -> Url {
        self.link(rel)
            .and_then(|l| l.url().ok())
            .unwrap_or_else(|| self.self_uri())
    }

    // ─── Error predicates ────────────────────────────────────────────

    pub fn has_client_error(&self) -> bool {
        self.status().is_client_error()
    }

    pub fn has_server_error(&self) -> bool {
        self.status().is_server_error()
    }

    pub fn has_error(&self) -> bool {
        self.has_client_error() || self.has_server_error()
    }

    /// This state if it has no error, else [`GedcomxError::Status`] carrying
    /// the response.
    pub fn if_successful(self) -> Result<Self> {
        if self.has_error() {
            return Err(GedcomxError::Status {
                method: self.request.method().clone(),
                uri: self.request.url().to_string(),
                status: self.status(),
                response: Box::new(self.response),
            });
        }
        Ok(self)
    }

    // ─── Request construction ────────────────────────────────────────

    /// A bare request.
    pub fn create_request(&self, method: Method, url: Url) -> Request {
        Request::new(method, url)
    }

    /// A request carrying the bearer token, if any.
    pub fn create_authenticated_request(&self, method: Method, url: Url) -> Result<Request> {
        let mut request = self.create_request(method, url);
        if let Some(token) = &self.access_token {
            request.set_bearer_token(token.secret())?;
        }
        Ok(request)
    }

    /// An authenticated request with GEDCOM X `Accept` and `Content-Type`.
    pub fn create_authenticated_gedcomx_request(&self, method: Method, url: Url) -> Result<Request> {
        self.create_authenticated_media_request(method, url, media::GEDCOMX_JSON)
    }

    /// An authenticated request with Atom `Accept` and `Content-Type`.
    pub fn create_authenticated_feed_request(&self, method: Method, url: Url) -> Result<Request> {
        self.create_authenticated_media_request(method, url, media::ATOM_JSON)
    }

    /// An authenticated request using the media type of kind `T`.
    pub fn create_authenticated_request_for<T: StateKind>(&self, method: Method, url: Url) -> Result<Request> {
        self.create_authenticated_media_request(method, url, T::MEDIA_TYPE)
    }

    fn create_authenticated_media_request(&self, method: Method, url: Url, media_type: &str) -> Result<Request> {
        let mut request = self.create_authenticated_request(method, url)?;
        request.set_accept(media_type)?;
        request.set_content_type(media_type)?;
        Ok(request)
    }

    /// An authenticated request that reuses this state's `Accept` and
    /// `Content-Type`.
    fn create_repeat_request(&self, method: Method, url: Url) -> Result<Request> {
        let mut request = self.create_authenticated_request(method, url)?;
        for name in [header::ACCEPT, header::CONTENT_TYPE] {
            if let Some(value) = self.request.header(name.as_str()) {
                request.set_header(name.as_str(), value)?;
            }
        }
        Ok(request)
    }

    // ─── Sending ─────────────────────────────────────────────────────

    /// Apply `options` in order, send, and return the completed exchange.
    pub fn invoke(&self, mut request: Request, options: &[&dyn StateTransitionOption]) -> Result<Exchange> {
        for option in options {
            option.apply(&mut request)?;
        }
        let response = self
            .context
            .transport
            .send(&request)
            .map_err(|source| GedcomxError::Transport {
                method: request.method().clone(),
                url: request.url().to_string(),
                source,
            })?;
        tracing::debug!(
            state = K::NAME.as_str(),
            method = %request.method(),
            url = %request.url(),
            status = response.status().as_u16(),
            "hypermedia request"
        );
        Ok(Exchange {
            context: self.context.clone(),
            request,
            response,
            access_token: self.access_token.clone(),
        })
    }

    /// Send `request` and build a state of kind `T` through the factory.
    pub fn transition<T: StateKind>(
        &self,
        request: Request,
        options: &[&dyn StateTransitionOption],
    ) -> Result<ApplicationState<T>> {
        let exchange = self.invoke(request, options)?;
        self.context.factory.create::<T>(exchange)
    }

    /// Send `request` and rebuild this kind.
    pub fn transition_same(&self, request: Request, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        let exchange = self.invoke(request, options)?;
        self.reconstruct(exchange)
    }

    /// GET `url` as kind `T`.
    pub fn read_uri<T: StateKind>(&self, url: Url, options: &[&dyn StateTransitionOption]) -> Result<ApplicationState<T>> {
        let request = self.create_authenticated_request_for::<T>(Method::GET, url)?;
        self.transition::<T>(request, options)
    }

    /// GET the target of `link` as kind `T`.
    pub fn follow_link<T: StateKind>(
        &self,
        link: &Link,
        options: &[&dyn StateTransitionOption],
    ) -> Result<ApplicationState<T>> {
        self.read_uri::<T>(link.url()?, options)
    }

    /// GET the target of `rel` as kind `T`; `None` without a request when
    /// the link is absent.
    pub fn follow<T: StateKind>(
        &self,
        rel: &str,
        options: &[&dyn StateTransitionOption],
    ) -> Result<Option<ApplicationState<T>>> {
        match self.link(rel) {
            Some(link) => self.follow_link::<T>(link, options).map(Some),
            None => Ok(None),
        }
    }

    /// POST `body` to the required link `rel` and build kind `T`.
    pub fn post_to<T: StateKind>(
        &self,
        rel: &str,
        body: &impl serde::Serialize,
        options: &[&dyn StateTransitionOption],
    ) -> Result<ApplicationState<T>> {
        let url = self.require_link(rel)?.url()?;
        self.post_to_uri::<T>(url, body, options)
    }

    /// POST `body` to `url` and build kind `T`.
    pub fn post_to_uri<T: StateKind>(
        &self,
        url: Url,
        body: &impl serde::Serialize,
        options: &[&dyn StateTransitionOption],
    ) -> Result<ApplicationState<T>> {
        let mut request = self.create_authenticated_request_for::<T>(Method::POST, url)?;
        request.set_json_body(body)?;
        self.transition::<T>(request, options)
    }

    /// POST `body` to `url` and rebuild this kind.
    pub fn post_same(&self, url: Url, body: &impl serde::Serialize, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        let mut request = self.create_authenticated_request_for::<K>(Method::POST, url)?;
        request.set_json_body(body)?;
        self.transition_same(request, options)
    }

    /// DELETE the object owning `links`, addressed by its `rel` link or its
    /// `self` link, and rebuild this kind.
    pub fn delete_linked(
        &self,
        links: &dyn HasLinks,
        rel: &str,
        options: &[&dyn StateTransitionOption],
    ) -> Result<Self> {
        let link = links
            .link(rel)
            .or_else(|| links.link(gx_core::rel::SELF))
            .ok_or_else(|| GedcomxError::MissingLink {
                rel: rel.to_string(),
                uri: self.self_uri().to_string(),
            })?;
        let request = self.create_authenticated_request_for::<K>(Method::DELETE, link.url()?)?;
        self.transition_same(request, options)
    }

    // ─── Generic verbs ───────────────────────────────────────────────

    fn repeat(&self, method: Method, body: Option<&K::Entity>, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        let mut request = self.create_repeat_request(method, self.self_uri())?;
        if let Some(entity) = body {
            request.set_json_body(entity)?;
        }
        self.transition_same(request, options)
    }

    pub fn get(&self, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.repeat(Method::GET, None, options)
    }

    pub fn head(&self, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.repeat(Method::HEAD, None, options)
    }

    pub fn options(&self, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.repeat(Method::OPTIONS, None, options)
    }

    pub fn delete(&self, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.repeat(Method::DELETE, None, options)
    }

    /// PUT `entity` to this resource.
    pub fn put(&self, entity: &K::Entity, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.repeat(Method::PUT, Some(entity), options)
    }

    // ─── Pagination ──────────────────────────────────────────────────

    fn read_page(&self, rel: &str, options: &[&dyn StateTransitionOption]) -> Result<Option<Self>> {
        let Some(link) = self.link(rel) else {
            return Ok(None);
        };
        let request = self.create_repeat_request(Method::GET, link.url()?)?;
        self.transition_same(request, options).map(Some)
    }

    pub fn read_next_page(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<Self>> {
        self.read_page(rel::NEXT, options)
    }

    pub fn read_previous_page(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<Self>> {
        self.read_page(rel::PREV, options)
    }

    pub fn read_first_page(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<Self>> {
        self.read_page(rel::FIRST, options)
    }

    pub fn read_last_page(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<Self>> {
        self.read_page(rel::LAST, options)
    }
}

// ─── Embedded resources ──────────────────────────────────────────────

impl<K: StateKind<Entity = Gedcomx>> ApplicationState<K> {
    /// Follow each of `rels` that is present and merge the returned GEDCOM X
    /// documents into a copy of this state's entity.
    ///
    /// Non-200 answers are skipped, except 5xx which fails. The returned
    /// state shares this state's request and response; its link table is
    /// rebuilt from the merged entity.
    pub fn load_embedded_resources(&self, rels: &[&str], options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.load_embedded_resources_as(rels, media::GEDCOMX_JSON, options)
    }

    /// [`load_embedded_resources`](Self::load_embedded_resources), asking
    /// for `media_type`. Extension payloads are only served under their own
    /// media type.
    pub fn load_embedded_resources_as(
        &self,
        rels: &[&str],
        media_type: &str,
        options: &[&dyn StateTransitionOption],
    ) -> Result<Self> {
        let mut entity = self.entity.clone().unwrap_or_default();
        for rel in rels {
            let Some(link) = self.link(rel) else {
                continue;
            };
            let request = self.create_authenticated_media_request(Method::GET, link.url()?, media_type)?;
            let exchange = self.invoke(request, options)?;
            let status = exchange.response.status();
            if status == StatusCode::OK && !exchange.response.body().is_empty() {
                let embedded: Gedcomx = exchange.response.json()?;
                entity.embed(&embedded);
            } else if status.is_server_error() {
                return Err(GedcomxError::Status {
                    method: exchange.request.method().clone(),
                    uri: exchange.request.url().to_string(),
                    status,
                    response: Box::new(exchange.response),
                });
            }
        }
        let links = build_links::<K>(&self.response, Some(&entity));
        let mut state = self.clone();
        state.entity = Some(entity);
        state.links = links;
        Ok(state)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::kind;
    use gx_core::{MockResponse, MockTransport};
    use serde_json::json;

    pub(crate) const ROOT: &str = "https://api.example/platform/collections/tree";

    pub(crate) fn context(mock: &MockTransport) -> StateContext {
        let factory = StateFactory::gedcomx(Url::parse(ROOT).unwrap());
        StateContext::new(Arc::new(mock.clone()), Arc::new(factory))
    }

    pub(crate) fn read<K: StateKind>(mock: &MockTransport, url: &str) -> ApplicationState<K> {
        let request = Request::new(Method::GET, Url::parse(url).unwrap())
            .with_header("Accept", K::MEDIA_TYPE)
            .unwrap();
        let response = mock.send(&request).unwrap();
        ApplicationState::new(Exchange {
            context: context(mock),
            request,
            response,
            access_token: None,
        })
        .unwrap()
    }

    fn person_state(mock: &MockTransport) -> ApplicationState<kind::Person> {
        mock.on(
            Method::GET,
            "https://api.example/persons/P1",
            MockResponse::ok()
                .header("ETag", "\"v1\"")
                .json(json!({ "persons": [{ "id": "P1" }] })),
        );
        read::<kind::Person>(mock, "https://api.example/persons/P1")
    }

    fn state_with_status(status: u16) -> ApplicationState<kind::Person> {
        let mock = MockTransport::new();
        mock.on(Method::GET, "https://api.example/x", MockResponse::new(status));
        read::<kind::Person>(&mock, "https://api.example/x")
    }

    #[test]
    fn verbs_return_new_state_and_leave_original_untouched() {
        let mock = MockTransport::new();
        let state = person_state(&mock);
        let before = (state.request().clone(), state.response().clone(), state.entity().cloned(), state.links().clone());

        for method in [Method::HEAD, Method::DELETE, Method::OPTIONS] {
            mock.on(method.clone(), "https://api.example/persons/P1", MockResponse::new(204));
        }
        let got = state.get(&[]).unwrap();
        let headed = state.head(&[]).unwrap();
        let deleted = state.delete(&[]).unwrap();
        let optioned = state.options(&[]).unwrap();

        for new_state in [&got, &headed, &deleted, &optioned] {
            assert_eq!(new_state.name(), crate::kind::StateName::Person);
        }
        assert_eq!(got.status(), StatusCode::OK);
        assert!(got.entity().is_some());
        assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
        assert_eq!(headed.request().method(), Method::HEAD);
        assert_eq!(optioned.request().method(), Method::OPTIONS);
        let after = (state.request().clone(), state.response().clone(), state.entity().cloned(), state.links().clone());
        assert_eq!(before, after);
    }

    #[test]
    fn verbs_reuse_accept_header() {
        let mock = MockTransport::new();
        let state = person_state(&mock);
        state.get(&[]).unwrap();
        let sent = mock.last_request().unwrap();
        assert_eq!(sent.header("accept"), Some(media::GEDCOMX_JSON));
    }

    #[test]
    fn put_serializes_entity() {
        let mock = MockTransport::new();
        let state = person_state(&mock);
        mock.on(Method::PUT, "https://api.example/persons/P1", MockResponse::new(204));
        let entity = state.entity().cloned().unwrap();
        state.put(&entity, &[]).unwrap();
        let sent = mock.last_request().unwrap();
        let body: Gedcomx = serde_json::from_slice(sent.body().unwrap()).unwrap();
        assert_eq!(body, entity);
    }

    #[test]
    fn head_never_parses_entity() {
        let mock = MockTransport::new();
        mock.on(Method::HEAD, "https://api.example/x", MockResponse::ok().body("not json"));
        let request = Request::new(Method::HEAD, Url::parse("https://api.example/x").unwrap());
        let response = mock.send(&request).unwrap();
        let state = ApplicationState::<kind::Person>::new(Exchange {
            context: context(&mock),
            request,
            response,
            access_token: None,
        })
        .unwrap();
        assert!(state.entity().is_none());
    }

    #[test]
    fn malformed_entity_fails_construction() {
        let mock = MockTransport::new();
        mock.on(Method::GET, "https://api.example/x", MockResponse::ok().body("{not json"));
        let request = Request::new(Method::GET, Url::parse("https://api.example/x").unwrap());
        let response = mock.send(&request).unwrap();
        let err = ApplicationState::<kind::Person>::new(Exchange {
            context: context(&mock),
            request,
            response,
            access_token: None,
        })
        .unwrap_err();
        assert!(matches!(err, GedcomxError::EntityParse { kind: crate::kind::StateName::Person, .. }));
    }

    #[test]
    fn non_200_body_is_not_parsed_by_default() {
        let mock = MockTransport::new();
        mock.on(Method::GET, "https://api.example/x", MockResponse::new(410).body("{not json"));
        let state = read::<kind::Person>(&mock, "https://api.example/x");
        assert!(state.entity().is_none());
    }

    #[test]
    fn link_merge_priority() {
        let mock = MockTransport::new();
        mock.on(
            Method::POST,
            "https://api.example/persons",
            MockResponse::ok()
                .header("Location", "https://api.example/persons/P9")
                .header("Link", "<https://api.example/header-a>; rel=\"a\", <https://api.example/header-b>; rel=\"b\"")
                .json(json!({
                    "links": {
                        "a": { "href": "https://api.example/entity-a" },
                        "c": { "href": "https://api.example/entity-c" }
                    },
                    "persons": [{
                        "id": "P9",
                        "links": { "a": { "href": "https://api.example/scope-a" } }
                    }]
                })),
        );
        let request = Request::new(Method::POST, Url::parse("https://api.example/persons").unwrap());
        let response = mock.send(&request).unwrap();
        let state = ApplicationState::<kind::Person>::new(Exchange {
            context: context(&mock),
            request,
            response,
            access_token: None,
        })
        .unwrap();

        let href = |rel: &str| state.link(rel).and_then(Link::href).map(str::to_string);
        assert_eq!(href("self").as_deref(), Some("https://api.example/persons/P9"));
        assert_eq!(href("a").as_deref(), Some("https://api.example/scope-a"));
        assert_eq!(href("b").as_deref(), Some("https://api.example/header-b"));
        assert_eq!(href("c").as_deref(), Some("https://api.example/entity-c"));
        assert_eq!(state.self_uri().as_str(), "https://api.example/persons/P9");
    }

    #[test]
    fn self_uri_falls_back_to_request_url() {
        let state = state_with_status(204);
        assert_eq!(state.self_uri().as_str(), "https://api.example/x");
    }

    #[test]
    fn error_predicate_boundaries() {
        let s399 = state_with_status(399);
        assert!(!s399.has_client_error());
        assert!(!s399.has_error());

        let s400 = state_with_status(400);
        assert!(s400.has_client_error());
        assert!(!s400.has_server_error());

        let s500 = state_with_status(500);
        assert!(s500.has_server_error());
        assert!(s500.has_error());

        assert!(state_with_status(200).if_successful().is_ok());
        let err = state_with_status(404).if_successful().unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    proptest::proptest! {
        #[test]
        fn error_predicates_follow_status_class(status in 200u16..600) {
            let state = state_with_status(status);
            proptest::prop_assert_eq!(state.has_client_error(), (400..500).contains(&status));
            proptest::prop_assert_eq!(state.has_server_error(), status >= 500);
            proptest::prop_assert_eq!(state.if_successful().is_ok(), status < 400);
        }
    }

    #[test]
    fn missing_page_link_issues_no_request() {
        let mock = MockTransport::new();
        let state = person_state(&mock);
        let sent = mock.request_count();
        assert!(state.read_next_page(&[]).unwrap().is_none());
        assert!(state.read_previous_page(&[]).unwrap().is_none());
        assert!(state.read_first_page(&[]).unwrap().is_none());
        assert!(state.read_last_page(&[]).unwrap().is_none());
        assert_eq!(mock.request_count(), sent);
    }

    #[test]
    fn pagination_keeps_kind() {
        let mock = MockTransport::new();
        mock.on(
            Method::GET,
            "https://api.example/search",
            MockResponse::ok()
                .header("Link", "<https://api.example/search?start=10>; rel=\"next\"")
                .json(json!({ "results": 20, "entries": [{ "id": "A" }] })),
        );
        let page1 = read::<kind::PersonSearchResults>(&mock, "https://api.example/search");
        let page2: ApplicationState<kind::PersonSearchResults> = page1.read_next_page(&[]).unwrap().unwrap();
        assert_eq!(page2.name(), crate::kind::StateName::PersonSearchResults);
        let sent = mock.last_request().unwrap();
        assert_eq!(sent.url().as_str(), "https://api.example/search?start=10");
        assert_eq!(sent.header("accept"), Some(media::ATOM_JSON));
    }

    #[test]
    fn follow_absent_rel_is_none_without_request() {
        let mock = MockTransport::new();
        let state = person_state(&mock);
        let sent = mock.request_count();
        assert!(state.follow::<kind::Agent>("agent", &[]).unwrap().is_none());
        assert_eq!(mock.request_count(), sent);
    }

    #[test]
    fn require_link_reports_resource() {
        let mock = MockTransport::new();
        let state = person_state(&mock);
        let err = state.require_link("relationships").unwrap_err();
        assert!(matches!(
            err,
            GedcomxError::MissingLink { ref rel, ref uri } if rel == "relationships" && uri == "https://api.example/persons/P1"
        ));
    }

    #[test]
    fn transport_failure_propagates() {
        let mock = MockTransport::new();
        let state = person_state(&mock);
        let err = state.follow_link::<kind::Agent>(&Link::new("agent", "https://api.example/nowhere"), &[]).unwrap_err();
        assert!(matches!(err, GedcomxError::Transport { .. }));
    }

    #[test]
    fn etag_and_token_redaction() {
        let mock = MockTransport::new();
        let state = person_state(&mock).with_access_token(Some(AccessToken::new("s3cret")));
        assert_eq!(state.etag(), Some("\"v1\""));
        assert!(!format!("{state:?}").contains("s3cret"));
    }

    #[test]
    fn authenticated_requests_carry_bearer_token() {
        let mock = MockTransport::new();
        let state = person_state(&mock).with_access_token(Some(AccessToken::new("T")));
        state.get(&[]).unwrap();
        assert_eq!(mock.last_request().unwrap().header("authorization"), Some("Bearer T"));
    }

    #[test]
    fn load_embedded_resources_merges_documents() {
        let mock = MockTransport::new();
        mock.on(
            Method::GET,
            "https://api.example/persons/P1",
            MockResponse::ok().json(json!({
                "persons": [{
                    "id": "P1",
                    "links": {
                        "conclusions": { "href": "https://api.example/persons/P1/conclusions" },
                        "notes": { "href": "https://api.example/persons/P1/notes" }
                    }
                }]
            })),
        );
        mock.on(
            Method::GET,
            "https://api.example/persons/P1/conclusions",
            MockResponse::ok().json(json!({ "persons": [{ "id": "P1", "facts": [{ "id": "F1" }] }] })),
        );
        mock.on(Method::GET, "https://api.example/persons/P1/notes", MockResponse::new(204));
        let state = read::<kind::Person>(&mock, "https://api.example/persons/P1");

        let loaded = state.load_embedded_resources(&["conclusions", "notes", "absent"], &[]).unwrap();
        assert_eq!(loaded.entity().unwrap().persons[0].facts.len(), 1);
        assert!(state.entity().unwrap().persons[0].facts.is_empty());
    }

    #[test]
    fn load_embedded_resources_fails_on_server_error() {
        let mock = MockTransport::new();
        mock.on(
            Method::GET,
            "https://api.example/persons/P1",
            MockResponse::ok().json(json!({
                "persons": [{ "id": "P1", "links": { "conclusions": { "href": "https://api.example/c" } } }]
            })),
        );
        mock.on(Method::GET, "https://api.example/c", MockResponse::new(503));
        let state = read::<kind::Person>(&mock, "https://api.example/persons/P1");
        let err = state.load_embedded_resources(&["conclusions"], &[]).unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
    }
}
