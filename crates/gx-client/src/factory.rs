//! # State Factory
//!
//! An explicit registry from [`StateName`] to builder. Every transition that
//! is not same-kind reconstruction goes through [`StateFactory::create`], so
//! overriding one entry changes construction for every caller of that name
//! and nothing else.
//!
//! [`StateFactory::gedcomx`] registers every GEDCOM X kind. API surfaces that
//! need different construction (FamilySearch's Family Tree parses 410 and 412
//! bodies) start from it and override or add entries before the factory is
//! shared behind an `Arc`. Asking for an unregistered name is a programming
//! error and fails loudly.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use gx_core::{media, Method, Request, Transport, Url};

use crate::any::AnyState;
use crate::error::{GedcomxError, Result};
use crate::kind::{self, StateKind, StateName};
use crate::state::{ApplicationState, EntityPolicy, Exchange, StateContext};
use crate::states::CollectionState;

/// Builds a state from a completed exchange.
pub type StateBuilder = Arc<dyn Fn(Exchange) -> Result<AnyState> + Send + Sync>;

/// Name-indexed state constructor registry.
#[derive(Clone)]
pub struct StateFactory {
    collection_uri: Url,
    builders: HashMap<StateName, StateBuilder>,
}

impl StateFactory {
    /// An empty registry rooted at `collection_uri`.
    pub fn new(collection_uri: Url) -> Self {
        Self {
            collection_uri,
            builders: HashMap::new(),
        }
    }

    /// A registry with every GEDCOM X kind.
    pub fn gedcomx(collection_uri: Url) -> Self {
        let mut factory = Self::new(collection_uri);
        factory
            .register::<kind::Collection>()
            .register::<kind::Collections>()
            .register::<kind::Person>()
            .register::<kind::PersonParents>()
            .register::<kind::PersonChildren>()
            .register::<kind::PersonSpouses>()
            .register::<kind::AncestryResults>()
            .register::<kind::DescendancyResults>()
            .register::<kind::Relationship>()
            .register::<kind::Relationships>()
            .register::<kind::SourceDescription>()
            .register::<kind::SourceDescriptions>()
            .register::<kind::Agent>()
            .register::<kind::PersonSearchResults>()
            .register::<kind::PlaceSearchResults>()
            .register::<kind::PlaceDescription>()
            .register::<kind::PlaceDescriptions>();
        factory
    }

    /// The root collection the entry point reads.
    pub fn collection_uri(&self) -> &Url {
        &self.collection_uri
    }

    /// Register kind `K` with its default entity-status policy.
    pub fn register<K: StateKind>(&mut self) -> &mut Self {
        self.register_with_policy::<K>(K::entity_expected)
    }

    /// Register kind `K` with an explicit entity-status policy.
    pub fn register_with_policy<K: StateKind>(&mut self, policy: EntityPolicy) -> &mut Self {
        let builder: StateBuilder =
            Arc::new(move |exchange| ApplicationState::<K>::with_policy(exchange, policy).map(AnyState::new));
        self.builders.insert(K::NAME, builder);
        self
    }

    /// Replace the builder for `name`, returning the previous one.
    pub fn override_builder(&mut self, name: StateName, builder: StateBuilder) -> Option<StateBuilder> {
        self.builders.insert(name, builder)
    }

    pub fn is_registered(&self, name: StateName) -> bool {
        self.builders.contains_key(&name)
    }

    /// Registered names, sorted.
    pub fn registered(&self) -> Vec<StateName> {
        let mut names: Vec<_> = self.builders.keys().copied().collect();
        names.sort();
        names
    }

    /// Build the state registered under `name`.
    pub fn create_state(&self, name: StateName, exchange: Exchange) -> Result<AnyState> {
        let builder = self.builders.get(&name).ok_or(GedcomxError::UnregisteredState(name))?;
        builder(exchange)
    }

    /// Build the state registered under `K::NAME` as kind `K`.
    pub fn create<K: StateKind>(&self, exchange: Exchange) -> Result<ApplicationState<K>> {
        self.create_state(K::NAME, exchange)?
            .downcast::<K>()
            .map_err(|other| GedcomxError::StateMismatch {
                name: K::NAME,
                expected: std::any::type_name::<ApplicationState<K>>(),
                actual: other.type_name(),
            })
    }

    /// The entry point: `GET` (or `POST`) the root collection.
    pub fn new_collection_state(self: &Arc<Self>, transport: Arc<dyn Transport>, method: Method) -> Result<CollectionState> {
        let mut request = Request::new(method, self.collection_uri.clone());
        request.set_accept(media::GEDCOMX_JSON)?;
        let context = StateContext::new(transport, Arc::clone(self));
        let response = context
            .transport()
            .send(&request)
            .map_err(|source| GedcomxError::Transport {
                method: request.method().clone(),
                url: request.url().to_string(),
                source,
            })?;
        tracing::debug!(
            method = %request.method(),
            url = %request.url(),
            status = response.status().as_u16(),
            "read root collection"
        );
        self.create::<kind::Collection>(Exchange {
            context,
            request,
            response,
            access_token: None,
        })
    }
}

impl fmt::Debug for StateFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateFactory")
            .field("collection_uri", &self.collection_uri.as_str())
            .field("registered", &self.registered())
            .finish()
    }
}
