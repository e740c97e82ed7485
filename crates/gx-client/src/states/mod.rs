//! # GEDCOM X Resource States
//!
//! Kind-specific operations over [`ApplicationState`]. Each method is built
//! only from the engine's primitives: a link lookup, an authenticated
//! request, `transition`/`follow` through the factory, and option
//! forwarding. Navigation methods return `Ok(None)` without sending anything
//! when their link is absent; mutations that need a link the server did not
//! send fail with [`GedcomxError::MissingLink`](crate::GedcomxError::MissingLink).

mod agent;
mod collection;
mod pedigree;
mod person;
mod place;
mod relationship;
mod relatives;
mod search;
mod source;

pub use pedigree::{AncestryNode, AncestryTree, DescendancyNode, DescendancyTree};
pub use search::PersonSearchQuery;

use gx_core::rel;
use gx_model::{Attribution, HasLinks};

use crate::error::Result;
use crate::kind::{self, StateKind};
use crate::options::StateTransitionOption;
use crate::state::ApplicationState;

pub type CollectionState = ApplicationState<kind::Collection>;
pub type CollectionsState = ApplicationState<kind::Collections>;
pub type PersonState = ApplicationState<kind::Person>;
pub type PersonParentsState = ApplicationState<kind::PersonParents>;
pub type PersonChildrenState = ApplicationState<kind::PersonChildren>;
pub type PersonSpousesState = ApplicationState<kind::PersonSpouses>;
pub type AncestryResultsState = ApplicationState<kind::AncestryResults>;
pub type DescendancyResultsState = ApplicationState<kind::DescendancyResults>;
pub type RelationshipState = ApplicationState<kind::Relationship>;
pub type RelationshipsState = ApplicationState<kind::Relationships>;
pub type SourceDescriptionState = ApplicationState<kind::SourceDescription>;
pub type SourceDescriptionsState = ApplicationState<kind::SourceDescriptions>;
pub type AgentState = ApplicationState<kind::Agent>;
pub type PersonSearchResultsState = ApplicationState<kind::PersonSearchResults>;
pub type PlaceSearchResultsState = ApplicationState<kind::PlaceSearchResults>;
pub type PlaceDescriptionState = ApplicationState<kind::PlaceDescription>;
pub type PlaceDescriptionsState = ApplicationState<kind::PlaceDescriptions>;

impl<K: StateKind> ApplicationState<K> {
    /// Read the agent that contributed an attributed object.
    pub fn read_contributor(
        &self,
        attribution: &Attribution,
        options: &[&dyn StateTransitionOption],
    ) -> Result<Option<AgentState>> {
        let Some(uri) = attribution.contributor.as_ref().and_then(|c| c.resource()) else {
            return Ok(None);
        };
        self.read_uri::<kind::Agent>(self.resolve(uri)?, options).map(Some)
    }

    /// Read a person through the person's own `person` or `self` link.
    pub fn read_person_at(
        &self,
        person: &gx_model::Person,
        options: &[&dyn StateTransitionOption],
    ) -> Result<Option<PersonState>> {
        match person.link(rel::PERSON).or_else(|| person.link(rel::SELF)) {
            Some(link) => self.follow_link::<kind::Person>(link, options).map(Some),
            None => Ok(None),
        }
    }

    /// Resolve a possibly relative resource reference against this state.
    pub fn resolve(&self, uri: &str) -> Result<gx_core::Url> {
        self.self_uri().join(uri).map_err(|source| {
            gx_core::HttpError::InvalidUrl {
                url: uri.to_string(),
                source,
            }
            .into()
        })
    }
}
