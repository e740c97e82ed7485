//! # State Kinds
//!
//! A state kind is a zero-sized marker that tells [`ApplicationState`] how
//! to treat one kind of resource. It supplies the three per-resource
//! behaviours the engine needs:
//!
//! - how to parse the entity ([`StateKind::load_entity`]) and which media
//!   type to ask for ([`StateKind::MEDIA_TYPE`]);
//! - which object inside the entity is the scope whose links are merged
//!   last ([`StateKind::scope`]);
//! - which statuses carry a representation ([`StateKind::entity_expected`]).
//!
//! Same-kind reconstruction falls out of the type parameter: a verb on
//! `ApplicationState<K>` returns `ApplicationState<K>`.
//!
//! [`StateName`] is the closed set of logical names the factory dispatches
//! on. It covers the GEDCOM X kinds defined here and the FamilySearch kinds
//! defined by `gx-familysearch`.
//!
//! [`ApplicationState`]: crate::ApplicationState

use std::fmt;

use gx_core::{media, Response, StatusCode};
use gx_model::{Feed, Gedcomx, HasLinks};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Logical name of a state, the key of the factory registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StateName {
    Collection,
    Collections,
    Person,
    PersonParents,
    PersonChildren,
    PersonSpouses,
    AncestryResults,
    DescendancyResults,
    Relationship,
    Relationships,
    SourceDescription,
    SourceDescriptions,
    Agent,
    PersonSearchResults,
    PlaceSearchResults,
    PlaceDescription,
    PlaceDescriptions,
    // FamilySearch
    ChildAndParentsRelationship,
    ChangeHistory,
    Discussion,
    Discussions,
    User,
    PersonMatchResults,
    PersonMerge,
    PersonNonMatches,
}

impl StateName {
    /// Every name, in declaration order.
    pub const ALL: [StateName; 25] = [
        Self::Collection,
        Self::Collections,
        Self::Person,
        Self::PersonParents,
        Self::PersonChildren,
        Self::PersonSpouses,
        Self::AncestryResults,
        Self::DescendancyResults,
        Self::Relationship,
        Self::Relationships,
        Self::SourceDescription,
        Self::SourceDescriptions,
        Self::Agent,
        Self::PersonSearchResults,
        Self::PlaceSearchResults,
        Self::PlaceDescription,
        Self::PlaceDescriptions,
        Self::ChildAndParentsRelationship,
        Self::ChangeHistory,
        Self::Discussion,
        Self::Discussions,
        Self::User,
        Self::PersonMatchResults,
        Self::PersonMerge,
        Self::PersonNonMatches,
    ];

    /// The canonical state name (e.g. `"PersonState"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Collection => "CollectionState",
            Self::Collections => "CollectionsState",
            Self::Person => "PersonState",
            Self::PersonParents => "PersonParentsState",
            Self::PersonChildren => "PersonChildrenState",
            Self::PersonSpouses => "PersonSpousesState",
            Self::AncestryResults => "AncestryResultsState",
            Self::DescendancyResults => "DescendancyResultsState",
            Self::Relationship => "RelationshipState",
            Self::Relationships => "RelationshipsState",
            Self::SourceDescription => "SourceDescriptionState",
            Self::SourceDescriptions => "SourceDescriptionsState",
            Self::Agent => "AgentState",
            Self::PersonSearchResults => "PersonSearchResultsState",
            Self::PlaceSearchResults => "PlaceSearchResultsState",
            Self::PlaceDescription => "PlaceDescriptionState",
            Self::PlaceDescriptions => "PlaceDescriptionsState",
            Self::ChildAndParentsRelationship => "ChildAndParentsRelationshipState",
            Self::ChangeHistory => "ChangeHistoryState",
            Self::Discussion => "DiscussionState",
            Self::Discussions => "DiscussionsState",
            Self::User => "UserState",
            Self::PersonMatchResults => "PersonMatchResultsState",
            Self::PersonMerge => "PersonMergeState",
            Self::PersonNonMatches => "PersonNonMatchesState",
        }
    }
}

impl fmt::Display for StateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-resource behaviour of an [`ApplicationState`](crate::ApplicationState).
pub trait StateKind: fmt::Debug + Send + Sync + 'static {
    /// Logical name the factory registers this kind under.
    const NAME: StateName;

    /// Media type requested for, and sent with, this kind's entity.
    const MEDIA_TYPE: &'static str = media::GEDCOMX_JSON;

    /// The parsed payload.
    type Entity: HasLinks + Serialize + DeserializeOwned + Clone + fmt::Debug + Send + Sync + 'static;

    /// Whether a response with `status` carries an entity worth parsing.
    fn entity_expected(status: StatusCode) -> bool {
        status == StatusCode::OK
    }

    /// Parse the response body.
    fn load_entity(response: &Response) -> Result<Self::Entity, serde_json::Error> {
        serde_json::from_slice(response.body())
    }

    /// The primary object inside the entity whose links are merged last.
    fn scope(_entity: &Self::Entity) -> Option<&dyn HasLinks> {
        None
    }
}

// ─── GEDCOM X kinds ──────────────────────────────────────────────────

macro_rules! gedcomx_kind {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl StateKind for $name {
            const NAME: StateName = StateName::$name;
            type Entity = Gedcomx;
        }
    };
    ($(#[$doc:meta])* $name:ident, scope = $field:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl StateKind for $name {
            const NAME: StateName = StateName::$name;
            type Entity = Gedcomx;

            fn scope(entity: &Gedcomx) -> Option<&dyn HasLinks> {
                entity.$field.first().map(|s| s as &dyn HasLinks)
            }
        }
    };
}

macro_rules! feed_kind {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;

        impl StateKind for $name {
            const NAME: StateName = StateName::$name;
            const MEDIA_TYPE: &'static str = media::ATOM_JSON;
            type Entity = Feed;
        }
    };
}

gedcomx_kind!(
    /// A collection; scope is its first collection.
    Collection,
    scope = collections
);
gedcomx_kind!(
    /// A list of subcollections.
    Collections
);
gedcomx_kind!(
    /// A person; scope is the first person.
    Person,
    scope = persons
);
gedcomx_kind!(
    /// A person's parents and the relationships to them.
    PersonParents
);
gedcomx_kind!(
    /// A person's children and the relationships to them.
    PersonChildren
);
gedcomx_kind!(
    /// A person's spouses and the couple relationships.
    PersonSpouses
);
gedcomx_kind!(
    /// An ancestry query result, numbered by Ahnentafel.
    AncestryResults
);
gedcomx_kind!(
    /// A descendancy query result, numbered by d'Aboville.
    DescendancyResults
);
gedcomx_kind!(
    /// A relationship; scope is the first relationship.
    Relationship,
    scope = relationships
);
gedcomx_kind!(
    /// A list of relationships.
    Relationships
);
gedcomx_kind!(
    /// A source description; scope is the first source description.
    SourceDescription,
    scope = source_descriptions
);
gedcomx_kind!(
    /// A list of source descriptions.
    SourceDescriptions
);
gedcomx_kind!(
    /// An agent; scope is the first agent.
    Agent,
    scope = agents
);
feed_kind!(
    /// Person search results.
    PersonSearchResults
);
feed_kind!(
    /// Place search results.
    PlaceSearchResults
);
gedcomx_kind!(
    /// A place description; scope is the first place.
    PlaceDescription,
    scope = places
);
gedcomx_kind!(
    /// A list of place descriptions.
    PlaceDescriptions
);
