//! # gx-familysearch — FamilySearch Family Tree Extensions
//!
//! Extends the `gx-client` engine with the FamilySearch API surface:
//!
//! - [`factory`]: the Family Tree state factory. It overrides the `Person`
//!   and `Relationship` builders so deleted (410) and conflicting (412)
//!   resources keep their representation, and registers every
//!   FamilySearch-only kind. The platform factory registers the kinds
//!   without the override.
//! - [`kind`]: child-and-parents relationships, change history,
//!   discussions, users, person matches, merges and non-matches.
//! - [`states`]: the operations of those kinds, plus FamilySearch
//!   operations on GEDCOM X collections and persons, as extension traits.
//! - [`rel`]: the link relations FamilySearch adds.
//!
//! ## Usage
//!
//! ```ignore
//! use gx_familysearch::prelude::*;
//!
//! let config = ClientConfig::from_env()?;
//! let transport = Arc::new(ReqwestTransport::new(&config)?);
//! let tree = family_tree_client(config, transport)
//!     .read_collection()?
//!     .authenticate_via_oauth2_password("user", "pass", "client-id", None)?;
//! let person = tree.read_person_with_relationships("KWQS-BBQ", &[])?;
//! if person.is_deleted() {
//!     person.restore(&[])?;
//! }
//! ```

pub mod factory;
pub mod kind;
pub mod rel;
pub mod states;

pub use factory::{
    family_search_factory, family_search_factory_at, family_tree_client, family_tree_factory, family_tree_factory_at,
    register_family_search, register_family_tree,
};
pub use kind::tree_entity_expected;
pub use states::*;

/// Every extension trait plus the `gx-client` types they are used with.
pub mod prelude {
    pub use crate::factory::{family_tree_client, family_tree_factory};
    pub use crate::states::{
        ChangeHistoryState, ChangeHistoryStateExt, ChildAndParentsRelationshipState,
        ChildAndParentsRelationshipStateExt, DiscussionState, DiscussionStateExt, DiscussionsState,
        DiscussionsStateExt, FamilySearchCollectionExt, FamilyTreePersonExt, PersonMatchResultsState,
        PersonMatchResultsStateExt, PersonMergeState, PersonMergeStateExt, PersonNonMatchesState,
        PersonNonMatchesStateExt, UserState, UserStateExt,
    };
    pub use gx_client::{
        ClientConfig, CollectionState, Environment, GedcomxClient, GedcomxError, PersonState, ReqwestTransport,
        StateTransitionOption,
    };
}
