//! # FamilySearch State Extensions
//!
//! FamilySearch operations on both the GEDCOM X kinds (collection, person)
//! and the FamilySearch-only kinds. They are extension traits because the
//! state type lives in `gx-client`; bring them into scope with
//! `use gx_familysearch::prelude::*`.
//!
//! The same conventions hold as for the GEDCOM X kinds: navigation returns
//! `Ok(None)` without a request when the link is absent, and mutations that
//! need an absent link fail with `GedcomxError::MissingLink`.

mod collection;
mod discussion;
mod history;
mod merge;
mod person;
mod relationship;
mod user;

pub use collection::FamilySearchCollectionExt;
pub use discussion::{DiscussionStateExt, DiscussionsStateExt};
pub use history::ChangeHistoryStateExt;
pub use merge::{PersonMatchResultsStateExt, PersonMergeStateExt, PersonNonMatchesStateExt};
pub use person::FamilyTreePersonExt;
pub use relationship::ChildAndParentsRelationshipStateExt;
pub use user::UserStateExt;

use gx_client::{ApplicationState, GedcomxError, PersonState, Result, StateKind, StateTransitionOption};
use gx_core::{media, Method, Request, Url};
use gx_model::ResourceReference;

use crate::kind;

pub type ChildAndParentsRelationshipState = ApplicationState<kind::ChildAndParentsRelationship>;
pub type ChangeHistoryState = ApplicationState<kind::ChangeHistory>;
pub type DiscussionState = ApplicationState<kind::Discussion>;
pub type DiscussionsState = ApplicationState<kind::Discussions>;
pub type UserState = ApplicationState<kind::User>;
pub type PersonMatchResultsState = ApplicationState<kind::PersonMatchResults>;
pub type PersonMergeState = ApplicationState<kind::PersonMerge>;
pub type PersonNonMatchesState = ApplicationState<kind::PersonNonMatches>;

/// An authenticated request speaking the FamilySearch media type.
pub(crate) fn fs_request<K: StateKind>(state: &ApplicationState<K>, method: Method, url: Url) -> Result<Request> {
    let mut request = state.create_authenticated_request(method, url)?;
    request.set_accept(media::FAMILYSEARCH_JSON)?;
    request.set_content_type(media::FAMILYSEARCH_JSON)?;
    Ok(request)
}

/// The href of the required link `rel`, expanding `vars` when it is
/// templated.
pub(crate) fn link_target<K: StateKind>(state: &ApplicationState<K>, rel: &str, vars: &[(&str, &str)]) -> Result<Url> {
    let link = state.require_link(rel)?;
    let url = if link.template().is_some() {
        link.expand(vars)?
    } else {
        link.url()?
    };
    Ok(url)
}

/// A `MissingLink` error for `rel` on `state`.
pub(crate) fn missing<K: StateKind>(state: &ApplicationState<K>, rel: &str) -> GedcomxError {
    GedcomxError::MissingLink {
        rel: rel.to_string(),
        uri: state.self_uri().to_string(),
    }
}

/// A reference to `person` by URI and, when known, by id.
pub(crate) fn person_reference(person: &PersonState) -> ResourceReference {
    match person.person_id() {
        Some(id) => ResourceReference::with_id(person.self_uri().as_str(), id),
        None => ResourceReference::new(person.self_uri().as_str()),
    }
}

/// Read a person through the state's `rel` link, else through `reference`.
pub(crate) fn read_person_via<K: StateKind>(
    state: &ApplicationState<K>,
    rel: &str,
    reference: Option<&ResourceReference>,
    options: &[&dyn StateTransitionOption],
) -> Result<Option<PersonState>> {
    if let Some(link) = state.link(rel) {
        return state.follow_link::<gx_client::kind::Person>(link, options).map(Some);
    }
    match reference.and_then(ResourceReference::resource) {
        Some(uri) => state
            .read_uri::<gx_client::kind::Person>(state.resolve(uri)?, options)
            .map(Some),
        None => Ok(None),
    }
}
