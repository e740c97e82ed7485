use gx_client::{kind as gx_kind, CollectionState, PersonState, Result, StateTransitionOption};
use gx_core::{rel as gx_rel, Method};
use gx_model::{ChildAndParentsRelationship, Discussion, Gedcomx};

use super::{
    fs_request, link_target, missing, person_reference, ChildAndParentsRelationshipState, DiscussionState,
    DiscussionsState, UserState,
};
use crate::{kind, rel};

/// Grant type of FamilySearch's unauthenticated-session flow.
pub const GRANT_UNAUTHENTICATED_SESSION: &str = "unauthenticated_session";

/// FamilySearch operations on a collection.
pub trait FamilySearchCollectionExt: Sized {
    /// Obtain a read-only session token for a client by IP address.
    fn authenticate_via_unauthenticated_access(self, client_id: &str, ip_address: &str) -> Result<Self>;

    fn read_current_user(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<UserState>>;

    /// Create a child-and-parents relationship between existing persons.
    fn add_child_and_parents_relationship(
        &self,
        child: &PersonState,
        father: Option<&PersonState>,
        mother: Option<&PersonState>,
        options: &[&dyn StateTransitionOption],
    ) -> Result<ChildAndParentsRelationshipState>;

    /// Read a person together with all its relationships and relatives.
    fn read_person_with_relationships(
        &self,
        person_id: &str,
        options: &[&dyn StateTransitionOption],
    ) -> Result<PersonState>;

    fn read_discussions(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<DiscussionsState>>;

    fn add_discussion(
        &self,
        discussion: &Discussion,
        options: &[&dyn StateTransitionOption],
    ) -> Result<DiscussionState>;
}

impl FamilySearchCollectionExt for CollectionState {
    fn authenticate_via_unauthenticated_access(self, client_id: &str, ip_address: &str) -> Result<Self> {
        self.authenticate_via_oauth2(&[
            ("grant_type", GRANT_UNAUTHENTICATED_SESSION),
            ("client_id", client_id),
            ("ip_address", ip_address),
        ])
    }

    fn read_current_user(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<UserState>> {
        self.follow::<kind::User>(rel::CURRENT_USER, options)
    }

    fn add_child_and_parents_relationship(
        &self,
        child: &PersonState,
        father: Option<&PersonState>,
        mother: Option<&PersonState>,
        options: &[&dyn StateTransitionOption],
    ) -> Result<ChildAndParentsRelationshipState> {
        let link = self
            .link(rel::CHILD_AND_PARENTS_RELATIONSHIPS)
            .or_else(|| self.link(gx_rel::RELATIONSHIPS))
            .ok_or_else(|| missing(self, rel::CHILD_AND_PARENTS_RELATIONSHIPS))?;
        let relationship = ChildAndParentsRelationship {
            child: Some(person_reference(child)),
            father: father.map(person_reference),
            mother: mother.map(person_reference),
            ..ChildAndParentsRelationship::default()
        };
        let mut request = fs_request(self, Method::POST, link.url()?)?;
        request.set_json_body(&Gedcomx::with_child_and_parents(relationship))?;
        self.transition::<kind::ChildAndParentsRelationship>(request, options)
    }

    fn read_person_with_relationships(
        &self,
        person_id: &str,
        options: &[&dyn StateTransitionOption],
    ) -> Result<PersonState> {
        let url = link_target(self, rel::PERSON_WITH_RELATIONSHIPS, &[("person", person_id)])?;
        let request = fs_request(self, Method::GET, url)?;
        self.transition::<gx_kind::Person>(request, options)
    }

    fn read_discussions(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<DiscussionsState>> {
        self.follow::<kind::Discussions>(rel::DISCUSSIONS, options)
    }

    fn add_discussion(
        &self,
        discussion: &Discussion,
        options: &[&dyn StateTransitionOption],
    ) -> Result<DiscussionState> {
        self.post_to::<kind::Discussion>(rel::DISCUSSIONS, &Gedcomx::with_discussion(discussion.clone()), options)
    }
}
