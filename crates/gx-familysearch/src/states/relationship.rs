//! # Child-and-Parents Relationship State
//!
//! A Family Tree relationship joining a child to an optional father and an
//! optional mother, each parent carrying its own facts.
//!
//! Updates are sent as a FamilySearch document holding a single relationship
//! with only the id and the changed members, POSTed to the relationship
//! itself. Removing a parent deletes that parent's role resource
//! (`father-role` / `mother-role`), never the relationship.

use gx_client::{PersonState, Result, StateTransitionOption};
use gx_core::{Method, StatusCode};
use gx_model::{ChildAndParentsRelationship, Fact, Gedcomx, ResourceReference};

use super::{fs_request, person_reference, read_person_via, ChildAndParentsRelationshipState};
use crate::rel;

/// Operations on a child-and-parents relationship.
pub trait ChildAndParentsRelationshipStateExt: Sized {
    fn child_and_parents_relationship(&self) -> Option<&ChildAndParentsRelationship>;
    fn father(&self) -> Option<&ResourceReference>;
    fn mother(&self) -> Option<&ResourceReference>;
    fn child(&self) -> Option<&ResourceReference>;
    fn father_facts(&self) -> &[Fact];
    fn mother_facts(&self) -> &[Fact];

    /// Whether the relationship was deleted (410).
    fn is_deleted(&self) -> bool;

    fn read_father(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<PersonState>>;
    fn read_mother(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<PersonState>>;
    fn read_child(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<PersonState>>;

    /// Make `father` the father of this relationship.
    fn update_father(&self, father: &PersonState, options: &[&dyn StateTransitionOption]) -> Result<Self>;
    /// Make `mother` the mother of this relationship.
    fn update_mother(&self, mother: &PersonState, options: &[&dyn StateTransitionOption]) -> Result<Self>;

    fn delete_father(&self, options: &[&dyn StateTransitionOption]) -> Result<Self>;
    fn delete_mother(&self, options: &[&dyn StateTransitionOption]) -> Result<Self>;

    fn add_father_fact(&self, fact: &Fact, options: &[&dyn StateTransitionOption]) -> Result<Self>;
    fn add_mother_fact(&self, fact: &Fact, options: &[&dyn StateTransitionOption]) -> Result<Self>;

    /// Undelete this relationship.
    fn restore(&self, options: &[&dyn StateTransitionOption]) -> Result<Self>;
}

/// A relationship carrying only the id of `state`'s relationship.
fn shell(state: &ChildAndParentsRelationshipState) -> ChildAndParentsRelationship {
    ChildAndParentsRelationship {
        id: state.child_and_parents_relationship().and_then(|r| r.id.clone()),
        ..ChildAndParentsRelationship::default()
    }
}

fn post_update(
    state: &ChildAndParentsRelationshipState,
    relationship: ChildAndParentsRelationship,
    options: &[&dyn StateTransitionOption],
) -> Result<ChildAndParentsRelationshipState> {
    let mut request = fs_request(state, Method::POST, state.self_uri())?;
    request.set_json_body(&Gedcomx::with_child_and_parents(relationship))?;
    state.transition_same(request, options)
}

fn send_to_link(
    state: &ChildAndParentsRelationshipState,
    method: Method,
    rel: &str,
    options: &[&dyn StateTransitionOption],
) -> Result<ChildAndParentsRelationshipState> {
    let url = state.require_link(rel)?.url()?;
    let request = fs_request(state, method, url)?;
    state.transition_same(request, options)
}

impl ChildAndParentsRelationshipStateExt for ChildAndParentsRelationshipState {
    fn child_and_parents_relationship(&self) -> Option<&ChildAndParentsRelationship> {
        self.entity().and_then(|g| g.child_and_parents_relationships.first())
    }

    fn father(&self) -> Option<&ResourceReference> {
        self.child_and_parents_relationship().and_then(|r| r.father.as_ref())
    }

    fn mother(&self) -> Option<&ResourceReference> {
        self.child_and_parents_relationship().and_then(|r| r.mother.as_ref())
    }

    fn child(&self) -> Option<&ResourceReference> {
        self.child_and_parents_relationship().and_then(|r| r.child.as_ref())
    }

    fn father_facts(&self) -> &[Fact] {
        self.child_and_parents_relationship()
            .map(|r| r.father_facts.as_slice())
            .unwrap_or_default()
    }

    fn mother_facts(&self) -> &[Fact] {
        self.child_and_parents_relationship()
            .map(|r| r.mother_facts.as_slice())
            .unwrap_or_default()
    }

    fn is_deleted(&self) -> bool {
        self.status() == StatusCode::GONE
    }

    fn read_father(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<PersonState>> {
        read_person_via(self, rel::FATHER, self.father(), options)
    }

    fn read_mother(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<PersonState>> {
        read_person_via(self, rel::MOTHER, self.mother(), options)
    }

    fn read_child(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<PersonState>> {
        read_person_via(self, rel::CHILD, self.child(), options)
    }

    fn update_father(&self, father: &PersonState, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        let relationship = ChildAndParentsRelationship {
            father: Some(person_reference(father)),
            ..shell(self)
        };
        post_update(self, relationship, options)
    }

    fn update_mother(&self, mother: &PersonState, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        let relationship = ChildAndParentsRelationship {
            mother: Some(person_reference(mother)),
            ..shell(self)
        };
        post_update(self, relationship, options)
    }

    fn delete_father(&self, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        send_to_link(self, Method::DELETE, rel::FATHER_ROLE, options)
    }

    fn delete_mother(&self, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        send_to_link(self, Method::DELETE, rel::MOTHER_ROLE, options)
    }

    fn add_father_fact(&self, fact: &Fact, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        let relationship = ChildAndParentsRelationship {
            father_facts: vec![fact.clone()],
            ..shell(self)
        };
        post_update(self, relationship, options)
    }

    fn add_mother_fact(&self, fact: &Fact, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        let relationship = ChildAndParentsRelationship {
            mother_facts: vec![fact.clone()],
            ..shell(self)
        };
        post_update(self, relationship, options)
    }

    fn restore(&self, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        send_to_link(self, Method::POST, rel::RESTORE, options)
    }
}
