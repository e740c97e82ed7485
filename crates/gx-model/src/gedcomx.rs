//! The GEDCOM X document.

use gx_core::Link;
use serde::{Deserialize, Serialize};

use crate::common::Attribution;
use crate::conclusion::{merge_by_id, merge_links, Person, Relationship};
use crate::familysearch::{ChildAndParentsRelationship, Discussion, Merge, MergeAnalysis, User};
use crate::source::{Agent, Collection, PlaceDescription, SourceDescription};

/// A GEDCOM X document. Also carries the FamilySearch extension arrays, so
/// the same type parses `application/x-fs-v1+json` bodies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gedcomx {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    /// URI of the source description describing this document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<Attribution>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub persons: Vec<Person>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_descriptions: Vec<SourceDescription>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub agents: Vec<Agent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub places: Vec<PlaceDescription>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub collections: Vec<Collection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_and_parents_relationships: Vec<ChildAndParentsRelationship>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub discussions: Vec<Discussion>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub users: Vec<User>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merges: Vec<Merge>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merge_analyses: Vec<MergeAnalysis>,
    #[serde(default, with = "crate::links", skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl Gedcomx {
    pub fn with_person(person: Person) -> Self {
        Self {
            persons: vec![person],
            ..Self::default()
        }
    }

    pub fn with_relationships(relationships: Vec<Relationship>) -> Self {
        Self {
            relationships,
            ..Self::default()
        }
    }

    pub fn with_source_description(description: SourceDescription) -> Self {
        Self {
            source_descriptions: vec![description],
            ..Self::default()
        }
    }

    pub fn with_collection(collection: Collection) -> Self {
        Self {
            collections: vec![collection],
            ..Self::default()
        }
    }

    pub fn with_child_and_parents(relationship: ChildAndParentsRelationship) -> Self {
        Self {
            child_and_parents_relationships: vec![relationship],
            ..Self::default()
        }
    }

    pub fn with_discussion(discussion: Discussion) -> Self {
        Self {
            discussions: vec![discussion],
            ..Self::default()
        }
    }

    /// First person, the subject of a person resource.
    pub fn person(&self) -> Option<&Person> {
        self.persons.first()
    }

    pub fn relationship(&self) -> Option<&Relationship> {
        self.relationships.first()
    }

    /// Look up a person by local id.
    pub fn person_by_id(&self, id: &str) -> Option<&Person> {
        self.persons.iter().find(|p| p.id.as_deref() == Some(id))
    }

    /// Whether this document has no content at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge `other` into this document.
    ///
    /// Persons, relationships, child-and-parents relationships and
    /// discussions whose id is already present are merged member-wise;
    /// everything else is appended unless an item with the same id exists. Document links are added only
    /// for rels not yet present.
    pub fn embed(&mut self, other: &Gedcomx) {
        merge_links(&mut self.links, &other.links);

        for person in &other.persons {
            match self.persons.iter_mut().find(|p| p.id.is_some() && p.id == person.id) {
                Some(existing) => existing.embed(person),
                None => self.persons.push(person.clone()),
            }
        }
        for relationship in &other.relationships {
            match self
                .relationships
                .iter_mut()
                .find(|r| r.id.is_some() && r.id == relationship.id)
            {
                Some(existing) => existing.embed(relationship),
                None => self.relationships.push(relationship.clone()),
            }
        }
        for cpr in &other.child_and_parents_relationships {
            match self
                .child_and_parents_relationships
                .iter_mut()
                .find(|r| r.id.is_some() && r.id == cpr.id)
            {
                Some(existing) => existing.embed(cpr),
                None => self.child_and_parents_relationships.push(cpr.clone()),
            }
        }

        merge_by_id(&mut self.source_descriptions, &other.source_descriptions, |s| s.id.as_deref());
        merge_by_id(&mut self.agents, &other.agents, |a| a.id.as_deref());
        merge_by_id(&mut self.places, &other.places, |p| p.id.as_deref());
        merge_by_id(&mut self.collections, &other.collections, |c| c.id.as_deref());
        for discussion in &other.discussions {
            match self
                .discussions
                .iter_mut()
                .find(|d| d.id.is_some() && d.id == discussion.id)
            {
                Some(existing) => existing.embed(discussion),
                None => self.discussions.push(discussion.clone()),
            }
        }
        merge_by_id(&mut self.users, &other.users, |u| u.id.as_deref());
    }
}
