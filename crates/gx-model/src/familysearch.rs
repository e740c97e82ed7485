//! # FamilySearch Extensions
//!
//! Types carried in `application/x-fs-v1+json` documents and in the
//! extension members FamilySearch adds to GEDCOM X documents and Atom
//! entries.

use gx_core::Link;
use serde::{Deserialize, Serialize};

use crate::common::{Attribution, Note, ResourceReference, SourceReference};
use crate::conclusion::{merge_by_id, merge_links, Fact};

/// A child with up to two parents, modelled as one resource in the Family
/// Tree instead of two parent-child relationships.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildAndParentsRelationship {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub father: Option<ResourceReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mother: Option<ResourceReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub child: Option<ResourceReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub father_facts: Vec<Fact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mother_facts: Vec<Fact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<Note>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<Attribution>,
    #[serde(default, with = "crate::links", skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl ChildAndParentsRelationship {
    pub fn embed(&mut self, other: &ChildAndParentsRelationship) {
        self.father_facts.extend(other.father_facts.iter().cloned());
        self.mother_facts.extend(other.mother_facts.iter().cloned());
        self.sources.extend(other.sources.iter().cloned());
        self.notes.extend(other.notes.iter().cloned());
        merge_links(&mut self.links, &other.links);
    }
}

/// A comment on a discussion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributor: Option<ResourceReference>,
    #[serde(default, with = "crate::links", skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl Comment {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Discussion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributor: Option<ResourceReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_comments: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<Comment>,
    #[serde(default, with = "crate::links", skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl Discussion {
    pub fn titled(title: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            details: Some(details.into()),
            ..Self::default()
        }
    }

    /// Merge the comments of another view of the same discussion.
    pub fn embed(&mut self, other: &Discussion) {
        merge_by_id(&mut self.comments, &other.comments, |c| c.id.as_deref());
        merge_links(&mut self.links, &other.links);
    }
}

/// A person's reference to a discussion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscussionReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<Attribution>,
    #[serde(default, with = "crate::links", skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tree_user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub given_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_language: Option<String>,
    #[serde(default, with = "crate::links", skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

/// What a change-history entry changed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_modifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<ResourceReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ResourceReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed: Option<ResourceReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resulting: Option<ResourceReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeConflict {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub survivor_resource: Option<ResourceReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate_resource: Option<ResourceReference>,
}

/// The server's analysis of merging a duplicate into a survivor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub survivor: Option<ResourceReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duplicate: Option<ResourceReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub survivor_resources: Vec<ResourceReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub duplicate_resources: Vec<ResourceReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicting_resources: Vec<MergeConflict>,
}

/// The merge instruction sent back to the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Merge {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources_to_delete: Vec<ResourceReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources_to_copy: Vec<ResourceReference>,
}

impl Merge {
    /// Copy every duplicate-only resource and keep every survivor resource.
    pub fn accept_all(analysis: &MergeAnalysis) -> Self {
        Self {
            resources_to_delete: Vec::new(),
            resources_to_copy: analysis.duplicate_resources.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn child_and_parents_parses() {
        let cpr: ChildAndParentsRelationship = serde_json::from_value(serde_json::json!({
            "id": "CPR-1",
            "father": { "resource": "https://api.example/persons/F", "resourceId": "F" },
            "child": { "resource": "https://api.example/persons/C" },
            "fatherFacts": [{ "type": "http://gedcomx.org/BiologicalParent" }],
            "links": { "father": { "href": "https://api.example/persons/F" } }
        }))
        .unwrap();
        assert_eq!(cpr.father.and_then(|f| f.resource_id).as_deref(), Some("F"));
        assert!(cpr.mother.is_none());
        assert_eq!(cpr.father_facts.len(), 1);
        assert_eq!(cpr.links[0].rel, "father");
    }

    #[test]
    fn accept_all_copies_duplicate_resources() {
        let analysis = MergeAnalysis {
            duplicate_resources: vec![ResourceReference::new("#name-2")],
            ..MergeAnalysis::default()
        };
        let merge = Merge::accept_all(&analysis);
        assert_eq!(merge.resources_to_copy.len(), 1);
        assert!(merge.resources_to_delete.is_empty());
    }
}
