//! Conclusions: persons, relationships and their names, genders and facts.

use gx_core::Link;
use serde::{Deserialize, Serialize};

use crate::common::{
    Attribution, Date, EvidenceReference, Identifiers, Note, PlaceReference, Qualifier,
    ResourceReference, SourceReference,
};
use crate::familysearch::DiscussionReference;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamePart {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NameForm {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<NamePart>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Name {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub name_forms: Vec<NameForm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<Attribution>,
    #[serde(default, with = "crate::links", skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl Name {
    /// A name with one form carrying `full_text`.
    pub fn full_text(full_text: impl Into<String>) -> Self {
        Self {
            name_forms: vec![NameForm {
                full_text: Some(full_text.into()),
                ..NameForm::default()
            }],
            ..Self::default()
        }
    }

    /// Full text of the first name form.
    pub fn display_text(&self) -> Option<&str> {
        self.name_forms.first().and_then(|f| f.full_text.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gender {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<Attribution>,
    #[serde(default, with = "crate::links", skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl Gender {
    pub fn of_type(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fact {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<PlaceReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qualifiers: Vec<Qualifier>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<Note>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<Attribution>,
    #[serde(default, with = "crate::links", skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl Fact {
    pub fn of_type(kind: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.into()),
            ..Self::default()
        }
    }
}

/// Summary display properties computed by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifespan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_place: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_place: Option<String>,
    /// Ahnentafel number in an ancestry result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ascendancy_number: Option<String>,
    /// d'Aboville number in a descendancy result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub descendancy_number: Option<String>,
}

/// A person conclusion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub living: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub names: Vec<Name>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facts: Vec<Fact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<EvidenceReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<SourceReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<Note>,
    #[serde(default, skip_serializing_if = "Identifiers::is_empty")]
    pub identifiers: Identifiers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplayProperties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<Attribution>,
    /// FamilySearch extension.
    #[serde(
        rename = "discussion-references",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub discussion_references: Vec<DiscussionReference>,
    #[serde(default, with = "crate::links", skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl Person {
    /// A person with only an id.
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            ..Self::default()
        }
    }

    /// The preferred name, else the first.
    pub fn preferred_name(&self) -> Option<&Name> {
        self.names
            .iter()
            .find(|n| n.preferred == Some(true))
            .or_else(|| self.names.first())
    }

    /// Merge the conclusions of `other` (another view of the same person)
    /// into `self`, skipping items whose id is already present.
    pub fn embed(&mut self, other: &Person) {
        merge_by_id(&mut self.names, &other.names, |n| n.id.as_deref());
        merge_by_id(&mut self.facts, &other.facts, |f| f.id.as_deref());
        merge_by_id(&mut self.notes, &other.notes, |n| n.id.as_deref());
        self.sources.extend(other.sources.iter().cloned());
        self.evidence.extend(other.evidence.iter().cloned());
        self.media.extend(other.media.iter().cloned());
        self.discussion_references
            .extend(other.discussion_references.iter().cloned());
        if self.gender.is_none() {
            self.gender.clone_from(&other.gender);
        }
        merge_links(&mut self.links, &other.links);
    }
}

/// A relationship between two persons.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person1: Option<ResourceReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person2: Option<ResourceReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub facts: Vec<Fact>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<SourceReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evidence: Vec<EvidenceReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media: Vec<SourceReference>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<Note>,
    #[serde(default, skip_serializing_if = "Identifiers::is_empty")]
    pub identifiers: Identifiers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<Attribution>,
    #[serde(default, with = "crate::links", skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl Relationship {
    /// A relationship of `kind` between the persons at two URIs.
    pub fn between(kind: &str, person1: impl Into<String>, person2: impl Into<String>) -> Self {
        Self {
            kind: Some(kind.to_string()),
            person1: Some(ResourceReference::new(person1)),
            person2: Some(ResourceReference::new(person2)),
            ..Self::default()
        }
    }

    pub fn is_type(&self, kind: &str) -> bool {
        self.kind.as_deref() == Some(kind)
    }

    /// Whether either end references `person_uri` or `#person_id`.
    pub fn involves(&self, person: &str) -> bool {
        [&self.person1, &self.person2]
            .into_iter()
            .flatten()
            .any(|r| reference_matches(r, person))
    }

    pub fn embed(&mut self, other: &Relationship) {
        merge_by_id(&mut self.facts, &other.facts, |f| f.id.as_deref());
        merge_by_id(&mut self.notes, &other.notes, |n| n.id.as_deref());
        self.sources.extend(other.sources.iter().cloned());
        self.evidence.extend(other.evidence.iter().cloned());
        self.media.extend(other.media.iter().cloned());
        merge_links(&mut self.links, &other.links);
    }
}

/// Whether a reference points at `person`, given either as a URI, as a
/// `#id` fragment, or as a bare id.
pub(crate) fn reference_matches(reference: &ResourceReference, person: &str) -> bool {
    let Some(resource) = reference.resource.as_deref() else {
        return reference.resource_id.as_deref() == Some(person);
    };
    resource == person
        || resource.strip_prefix('#') == Some(person)
        || reference.resource_id.as_deref() == Some(person)
        || resource.rsplit('/').next() == Some(person)
}

pub(crate) fn merge_by_id<T: Clone>(into: &mut Vec<T>, from: &[T], id: impl Fn(&T) -> Option<&str>) {
    for item in from {
        let exists = id(item).is_some_and(|candidate| into.iter().any(|e| id(e) == Some(candidate)));
        if !exists {
            into.push(item.clone());
        }
    }
}

pub(crate) fn merge_links(into: &mut Vec<Link>, from: &[Link]) {
    for link in from {
        if !into.iter().any(|l| l.rel == link.rel) {
            into.push(link.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types;

    #[test]
    fn person_parses_gedcomx_json() {
        let person: Person = serde_json::from_value(serde_json::json!({
            "id": "KWQS-BBQ",
            "living": false,
            "gender": { "type": "http://gedcomx.org/Male" },
            "names": [{ "nameForms": [{ "fullText": "George Washington" }], "preferred": true }],
            "facts": [{ "type": "http://gedcomx.org/Birth", "date": { "original": "22 February 1732" } }],
            "display": { "name": "George Washington", "lifespan": "1732-1799", "ascendancyNumber": "1" },
            "identifiers": { "http://gedcomx.org/Persistent": ["https://familysearch.org/ark:/61903/4:1:KWQS-BBQ"] },
            "discussion-references": [{ "resource": "https://api.example/discussions/dis-1" }]
        }))
        .unwrap();
        assert_eq!(person.gender.as_ref().and_then(|g| g.kind.as_deref()), Some(types::MALE));
        assert_eq!(person.preferred_name().and_then(Name::display_text), Some("George Washington"));
        assert_eq!(person.facts[0].kind.as_deref(), Some(types::BIRTH));
        assert_eq!(person.display.as_ref().and_then(|d| d.ascendancy_number.as_deref()), Some("1"));
        assert_eq!(person.identifiers[types::PERSISTENT_IDENTIFIER].len(), 1);
        assert_eq!(person.discussion_references.len(), 1);
    }

    #[test]
    fn empty_fields_are_not_serialized() {
        let json = serde_json::to_value(Person::with_id("P1")).unwrap();
        assert_eq!(json, serde_json::json!({ "id": "P1" }));
    }

    #[test]
    fn relationship_involves_by_uri_or_fragment() {
        let rel = Relationship::between(types::COUPLE, "https://api.example/persons/P1", "#P2");
        assert!(rel.involves("https://api.example/persons/P1"));
        assert!(rel.involves("P1"));
        assert!(rel.involves("P2"));
        assert!(!rel.involves("P3"));
    }

    #[test]
    fn person_embed_skips_known_ids() {
        let mut a = Person::with_id("P1");
        a.facts.push(Fact {
            id: Some("F1".into()),
            ..Fact::of_type(types::BIRTH)
        });
        let mut b = Person::with_id("P1");
        b.facts.push(Fact {
            id: Some("F1".into()),
            ..Fact::of_type(types::BIRTH)
        });
        b.facts.push(Fact {
            id: Some("F2".into()),
            ..Fact::of_type(types::DEATH)
        });
        b.notes.push(Note::default());
        a.embed(&b);
        assert_eq!(a.facts.len(), 2);
        assert_eq!(a.notes.len(), 1);
    }
}
