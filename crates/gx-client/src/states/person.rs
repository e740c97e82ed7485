//! # Person State
//!
//! A person resource: its conclusions (names, gender, facts), references
//! (sources, evidence, media), notes, and the navigation to its family and
//! pedigree.
//!
//! ## Mutations
//!
//! Conclusion changes are sent as a GEDCOM X document holding a single person
//! that carries only the person id and the changed items. The document is
//! POSTed to the person's `conclusions` (or `source-references`, ...) link
//! and falls back to the person's own URI when the server omits the
//! dedicated link. Deletions target the item's own link. Every mutation
//! returns a fresh person state built from the server's answer.

use gx_core::rel;
use gx_model::{
    DisplayProperties, EvidenceReference, Fact, Gedcomx, Gender, Name, Note, Person, Relationship,
    ResourceReference, SourceReference,
};

use super::{
    AncestryResultsState, CollectionState, DescendancyResultsState, PersonChildrenState, PersonParentsState,
    PersonSpousesState, PersonState,
};
use crate::error::Result;
use crate::kind;
use crate::options::StateTransitionOption;

impl PersonState {
    // ─── Accessors ───────────────────────────────────────────────────

    /// The person this state describes.
    pub fn person(&self) -> Option<&Person> {
        self.entity().and_then(Gedcomx::person)
    }

    pub fn person_id(&self) -> Option<&str> {
        self.person().and_then(|p| p.id.as_deref())
    }

    pub fn names(&self) -> &[Name] {
        self.person().map(|p| p.names.as_slice()).unwrap_or_default()
    }

    pub fn preferred_name(&self) -> Option<&Name> {
        self.person().and_then(Person::preferred_name)
    }

    pub fn gender(&self) -> Option<&Gender> {
        self.person().and_then(|p| p.gender.as_ref())
    }

    pub fn facts(&self) -> &[Fact] {
        self.person().map(|p| p.facts.as_slice()).unwrap_or_default()
    }

    pub fn source_references(&self) -> &[SourceReference] {
        self.person().map(|p| p.sources.as_slice()).unwrap_or_default()
    }

    pub fn evidence_references(&self) -> &[EvidenceReference] {
        self.person().map(|p| p.evidence.as_slice()).unwrap_or_default()
    }

    pub fn media_references(&self) -> &[SourceReference] {
        self.person().map(|p| p.media.as_slice()).unwrap_or_default()
    }

    pub fn notes(&self) -> &[Note] {
        self.person().map(|p| p.notes.as_slice()).unwrap_or_default()
    }

    /// Server-computed display summary.
    pub fn display(&self) -> Option<&DisplayProperties> {
        self.person().and_then(|p| p.display.as_ref())
    }

    /// Relationships of the given type that involve this person, as loaded
    /// into the entity.
    pub fn relationships_of_type(&self, kind: &str) -> Vec<&Relationship> {
        self.entity()
            .map(|e| e.relationships.iter().filter(|r| r.is_type(kind)).collect())
            .unwrap_or_default()
    }

    // ─── Navigation ──────────────────────────────────────────────────

    pub fn read_collection(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<CollectionState>> {
        self.follow::<kind::Collection>(rel::COLLECTION, options)
    }

    /// Read the ancestry pedigree. Pass `QueryParameter::generations` to set
    /// its depth.
    pub fn read_ancestry(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<AncestryResultsState>> {
        self.follow::<kind::AncestryResults>(rel::ANCESTRY, options)
    }

    pub fn read_descendancy(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<DescendancyResultsState>> {
        self.follow::<kind::DescendancyResults>(rel::DESCENDANCY, options)
    }

    pub fn read_parents(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<PersonParentsState>> {
        self.follow::<kind::PersonParents>(rel::PARENTS, options)
    }

    pub fn read_children(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<PersonChildrenState>> {
        self.follow::<kind::PersonChildren>(rel::CHILDREN, options)
    }

    pub fn read_spouses(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<PersonSpousesState>> {
        self.follow::<kind::PersonSpouses>(rel::SPOUSES, options)
    }

    /// Read the person at the other end of `relationship`.
    ///
    /// `None` when neither end is this person or the other end carries no
    /// resource URI.
    pub fn read_relative(
        &self,
        relationship: &Relationship,
        options: &[&dyn StateTransitionOption],
    ) -> Result<Option<PersonState>> {
        let (person1, person2) = (relationship.person1.as_ref(), relationship.person2.as_ref());
        let other = match (person1, person2) {
            (Some(p1), other) if self.is_reference_to_me(p1) => other,
            (other, Some(p2)) if self.is_reference_to_me(p2) => other,
            _ => None,
        };
        match other.and_then(ResourceReference::resource) {
            Some(uri) => self.read_uri::<kind::Person>(self.resolve(uri)?, options).map(Some),
            None => Ok(None),
        }
    }

    fn is_reference_to_me(&self, reference: &ResourceReference) -> bool {
        let self_uri = self.self_uri();
        let id = self.person_id();
        match reference.resource() {
            Some(resource) => {
                resource == self_uri.as_str()
                    || self.resolve(resource).is_ok_and(|url| url == self_uri)
                    || (id.is_some() && resource.strip_prefix('#') == id)
            }
            None => id.is_some() && reference.resource_id.as_deref() == id,
        }
    }

    // ─── Embedded loading ────────────────────────────────────────────

    /// Load the names, gender and facts.
    pub fn load_conclusions(&self, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.load_embedded_resources(&[rel::CONCLUSIONS], options)
    }

    pub fn load_source_references(&self, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.load_embedded_resources(&[rel::SOURCE_REFERENCES], options)
    }

    pub fn load_evidence_references(&self, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.load_embedded_resources(&[rel::EVIDENCE_REFERENCES], options)
    }

    pub fn load_media_references(&self, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.load_embedded_resources(&[rel::MEDIA_REFERENCES], options)
    }

    pub fn load_notes(&self, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.load_embedded_resources(&[rel::NOTES], options)
    }

    pub fn load_parent_relationships(&self, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.load_embedded_resources(&[rel::PARENT_RELATIONSHIPS], options)
    }

    pub fn load_spouse_relationships(&self, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.load_embedded_resources(&[rel::SPOUSE_RELATIONSHIPS], options)
    }

    pub fn load_child_relationships(&self, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.load_embedded_resources(&[rel::CHILD_RELATIONSHIPS], options)
    }

    // ─── Mutations ───────────────────────────────────────────────────

    /// Replace the person with `person`.
    pub fn update(&self, person: &Person, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.post_same(self.self_uri(), &Gedcomx::with_person(person.clone()), options)
    }

    /// A person carrying only this person's id, the shell every partial
    /// update is built on.
    fn shell(&self) -> Person {
        Person {
            id: self.person_id().map(str::to_string),
            ..Person::default()
        }
    }

    fn update_conclusions(&self, person: Person, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.post_same(self.target_uri(rel::CONCLUSIONS), &Gedcomx::with_person(person), options)
    }

    pub fn add_name(&self, name: &Name, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.update_conclusions(
            Person {
                names: vec![name.clone()],
                ..self.shell()
            },
            options,
        )
    }

    /// Update an existing name; `name.id` identifies it.
    pub fn update_name(&self, name: &Name, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.add_name(name, options)
    }

    pub fn delete_name(&self, name: &Name, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.delete_linked(name, rel::CONCLUSION, options)
    }

    pub fn update_gender(&self, gender: &Gender, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.update_conclusions(
            Person {
                gender: Some(gender.clone()),
                ..self.shell()
            },
            options,
        )
    }

    pub fn add_fact(&self, fact: &Fact, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.update_conclusions(
            Person {
                facts: vec![fact.clone()],
                ..self.shell()
            },
            options,
        )
    }

    /// Update an existing fact; `fact.id` identifies it.
    pub fn update_fact(&self, fact: &Fact, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.add_fact(fact, options)
    }

    pub fn delete_fact(&self, fact: &Fact, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.delete_linked(fact, rel::CONCLUSION, options)
    }

    pub fn add_source_reference(
        &self,
        reference: &SourceReference,
        options: &[&dyn StateTransitionOption],
    ) -> Result<Self> {
        let person = Person {
            sources: vec![reference.clone()],
            ..self.shell()
        };
        self.post_same(self.target_uri(rel::SOURCE_REFERENCES), &Gedcomx::with_person(person), options)
    }

    pub fn delete_source_reference(
        &self,
        reference: &SourceReference,
        options: &[&dyn StateTransitionOption],
    ) -> Result<Self> {
        self.delete_linked(reference, rel::SOURCE_REFERENCE, options)
    }

    pub fn add_evidence_reference(
        &self,
        reference: &EvidenceReference,
        options: &[&dyn StateTransitionOption],
    ) -> Result<Self> {
        let person = Person {
            evidence: vec![reference.clone()],
            ..self.shell()
        };
        self.post_same(self.target_uri(rel::EVIDENCE_REFERENCES), &Gedcomx::with_person(person), options)
    }

    pub fn add_media_reference(
        &self,
        reference: &SourceReference,
        options: &[&dyn StateTransitionOption],
    ) -> Result<Self> {
        let person = Person {
            media: vec![reference.clone()],
            ..self.shell()
        };
        self.post_same(self.target_uri(rel::MEDIA_REFERENCES), &Gedcomx::with_person(person), options)
    }

    pub fn add_note(&self, note: &Note, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        let person = Person {
            notes: vec![note.clone()],
            ..self.shell()
        };
        self.post_same(self.target_uri(rel::NOTES), &Gedcomx::with_person(person), options)
    }

    pub fn delete_note(&self, note: &Note, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.delete_linked(note, rel::NOTE, options)
    }
}
