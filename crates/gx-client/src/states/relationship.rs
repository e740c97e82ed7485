//! Relationship and relationships states.

use gx_core::rel;
use gx_model::{Fact, Gedcomx, Note, Relationship, ResourceReference, SourceReference};

use super::{PersonState, RelationshipState, RelationshipsState};
use crate::error::Result;
use crate::kind;
use crate::options::StateTransitionOption;

impl RelationshipState {
    pub fn relationship(&self) -> Option<&Relationship> {
        self.entity().and_then(Gedcomx::relationship)
    }

    pub fn relationship_id(&self) -> Option<&str> {
        self.relationship().and_then(|r| r.id.as_deref())
    }

    pub fn is_type(&self, kind: &str) -> bool {
        self.relationship().is_some_and(|r| r.is_type(kind))
    }

    pub fn facts(&self) -> &[Fact] {
        self.relationship().map(|r| r.facts.as_slice()).unwrap_or_default()
    }

    pub fn source_references(&self) -> &[SourceReference] {
        self.relationship().map(|r| r.sources.as_slice()).unwrap_or_default()
    }

    pub fn notes(&self) -> &[Note] {
        self.relationship().map(|r| r.notes.as_slice()).unwrap_or_default()
    }

    // ─── Navigation ──────────────────────────────────────────────────

    /// Read the first participant (the husband, or the parent).
    pub fn read_person1(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<PersonState>> {
        let reference = self.relationship().and_then(|r| r.person1.as_ref());
        self.read_participant(rel::PERSON1, reference, options)
    }

    /// Read the second participant (the wife, or the child).
    pub fn read_person2(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<PersonState>> {
        let reference = self.relationship().and_then(|r| r.person2.as_ref());
        self.read_participant(rel::PERSON2, reference, options)
    }

    /// Prefer the server's participant link, else the reference's URI.
    fn read_participant(
        &self,
        rel: &str,
        reference: Option<&ResourceReference>,
        options: &[&dyn StateTransitionOption],
    ) -> Result<Option<PersonState>> {
        if let Some(link) = self.link(rel) {
            return self.follow_link::<kind::Person>(link, options).map(Some);
        }
        match reference.and_then(ResourceReference::resource) {
            Some(uri) => self.read_uri::<kind::Person>(self.resolve(uri)?, options).map(Some),
            None => Ok(None),
        }
    }

    // ─── Embedded loading ────────────────────────────────────────────

    pub fn load_conclusions(&self, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.load_embedded_resources(&[rel::CONCLUSIONS], options)
    }

    pub fn load_source_references(&self, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.load_embedded_resources(&[rel::SOURCE_REFERENCES], options)
    }

    pub fn load_notes(&self, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.load_embedded_resources(&[rel::NOTES], options)
    }

    // ─── Mutations ───────────────────────────────────────────────────

    fn shell(&self) -> Relationship {
        Relationship {
            id: self.relationship_id().map(str::to_string),
            ..Relationship::default()
        }
    }

    fn post_relationship(&self, rel: &str, relationship: Relationship, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.post_same(self.target_uri(rel), &Gedcomx::with_relationships(vec![relationship]), options)
    }

    pub fn add_fact(&self, fact: &Fact, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        let relationship = Relationship {
            facts: vec![fact.clone()],
            ..self.shell()
        };
        self.post_relationship(rel::CONCLUSIONS, relationship, options)
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
        let relationship = Relationship {
            sources: vec![reference.clone()],
            ..self.shell()
        };
        self.post_relationship(rel::SOURCE_REFERENCES, relationship, options)
    }

    pub fn add_note(&self, note: &Note, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        let relationship = Relationship {
            notes: vec![note.clone()],
            ..self.shell()
        };
        self.post_relationship(rel::NOTES, relationship, options)
    }
}

impl RelationshipsState {
    pub fn relationships(&self) -> &[Relationship] {
        self.entity().map(|e| e.relationships.as_slice()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::read;
    use gx_core::{Method, MockResponse, MockTransport};
    use gx_model::types;
    use serde_json::json;

    const R1: &str = "https://api.example/relationships/R1";

    fn relationship(mock: &MockTransport, links: serde_json::Value) -> RelationshipState {
        mock.on(
            Method::GET,
            R1,
            MockResponse::ok().json(json!({
                "relationships": [{
                    "id": "R1",
                    "type": "http://gedcomx.org/Couple",
                    "person1": { "resource": "https://api.example/persons/H" },
                    "person2": { "resource": "https://api.example/persons/W" },
                    "links": links
                }]
            })),
        );
        read::<kind::Relationship>(mock, R1)
    }

    #[test]
    fn participants_follow_link_then_reference() {
        let mock = MockTransport::new();
        let state = relationship(
            &mock,
            json!({ "person1": { "href": "https://api.example/persons/H?flag=1" } }),
        );
        assert!(state.is_type(types::COUPLE));
        for id in ["H", "W"] {
            mock.on(
                Method::GET,
                &format!("https://api.example/persons/{id}"),
                MockResponse::ok().json(json!({ "persons": [{ "id": id }] })),
            );
        }

        state.read_person1(&[]).unwrap().unwrap();
        assert_eq!(mock.last_request().unwrap().url().as_str(), "https://api.example/persons/H?flag=1");

        let wife = state.read_person2(&[]).unwrap().unwrap();
        assert_eq!(wife.person_id(), Some("W"));
    }

    #[test]
    fn add_fact_posts_relationship_shell() {
        let mock = MockTransport::new();
        let state = relationship(
            &mock,
            json!({ "conclusions": { "href": "https://api.example/relationships/R1/conclusions" } }),
        );
        mock.on(
            Method::POST,
            "https://api.example/relationships/R1/conclusions",
            MockResponse::new(204),
        );
        state.add_fact(&Fact::of_type(types::MARRIAGE), &[]).unwrap();

        let body: Gedcomx = serde_json::from_slice(mock.last_request().unwrap().body().unwrap()).unwrap();
        let sent = &body.relationships[0];
        assert_eq!(sent.id.as_deref(), Some("R1"));
        assert_eq!(sent.facts.len(), 1);
        assert!(sent.person1.is_none());
    }
}
