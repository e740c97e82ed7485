//! Collection and collections states: the root of every API surface.

use gx_core::{rel, Method};
use gx_model::{types, Collection, Gedcomx, Person, Relationship, SourceDescription};

use super::search::PersonSearchQuery;
use super::{
    CollectionState, CollectionsState, PersonSearchResultsState, PersonState, PlaceSearchResultsState,
    RelationshipState, RelationshipsState, SourceDescriptionState, SourceDescriptionsState,
};
use crate::error::Result;
use crate::kind;
use crate::options::StateTransitionOption;

impl CollectionState {
    /// The collection this state describes.
    pub fn collection(&self) -> Option<&Collection> {
        self.entity().and_then(|e| e.collections.first())
    }

    /// The person record of the authenticated user.
    pub fn read_person_for_current_user(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<PersonState>> {
        self.follow::<kind::Person>(rel::CURRENT_USER_PERSON, options)
    }

    pub fn add_person(&self, person: &Person, options: &[&dyn StateTransitionOption]) -> Result<PersonState> {
        self.post_to::<kind::Person>(rel::PERSONS, &Gedcomx::with_person(person.clone()), options)
    }

    pub fn add_relationship(
        &self,
        relationship: &Relationship,
        options: &[&dyn StateTransitionOption],
    ) -> Result<RelationshipState> {
        let body = Gedcomx::with_relationships(vec![relationship.clone()]);
        self.post_to::<kind::Relationship>(rel::RELATIONSHIPS, &body, options)
    }

    /// Create a couple relationship between two persons.
    pub fn add_spouse_relationship(
        &self,
        person1: &PersonState,
        person2: &PersonState,
        options: &[&dyn StateTransitionOption],
    ) -> Result<RelationshipState> {
        let relationship = Relationship::between(
            types::COUPLE,
            person1.self_uri().as_str(),
            person2.self_uri().as_str(),
        );
        self.add_relationship(&relationship, options)
    }

    /// Create a parent-child relationship.
    pub fn add_parent_child_relationship(
        &self,
        parent: &PersonState,
        child: &PersonState,
        options: &[&dyn StateTransitionOption],
    ) -> Result<RelationshipState> {
        let relationship = Relationship::between(
            types::PARENT_CHILD,
            parent.self_uri().as_str(),
            child.self_uri().as_str(),
        );
        self.add_relationship(&relationship, options)
    }

    /// Create several relationships in one request.
    pub fn add_relationships(
        &self,
        relationships: Vec<Relationship>,
        options: &[&dyn StateTransitionOption],
    ) -> Result<RelationshipsState> {
        let body = Gedcomx::with_relationships(relationships);
        self.post_to::<kind::Relationships>(rel::RELATIONSHIPS, &body, options)
    }

    pub fn read_relationships(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<RelationshipsState>> {
        self.follow::<kind::Relationships>(rel::RELATIONSHIPS, options)
    }

    pub fn add_source_description(
        &self,
        description: &SourceDescription,
        options: &[&dyn StateTransitionOption],
    ) -> Result<SourceDescriptionState> {
        let body = Gedcomx::with_source_description(description.clone());
        self.post_to::<kind::SourceDescription>(rel::SOURCE_DESCRIPTIONS, &body, options)
    }

    pub fn read_source_descriptions(
        &self,
        options: &[&dyn StateTransitionOption],
    ) -> Result<Option<SourceDescriptionsState>> {
        self.follow::<kind::SourceDescriptions>(rel::SOURCE_DESCRIPTIONS, options)
    }

    /// Search for persons through the `person-search` template.
    pub fn search_for_persons(
        &self,
        query: &PersonSearchQuery,
        options: &[&dyn StateTransitionOption],
    ) -> Result<PersonSearchResultsState> {
        let q = query.build();
        let url = self.require_link(rel::PERSON_SEARCH)?.expand(&[("q", q.as_str())])?;
        let request = self.create_authenticated_feed_request(Method::GET, url)?;
        self.transition::<kind::PersonSearchResults>(request, options)
    }

    /// Search for places through the `place-search` template.
    pub fn search_for_places(
        &self,
        query: &str,
        options: &[&dyn StateTransitionOption],
    ) -> Result<PlaceSearchResultsState> {
        let url = self.require_link(rel::PLACE_SEARCH)?.expand(&[("q", query)])?;
        let request = self.create_authenticated_feed_request(Method::GET, url)?;
        self.transition::<kind::PlaceSearchResults>(request, options)
    }

    pub fn read_subcollections(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<CollectionsState>> {
        self.follow::<kind::Collections>(rel::SUBCOLLECTIONS, options)
    }

    /// Create a subcollection.
    pub fn add_collection(
        &self,
        collection: &Collection,
        options: &[&dyn StateTransitionOption],
    ) -> Result<CollectionState> {
        let body = Gedcomx::with_collection(collection.clone());
        self.post_to::<kind::Collection>(rel::SUBCOLLECTIONS, &body, options)
    }
}

impl CollectionsState {
    pub fn collections(&self) -> &[Collection] {
        self.entity().map(|e| e.collections.as_slice()).unwrap_or_default()
    }

    /// Read one of the listed collections through its `self` link.
    pub fn read_collection(
        &self,
        collection: &Collection,
        options: &[&dyn StateTransitionOption],
    ) -> Result<Option<CollectionState>> {
        use gx_model::HasLinks;
        match collection.link(rel::SELF) {
            Some(link) => self.follow_link::<kind::Collection>(link, options).map(Some),
            None => Ok(None),
        }
    }

    /// Create a collection in this list.
    pub fn add_collection(
        &self,
        collection: &Collection,
        options: &[&dyn StateTransitionOption],
    ) -> Result<CollectionState> {
        let body = Gedcomx::with_collection(collection.clone());
        self.post_to_uri::<kind::Collection>(self.self_uri(), &body, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::read;
    use gx_core::{MockResponse, MockTransport, StatusCode};
    use serde_json::json;

    const ROOT: &str = "https://api.example/platform/collections/tree";

    fn collection(mock: &MockTransport) -> CollectionState {
        mock.on(
            Method::GET,
            ROOT,
            MockResponse::ok().json(json!({
                "collections": [{
                    "id": "FSFT",
                    "links": {
                        "persons": { "href": "https://api.example/persons" },
                        "relationships": { "href": "https://api.example/relationships" },
                        "current-user-person": { "href": "https://api.example/current-person" },
                        "person-search": { "template": "https://api.example/search{?q,start,count}" },
                        "subcollections": { "href": "https://api.example/collections" }
                    }
                }]
            })),
        );
        read::<kind::Collection>(mock, ROOT)
    }

    #[test]
    fn add_person_posts_gedcomx_and_follows_location() {
        let mock = MockTransport::new();
        let root = collection(&mock);
        mock.on(
            Method::POST,
            "https://api.example/persons",
            MockResponse::new(201).header("Location", "https://api.example/persons/NEW-1"),
        );
        let person = root.add_person(&Person::default(), &[]).unwrap();
        assert_eq!(person.status(), StatusCode::CREATED);
        assert_eq!(person.self_uri().as_str(), "https://api.example/persons/NEW-1");

        let sent = mock.last_request().unwrap();
        assert_eq!(sent.header("content-type"), Some(gx_core::media::GEDCOMX_JSON));
        let body: Gedcomx = serde_json::from_slice(sent.body().unwrap()).unwrap();
        assert_eq!(body.persons.len(), 1);
    }

    #[test]
    fn spouse_relationship_references_both_persons() {
        let mock = MockTransport::new();
        let root = collection(&mock);
        for id in ["H", "W"] {
            let url = format!("https://api.example/persons/{id}");
            mock.on(Method::GET, &url, MockResponse::ok().json(json!({ "persons": [{ "id": id }] })));
        }
        let husband = read::<kind::Person>(&mock, "https://api.example/persons/H");
        let wife = read::<kind::Person>(&mock, "https://api.example/persons/W");
        mock.on(Method::POST, "https://api.example/relationships", MockResponse::new(201));

        root.add_spouse_relationship(&husband, &wife, &[]).unwrap();
        let body: Gedcomx = serde_json::from_slice(mock.last_request().unwrap().body().unwrap()).unwrap();
        let relationship = &body.relationships[0];
        assert!(relationship.is_type(types::COUPLE));
        assert!(relationship.involves("https://api.example/persons/H"));
        assert!(relationship.involves("https://api.example/persons/W"));
    }

    #[test]
    fn search_expands_template() {
        let mock = MockTransport::new();
        let root = collection(&mock);
        mock.on(
            Method::GET,
            "https://api.example/search",
            MockResponse::ok().json(json!({ "results": 1, "entries": [{ "id": "P1" }] })),
        );
        let query = PersonSearchQuery::new().given_name("John").surname("Smith");
        let results = root.search_for_persons(&query, &[]).unwrap();
        assert_eq!(results.entries().len(), 1);

        let sent = mock.last_request().unwrap();
        assert_eq!(sent.url().query(), Some("q=givenName%3AJohn%20surname%3ASmith"));
        assert_eq!(sent.header("accept"), Some(gx_core::media::ATOM_JSON));
    }

    #[test]
    fn absent_links_short_circuit_or_fail() {
        let mock = MockTransport::new();
        let root = collection(&mock);
        let sent = mock.request_count();
        assert!(root.read_source_descriptions(&[]).unwrap().is_none());
        assert!(root.add_source_description(&SourceDescription::default(), &[]).is_err());
        assert!(root.search_for_places("Paris", &[]).is_err());
        assert_eq!(mock.request_count(), sent);
    }

    #[test]
    fn current_user_person_is_followed() {
        let mock = MockTransport::new();
        let root = collection(&mock);
        mock.on(
            Method::GET,
            "https://api.example/current-person",
            MockResponse::ok().json(json!({ "persons": [{ "id": "ME" }] })),
        );
        let me = root.read_person_for_current_user(&[]).unwrap().unwrap();
        assert_eq!(me.person().and_then(|p| p.id.as_deref()), Some("ME"));
    }
}
