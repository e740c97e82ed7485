//! # Family Tree State Factory
//!
//! The Family Tree factory starts from every GEDCOM X registration and
//! changes it in two ways:
//!
//! - the `Person` and `Relationship` builders are overridden with the
//!   [`tree_entity_expected`] policy, so a deleted person (410) or a
//!   conflicting update (412) still yields its representation;
//! - every FamilySearch-only kind is registered.
//!
//! Every state reached from a collection built with this factory picks up
//! the overrides, because cross-kind transitions all dispatch through it.
//!
//! The platform factory registers the FamilySearch kinds only. Its persons
//! and relationships keep the GEDCOM X 200-only policy.

use std::sync::Arc;

use gx_client::{kind as gx_kind, ClientConfig, Environment, GedcomxClient, Result, StateFactory, Transport};
use gx_core::Url;

use crate::kind::{self, tree_entity_expected};

/// Register the FamilySearch-only kinds on `factory`.
pub fn register_family_search(factory: &mut StateFactory) -> &mut StateFactory {
    factory
        .register::<kind::ChildAndParentsRelationship>()
        .register::<kind::ChangeHistory>()
        .register::<kind::Discussion>()
        .register::<kind::Discussions>()
        .register::<kind::User>()
        .register::<kind::PersonMatchResults>()
        .register::<kind::PersonMerge>()
        .register::<kind::PersonNonMatches>()
}

/// Register the FamilySearch kinds plus the Family Tree entity policy for
/// persons and relationships.
pub fn register_family_tree(factory: &mut StateFactory) -> &mut StateFactory {
    factory
        .register_with_policy::<gx_kind::Person>(tree_entity_expected)
        .register_with_policy::<gx_kind::Relationship>(tree_entity_expected);
    register_family_search(factory)
}

/// A factory for a Family Tree rooted at an explicit collection URI.
pub fn family_tree_factory_at(collection_uri: Url) -> StateFactory {
    let mut factory = StateFactory::gedcomx(collection_uri);
    register_family_tree(&mut factory);
    factory
}

/// A factory for a FamilySearch platform collection at an explicit URI.
pub fn family_search_factory_at(collection_uri: Url) -> StateFactory {
    let mut factory = StateFactory::gedcomx(collection_uri);
    register_family_search(&mut factory);
    factory
}

/// A factory for the Family Tree of `environment`.
pub fn family_tree_factory(environment: Environment) -> Result<StateFactory> {
    Ok(family_tree_factory_at(environment.family_tree_uri()?))
}

/// A factory for the platform collection of `environment`, the root that
/// lists the Family Tree and the other FamilySearch collections.
pub fn family_search_factory(environment: Environment) -> Result<StateFactory> {
    Ok(family_search_factory_at(environment.platform_uri()?))
}

/// A client whose factory is the Family Tree factory for the configured
/// collection.
pub fn family_tree_client(config: ClientConfig, transport: Arc<dyn Transport>) -> GedcomxClient {
    let factory = family_tree_factory_at(config.collection_url.clone());
    GedcomxClient::with_parts(config, transport, Arc::new(factory))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gx_client::StateName;
    use gx_core::{Method, MockResponse, MockTransport};
    use serde_json::json;

    #[test]
    fn registers_every_state_name() {
        let factory = family_tree_factory(Environment::Production).unwrap();
        assert_eq!(factory.registered(), StateName::ALL.to_vec());
        assert_eq!(
            factory.collection_uri().as_str(),
            "https://api.familysearch.org/platform/collections/tree"
        );
        let platform = family_search_factory(Environment::Sandbox).unwrap();
        assert_eq!(platform.collection_uri().as_str(), "https://api-integ.familysearch.org/platform/collection");
    }

    const ROOT: &str = "https://api.example/platform/collections/tree";
    const GONE: &str = "https://api.example/persons/GONE";

    /// Read a deleted person through a collection built with `factory`.
    fn read_deleted_person(factory: StateFactory) -> gx_client::PersonState {
        let mock = MockTransport::new();
        mock.on(
            Method::GET,
            ROOT,
            MockResponse::ok().json(json!({
                "collections": [{ "id": "FSFT", "links": { "persons": { "href": "https://api.example/persons" } } }]
            })),
        );
        mock.on(
            Method::GET,
            GONE,
            MockResponse::new(410).json(json!({ "persons": [{ "id": "GONE" }] })),
        );
        let config = ClientConfig::new(Url::parse(ROOT).unwrap());
        GedcomxClient::with_parts(config, Arc::new(mock), Arc::new(factory))
            .read_collection()
            .unwrap()
            .read_uri::<gx_kind::Person>(Url::parse(GONE).unwrap(), &[])
            .unwrap()
    }

    #[test]
    fn deleted_person_keeps_its_entity() {
        let person = read_deleted_person(family_tree_factory_at(Url::parse(ROOT).unwrap()));
        assert!(person.has_client_error());
        assert_eq!(person.person_id(), Some("GONE"));

        let person = read_deleted_person(StateFactory::gedcomx(Url::parse(ROOT).unwrap()));
        assert!(person.entity().is_none());
    }

    #[test]
    fn platform_factory_keeps_gedcomx_entity_policy() {
        let platform = family_search_factory_at(Url::parse(ROOT).unwrap());
        assert_eq!(platform.registered(), StateName::ALL.to_vec());
        let person = read_deleted_person(platform);
        assert!(person.has_client_error());
        assert!(person.entity().is_none());
    }

    #[test]
    fn client_uses_the_family_tree_factory() {
        let mock = MockTransport::new();
        mock.on(Method::GET, ROOT, MockResponse::ok().json(json!({ "collections": [{ "id": "FSFT" }] })));
        mock.on(
            Method::GET,
            GONE,
            MockResponse::new(410).json(json!({ "persons": [{ "id": "GONE" }] })),
        );
        let config = ClientConfig::new(Url::parse(ROOT).unwrap());
        let person = family_tree_client(config, Arc::new(mock))
            .read_collection()
            .unwrap()
            .read_uri::<gx_kind::Person>(Url::parse(GONE).unwrap(), &[])
            .unwrap();
        assert_eq!(person.person_id(), Some("GONE"));
    }
}
