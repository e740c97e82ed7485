//! Family Tree operations on a person: deletion and restore, change
//! history, duplicate matching and merging, discussion references and
//! child-and-parents relationships.

use gx_client::{PersonState, Result, StateTransitionOption};
use gx_core::{media, rel as gx_rel, Method, StatusCode};
use gx_model::{ChildAndParentsRelationship, DiscussionReference, Gedcomx, HasLinks, Person};

use super::{
    fs_request, link_target, missing, ChangeHistoryState, ChildAndParentsRelationshipState, DiscussionState,
    PersonMatchResultsState, PersonMergeState, PersonNonMatchesState,
};
use crate::{kind, rel};

/// Family Tree operations on a person.
pub trait FamilyTreePersonExt: Sized {
    /// Whether the server answered 410: the person was deleted and can be
    /// restored.
    fn is_deleted(&self) -> bool;

    fn read_change_history(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<ChangeHistoryState>>;

    /// Possible duplicates of this person.
    fn read_matches(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<PersonMatchResultsState>>;

    fn read_non_matches(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<PersonNonMatchesState>>;

    /// The merge analysis of this person (the survivor) with `candidate`
    /// (the duplicate).
    fn read_merge(&self, candidate: &PersonState, options: &[&dyn StateTransitionOption]) -> Result<PersonMergeState>;

    /// Undelete this person.
    fn restore(&self, options: &[&dyn StateTransitionOption]) -> Result<Self>;

    fn load_discussion_references(&self, options: &[&dyn StateTransitionOption]) -> Result<Self>;

    /// Attach `discussion` to this person.
    fn add_discussion_reference(
        &self,
        discussion: &DiscussionState,
        options: &[&dyn StateTransitionOption],
    ) -> Result<Self>;

    fn discussion_references(&self) -> &[DiscussionReference];

    /// Child-and-parents relationships carried by the person document.
    fn child_and_parents_relationships(&self) -> &[ChildAndParentsRelationship];

    /// Read every child-and-parents relationship that has a `self` link.
    fn read_child_and_parents_relationships(
        &self,
        options: &[&dyn StateTransitionOption],
    ) -> Result<Vec<ChildAndParentsRelationshipState>>;
}

/// The local id of a person, else the last path segment of its URI.
pub(crate) fn person_id_of(person: &PersonState) -> Option<String> {
    person.person_id().map(str::to_string).or_else(|| {
        person
            .self_uri()
            .path_segments()
            .and_then(|mut segments| segments.next_back().map(str::to_string))
            .filter(|segment| !segment.is_empty())
    })
}

impl FamilyTreePersonExt for PersonState {
    fn is_deleted(&self) -> bool {
        self.status() == StatusCode::GONE
    }

    fn read_change_history(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<ChangeHistoryState>> {
        self.follow::<kind::ChangeHistory>(rel::CHANGE_HISTORY, options)
    }

    fn read_matches(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<PersonMatchResultsState>> {
        self.follow::<kind::PersonMatchResults>(rel::MATCHES, options)
    }

    fn read_non_matches(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<PersonNonMatchesState>> {
        self.follow::<kind::PersonNonMatches>(rel::NON_MATCHES, options)
    }

    fn read_merge(&self, candidate: &PersonState, options: &[&dyn StateTransitionOption]) -> Result<PersonMergeState> {
        let duplicate = person_id_of(candidate).ok_or_else(|| missing(candidate, gx_rel::SELF))?;
        let url = link_target(self, rel::MERGE, &[("dpid", &duplicate)])?;
        let request = fs_request(self, Method::GET, url)?;
        self.transition::<kind::PersonMerge>(request, options)
    }

    fn restore(&self, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        let url = self.require_link(rel::RESTORE)?.url()?;
        let request = fs_request(self, Method::POST, url)?;
        self.transition_same(request, options)
    }

    fn load_discussion_references(&self, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.load_embedded_resources_as(&[rel::DISCUSSION_REFERENCES], media::FAMILYSEARCH_JSON, options)
    }

    fn add_discussion_reference(
        &self,
        discussion: &DiscussionState,
        options: &[&dyn StateTransitionOption],
    ) -> Result<Self> {
        let reference = DiscussionReference {
            resource: Some(discussion.self_uri().to_string()),
            resource_id: discussion
                .entity()
                .and_then(|g| g.discussions.first())
                .and_then(|d| d.id.clone()),
            ..DiscussionReference::default()
        };
        let person = Person {
            id: self.person_id().map(str::to_string),
            discussion_references: vec![reference],
            ..Person::default()
        };
        let mut request = fs_request(self, Method::POST, self.target_uri(rel::DISCUSSION_REFERENCES))?;
        request.set_json_body(&Gedcomx::with_person(person))?;
        self.transition_same(request, options)
    }

    fn discussion_references(&self) -> &[DiscussionReference] {
        self.person()
            .map(|p| p.discussion_references.as_slice())
            .unwrap_or_default()
    }

    fn child_and_parents_relationships(&self) -> &[ChildAndParentsRelationship] {
        self.entity()
            .map(|g| g.child_and_parents_relationships.as_slice())
            .unwrap_or_default()
    }

    fn read_child_and_parents_relationships(
        &self,
        options: &[&dyn StateTransitionOption],
    ) -> Result<Vec<ChildAndParentsRelationshipState>> {
        self.child_and_parents_relationships()
            .iter()
            .filter_map(|cpr| cpr.link(gx_rel::SELF))
            .map(|link| {
                let request = fs_request(self, Method::GET, link.url()?)?;
                self.transition::<kind::ChildAndParentsRelationship>(request, options)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::states::tests::read;
    use gx_client::{kind as gx_kind, media, GedcomxError, StateName};
    use gx_core::{MockResponse, MockTransport};
    use serde_json::json;

    const P1: &str = "https://api.example/persons/P1";

    fn person(mock: &MockTransport, status: u16) -> PersonState {
        mock.on(
            Method::GET,
            P1,
            MockResponse::new(status).json(json!({
                "persons": [{
                    "id": "P1",
                    "links": {
                        "change-history": { "href": "https://api.example/persons/P1/changes" },
                        "matches": { "href": "https://api.example/persons/P1/matches" },
                        "merge": { "template": "https://api.example/persons/P1/merges/{dpid}" },
                        "restore": { "href": "https://api.example/persons/P1/restore" },
                        "discussion-references": { "href": "https://api.example/persons/P1/discussion-references" }
                    }
                }],
                "childAndParentsRelationships": [{
                    "id": "CPR1",
                    "child": { "resource": P1, "resourceId": "P1" },
                    "links": { "self": { "href": "https://api.example/child-and-parents-relationships/CPR1" } }
                }]
            })),
        );
        read::<gx_kind::Person>(mock, P1)
    }

    #[test]
    fn deleted_person_restores() {
        let mock = MockTransport::new();
        let gone = person(&mock, 410);
        assert!(gone.is_deleted());
        assert_eq!(gone.person_id(), Some("P1"));

        mock.on(Method::POST, "https://api.example/persons/P1/restore", MockResponse::new(204));
        let restored = gone.restore(&[]).unwrap();
        assert!(!restored.is_deleted());
        let sent = mock.last_request().unwrap();
        assert_eq!(sent.header("accept"), Some(media::FAMILYSEARCH_JSON));
    }

    #[test]
    fn merge_expands_duplicate_id() {
        let mock = MockTransport::new();
        let survivor = person(&mock, 200);
        mock.on(
            Method::GET,
            "https://api.example/persons/P2",
            MockResponse::ok().json(json!({ "persons": [{ "id": "P2" }] })),
        );
        let duplicate = read::<gx_kind::Person>(&mock, "https://api.example/persons/P2");
        mock.on(
            Method::GET,
            "https://api.example/persons/P1/merges/P2",
            MockResponse::ok().json(json!({
                "mergeAnalyses": [{
                    "survivor": { "resourceId": "P1" },
                    "duplicate": { "resourceId": "P2" }
                }]
            })),
        );
        let merge = survivor.read_merge(&duplicate, &[]).unwrap();
        assert_eq!(merge.name(), StateName::PersonMerge);
        assert_eq!(merge.entity().unwrap().merge_analyses.len(), 1);
    }

    #[test]
    fn discussion_reference_is_sent_in_a_shell_person() {
        let mock = MockTransport::new();
        let p1 = person(&mock, 200);
        mock.on(
            Method::GET,
            "https://api.example/discussions/D1",
            MockResponse::ok().json(json!({ "discussions": [{ "id": "D1", "title": "Birth year" }] })),
        );
        let discussion = read::<kind::Discussion>(&mock, "https://api.example/discussions/D1");
        mock.on(
            Method::POST,
            "https://api.example/persons/P1/discussion-references",
            MockResponse::new(204),
        );

        p1.add_discussion_reference(&discussion, &[]).unwrap();
        let sent: serde_json::Value = serde_json::from_slice(mock.last_request().unwrap().body().unwrap()).unwrap();
        assert_eq!(sent["persons"][0]["id"], "P1");
        assert_eq!(
            sent["persons"][0]["discussion-references"][0]["resource"],
            "https://api.example/discussions/D1"
        );
        assert_eq!(sent["persons"][0]["discussion-references"][0]["resourceId"], "D1");
    }

    #[test]
    fn discussion_references_load_as_familysearch_json() {
        let mock = MockTransport::new();
        let p1 = person(&mock, 200);
        assert!(p1.discussion_references().is_empty());
        mock.on(
            Method::GET,
            "https://api.example/persons/P1/discussion-references",
            MockResponse::ok().json(json!({
                "persons": [{
                    "id": "P1",
                    "discussion-references": [{
                        "resource": "https://api.example/discussions/D1",
                        "resourceId": "D1"
                    }]
                }]
            })),
        );

        let loaded = p1.load_discussion_references(&[]).unwrap();
        assert_eq!(mock.last_request().unwrap().header("accept"), Some(media::FAMILYSEARCH_JSON));
        assert_eq!(loaded.discussion_references().len(), 1);
        assert_eq!(loaded.discussion_references()[0].resource_id.as_deref(), Some("D1"));
        assert!(p1.discussion_references().is_empty());
    }

    #[test]
    fn follows_history_and_cprs() {
        let mock = MockTransport::new();
        let p1 = person(&mock, 200);
        mock.on(
            Method::GET,
            "https://api.example/persons/P1/changes",
            MockResponse::ok().json(json!({ "entries": [{ "id": "C1" }] })),
        );
        mock.on(
            Method::GET,
            "https://api.example/child-and-parents-relationships/CPR1",
            MockResponse::ok().json(json!({ "childAndParentsRelationships": [{ "id": "CPR1" }] })),
        );

        let history = p1.read_change_history(&[]).unwrap().unwrap();
        assert_eq!(history.entity().unwrap().entries.len(), 1);
        assert_eq!(mock.last_request().unwrap().header("accept"), Some(media::ATOM_JSON));

        assert_eq!(p1.child_and_parents_relationships().len(), 1);
        let cprs = p1.read_child_and_parents_relationships(&[]).unwrap();
        assert_eq!(cprs.len(), 1);
        assert_eq!(cprs[0].name(), StateName::ChildAndParentsRelationship);

        assert!(p1.read_non_matches(&[]).unwrap().is_none());
    }

    #[test]
    fn restore_without_link_is_missing_link() {
        let mock = MockTransport::new();
        mock.on(Method::GET, P1, MockResponse::ok().json(json!({ "persons": [{ "id": "P1" }] })));
        let p1 = read::<gx_kind::Person>(&mock, P1);
        assert!(matches!(p1.restore(&[]), Err(GedcomxError::MissingLink { .. })));
        assert_eq!(mock.request_count(), 1);
    }
}
