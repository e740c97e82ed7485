use gx_client::{kind as gx_kind, PersonState, Result, StateTransitionOption};
use gx_core::rel as gx_rel;
use gx_model::User;

use super::UserState;

/// Operations on the authenticated user.
pub trait UserStateExt {
    fn user(&self) -> Option<&User>;

    /// The tree person representing the user.
    fn read_person(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<PersonState>>;
}

impl UserStateExt for UserState {
    fn user(&self) -> Option<&User> {
        self.entity().and_then(|g| g.users.first())
    }

    fn read_person(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<PersonState>> {
        self.follow::<gx_kind::Person>(gx_rel::PERSON, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind;
    use crate::states::tests::read;
    use gx_core::{Method, MockResponse, MockTransport};
    use serde_json::json;

    #[test]
    fn user_links_to_their_tree_person() {
        let mock = MockTransport::new();
        let url = "https://api.example/users/current";
        mock.on(
            Method::GET,
            url,
            MockResponse::ok().json(json!({
                "users": [{
                    "id": "U1",
                    "personId": "KWQS-BBQ",
                    "displayName": "Pat Doe",
                    "links": { "person": { "href": "https://api.example/persons/KWQS-BBQ" } }
                }]
            })),
        );
        mock.on(
            Method::GET,
            "https://api.example/persons/KWQS-BBQ",
            MockResponse::ok().json(json!({ "persons": [{ "id": "KWQS-BBQ" }] })),
        );

        let state = read::<kind::User>(&mock, url);
        let user = state.user().unwrap();
        assert_eq!(user.person_id.as_deref(), Some("KWQS-BBQ"));
        assert_eq!(user.display_name.as_deref(), Some("Pat Doe"));

        let person = state.read_person(&[]).unwrap().unwrap();
        assert_eq!(person.person_id(), Some("KWQS-BBQ"));
    }

    #[test]
    fn user_without_person_link_reads_nothing() {
        let mock = MockTransport::new();
        let url = "https://api.example/users/current";
        mock.on(Method::GET, url, MockResponse::ok().json(json!({ "users": [{ "id": "U1" }] })));
        let state = read::<kind::User>(&mock, url);
        assert!(state.read_person(&[]).unwrap().is_none());
        assert_eq!(mock.request_count(), 1);
    }
}
