use gx_model::Agent;

use super::AgentState;

impl AgentState {
    /// The agent this state describes.
    pub fn agent(&self) -> Option<&Agent> {
        self.entity().and_then(|e| e.agents.first())
    }
}

#[cfg(test)]
mod tests {
    use crate::kind;
    use crate::state::tests::read;
    use gx_core::{Method, MockResponse, MockTransport};
    use gx_model::Attribution;
    use serde_json::json;

    #[test]
    fn contributor_is_read_as_agent() {
        let mock = MockTransport::new();
        mock.on(
            Method::GET,
            "https://api.example/persons/P1",
            MockResponse::ok().json(json!({
                "persons": [{ "id": "P1", "attribution": { "contributor": { "resource": "https://api.example/agents/A9" } } }]
            })),
        );
        mock.on(
            Method::GET,
            "https://api.example/agents/A9",
            MockResponse::ok().json(json!({ "agents": [{ "id": "A9" }] })),
        );
        let person = read::<kind::Person>(&mock, "https://api.example/persons/P1");
        let attribution = person.person().and_then(|p| p.attribution.clone()).unwrap();

        let agent = person.read_contributor(&attribution, &[]).unwrap().unwrap();
        assert_eq!(agent.agent().and_then(|a| a.id.as_deref()), Some("A9"));
        assert!(person.read_contributor(&Attribution::default(), &[]).unwrap().is_none());
    }
}
