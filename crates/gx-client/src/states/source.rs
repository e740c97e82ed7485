//! Source description states.

use gx_model::{Gedcomx, SourceDescription};

use super::{AgentState, SourceDescriptionState, SourceDescriptionsState};
use crate::error::Result;
use crate::kind;
use crate::options::StateTransitionOption;

impl SourceDescriptionState {
    pub fn source_description(&self) -> Option<&SourceDescription> {
        self.entity().and_then(|e| e.source_descriptions.first())
    }

    /// Replace the description with `description`.
    pub fn update(&self, description: &SourceDescription, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        let body = Gedcomx::with_source_description(description.clone());
        self.post_same(self.self_uri(), &body, options)
    }

    /// Read the agent (archive, publisher) that mediates the source.
    pub fn read_mediator(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<AgentState>> {
        let mediator = self
            .source_description()
            .and_then(|d| d.mediator.as_ref())
            .and_then(|m| m.resource());
        match mediator {
            Some(uri) => self.read_uri::<kind::Agent>(self.resolve(uri)?, options).map(Some),
            None => Ok(None),
        }
    }
}

impl SourceDescriptionsState {
    pub fn source_descriptions(&self) -> &[SourceDescription] {
        self.entity().map(|e| e.source_descriptions.as_slice()).unwrap_or_default()
    }

    /// Create a description in this list.
    pub fn add_source_description(
        &self,
        description: &SourceDescription,
        options: &[&dyn StateTransitionOption],
    ) -> Result<SourceDescriptionState> {
        let body = Gedcomx::with_source_description(description.clone());
        self.post_to_uri::<kind::SourceDescription>(self.self_uri(), &body, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::read;
    use gx_core::{Method, MockResponse, MockTransport};
    use serde_json::json;

    #[test]
    fn mediator_is_resolved_against_the_source() {
        let mock = MockTransport::new();
        mock.on(
            Method::GET,
            "https://api.example/sources/S1",
            MockResponse::ok().json(json!({
                "sourceDescriptions": [{
                    "id": "S1",
                    "titles": [{ "value": "1900 Census" }],
                    "mediator": { "resource": "/agents/A1" }
                }]
            })),
        );
        mock.on(
            Method::GET,
            "https://api.example/agents/A1",
            MockResponse::ok().json(json!({ "agents": [{ "id": "A1", "names": [{ "value": "Archive" }] }] })),
        );
        let source = read::<kind::SourceDescription>(&mock, "https://api.example/sources/S1");
        assert_eq!(source.source_description().and_then(SourceDescription::title), Some("1900 Census"));

        let agent = source.read_mediator(&[]).unwrap().unwrap();
        assert_eq!(agent.agent().and_then(|a| a.name()), Some("Archive"));
    }

    #[test]
    fn add_to_list_posts_to_list_uri() {
        let mock = MockTransport::new();
        mock.on(
            Method::GET,
            "https://api.example/sources",
            MockResponse::ok().json(json!({ "sourceDescriptions": [{ "id": "S1" }] })),
        );
        mock.on(
            Method::POST,
            "https://api.example/sources",
            MockResponse::new(201).header("Location", "https://api.example/sources/S2"),
        );
        let list = read::<kind::SourceDescriptions>(&mock, "https://api.example/sources");
        assert_eq!(list.source_descriptions().len(), 1);

        let created = list
            .add_source_description(&SourceDescription::cited("Birth register", None), &[])
            .unwrap();
        assert_eq!(created.self_uri().as_str(), "https://api.example/sources/S2");
    }
}
