use gx_core::rel;
use gx_model::PlaceDescription;

use super::{PlaceDescriptionState, PlaceDescriptionsState};
use crate::error::Result;
use crate::kind;
use crate::options::StateTransitionOption;

impl PlaceDescriptionState {
    /// The place this state describes.
    pub fn place(&self) -> Option<&PlaceDescription> {
        self.entity().and_then(|e| e.places.first())
    }

    /// Read the places within this one.
    pub fn read_children(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<PlaceDescriptionsState>> {
        self.follow::<kind::PlaceDescriptions>(rel::CHILDREN, options)
    }

    /// Read the enclosing jurisdiction.
    pub fn read_jurisdiction(&self, options: &[&dyn StateTransitionOption]) -> Result<Option<PlaceDescriptionState>> {
        let jurisdiction = self
            .place()
            .and_then(|p| p.jurisdiction.as_ref())
            .and_then(|j| j.resource());
        match jurisdiction {
            Some(uri) => self.read_uri::<kind::PlaceDescription>(self.resolve(uri)?, options).map(Some),
            None => Ok(None),
        }
    }
}

impl PlaceDescriptionsState {
    pub fn places(&self) -> &[PlaceDescription] {
        self.entity().map(|e| e.places.as_slice()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use crate::kind;
    use crate::state::tests::read;
    use gx_core::{Method, MockResponse, MockTransport};
    use serde_json::json;

    #[test]
    fn children_and_jurisdiction() {
        let mock = MockTransport::new();
        mock.on(
            Method::GET,
            "https://api.example/places/2",
            MockResponse::ok().json(json!({
                "places": [{
                    "id": "2",
                    "names": [{ "value": "Utah" }],
                    "latitude": 39.5,
                    "longitude": -111.5,
                    "jurisdiction": { "resource": "https://api.example/places/1" },
                    "links": { "children": { "href": "https://api.example/places/2/children" } }
                }]
            })),
        );
        mock.on(
            Method::GET,
            "https://api.example/places/2/children",
            MockResponse::ok().json(json!({ "places": [{ "id": "3" }, { "id": "4" }] })),
        );
        mock.on(
            Method::GET,
            "https://api.example/places/1",
            MockResponse::ok().json(json!({ "places": [{ "id": "1", "names": [{ "value": "United States" }] }] })),
        );
        let utah = read::<kind::PlaceDescription>(&mock, "https://api.example/places/2");
        assert_eq!(utah.place().and_then(|p| p.latitude), Some(39.5));

        let children = utah.read_children(&[]).unwrap().unwrap();
        assert_eq!(children.places().len(), 2);

        let country = utah.read_jurisdiction(&[]).unwrap().unwrap();
        assert_eq!(country.place().and_then(|p| p.name()), Some("United States"));
    }
}
