//! Parents, children and spouses of a person.
//!
//! Each of these documents lists the relatives in `persons` and the
//! relationships linking them to the subject in `relationships`.

use gx_model::{Person, Relationship};

use super::{PersonChildrenState, PersonParentsState, PersonSpousesState, PersonState};
use crate::error::Result;
use crate::options::StateTransitionOption;

macro_rules! relatives_state {
    ($state:ty) => {
        impl $state {
            /// The relatives listed in the document.
            pub fn persons(&self) -> &[Person] {
                self.entity().map(|e| e.persons.as_slice()).unwrap_or_default()
            }

            /// The relationships listed in the document.
            pub fn relationships(&self) -> &[Relationship] {
                self.entity().map(|e| e.relationships.as_slice()).unwrap_or_default()
            }

            /// Read one of the listed relatives through its own links.
            pub fn read_person(
                &self,
                person: &Person,
                options: &[&dyn StateTransitionOption],
            ) -> Result<Option<PersonState>> {
                self.read_person_at(person, options)
            }

            /// The listed relationship involving `person`, matched by its
            /// id or URI.
            pub fn relationship_with(&self, person: &Person) -> Option<&Relationship> {
                let id = person.id.as_deref()?;
                self.relationships().iter().find(|r| r.involves(id))
            }
        }
    };
}

relatives_state!(PersonParentsState);
relatives_state!(PersonChildrenState);
relatives_state!(PersonSpousesState);
