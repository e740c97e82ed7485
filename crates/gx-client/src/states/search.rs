//! # Search
//!
//! Person and place search go through templated links on the collection
//! and return Atom feeds. [`PersonSearchQuery`] builds the `q` parameter of
//! the person search in the platform syntax: space-separated `name:value`
//! terms, values with whitespace quoted, and a trailing `~` marking a term
//! as approximate.

use std::fmt;

use gx_core::rel;
use gx_model::{Entry, Feed, HasLinks};

use super::{PersonSearchResultsState, PersonState, PlaceDescriptionState, PlaceSearchResultsState};
use crate::error::Result;
use crate::kind;
use crate::options::StateTransitionOption;

// ─── Query builder ───────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
struct SearchTerm {
    name: String,
    value: String,
    approximate: bool,
}

impl fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.name)?;
        if self.value.chars().any(char::is_whitespace) {
            write!(f, "\"{}\"", self.value.replace('"', "\\\""))?;
        } else {
            f.write_str(&self.value.replace('"', "\\\""))?;
        }
        if self.approximate {
            f.write_str("~")?;
        }
        Ok(())
    }
}

/// A person search query.
///
/// ```ignore
/// let query = PersonSearchQuery::new()
///     .given_name("John").approximate()
///     .surname("Van Buren")
///     .birth_place("New York");
/// assert_eq!(query.build(), r#"givenName:John~ surname:"Van Buren" birthPlace:"New York""#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonSearchQuery {
    terms: Vec<SearchTerm>,
}

macro_rules! search_params {
    ($($method:ident => $param:literal),+ $(,)?) => {
        impl PersonSearchQuery {
            $(
                #[doc = concat!("Add a `", $param, "` term.")]
                pub fn $method(self, value: impl Into<String>) -> Self {
                    self.param($param, value)
                }
            )+
        }
    };
}

search_params! {
    name => "name",
    given_name => "givenName",
    surname => "surname",
    gender => "gender",
    birth_date => "birthDate",
    birth_place => "birthPlace",
    death_date => "deathDate",
    death_place => "deathPlace",
    marriage_date => "marriageDate",
    marriage_place => "marriagePlace",
    father_name => "fatherName",
    father_given_name => "fatherGivenName",
    father_surname => "fatherSurname",
    mother_name => "motherName",
    mother_given_name => "motherGivenName",
    mother_surname => "motherSurname",
    spouse_name => "spouseName",
    spouse_given_name => "spouseGivenName",
    spouse_surname => "spouseSurname",
}

impl PersonSearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an arbitrary `name:value` term.
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.terms.push(SearchTerm {
            name: name.into(),
            value: value.into(),
            approximate: false,
        });
        self
    }

    /// Mark the most recently added term as approximate.
    pub fn approximate(mut self) -> Self {
        if let Some(term) = self.terms.last_mut() {
            term.approximate = true;
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// The query string in platform syntax.
    pub fn build(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for PersonSearchQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, term) in self.terms.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{term}")?;
        }
        Ok(())
    }
}

// ─── Result states ───────────────────────────────────────────────────

fn feed_entries(feed: Option<&Feed>) -> &[Entry] {
    feed.map(|f| f.entries.as_slice()).unwrap_or_default()
}

impl PersonSearchResultsState {
    /// Entries of this page.
    pub fn entries(&self) -> &[Entry] {
        feed_entries(self.entity())
    }

    /// Total number of results across all pages.
    pub fn total_results(&self) -> Option<u64> {
        self.entity().and_then(|f| f.results)
    }

    /// Read the person behind a result entry, through its `person` link or
    /// else its `self` link.
    pub fn read_person(&self, entry: &Entry, options: &[&dyn StateTransitionOption]) -> Result<Option<PersonState>> {
        match entry.link(rel::PERSON).or_else(|| entry.link(rel::SELF)) {
            Some(link) => self.follow_link::<kind::Person>(link, options).map(Some),
            None => Ok(None),
        }
    }
}

impl PlaceSearchResultsState {
    /// Entries of this page.
    pub fn entries(&self) -> &[Entry] {
        feed_entries(self.entity())
    }

    /// Read the place behind a result entry, through its `description` link
    /// or else its `self` link.
    pub fn read_place_description(
        &self,
        entry: &Entry,
        options: &[&dyn StateTransitionOption],
    ) -> Result<Option<PlaceDescriptionState>> {
        match entry.link(rel::DESCRIPTION).or_else(|| entry.link(rel::SELF)) {
            Some(link) => self.follow_link::<kind::PlaceDescription>(link, options).map(Some),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::tests::read;
    use gx_core::{Method, MockResponse, MockTransport};
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn query_syntax() {
        let query = PersonSearchQuery::new()
            .given_name("John")
            .approximate()
            .surname("Van Buren")
            .birth_place("New York")
            .param("custom", "say \"hi\"");
        assert_eq!(
            query.build(),
            r#"givenName:John~ surname:"Van Buren" birthPlace:"New York" custom:"say \"hi\"""#
        );
    }

    #[test]
    fn approximate_on_empty_query_is_a_no_op() {
        let query = PersonSearchQuery::new().approximate();
        assert!(query.is_empty());
        assert_eq!(query.build(), "");
    }

    proptest! {
        #[test]
        fn bare_values_are_not_quoted(value in "[A-Za-z0-9'.-]{1,16}") {
            prop_assert_eq!(PersonSearchQuery::new().surname(value.clone()).build(), format!("surname:{value}"));
        }

        #[test]
        fn spaced_values_are_quoted(first in "[A-Za-z]{1,8}", last in "[A-Za-z]{1,8}") {
            let built = PersonSearchQuery::new().name(format!("{first} {last}")).approximate().build();
            prop_assert_eq!(built, format!("name:\"{first} {last}\"~"));
        }
    }

    #[test]
    fn entries_resolve_to_persons() {
        let mock = MockTransport::new();
        mock.on(
            Method::GET,
            "https://api.example/search",
            MockResponse::ok().json(json!({
                "results": 42,
                "entries": [
                    { "id": "P1", "score": 4.5, "links": { "person": { "href": "https://api.example/persons/P1" } } },
                    { "id": "P2" }
                ]
            })),
        );
        mock.on(
            Method::GET,
            "https://api.example/persons/P1",
            MockResponse::ok().json(json!({ "persons": [{ "id": "P1" }] })),
        );
        let results = read::<kind::PersonSearchResults>(&mock, "https://api.example/search");
        assert_eq!(results.total_results(), Some(42));

        let entries = results.entries().to_vec();
        let person = results.read_person(&entries[0], &[]).unwrap().unwrap();
        assert_eq!(person.person_id(), Some("P1"));
        assert!(results.read_person(&entries[1], &[]).unwrap().is_none());
    }

    #[test]
    fn place_entries_follow_description() {
        let mock = MockTransport::new();
        mock.on(
            Method::GET,
            "https://api.example/places/search",
            MockResponse::ok().json(json!({
                "entries": [{ "id": "1", "links": { "description": { "href": "https://api.example/places/1" } } }]
            })),
        );
        mock.on(
            Method::GET,
            "https://api.example/places/1",
            MockResponse::ok().json(json!({ "places": [{ "id": "1", "names": [{ "value": "Paris" }] }] })),
        );
        let results = read::<kind::PlaceSearchResults>(&mock, "https://api.example/places/search");
        let entry = results.entries()[0].clone();
        let place = results.read_place_description(&entry, &[]).unwrap().unwrap();
        assert_eq!(place.place().and_then(|p| p.name()), Some("Paris"));
    }
}
