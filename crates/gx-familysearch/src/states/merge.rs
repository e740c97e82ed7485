//! # Duplicate Matching and Merging
//!
//! A person's `matches` feed lists possible duplicates. Each entry is
//! either analysed for a merge (survivor is the person, duplicate is the
//! entry) or declared not a match, which moves it to the person's
//! non-matches list. A merge is carried out by POSTing the chosen
//! [`Merge`] back to the analysis resource.

use gx_client::{Result, StateTransitionOption};
use gx_core::Method;
use gx_model::{Entry, Gedcomx, HasLinks, Merge, MergeAnalysis, Person};

use super::{fs_request, missing, PersonMatchResultsState, PersonMergeState, PersonNonMatchesState};
use crate::{kind, rel};

/// Operations on a person's possible duplicates.
pub trait PersonMatchResultsStateExt {
    fn entries(&self) -> &[Entry];

    /// The merge analysis for the duplicate described by `entry`.
    fn read_merge(&self, entry: &Entry, options: &[&dyn StateTransitionOption]) -> Result<PersonMergeState>;

    /// Declare the duplicate described by `entry` not a match.
    fn add_non_match(&self, entry: &Entry, options: &[&dyn StateTransitionOption]) -> Result<PersonNonMatchesState>;
}

/// Operations on a merge analysis.
pub trait PersonMergeStateExt: Sized {
    fn merge_analysis(&self) -> Option<&MergeAnalysis>;

    /// Carry out `merge`.
    fn merge(&self, merge: &Merge, options: &[&dyn StateTransitionOption]) -> Result<Self>;
}

/// Operations on a person's declared non-matches.
pub trait PersonNonMatchesStateExt: Sized {
    fn persons(&self) -> &[Person];

    /// Withdraw the non-match declaration for `person`.
    fn remove_non_match(&self, person: &Person, options: &[&dyn StateTransitionOption]) -> Result<Self>;
}

impl PersonMatchResultsStateExt for PersonMatchResultsState {
    fn entries(&self) -> &[Entry] {
        self.entity().map(|f| f.entries.as_slice()).unwrap_or_default()
    }

    fn read_merge(&self, entry: &Entry, options: &[&dyn StateTransitionOption]) -> Result<PersonMergeState> {
        let link = entry
            .link(rel::MERGE)
            .or_else(|| self.link(rel::MERGE))
            .ok_or_else(|| missing(self, rel::MERGE))?;
        let duplicate = entry.id.as_deref().unwrap_or_default();
        let request = fs_request(self, Method::GET, link.expand(&[("dpid", duplicate)])?)?;
        self.transition::<kind::PersonMerge>(request, options)
    }

    fn add_non_match(&self, entry: &Entry, options: &[&dyn StateTransitionOption]) -> Result<PersonNonMatchesState> {
        let link = entry
            .link(rel::NOT_A_MATCH)
            .or_else(|| self.link(rel::NON_MATCHES))
            .ok_or_else(|| missing(self, rel::NON_MATCHES))?;
        let duplicate = Person {
            id: entry.id.clone(),
            ..Person::default()
        };
        let mut request = fs_request(self, Method::POST, link.url()?)?;
        request.set_json_body(&Gedcomx::with_person(duplicate))?;
        self.transition::<kind::PersonNonMatches>(request, options)
    }
}

impl PersonMergeStateExt for PersonMergeState {
    fn merge_analysis(&self) -> Option<&MergeAnalysis> {
        self.entity().and_then(|g| g.merge_analyses.first())
    }

    fn merge(&self, merge: &Merge, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        let body = Gedcomx {
            merges: vec![merge.clone()],
            ..Gedcomx::default()
        };
        let mut request = fs_request(self, Method::POST, self.self_uri())?;
        request.set_json_body(&body)?;
        tracing::info!(uri = %self.self_uri(), "merging persons");
        self.transition_same(request, options)
    }
}

impl PersonNonMatchesStateExt for PersonNonMatchesState {
    fn persons(&self) -> &[Person] {
        self.entity().map(|g| g.persons.as_slice()).unwrap_or_default()
    }

    fn remove_non_match(&self, person: &Person, options: &[&dyn StateTransitionOption]) -> Result<Self> {
        self.delete_linked(person, rel::NOT_A_MATCH, options)
    }
}
