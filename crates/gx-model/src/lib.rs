//! # gx-model — GEDCOM X Entity Model
//!
//! Serde model of the documents the hypermedia client parses and sends:
//!
//! - [`Gedcomx`]: the GEDCOM X JSON document (`application/x-gedcomx-v1+json`)
//!   with persons, relationships, source descriptions, agents, places and
//!   collections, plus the FamilySearch extension arrays
//!   (`application/x-fs-v1+json`).
//! - [`Feed`] / [`Entry`]: the Atom JSON wrapper (`application/x-gedcomx-atom+json`)
//!   used for search results, match results and change history.
//! - [`familysearch`]: child-and-parents relationships, discussions, users,
//!   merges and change info.
//!
//! Every linkable object implements [`HasLinks`]. Links are accepted both in
//! the rel-keyed object form GEDCOM X JSON uses and in array form.
//!
//! Only what the client reads or writes is modelled; unknown fields are
//! ignored on input.

pub mod atom;
pub mod common;
pub mod conclusion;
pub mod familysearch;
pub mod gedcomx;
pub mod links;
pub mod source;

pub use atom::{Entry, EntryContent, Feed};
pub use common::{
    Attribution, Date, EvidenceReference, Identifiers, Note, PlaceReference, Qualifier,
    ResourceReference, SourceReference, TextValue,
};
pub use conclusion::{DisplayProperties, Fact, Gender, Name, NameForm, NamePart, Person, Relationship};
pub use familysearch::{
    ChangeInfo, ChildAndParentsRelationship, Comment, Discussion, DiscussionReference, Merge,
    MergeAnalysis, MergeConflict, User,
};
pub use gedcomx::Gedcomx;
pub use gx_core::Link;
pub use links::HasLinks;
pub use source::{Agent, Collection, PlaceDescription, SourceCitation, SourceDescription};

/// Well-known GEDCOM X type URIs.
pub mod types {
    pub const COUPLE: &str = "http://gedcomx.org/Couple";
    pub const PARENT_CHILD: &str = "http://gedcomx.org/ParentChild";

    pub const MALE: &str = "http://gedcomx.org/Male";
    pub const FEMALE: &str = "http://gedcomx.org/Female";
    pub const UNKNOWN_GENDER: &str = "http://gedcomx.org/Unknown";

    pub const BIRTH: &str = "http://gedcomx.org/Birth";
    pub const DEATH: &str = "http://gedcomx.org/Death";
    pub const MARRIAGE: &str = "http://gedcomx.org/Marriage";

    pub const BIRTH_NAME: &str = "http://gedcomx.org/BirthName";
    pub const GIVEN: &str = "http://gedcomx.org/Given";
    pub const SURNAME: &str = "http://gedcomx.org/Surname";

    pub const PRIMARY_IDENTIFIER: &str = "http://gedcomx.org/Primary";
    pub const PERSISTENT_IDENTIFIER: &str = "http://gedcomx.org/Persistent";
}
