//! Well-known link relations of the GEDCOM X RS vocabulary.
//!
//! These are the wire contract between client and server and are
//! reproduced exactly. FamilySearch adds its own in `gx-familysearch`.

pub const SELF: &str = "self";
pub const NEXT: &str = "next";
pub const PREV: &str = "prev";
pub const FIRST: &str = "first";
pub const LAST: &str = "last";

pub const AGENT: &str = "agent";
pub const ANCESTRY: &str = "ancestry";
pub const ARTIFACTS: &str = "artifacts";
pub const CHILD_RELATIONSHIPS: &str = "child-relationships";
pub const CHILDREN: &str = "children";
pub const COLLECTION: &str = "collection";
pub const CONCLUSION: &str = "conclusion";
pub const CONCLUSIONS: &str = "conclusions";
pub const CURRENT_USER_PERSON: &str = "current-user-person";
pub const CURRENT_USER_RESOURCES: &str = "current-user-resources";
pub const DESCENDANCY: &str = "descendancy";
pub const DESCRIPTION: &str = "description";
pub const EVIDENCE_REFERENCE: &str = "evidence-reference";
pub const EVIDENCE_REFERENCES: &str = "evidence-references";
pub const MEDIA_REFERENCE: &str = "media-reference";
pub const MEDIA_REFERENCES: &str = "media-references";
pub const NOTE: &str = "note";
pub const NOTES: &str = "notes";
pub const PARENT_RELATIONSHIPS: &str = "parent-relationships";
pub const PARENTS: &str = "parents";
pub const PERSON: &str = "person";
pub const PERSON1: &str = "person1";
pub const PERSON2: &str = "person2";
pub const PERSON_SEARCH: &str = "person-search";
pub const PERSONS: &str = "persons";
pub const PLACE: &str = "place";
pub const PLACE_DESCRIPTION: &str = "place-description";
pub const PLACE_SEARCH: &str = "place-search";
pub const PLACES: &str = "places";
pub const RELATIONSHIP: &str = "relationship";
pub const RELATIONSHIPS: &str = "relationships";
pub const SOURCE_DESCRIPTION: &str = "source-description";
pub const SOURCE_DESCRIPTIONS: &str = "source-descriptions";
pub const SOURCE_REFERENCE: &str = "source-reference";
pub const SOURCE_REFERENCES: &str = "source-references";
pub const SPOUSE_RELATIONSHIPS: &str = "spouse-relationships";
pub const SPOUSES: &str = "spouses";
pub const SUBCOLLECTIONS: &str = "subcollections";

/// OAuth2 token endpoint.
pub const OAUTH2_TOKEN: &str = "http://oauth.net/core/2.0/endpoint/token";
/// OAuth2 authorization endpoint.
pub const OAUTH2_AUTHORIZE: &str = "http://oauth.net/core/2.0/endpoint/authorize";
