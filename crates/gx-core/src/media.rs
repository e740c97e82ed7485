//! Media types used on the wire. These strings are part of the server
//! contract and must not change.

/// GEDCOM X JSON document.
pub const GEDCOMX_JSON: &str = "application/x-gedcomx-v1+json";

/// GEDCOM X Atom feed, JSON serialization.
pub const ATOM_JSON: &str = "application/x-gedcomx-atom+json";

/// FamilySearch platform extension document.
pub const FAMILYSEARCH_JSON: &str = "application/x-fs-v1+json";

/// Plain JSON, as returned by the OAuth2 token endpoint.
pub const JSON: &str = "application/json";

/// HTML form encoding, as sent to the OAuth2 token endpoint.
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
