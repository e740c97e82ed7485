//! Atom feed wrapper, JSON serialization (`application/x-gedcomx-atom+json`).
//!
//! Search results, person matches and change history are all feeds whose
//! entries optionally embed a GEDCOM X document as their content.

use gx_core::Link;
use serde::{Deserialize, Serialize};

use crate::familysearch::ChangeInfo;
use crate::gedcomx::Gedcomx;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Total number of results across all pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results: Option<u64>,
    /// Index of the first entry of this page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entries: Vec<Entry>,
    #[serde(default, with = "crate::links", skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryContent {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gedcomx: Option<Gedcomx>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<EntryContent>,
    /// FamilySearch change-history extension.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub change_info: Vec<ChangeInfo>,
    #[serde(default, with = "crate::links", skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl Entry {
    /// The embedded GEDCOM X document, if any.
    pub fn gedcomx(&self) -> Option<&Gedcomx> {
        self.content.as_ref().and_then(|c| c.gedcomx.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HasLinks;

    #[test]
    fn parses_search_feed() {
        let feed: Feed = serde_json::from_value(serde_json::json!({
            "results": 42,
            "index": 0,
            "entries": [{
                "id": "KWQS-BBQ",
                "score": 3.5,
                "confidence": 4,
                "content": { "gedcomx": { "persons": [{ "id": "KWQS-BBQ" }] } },
                "links": { "person": { "href": "https://api.example/persons/KWQS-BBQ" } }
            }],
            "links": { "next": { "href": "https://api.example/search?start=1" } }
        }))
        .unwrap();
        assert_eq!(feed.results, Some(42));
        let entry = &feed.entries[0];
        assert_eq!(entry.gedcomx().and_then(|g| g.person()).and_then(|p| p.id.as_deref()), Some("KWQS-BBQ"));
        assert!(entry.link("person").is_some());
        assert!(feed.link("next").is_some());
    }

    #[test]
    fn parses_change_info() {
        let entry: Entry = serde_json::from_value(serde_json::json!({
            "changeInfo": [{ "operation": "http://familysearch.org/v1/Create", "objectType": "http://gedcomx.org/BirthName" }],
            "links": { "restore": { "href": "https://api.example/changes/1/restore" } }
        }))
        .unwrap();
        assert_eq!(entry.change_info[0].operation.as_deref(), Some("http://familysearch.org/v1/Create"));
        assert!(entry.gedcomx().is_none());
    }
}
