//! Link serde and the [`HasLinks`] capability.
//!
//! GEDCOM X JSON writes links as an object keyed by rel:
//!
//! ```json
//! "links": { "self": { "href": "https://..." }, "person-search": { "template": "..." } }
//! ```
//!
//! Some producers emit an array of links carrying their own `rel`. Both are
//! accepted; output always uses the keyed form.

use std::collections::BTreeMap;

use gx_core::Link;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serializer};

/// An object exposing hypermedia links.
pub trait HasLinks {
    /// Links in document order.
    fn links(&self) -> &[Link];

    /// First link with `rel`.
    fn link(&self, rel: &str) -> Option<&Link> {
        self.links().iter().find(|l| l.rel == rel)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LinksRepr {
    Keyed(BTreeMap<String, Link>),
    List(Vec<Link>),
}

pub(crate) fn serialize<S: Serializer>(links: &[Link], serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(links.len()))?;
    for link in links {
        let body = Link {
            rel: String::new(),
            ..link.clone()
        };
        map.serialize_entry(&link.rel, &body)?;
    }
    map.end()
}

pub(crate) fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Link>, D::Error> {
    Ok(match Option::<LinksRepr>::deserialize(deserializer)? {
        Some(LinksRepr::Keyed(map)) => map
            .into_iter()
            .map(|(rel, mut link)| {
                if link.rel.is_empty() {
                    link.rel = rel;
                }
                link
            })
            .collect(),
        Some(LinksRepr::List(list)) => list,
        None => Vec::new(),
    })
}

macro_rules! impl_has_links {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl HasLinks for $ty {
                fn links(&self) -> &[Link] {
                    &self.links
                }
            }
        )+
    };
}

impl_has_links!(
    crate::Gedcomx,
    crate::Feed,
    crate::Entry,
    crate::Person,
    crate::Relationship,
    crate::Name,
    crate::Fact,
    crate::Gender,
    crate::Note,
    crate::SourceReference,
    crate::EvidenceReference,
    crate::SourceDescription,
    crate::Agent,
    crate::PlaceDescription,
    crate::Collection,
    crate::ChildAndParentsRelationship,
    crate::Discussion,
    crate::DiscussionReference,
    crate::Comment,
    crate::User,
);
