//! # Hypermedia Links
//!
//! A [`Link`] is a plain value: a `rel` naming its role plus either a
//! concrete `href` or an RFC 6570 `template`, and optional hints about what
//! the target accepts. [`Links`] is the rel-keyed table a state carries.
//! Identity inside a table is the rel, so inserting a link whose rel already
//! exists replaces the earlier one. That is the whole merge rule.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::HttpError;
use crate::template;

/// A typed hypermedia link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    /// Semantic role of the link. Absent from the rel-keyed JSON form, where
    /// the key carries it.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub rel: String,
    /// Concrete target URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// RFC 6570 URI template for the target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Media types the target accepts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accept: Option<String>,
    /// Methods the target allows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow: Option<String>,
    /// Language of the target.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hreflang: Option<String>,
    /// Human-readable title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Media type the target returns.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

impl Link {
    /// A link with a concrete href.
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: Some(href.into()),
            ..Self::default()
        }
    }

    /// A templated link.
    pub fn templated(rel: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            template: Some(template.into()),
            ..Self::default()
        }
    }

    /// Builder-style media type hint.
    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Builder-style title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// The rel.
    pub fn rel(&self) -> &str {
        &self.rel
    }

    /// The href, if any.
    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    /// The URI template, if any.
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    /// Parse the href as an absolute URL.
    pub fn url(&self) -> Result<Url, HttpError> {
        let href = self.href.as_deref().ok_or_else(|| HttpError::UnresolvableLink {
            rel: self.rel.clone(),
        })?;
        Url::parse(href).map_err(|source| HttpError::InvalidUrl {
            url: href.to_string(),
            source,
        })
    }

    /// Resolve the target with template variables.
    ///
    /// A templated link is expanded with `vars`; an href-only link ignores
    /// `vars` and returns its href.
    pub fn expand(&self, vars: &[(&str, &str)]) -> Result<Url, HttpError> {
        match self.template.as_deref() {
            Some(tpl) => {
                let expanded = template::expand(tpl, vars);
                Url::parse(&expanded).map_err(|source| HttpError::InvalidUrl {
                    url: expanded,
                    source,
                })
            }
            None => self.url(),
        }
    }
}

/// The rel-keyed link table of a state or entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links {
    by_rel: HashMap<String, Link>,
}

impl Links {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a link by rel.
    pub fn get(&self, rel: &str) -> Option<&Link> {
        self.by_rel.get(rel)
    }

    /// Whether a rel is present.
    pub fn contains(&self, rel: &str) -> bool {
        self.by_rel.contains_key(rel)
    }

    /// Insert a link, replacing any existing link with the same rel.
    pub fn insert(&mut self, link: Link) {
        self.by_rel.insert(link.rel.clone(), link);
    }

    /// Insert every link in order. Later links win.
    pub fn merge<'a, I>(&mut self, links: I)
    where
        I: IntoIterator<Item = &'a Link>,
    {
        for link in links {
            self.insert(link.clone());
        }
    }

    /// Number of distinct rels.
    pub fn len(&self) -> usize {
        self.by_rel.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.by_rel.is_empty()
    }

    /// Iterate over the links in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.by_rel.values()
    }
}

impl FromIterator<Link> for Links {
    fn from_iter<T: IntoIterator<Item = Link>>(iter: T) -> Self {
        let mut links = Links::new();
        for link in iter {
            links.insert(link);
        }
        links
    }
}
