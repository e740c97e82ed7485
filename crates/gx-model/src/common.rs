//! Shared value types: references, attribution, notes, dates, places.

use std::collections::BTreeMap;

use gx_core::Link;
use serde::{Deserialize, Serialize};

/// Identifiers keyed by identifier type URI, as GEDCOM X JSON writes them.
pub type Identifiers = BTreeMap<String, Vec<String>>;

/// A reference to another resource by URI, optionally by local id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
}

impl ResourceReference {
    /// Reference a resource by URI.
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: Some(resource.into()),
            resource_id: None,
        }
    }

    /// Reference a resource by URI and local id.
    pub fn with_id(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource: Some(resource.into()),
            resource_id: Some(id.into()),
        }
    }

    pub fn resource(&self) -> Option<&str> {
        self.resource.as_deref()
    }
}

/// Who changed something, when, and why.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribution {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributor: Option<ResourceReference>,
    /// Milliseconds since the epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub change_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<ResourceReference>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
}

impl Attribution {
    /// An attribution carrying only a change message.
    pub fn with_change_message(message: impl Into<String>) -> Self {
        Self {
            change_message: Some(message.into()),
            ..Self::default()
        }
    }
}

/// A localized text value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default)]
    pub value: String,
}

impl TextValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            lang: None,
            value: value.into(),
        }
    }
}

/// A qualifier on a fact or source reference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Qualifier {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<Attribution>,
    #[serde(default, with = "crate::links", skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

/// A reference from a conclusion to the source description supporting it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<Attribution>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qualifiers: Vec<Qualifier>,
    #[serde(default, with = "crate::links", skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

impl SourceReference {
    /// Reference the source description at `uri`.
    pub fn to(uri: impl Into<String>) -> Self {
        Self {
            description: Some(uri.into()),
            ..Self::default()
        }
    }
}

/// A reference to a persona or other subject used as evidence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<Attribution>,
    #[serde(default, with = "crate::links", skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Date {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formal: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub normalized: Vec<TextValue>,
}

impl Date {
    pub fn original(value: impl Into<String>) -> Self {
        Self {
            original: Some(value.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original: Option<String>,
    /// URI of the place description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_ref: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub normalized: Vec<TextValue>,
}

impl PlaceReference {
    pub fn original(value: impl Into<String>) -> Self {
        Self {
            original: Some(value.into()),
            ..Self::default()
        }
    }
}
