// src/types/profile.rs
//! Typed profile document with pass-through of unrecognized keys

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ===== Profile Document =====

/// Known profile fields plus a sidecar of everything else.
///
/// Built from an already validated document, so the typed fields only ever
/// see values of the expected shape. Unknown keys, and known keys given an
/// explicit null, land in `extra` and are written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skills: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<Project>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience: Option<Vec<Experience>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certifications: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    /// description, url, role and anything else
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub company: String,
    pub position: String,
    /// duration, description and anything else
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

const KNOWN_FIELDS: &[&str] = &[
    "name",
    "bio",
    "company",
    "location",
    "email",
    "website",
    "twitter",
    "github",
    "linkedin",
    "skills",
    "languages",
    "projects",
    "experience",
    "education",
    "certifications",
];

impl ProfileDocument {
    /// Convert a validated untyped document into the typed form
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        // Option fields read null as absent; keep the key so it is sent back
        let explicit_nulls: Vec<String> = value
            .as_object()
            .map(|fields| {
                fields
                    .iter()
                    .filter(|(key, v)| v.is_null() && KNOWN_FIELDS.contains(&key.as_str()))
                    .map(|(key, _)| key.clone())
                    .collect()
            })
            .unwrap_or_default();

        let mut document: Self = serde_json::from_value(value)?;
        for key in explicit_nulls {
            document.extra.insert(key, Value::Null);
        }
        Ok(document)
    }
}
