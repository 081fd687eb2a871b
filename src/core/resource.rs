//! Resource and resource type declarations

use crate::core::identifier::Identifier;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::hash::{Hash, Hasher};

/// A named pipeline entity that fragments deduplicate by name
pub trait Declaration {
    /// What kind of entity this is, for diagnostics
    const KIND: &'static str;

    /// The identity of this declaration
    fn name(&self) -> &Identifier;

    /// Whether every field, not only the name, matches `other`
    fn same_definition(&self, other: &Self) -> bool;
}

/// A custom resource type made available to the pipeline's resources
///
/// Equality and hashing consider only `name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceType {
    pub name: Identifier,

    /// Type of the resource type itself, normally `registry-image`
    #[serde(rename = "type")]
    pub kind: String,

    /// Opaque source configuration, passed through as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,

    /// Default params for every `get` of resources of this type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl ResourceType {
    pub fn new(name: Identifier, kind: impl Into<String>, source: Option<Value>) -> Self {
        Self {
            name,
            kind: kind.into(),
            source,
            params: None,
        }
    }
}

impl Declaration for ResourceType {
    const KIND: &'static str = "resource type";

    fn name(&self) -> &Identifier {
        &self.name
    }

    fn same_definition(&self, other: &Self) -> bool {
        self.name == other.name
            && self.kind == other.kind
            && self.source == other.source
            && self.params == other.params
    }
}

impl PartialEq for ResourceType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ResourceType {}

impl Hash for ResourceType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

/// An external dependency the pipeline can fetch or push
///
/// Equality and hashing consider only `name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub name: Identifier,

    /// Name of a declared resource type or a core Concourse type
    #[serde(rename = "type")]
    pub kind: String,

    /// Opaque source configuration, passed through as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,

    /// Polling interval, e.g. `1h`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check_every: Option<String>,
}

impl Resource {
    pub fn new(name: Identifier, kind: impl Into<String>, source: Option<Value>) -> Self {
        Self {
            name,
            kind: kind.into(),
            source,
            icon: None,
            check_every: None,
        }
    }

    /// Set the icon shown for this resource in the web UI
    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_check_every(mut self, interval: impl Into<String>) -> Self {
        self.check_every = Some(interval.into());
        self
    }
}

impl Declaration for Resource {
    const KIND: &'static str = "resource";

    fn name(&self) -> &Identifier {
        &self.name
    }

    fn same_definition(&self, other: &Self) -> bool {
        self.name == other.name
            && self.kind == other.kind
            && self.source == other.source
            && self.icon == other.icon
            && self.check_every == other.check_every
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Resource {}

impl Hash for Resource {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}
