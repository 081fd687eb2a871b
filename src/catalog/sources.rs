//! Typed builders for opaque `source` payloads

use serde_json::{json, Map, Value};

/// Coordinates of a container image in a registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryImage {
    pub repository: String,
    pub tag: Option<String>,
}

impl RegistryImage {
    pub fn new(repository: impl Into<String>) -> Self {
        Self {
            repository: repository.into(),
            tag: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn to_source(&self) -> Value {
        let mut source = Map::new();
        source.insert("repository".to_string(), json!(self.repository));
        if let Some(tag) = &self.tag {
            source.insert("tag".to_string(), json!(tag));
        }
        Value::Object(source)
    }
}

/// Source of a `git` resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSource {
    pub uri: String,
    pub branch: String,
    pub paths: Vec<String>,
    pub ignore_paths: Vec<String>,
}

impl GitSource {
    /// Track `uri` on the `main` branch
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            branch: "main".to_string(),
            paths: Vec::new(),
            ignore_paths: Vec::new(),
        }
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    /// Only trigger on changes under these paths
    pub fn with_paths(mut self, paths: Vec<String>) -> Self {
        self.paths = paths;
        self
    }

    pub fn with_ignore_paths(mut self, ignore_paths: Vec<String>) -> Self {
        self.ignore_paths = ignore_paths;
        self
    }

    pub fn to_source(&self) -> Value {
        let mut source = Map::new();
        source.insert("uri".to_string(), json!(self.uri));
        source.insert("branch".to_string(), json!(self.branch));
        if !self.paths.is_empty() {
            source.insert("paths".to_string(), json!(self.paths));
        }
        if !self.ignore_paths.is_empty() {
            source.insert("ignore_paths".to_string(), json!(self.ignore_paths));
        }
        Value::Object(source)
    }
}
