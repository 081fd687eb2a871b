//! Final pipeline document emission

pub mod validation;

use crate::core::{
    config::GeneratorConfig,
    error::{CompositionError, PipelineResult, SerializationError},
    fragment::{CollectConflicts, PipelineFragment},
    job::Job,
    resource::{Resource, ResourceType},
};
use serde::Serialize;
use std::fmt;
use tracing::info;

pub use validation::validate_fragment;

/// Output format of the rendered document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Yaml => f.write_str("yaml"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

/// A complete pipeline definition, ready for the CI server
///
/// Only obtainable from a fragment whose cross references all resolve.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineDocument {
    resource_types: Vec<ResourceType>,
    resources: Vec<Resource>,
    jobs: Vec<Job>,
}

impl PipelineDocument {
    /// Validate `fragment` and turn it into a document
    pub fn from_fragment(fragment: PipelineFragment) -> Result<Self, CompositionError> {
        validate_fragment(&fragment)?;

        let (resource_types, resources, jobs) = fragment.into_parts();
        info!(
            "Pipeline document has {} resource types, {} resources and {} jobs",
            resource_types.len(),
            resources.len(),
            jobs.len()
        );

        Ok(Self {
            resource_types,
            resources,
            jobs,
        })
    }

    pub fn resource_types(&self) -> &[ResourceType] {
        &self.resource_types
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn to_yaml(&self) -> Result<String, SerializationError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn to_json(&self) -> Result<String, SerializationError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn render(&self, format: OutputFormat) -> Result<String, SerializationError> {
        match format {
            OutputFormat::Yaml => self.to_yaml(),
            OutputFormat::Json => self.to_json(),
        }
    }
}

impl TryFrom<PipelineFragment> for PipelineDocument {
    type Error = CompositionError;

    fn try_from(fragment: PipelineFragment) -> Result<Self, Self::Error> {
        Self::from_fragment(fragment)
    }
}

/// Generate the document a configuration describes
///
/// In `strict` mode two different definitions sharing a name are an error
/// instead of a warning.
pub fn build_document(config: &GeneratorConfig, strict: bool) -> PipelineResult<PipelineDocument> {
    let fragment = if strict {
        let mut conflicts = CollectConflicts::new();
        let fragment = config.to_fragment_with(&mut conflicts)?;
        conflicts.into_result()?;
        fragment
    } else {
        config.to_fragment()?
    };

    Ok(PipelineDocument::from_fragment(fragment)?)
}
