//! Error types for pipeline generation

use thiserror::Error;

/// A name that cannot be used as a pipeline identifier
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid identifier '{value}': {reason}")]
pub struct InvalidNameError {
    /// The rejected input
    pub value: String,

    /// Which rule the input broke
    pub reason: String,
}

/// Invalid inputs supplied to a factory or loaded from configuration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error(transparent)]
    InvalidName(#[from] InvalidNameError),

    #[error("{field} must not be empty")]
    EmptyInput { field: &'static str },

    #[error("duplicate {field} '{value}'")]
    DuplicateInput { field: &'static str, value: String },

    #[error("stacks '{first}' and '{second}' both produce job '{job}'")]
    CollidingStacks {
        first: String,
        second: String,
        job: String,
    },

    #[error("at most {max} {field} supported, found {found}")]
    TooManyInputs {
        field: &'static str,
        max: usize,
        found: usize,
    },

    #[error("{field} '{second}' conflicts with '{first}'")]
    ConflictingInputs {
        field: &'static str,
        first: String,
        second: String,
    },

    #[error("{context} references undeclared resource '{resource}'")]
    UnknownResource { context: String, resource: String },

    #[error("no catalog resource type named '{0}'")]
    UnknownCatalogType(String),
}

/// A fragment or document whose cross references do not hold together
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositionError {
    #[error("job '{job}' gets '{resource}' passed '{passed}', but no such job exists")]
    UnknownPassedJob {
        job: String,
        resource: String,
        passed: String,
    },

    #[error("job '{job}' gets '{resource}' passed '{passed}', but '{passed}' never uses '{resource}'")]
    PassedJobMissingResource {
        job: String,
        resource: String,
        passed: String,
    },

    #[error("job '{job}' uses undeclared resource '{resource}'")]
    UnknownResource { job: String, resource: String },

    #[error("resource '{resource}' has undeclared type '{resource_type}'")]
    UnknownResourceType {
        resource: String,
        resource_type: String,
    },

    #[error("cycle in passed constraints involving job '{0}'")]
    PassedCycle(String),

    #[error("conflicting definitions for {kind} '{name}'")]
    ConflictingDefinition { kind: String, name: String },
}

/// Failure encoding the final document
#[derive(Debug, Error)]
pub enum SerializationError {
    #[error("YAML encoding failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Any failure raised while generating a pipeline
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("composition error: {0}")]
    Composition(#[from] CompositionError),

    #[error("serialization error: {0}")]
    Serialization(#[from] SerializationError),
}

impl From<InvalidNameError> for PipelineError {
    fn from(err: InvalidNameError) -> Self {
        PipelineError::Configuration(err.into())
    }
}

pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
