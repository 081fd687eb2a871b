//! pipeline-composer - composable Concourse pipeline fragments

pub mod catalog;
pub mod cli;
pub mod core;
pub mod jobs;
pub mod render;

// Re-export commonly used types
pub use crate::core::{Identifier, Job, PipelineFragment, Resource, ResourceType, Step};
pub use crate::core::{CompositionError, ConfigurationError, PipelineError, PipelineResult, SerializationError};
pub use jobs::{packer_jobs, pulumi_job, pulumi_jobs_chain, PackerOptions};
pub use render::{OutputFormat, PipelineDocument};
