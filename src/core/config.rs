//! Generator configuration from YAML

use crate::catalog::catalog_resource_type;
use crate::core::{
    error::ConfigurationError,
    fragment::{CollisionHook, LogCollisions, PipelineFragment},
    identifier::Identifier,
    resource::{Resource, ResourceType},
    step::Step,
};
use crate::jobs::{packer_jobs, pulumi::deploy_job_name, pulumi_jobs_chain, PackerOptions};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

/// Top-level generator configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Pipeline name
    pub name: String,

    /// Pipeline version (optional)
    #[serde(default)]
    pub version: Option<String>,

    /// Resource types to pull from the built-in catalog by name
    #[serde(default)]
    pub catalog_resource_types: Vec<String>,

    /// Additional resource types declared inline
    #[serde(default)]
    pub resource_types: Vec<ResourceType>,

    /// External resources, e.g. the git repositories jobs build from
    #[serde(default)]
    pub resources: Vec<Resource>,

    /// Packer image builds
    #[serde(default)]
    pub packer: Vec<PackerBuildConfig>,

    /// Pulumi deployment chains
    #[serde(default)]
    pub pulumi: Vec<PulumiChainConfig>,
}

/// One validate/build pair of packer jobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackerBuildConfig {
    /// Name of the resource holding the packer template
    pub image_code: Identifier,

    /// Steps run before the image code is fetched
    #[serde(default)]
    pub dependencies: Vec<Step>,

    #[serde(flatten)]
    pub options: PackerOptions,
}

/// One chain of deploy jobs, a job per stack
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PulumiChainConfig {
    /// Name of the resource holding the pulumi code
    pub code: Identifier,

    pub project_name: String,

    /// Project location inside the code resource
    pub path: String,

    /// Stacks in promotion order
    pub stack_names: Vec<String>,

    /// Steps run before the code is fetched; only the first stack triggers on them
    #[serde(default)]
    pub dependencies: Vec<Step>,
}

impl PulumiChainConfig {
    fn project_source(&self) -> String {
        format!("{} at {}/{}", self.project_name, self.code, self.path)
    }
}

impl GeneratorConfig {
    /// Load generator configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content)
    }

    /// Parse generator configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: GeneratorConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the generator configuration
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let mut seen = HashSet::new();
        for resource in &self.resources {
            if !seen.insert(&resource.name) {
                return Err(ConfigurationError::DuplicateInput {
                    field: "resource",
                    value: resource.name.to_string(),
                });
            }
        }

        let mut seen = HashSet::new();
        for resource_type in &self.resource_types {
            if !seen.insert(&resource_type.name) {
                return Err(ConfigurationError::DuplicateInput {
                    field: "resource type",
                    value: resource_type.name.to_string(),
                });
            }
        }

        for name in &self.catalog_resource_types {
            if catalog_resource_type(name).is_none() {
                return Err(ConfigurationError::UnknownCatalogType(name.clone()));
            }
        }

        // Packer jobs and their resources have fixed names
        if self.packer.len() > 1 {
            return Err(ConfigurationError::TooManyInputs {
                field: "packer build",
                max: 1,
                found: self.packer.len(),
            });
        }

        for (index, build) in self.packer.iter().enumerate() {
            self.require_resource(&build.image_code, || format!("packer build #{}", index + 1))?;
            build.options.effective_node_types()?;
        }

        for chain in &self.pulumi {
            self.require_resource(&chain.code, || format!("pulumi chain '{}'", chain.project_name))?;
            if chain.stack_names.is_empty() {
                return Err(ConfigurationError::EmptyInput { field: "stack names" });
            }
        }

        self.validate_chains_share_project()?;

        Ok(())
    }

    /// Every chain puts to the one `pulumi-project` resource, so all chains
    /// must deploy the same project and their stacks must not overlap
    fn validate_chains_share_project(&self) -> Result<(), ConfigurationError> {
        let Some(first) = self.pulumi.first() else {
            return Ok(());
        };
        let first_source = first.project_source();

        let mut stack_for_job: HashMap<Identifier, &str> = HashMap::new();
        for chain in &self.pulumi {
            let source = chain.project_source();
            if source != first_source {
                return Err(ConfigurationError::ConflictingInputs {
                    field: "pulumi project",
                    first: first_source,
                    second: source,
                });
            }

            for stack_name in &chain.stack_names {
                let job = deploy_job_name(&chain.project_name, stack_name)?;
                if let Some(previous) = stack_for_job.insert(job.clone(), stack_name) {
                    return Err(ConfigurationError::CollidingStacks {
                        first: previous.to_string(),
                        second: stack_name.clone(),
                        job: job.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    fn require_resource<F>(&self, name: &Identifier, context: F) -> Result<&Resource, ConfigurationError>
    where
        F: FnOnce() -> String,
    {
        self.resources
            .iter()
            .find(|r| &r.name == name)
            .ok_or_else(|| ConfigurationError::UnknownResource {
                context: context(),
                resource: name.to_string(),
            })
    }

    /// Build every fragment the configuration describes and merge them
    pub fn to_fragment(&self) -> Result<PipelineFragment, ConfigurationError> {
        self.to_fragment_with(&mut LogCollisions)
    }

    /// Like [`to_fragment`](Self::to_fragment), reporting merge collisions to `hook`
    pub fn to_fragment_with(&self, hook: &mut dyn CollisionHook) -> Result<PipelineFragment, ConfigurationError> {
        let mut resource_types = Vec::with_capacity(self.catalog_resource_types.len() + self.resource_types.len());
        for name in &self.catalog_resource_types {
            let resource_type = catalog_resource_type(name)
                .ok_or_else(|| ConfigurationError::UnknownCatalogType(name.clone()))??;
            resource_types.push(resource_type);
        }
        resource_types.extend(self.resource_types.iter().cloned());

        let mut fragments = vec![PipelineFragment::with_hook(
            resource_types,
            self.resources.clone(),
            Vec::new(),
            hook,
        )];

        for (index, build) in self.packer.iter().enumerate() {
            let image_code = self.require_resource(&build.image_code, || format!("packer build #{}", index + 1))?;
            fragments.push(packer_jobs(&build.dependencies, image_code, &build.options)?);
        }

        for chain in &self.pulumi {
            let code = self.require_resource(&chain.code, || format!("pulumi chain '{}'", chain.project_name))?;
            fragments.push(pulumi_jobs_chain(
                code,
                &chain.stack_names,
                &chain.project_name,
                &chain.path,
                &chain.dependencies,
            )?);
        }

        debug!("Merging {} fragments for pipeline '{}'", fragments.len(), self.name);
        Ok(PipelineFragment::combine_with(fragments, hook))
    }
}
