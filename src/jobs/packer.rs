//! Validate-then-build jobs for packer image templates

use crate::catalog::{packer_build, packer_build_resource, packer_validate, packer_validate_resource};
use crate::core::{
    error::ConfigurationError,
    fragment::PipelineFragment,
    identifier::Identifier,
    job::Job,
    resource::Resource,
    step::{GetStep, InParallelStep, PutStep, Step},
};
use crate::jobs::AWS_REGION;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

pub const VALIDATE_JOB: &str = "validate-packer-template";
pub const BUILD_JOB: &str = "build-packer-template";

/// Node type used when none are given
pub const DEFAULT_NODE_TYPE: &str = "server";

pub const DEFAULT_TEMPLATE_PATH: &str = "src/bilder/images/.";

fn default_template_path() -> String {
    DEFAULT_TEMPLATE_PATH.to_string()
}

/// Knobs for [`packer_jobs`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackerOptions {
    /// Template path, relative to the root of the image code resource
    #[serde(default = "default_template_path")]
    pub template_path: String,

    /// Deployable variants, each validated and built separately
    #[serde(default)]
    pub node_types: Vec<String>,

    /// Template vars shared by every node type
    #[serde(default)]
    pub vars: BTreeMap<String, String>,

    /// Environment variables for the build, read from files in the build inputs
    #[serde(default)]
    pub env_vars_from_files: BTreeMap<String, String>,

    /// Extra put params merged into every validate and build action
    #[serde(default)]
    pub extra_params: Map<String, Value>,
}

impl Default for PackerOptions {
    fn default() -> Self {
        Self {
            template_path: default_template_path(),
            node_types: Vec::new(),
            vars: BTreeMap::new(),
            env_vars_from_files: BTreeMap::new(),
            extra_params: Map::new(),
        }
    }
}

impl PackerOptions {
    /// The node types to build, falling back to the default variant
    pub fn effective_node_types(&self) -> Result<Vec<&str>, ConfigurationError> {
        if self.node_types.is_empty() {
            return Ok(vec![DEFAULT_NODE_TYPE]);
        }

        let mut seen = HashSet::new();
        for node_type in &self.node_types {
            if node_type.is_empty() {
                return Err(ConfigurationError::EmptyInput { field: "node type" });
            }
            if !seen.insert(node_type.as_str()) {
                return Err(ConfigurationError::DuplicateInput {
                    field: "node type",
                    value: node_type.clone(),
                });
            }
        }

        Ok(self.node_types.iter().map(String::as_str).collect())
    }

    fn vars_for(&self, node_type: &str) -> Value {
        let mut vars: Map<String, Value> = self
            .vars
            .iter()
            .map(|(k, v)| (k.clone(), Value::String(v.clone())))
            .collect();
        vars.insert("node_type".to_string(), json!(node_type));
        Value::Object(vars)
    }
}

#[derive(Clone, Copy)]
enum Objective {
    Validate,
    Build,
}

fn put_params(image_code: &Resource, options: &PackerOptions, node_type: &str, objective: Objective) -> Value {
    let mut params = Map::new();
    params.insert(
        "template".to_string(),
        json!(format!("{}/{}", image_code.name, options.template_path)),
    );

    match objective {
        Objective::Validate => {
            params.insert("objective".to_string(), json!("validate"));
            params.insert("vars".to_string(), options.vars_for(node_type));
        }
        Objective::Build => {
            params.insert("objective".to_string(), json!("build"));
            params.insert("vars".to_string(), options.vars_for(node_type));
            params.insert(
                "env_vars".to_string(),
                json!({
                    "AWS_REGION": AWS_REGION,
                    "PYTHONPATH": format!("${{PYTHONPATH}}:{}/src", image_code.name),
                }),
            );
            params.insert("env_vars_from_files".to_string(), json!(options.env_vars_from_files));
        }
    }

    for (key, value) in &options.extra_params {
        params.insert(key.clone(), value.clone());
    }

    Value::Object(params)
}

/// Build the `validate-packer-template` and `build-packer-template` jobs
///
/// Each plan runs `dependencies`, then a triggering get of `image_code`, then one
/// put per node type in parallel. The build job's get only accepts versions of
/// `image_code` that passed the validate job.
pub fn packer_jobs(
    dependencies: &[Step],
    image_code: &Resource,
    options: &PackerOptions,
) -> Result<PipelineFragment, ConfigurationError> {
    let node_types = options.effective_node_types()?;

    let validate_type = packer_validate()?;
    let build_type = packer_build()?;
    let validate_resource = packer_validate_resource()?;
    let build_resource = packer_build_resource()?;

    let puts = |resource: &Resource, objective: Objective| -> Step {
        InParallelStep::new(
            node_types
                .iter()
                .map(|node_type| {
                    PutStep::new(resource.name.clone())
                        .with_params(put_params(image_code, options, node_type, objective))
                        .into()
                })
                .collect(),
        )
        .into()
    };

    let mut validate_plan = dependencies.to_vec();
    validate_plan.push(GetStep::new(image_code.name.clone()).with_trigger(true).into());
    validate_plan.push(puts(&validate_resource, Objective::Validate));
    let validate_job = Job::new(Identifier::new(VALIDATE_JOB)?, validate_plan);

    let mut build_plan = dependencies.to_vec();
    build_plan.push(
        GetStep::new(image_code.name.clone())
            .with_trigger(true)
            .with_passed(vec![validate_job.name.clone()])
            .into(),
    );
    build_plan.push(puts(&build_resource, Objective::Build));
    let build_job = Job::new(Identifier::new(BUILD_JOB)?, build_plan);

    debug!(
        "Generated packer jobs for '{}' with node types {:?}",
        image_code.name, node_types
    );

    Ok(PipelineFragment::new(
        vec![validate_type, build_type],
        vec![validate_resource, build_resource],
        vec![validate_job, build_job],
    ))
}
