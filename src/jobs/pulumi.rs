//! Pulumi deployment jobs and stack-by-stack promotion chains

use crate::catalog::{pulumi_provisioner, pulumi_provisioner_resource, RegistryImage, REGISTRY_IMAGE};
use crate::core::{
    error::ConfigurationError,
    fragment::PipelineFragment,
    identifier::Identifier,
    job::Job,
    resource::Resource,
    step::{AnonymousResource, Command, GetStep, Platform, PutStep, Step, TaskConfig, TaskInput, TaskOutput, TaskStep},
};
use crate::jobs::AWS_REGION;
use serde_json::json;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, info};

pub const PULUMI_RESOURCE: &str = "pulumi-project";
pub const AWS_CREDS_TASK: &str = "set-aws-creds";
pub const AWS_CREDS_OUTPUT: &str = "aws_creds";

/// Name of the job deploying `stack_name` of `project_name`
pub fn deploy_job_name(project_name: &str, stack_name: &str) -> Result<Identifier, ConfigurationError> {
    Ok(Identifier::new(format!(
        "deploy-{}-{}",
        project_name,
        stack_name.to_lowercase()
    ))?)
}

fn aws_creds_task(code: &Resource) -> Result<Step, ConfigurationError> {
    Ok(TaskStep {
        name: Identifier::new(AWS_CREDS_TASK)?,
        config: TaskConfig {
            platform: Platform::Linux,
            image_resource: Some(AnonymousResource {
                kind: REGISTRY_IMAGE.to_string(),
                source: RegistryImage::new("amazon/aws-cli").to_source(),
            }),
            inputs: vec![TaskInput {
                name: code.name.clone(),
                path: None,
            }],
            outputs: vec![TaskOutput {
                name: Identifier::new(AWS_CREDS_OUTPUT)?,
                path: None,
            }],
            params: BTreeMap::new(),
            run: Command {
                path: format!(
                    "{}/pipelines/infrastructure/scripts/generate_aws_config_from_instance_profile.sh",
                    code.name
                ),
                args: Vec::new(),
                dir: None,
            },
        },
    }
    .into())
}

/// Build the job that runs `pulumi up` for one stack
///
/// With a `previous_job`, the get of `code` is gated on it and does not trigger;
/// without one, the get triggers on every new version.
pub fn pulumi_job(
    code: &Resource,
    stack_name: &str,
    project_name: &str,
    project_source_path: &str,
    dependencies: &[Step],
    previous_job: Option<&Job>,
) -> Result<PipelineFragment, ConfigurationError> {
    if stack_name.is_empty() {
        return Err(ConfigurationError::EmptyInput { field: "stack name" });
    }

    let provisioner_type = pulumi_provisioner_resource()?;
    let provisioner = pulumi_provisioner(
        Identifier::new(PULUMI_RESOURCE)?,
        project_name,
        &format!("{}/{}", code.name, project_source_path),
    );

    let code_get = match previous_job {
        Some(previous) => GetStep::new(code.name.clone()).with_passed(vec![previous.name.clone()]),
        None => GetStep::new(code.name.clone()).with_trigger(true),
    };

    let mut plan = dependencies.to_vec();
    plan.push(code_get.into());
    plan.push(aws_creds_task(code)?);
    plan.push(
        PutStep::new(provisioner.name.clone())
            .with_get_params(json!({ "skip_implicit_get": true }))
            .with_params(json!({
                "env_os": {
                    "AWS_DEFAULT_REGION": AWS_REGION,
                    "PYTHONPATH": format!("/usr/lib/:/tmp/build/put/{}/src/", code.name),
                },
                "stack_name": stack_name,
            }))
            .into(),
    );

    let job = Job::new(deploy_job_name(project_name, stack_name)?, plan);
    debug!(
        "Generated job '{}' for stack '{}' (after {:?})",
        job.name,
        stack_name,
        previous_job.map(|j| j.name.as_str())
    );

    Ok(PipelineFragment::new(vec![provisioner_type], vec![provisioner], vec![job]))
}

/// Chain one deploy job per stack, each promoted only from the one before
///
/// Only the first job may be triggered by `dependencies`; later jobs receive a
/// copy with every trigger switched off, so an upstream change rolls through
/// the stacks in order instead of hitting all of them at once. The caller's
/// `dependencies` are left untouched.
pub fn pulumi_jobs_chain(
    code: &Resource,
    stack_names: &[String],
    project_name: &str,
    project_source_path: &str,
    dependencies: &[Step],
) -> Result<PipelineFragment, ConfigurationError> {
    if stack_names.is_empty() {
        return Err(ConfigurationError::EmptyInput { field: "stack names" });
    }

    let untriggered: Vec<Step> = dependencies.iter().map(Step::without_trigger).collect();

    let mut resource_types = Vec::new();
    let mut resources = Vec::new();
    let mut jobs: Vec<Job> = Vec::with_capacity(stack_names.len());
    let mut stack_for_job: HashMap<Identifier, &str> = HashMap::new();

    for (index, stack_name) in stack_names.iter().enumerate() {
        let stage_dependencies = if index == 0 { dependencies } else { &untriggered };

        let (rt, r, j) = pulumi_job(
            code,
            stack_name,
            project_name,
            project_source_path,
            stage_dependencies,
            jobs.last(),
        )?
        .into_parts();

        for job in &j {
            if let Some(first) = stack_for_job.insert(job.name.clone(), stack_name) {
                return Err(ConfigurationError::CollidingStacks {
                    first: first.to_string(),
                    second: stack_name.clone(),
                    job: job.name.to_string(),
                });
            }
        }

        resource_types.extend(rt);
        resources.extend(r);
        jobs.extend(j);
    }

    info!(
        "Chained {} deploy jobs for project '{}'",
        jobs.len(),
        project_name
    );

    Ok(PipelineFragment::new(resource_types, resources, jobs))
}
