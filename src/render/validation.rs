//! Cross-reference checks run before a fragment becomes a document

use crate::catalog::is_core_resource_type;
use crate::core::{
    error::CompositionError,
    fragment::PipelineFragment,
    identifier::Identifier,
    job::Job,
    step::Step,
};
use std::collections::{HashMap, HashSet};

/// Run every check, failing on the first problem found
pub fn validate_fragment(fragment: &PipelineFragment) -> Result<(), CompositionError> {
    check_resource_types(fragment)?;
    check_step_resources(fragment)?;
    check_passed_constraints(fragment)?;
    check_cycles(fragment)?;
    Ok(())
}

/// Every resource's type is declared or built in
pub fn check_resource_types(fragment: &PipelineFragment) -> Result<(), CompositionError> {
    let declared: HashSet<&str> = fragment.resource_types().iter().map(|rt| rt.name.as_str()).collect();

    for resource in fragment.resources() {
        if !declared.contains(resource.kind.as_str()) && !is_core_resource_type(&resource.kind) {
            return Err(CompositionError::UnknownResourceType {
                resource: resource.name.to_string(),
                resource_type: resource.kind.clone(),
            });
        }
    }
    Ok(())
}

fn step_resource(step: &Step) -> Option<&Identifier> {
    match step {
        Step::Get(get) => Some(&get.resource),
        Step::Put(put) => Some(&put.resource),
        Step::Task(_) | Step::InParallel(_) => None,
    }
}

/// Every `get` and `put` targets a declared resource
pub fn check_step_resources(fragment: &PipelineFragment) -> Result<(), CompositionError> {
    let declared: HashSet<&Identifier> = fragment.resources().iter().map(|r| &r.name).collect();

    for job in fragment.jobs() {
        for resource in job.leaf_steps().filter_map(step_resource) {
            if !declared.contains(resource) {
                return Err(CompositionError::UnknownResource {
                    job: job.name.to_string(),
                    resource: resource.to_string(),
                });
            }
        }
    }
    Ok(())
}

fn uses_resource(job: &Job, resource: &Identifier) -> bool {
    job.leaf_steps().filter_map(step_resource).any(|r| r == resource)
}

/// Every `passed` entry names an existing job that itself uses the resource
pub fn check_passed_constraints(fragment: &PipelineFragment) -> Result<(), CompositionError> {
    let jobs: HashMap<&Identifier, &Job> = fragment.jobs().iter().map(|j| (&j.name, j)).collect();

    for job in fragment.jobs() {
        for get in job.leaf_steps().filter_map(Step::as_get) {
            for passed in &get.passed {
                match jobs.get(passed) {
                    None => {
                        return Err(CompositionError::UnknownPassedJob {
                            job: job.name.to_string(),
                            resource: get.resource.to_string(),
                            passed: passed.to_string(),
                        })
                    }
                    Some(upstream) if !uses_resource(upstream, &get.resource) => {
                        return Err(CompositionError::PassedJobMissingResource {
                            job: job.name.to_string(),
                            resource: get.resource.to_string(),
                            passed: passed.to_string(),
                        })
                    }
                    Some(_) => {}
                }
            }
        }
    }
    Ok(())
}

/// The graph of `passed` constraints must be acyclic
pub fn check_cycles(fragment: &PipelineFragment) -> Result<(), CompositionError> {
    let jobs: HashMap<&Identifier, &Job> = fragment.jobs().iter().map(|j| (&j.name, j)).collect();
    let mut visited = HashSet::new();
    let mut recursion_stack = HashSet::new();

    for job in fragment.jobs() {
        if !visited.contains(&job.name) {
            dfs_check(&job.name, &jobs, &mut visited, &mut recursion_stack)?;
        }
    }
    Ok(())
}

fn dfs_check<'a>(
    job_name: &'a Identifier,
    jobs: &HashMap<&'a Identifier, &'a Job>,
    visited: &mut HashSet<&'a Identifier>,
    recursion_stack: &mut HashSet<&'a Identifier>,
) -> Result<(), CompositionError> {
    visited.insert(job_name);
    recursion_stack.insert(job_name);

    if let Some(&job) = jobs.get(job_name) {
        for upstream in job.upstream_jobs() {
            if recursion_stack.contains(upstream) {
                return Err(CompositionError::PassedCycle(upstream.to_string()));
            }
            if !visited.contains(upstream) {
                dfs_check(upstream, jobs, visited, recursion_stack)?;
            }
        }
    }

    recursion_stack.remove(job_name);
    Ok(())
}
