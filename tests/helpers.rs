//! Test utility functions for pipeline-composer
#![allow(dead_code)]

use pipeline_composer::core::config::GeneratorConfig;
use pipeline_composer::core::{GetStep, Identifier, Job, Resource, Step};
use pipeline_composer::render::build_document;
use pipeline_composer::{PipelineDocument, PipelineFragment};
use serde_json::json;

/// Shorthand for a known-good identifier
pub fn id(name: &str) -> Identifier {
    Identifier::new(name).expect("test identifiers are valid")
}

/// A git resource tracking `main`
pub fn git_resource(name: &str) -> Resource {
    Resource::new(
        id(name),
        "git",
        Some(json!({ "uri": "https://github.com/mitodl/ol-infrastructure", "branch": "main" })),
    )
}

/// A triggering get of `resource`
pub fn trigger_get(resource: &str) -> Step {
    GetStep::new(id(resource)).with_trigger(true).into()
}

/// Fragment holding only the given resources
pub fn resources_fragment(resources: Vec<Resource>) -> PipelineFragment {
    PipelineFragment::new(Vec::new(), resources, Vec::new())
}

/// Parse a YAML config and render it to a document
pub fn document_from_yaml(yaml: &str) -> Result<PipelineDocument, String> {
    let config = GeneratorConfig::from_yaml(yaml).map_err(|e| format!("{:#}", e))?;
    build_document(&config, false).map_err(|e| e.to_string())
}

/// The first `get` of `resource` in a job's plan
pub fn get_of<'a>(job: &'a Job, resource: &str) -> &'a GetStep {
    job.leaf_steps()
        .filter_map(Step::as_get)
        .find(|get| get.resource == resource)
        .unwrap_or_else(|| panic!("job '{}' has no get of '{}'", job.name, resource))
}

/// Assert that `job`'s get of `resource` is gated on exactly `upstream`
pub fn assert_gated_on(job: &Job, resource: &str, upstream: &[&str]) {
    let get = get_of(job, resource);
    let passed: Vec<&str> = get.passed.iter().map(Identifier::as_str).collect();
    assert_eq!(
        passed, upstream,
        "job '{}' get of '{}' should be gated on {:?}",
        job.name, resource, upstream
    );
}

/// Assert whether `job`'s get of `resource` triggers
pub fn assert_triggers(job: &Job, resource: &str, expected: bool) {
    assert_eq!(
        get_of(job, resource).trigger,
        expected,
        "job '{}' get of '{}' trigger",
        job.name,
        resource
    );
}

/// Job names in document order
pub fn job_names(jobs: &[Job]) -> Vec<String> {
    jobs.iter().map(|j| j.name.to_string()).collect()
}
