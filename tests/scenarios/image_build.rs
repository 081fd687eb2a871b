//! Test: Image Build - validate gates build

use crate::helpers::*;
use pipeline_composer::jobs::packer::{BUILD_JOB, DEFAULT_NODE_TYPE, VALIDATE_JOB};
use pipeline_composer::{packer_jobs, PackerOptions, PipelineDocument};

/// Two node types give two jobs, and build only sees validated versions
#[test]
fn test_build_only_after_validate() {
    let options = PackerOptions {
        node_types: vec!["web".to_string(), "worker".to_string()],
        ..Default::default()
    };
    let fragment = packer_jobs(&[], &git_resource("image-code"), &options).unwrap();

    assert_eq!(job_names(fragment.jobs()), vec![VALIDATE_JOB, BUILD_JOB]);

    let build = fragment.job(BUILD_JOB).unwrap();
    assert_gated_on(build, "image-code", &["validate-packer-template"]);
    assert_triggers(build, "image-code", true);

    let validate = fragment.job(VALIDATE_JOB).unwrap();
    assert_gated_on(validate, "image-code", &[]);
}

/// No node types still builds the default variant
#[test]
fn test_default_variant_is_not_an_empty_group() {
    let fragment = packer_jobs(&[], &git_resource("image-code"), &PackerOptions::default()).unwrap();

    for job in fragment.jobs() {
        let group = job.plan.last().unwrap().as_in_parallel().unwrap();
        assert_eq!(group.steps.len(), 1);
        let params = group.steps[0].as_put().unwrap().params.as_ref().unwrap();
        assert_eq!(params["vars"]["node_type"], DEFAULT_NODE_TYPE);
    }
}

/// Upstream triggers stay in place for both packer jobs
#[test]
fn test_dependencies_run_first_in_both_jobs() {
    let dependencies = vec![trigger_get("edx-release")];
    let fragment = packer_jobs(&dependencies, &git_resource("image-code"), &PackerOptions::default()).unwrap();

    for job in fragment.jobs() {
        assert_eq!(job.plan[0], dependencies[0]);
        assert_triggers(job, "edx-release", true);
    }
}

/// The packer fragment plus its code resource is a complete pipeline
#[test]
fn test_packer_fragment_renders() {
    let packer = packer_jobs(&[], &git_resource("image-code"), &PackerOptions::default()).unwrap();
    let fragment = resources_fragment(vec![git_resource("image-code")]).merge(&packer);

    let document = PipelineDocument::from_fragment(fragment).unwrap();
    let yaml = document.to_yaml().unwrap();
    assert!(yaml.contains("passed:\n    - validate-packer-template"));
    assert!(yaml.contains("put: packer-build"));
}
