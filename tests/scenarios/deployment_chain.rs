//! Test: Deployment Chain - stacks promoted one after another

use crate::helpers::*;
use pipeline_composer::{pulumi_jobs_chain, ConfigurationError, PipelineDocument};

fn stacks(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

/// dev -> stage -> prod, each gated on the one before
#[test]
fn test_three_stage_rollout() {
    let dependencies = vec![trigger_get("edxapp-ami")];
    let fragment = pulumi_jobs_chain(
        &git_resource("pulumi-code"),
        &stacks(&["dev", "stage", "prod"]),
        "edxapp",
        "src/ol_infrastructure/applications/edxapp",
        &dependencies,
    )
    .unwrap();
    let jobs = fragment.jobs();

    assert_eq!(
        job_names(jobs),
        vec!["deploy-edxapp-dev", "deploy-edxapp-stage", "deploy-edxapp-prod"]
    );

    assert_gated_on(&jobs[0], "pulumi-code", &[]);
    assert_gated_on(&jobs[1], "pulumi-code", &["deploy-edxapp-dev"]);
    assert_gated_on(&jobs[2], "pulumi-code", &["deploy-edxapp-stage"]);

    assert_triggers(&jobs[0], "edxapp-ami", true);
    assert_triggers(&jobs[1], "edxapp-ami", false);
    assert_triggers(&jobs[2], "edxapp-ami", false);

    assert_triggers(&jobs[0], "pulumi-code", true);
    assert_triggers(&jobs[1], "pulumi-code", false);
    assert_triggers(&jobs[2], "pulumi-code", false);
}

/// Two chains built from one dependency list do not affect each other
#[test]
fn test_chains_are_independent() {
    let dependencies = vec![trigger_get("edxapp-ami")];
    let code = git_resource("pulumi-code");

    let first = pulumi_jobs_chain(&code, &stacks(&["qa", "production"]), "edxapp", "src/edxapp", &dependencies).unwrap();
    let second = pulumi_jobs_chain(&code, &stacks(&["qa", "production"]), "xqueue", "src/xqueue", &dependencies).unwrap();

    assert_triggers(&first.jobs()[0], "edxapp-ami", true);
    assert_triggers(&second.jobs()[0], "edxapp-ami", true);
    assert!(dependencies[0].as_get().unwrap().trigger);
}

/// A chain behind a packer build renders with every passed reference resolved
#[test]
fn test_chain_renders_with_upstream_resources() {
    let chain = pulumi_jobs_chain(
        &git_resource("pulumi-code"),
        &stacks(&["qa", "production"]),
        "edxapp",
        "src/edxapp",
        &[trigger_get("edxapp-ami")],
    )
    .unwrap();
    let fragment = resources_fragment(vec![git_resource("pulumi-code"), git_resource("edxapp-ami")]).merge(&chain);

    let document = PipelineDocument::from_fragment(fragment).unwrap();
    assert_eq!(document.jobs().len(), 2);
    assert_eq!(document.resources().len(), 3);
}

/// Stack names that lowercase to the same job are rejected
#[test]
fn test_colliding_stacks_rejected() {
    let err = pulumi_jobs_chain(&git_resource("pulumi-code"), &stacks(&["QA", "qa"]), "edxapp", "src", &[]).unwrap_err();
    assert!(matches!(err, ConfigurationError::CollidingStacks { .. }));
}
