//! Test: Fragment Merge - independently built fragments compose

use crate::helpers::*;
use pipeline_composer::core::{Collision, Declaration};
use pipeline_composer::{packer_jobs, pulumi_jobs_chain, PackerOptions, PipelineFragment};
use serde_json::json;

fn packer() -> PipelineFragment {
    packer_jobs(&[], &git_resource("image-code"), &PackerOptions::default()).unwrap()
}

fn chain() -> PipelineFragment {
    pulumi_jobs_chain(
        &git_resource("pulumi-code"),
        &["qa".to_string(), "production".to_string()],
        "edxapp",
        "src/edxapp",
        &[],
    )
    .unwrap()
}

/// Merging a factory fragment with itself changes nothing
#[test]
fn test_merge_idempotent_for_factory_fragments() {
    for fragment in [packer(), chain()] {
        let merged = fragment.merge(&fragment);
        assert_eq!(merged, fragment);
        assert_eq!(merged.jobs().len(), fragment.jobs().len());
        assert_eq!(merged.resources().len(), fragment.resources().len());
        assert_eq!(merged.resource_types().len(), fragment.resource_types().len());

        for (m, f) in merged.jobs().iter().zip(fragment.jobs()) {
            assert!(m.same_definition(f), "job '{}' changed", f.name);
        }
        for (m, f) in merged.resources().iter().zip(fragment.resources()) {
            assert!(m.same_definition(f), "resource '{}' changed", f.name);
        }
        for (m, f) in merged.resource_types().iter().zip(fragment.resource_types()) {
            assert!(m.same_definition(f), "resource type '{}' changed", f.name);
        }
    }
}

/// Disjoint fragments keep every entry
#[test]
fn test_merge_disjoint_fragments() {
    let a = packer();
    let b = chain();
    let merged = a.merge(&b);

    assert_eq!(merged.resource_types().len(), a.resource_types().len() + b.resource_types().len());
    assert_eq!(merged.resources().len(), a.resources().len() + b.resources().len());
    assert_eq!(merged.jobs().len(), a.jobs().len() + b.jobs().len());
}

/// Merge order only decides which of two same-named definitions survives
#[test]
fn test_merge_order_independent_for_shared_names() {
    let shared = resources_fragment(vec![git_resource("image-code")]);
    let left = shared.merge(&packer()).merge(&chain());
    let right = chain().merge(&shared.merge(&packer()));

    let mut left_names = job_names(left.jobs());
    let mut right_names = job_names(right.jobs());
    left_names.sort();
    right_names.sort();
    assert_eq!(left_names, right_names);
    assert_eq!(left.resources().len(), right.resources().len());
}

/// First definition wins, and the dropped one is reported as a conflict
#[test]
fn test_first_definition_wins_with_diagnostic() {
    let mut v1 = git_resource("code");
    v1.source = Some(json!({"uri": "https://example.com/v1.git"}));
    let mut v2 = git_resource("code");
    v2.source = Some(json!({"uri": "https://example.com/v2.git"}));

    let mut reported: Vec<Collision> = Vec::new();
    let mut hook = |c: &Collision| reported.push(c.clone());
    let merged = resources_fragment(vec![v1.clone()]).merge_with(&resources_fragment(vec![v2]), &mut hook);

    assert_eq!(merged.resources().len(), 1);
    assert!(merged.resources()[0].same_definition(&v1));
    assert_eq!(
        reported,
        vec![Collision {
            kind: "resource",
            name: "code".to_string(),
            conflicting: true
        }]
    );
}
