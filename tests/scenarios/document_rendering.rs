//! Test: Document Rendering - configuration to pipeline document

use crate::helpers::*;
use pipeline_composer::core::{Job, Step};
use pipeline_composer::{CompositionError, OutputFormat, PipelineDocument, PipelineFragment};

const FULL_PIPELINE: &str = r#"
name: "edxapp"
resources:
  - name: image-code
    type: git
    source:
      uri: https://github.com/mitodl/ol-infrastructure
      paths: [src/bilder/images/edxapp/]
  - name: pulumi-code
    type: git
    source:
      uri: https://github.com/mitodl/ol-infrastructure
  - name: edx-release
    type: git
    source:
      uri: https://github.com/openedx/edx-platform
      branch: open-release/olive.master
packer:
  - image_code: image-code
    template_path: src/bilder/images/edxapp/edxapp_base.pkr.hcl
    node_types: [web, worker]
    dependencies:
      - get: edx-release
        trigger: true
pulumi:
  - code: pulumi-code
    project_name: ol-infrastructure-edxapp
    path: src/ol_infrastructure/applications/edxapp
    stack_names: [applications.edxapp.QA, applications.edxapp.Production]
    dependencies:
      - get: image-code
        trigger: true
        passed: [build-packer-template]
"#;

/// validated -> built -> deployed(QA) -> deployed(Production)
#[test]
fn test_full_state_machine() {
    let document = document_from_yaml(FULL_PIPELINE).unwrap();
    let jobs = document.jobs();

    assert_eq!(
        job_names(jobs),
        vec![
            "validate-packer-template",
            "build-packer-template",
            "deploy-ol-infrastructure-edxapp-applications.edxapp.qa",
            "deploy-ol-infrastructure-edxapp-applications.edxapp.production",
        ]
    );

    assert_gated_on(&jobs[1], "image-code", &["validate-packer-template"]);
    assert_gated_on(&jobs[2], "image-code", &["build-packer-template"]);
    assert_triggers(&jobs[2], "image-code", true);
    assert_gated_on(&jobs[3], "image-code", &["build-packer-template"]);
    assert_triggers(&jobs[3], "image-code", false);
    assert_gated_on(&jobs[3], "pulumi-code", &[jobs[2].name.as_str()]);
}

/// Both formats carry the three top-level collections
#[test]
fn test_yaml_and_json_output() {
    let document = document_from_yaml(FULL_PIPELINE).unwrap();

    let yaml = document.render(OutputFormat::Yaml).unwrap();
    let reparsed: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
    for key in ["resource_types", "resources", "jobs"] {
        assert!(reparsed.get(key).is_some(), "missing {}", key);
    }

    let json = document.render(OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["jobs"].as_array().unwrap().len(), 4);
    assert_eq!(value["jobs"][0]["plan"][2]["in_parallel"].as_array().unwrap().len(), 2);
}

/// A passed reference to a job nobody added fails before anything is emitted
#[test]
fn test_dangling_passed_reference() {
    let yaml = FULL_PIPELINE.replace("passed: [build-packer-template]", "passed: [build-ami]");
    let err = document_from_yaml(&yaml).unwrap_err();
    assert!(err.contains("build-ami"), "{}", err);
}

/// Mutually gated jobs are a composition error
#[test]
fn test_passed_cycle_rejected() {
    let gate = |name: &str, upstream: &str| {
        Job::new(
            id(name),
            vec![Step::from(
                pipeline_composer::core::GetStep::new(id("code")).with_passed(vec![id(upstream)]),
            )],
        )
    };
    let fragment = PipelineFragment::new(
        Vec::new(),
        vec![git_resource("code")],
        vec![gate("deploy-a", "deploy-b"), gate("deploy-b", "deploy-a")],
    );

    assert!(matches!(
        PipelineDocument::from_fragment(fragment),
        Err(CompositionError::PassedCycle(_))
    ));
}

/// Custom resource types must be declared somewhere in the document
#[test]
fn test_undeclared_resource_type_rejected() {
    let yaml = r#"
name: "sync"
resources:
  - name: bucket
    type: s3-sync
"#;
    let err = document_from_yaml(yaml).unwrap_err();
    assert!(err.contains("s3-sync"), "{}", err);

    let fixed = r#"
name: "sync"
catalog_resource_types: [s3-sync]
resources:
  - name: bucket
    type: s3-sync
"#;
    assert!(document_from_yaml(fixed).is_ok());
}
