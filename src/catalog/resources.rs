//! Resources used by the job factories

use crate::catalog::sources::GitSource;
use crate::core::{error::InvalidNameError, identifier::Identifier, resource::Resource};
use serde_json::json;

/// Resource that validates packer templates
pub fn packer_validate_resource() -> Result<Resource, InvalidNameError> {
    Ok(Resource::new(Identifier::new("packer-validate")?, "packer-validator", None))
}

/// Resource that builds AMIs from packer templates
pub fn packer_build_resource() -> Result<Resource, InvalidNameError> {
    Ok(Resource::new(Identifier::new("packer-build")?, "packer-builder", None))
}

/// Provisioner resource for one pulumi project; the stack is chosen per `put`
pub fn pulumi_provisioner(name: Identifier, project_name: &str, project_path: &str) -> Resource {
    Resource::new(
        name,
        "pulumi-provisioner",
        Some(json!({
            "env_pulumi": { "AWS_SHARED_CREDENTIALS_FILE": "aws_creds/credentials" },
            "action": "update",
            "project_name": project_name,
            "source_dir": project_path,
        })),
    )
    .with_icon("cloud-upload")
}

/// A `git` resource tracking `source`
pub fn git_repo(name: Identifier, source: &GitSource) -> Resource {
    Resource::new(name, "git", Some(source.to_source())).with_icon("git")
}
