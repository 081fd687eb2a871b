//! Custom resource types used by the job factories

use crate::catalog::{sources::RegistryImage, REGISTRY_IMAGE};
use crate::core::{error::InvalidNameError, identifier::Identifier, resource::ResourceType};

fn registry_resource_type(name: &str, repository: &str) -> Result<ResourceType, InvalidNameError> {
    Ok(ResourceType::new(
        Identifier::new(name)?,
        REGISTRY_IMAGE,
        Some(RegistryImage::new(repository).to_source()),
    ))
}

pub fn rclone() -> Result<ResourceType, InvalidNameError> {
    registry_resource_type("rclone", "mitodl/concourse-rclone-resource")
}

/// Runs `packer validate` against a template
pub fn packer_validate() -> Result<ResourceType, InvalidNameError> {
    registry_resource_type("packer-validator", "mitodl/concourse-packer-resource")
}

/// Runs `packer build` against a template
pub fn packer_build() -> Result<ResourceType, InvalidNameError> {
    registry_resource_type("packer-builder", "mitodl/concourse-packer-resource-builder")
}

pub fn ami_resource() -> Result<ResourceType, InvalidNameError> {
    registry_resource_type("amazon-ami", "jdub/ami-resource")
}

pub fn s3_sync() -> Result<ResourceType, InvalidNameError> {
    registry_resource_type("s3-sync", "mitodl/concourse-s3-sync-resource")
}

/// Runs `pulumi up` for one stack of a project
pub fn pulumi_provisioner_resource() -> Result<ResourceType, InvalidNameError> {
    registry_resource_type("pulumi-provisioner", "mitodl/concourse-pulumi-resource-provisioner")
}

/// Look up a catalog resource type by its pipeline name
pub fn catalog_resource_type(name: &str) -> Option<Result<ResourceType, InvalidNameError>> {
    let factory: fn() -> Result<ResourceType, InvalidNameError> = match name {
        "rclone" => rclone,
        "packer-validator" => packer_validate,
        "packer-builder" => packer_build,
        "amazon-ami" => ami_resource,
        "s3-sync" => s3_sync,
        "pulumi-provisioner" => pulumi_provisioner_resource,
        _ => return None,
    };
    Some(factory())
}
