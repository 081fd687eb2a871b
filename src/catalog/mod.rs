//! Well-known resource types, resources and source payloads

pub mod resource_types;
pub mod resources;
pub mod sources;

pub use resource_types::*;
pub use resources::*;
pub use sources::*;

/// Resource types every Concourse installation ships with
pub const CORE_RESOURCE_TYPES: &[&str] = &[
    "git",
    "registry-image",
    "time",
    "s3",
    "semver",
    "github-release",
    "pool",
    "mock",
];

/// Type used for every custom resource type image
pub const REGISTRY_IMAGE: &str = "registry-image";

pub fn is_core_resource_type(kind: &str) -> bool {
    CORE_RESOURCE_TYPES.contains(&kind)
}
