//! Job factories producing ready-to-merge pipeline fragments

pub mod packer;
pub mod pulumi;

pub use packer::{packer_jobs, PackerOptions};
pub use pulumi::{pulumi_job, pulumi_jobs_chain};

/// Region the generated build and deploy steps run against
pub const AWS_REGION: &str = "us-east-1";
