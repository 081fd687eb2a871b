//! Scenario-based tests for pipeline-composer

mod deployment_chain;
mod document_rendering;
mod fragment_merge;
mod image_build;
