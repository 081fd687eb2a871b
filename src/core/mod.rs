//! Core domain models for pipeline composition
//!
//! This module defines the fundamental data structures that make up a
//! pipeline: identifiers, resources, steps, jobs and the fragments they are
//! bundled into.

pub mod config;
pub mod error;
pub mod fragment;
pub mod identifier;
pub mod job;
pub mod resource;
pub mod step;

pub use error::*;
pub use fragment::*;
pub use identifier::*;
pub use job::*;
pub use resource::*;
pub use step::*;
