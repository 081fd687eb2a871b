//! Job domain model

use crate::core::{identifier::Identifier, resource::Declaration, step::Step};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// A named, strictly ordered plan of steps
///
/// Like resources, jobs compare equal when their names match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub name: Identifier,

    pub plan: Vec<Step>,
}

impl Job {
    pub fn new(name: Identifier, plan: Vec<Step>) -> Self {
        Self { name, plan }
    }

    /// Every non-parallel step of the plan, in order
    pub fn leaf_steps(&self) -> impl Iterator<Item = &Step> {
        self.plan.iter().flat_map(Step::leaves)
    }

    /// Upstream jobs named in `passed` constraints of this job's `get` steps
    pub fn upstream_jobs(&self) -> Vec<&Identifier> {
        let mut upstream: Vec<&Identifier> = Vec::new();
        for get in self.leaf_steps().filter_map(Step::as_get) {
            for job in &get.passed {
                if !upstream.contains(&job) {
                    upstream.push(job);
                }
            }
        }
        upstream
    }
}

impl Declaration for Job {
    const KIND: &'static str = "job";

    fn name(&self) -> &Identifier {
        &self.name
    }

    fn same_definition(&self, other: &Self) -> bool {
        self.name == other.name && self.plan == other.plan
    }
}

impl PartialEq for Job {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Job {}

impl Hash for Job {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}
