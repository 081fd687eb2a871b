//! Pipeline fragments - the unit of composition
//!
//! A fragment bundles resource types, resources and jobs. Fragments authored
//! independently are combined with [`PipelineFragment::merge`]; names stay
//! unique because every collection is deduplicated by name, keeping the first
//! definition seen.

use crate::core::{
    error::CompositionError,
    job::Job,
    resource::{Declaration, Resource, ResourceType},
};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

/// A duplicate name dropped during deduplication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    /// `resource type`, `resource` or `job`
    pub kind: &'static str,

    pub name: String,

    /// True when the dropped definition differs from the retained one
    pub conflicting: bool,
}

/// Observer for duplicates dropped while building or merging fragments
pub trait CollisionHook {
    fn on_collision(&mut self, collision: &Collision);
}

impl<F: FnMut(&Collision)> CollisionHook for F {
    fn on_collision(&mut self, collision: &Collision) {
        self(collision)
    }
}

/// Default hook: conflicting definitions are logged as warnings, identical
/// repeats only at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogCollisions;

impl CollisionHook for LogCollisions {
    fn on_collision(&mut self, collision: &Collision) {
        if collision.conflicting {
            warn!(
                "Dropping conflicting {} '{}'; the first definition is kept",
                collision.kind, collision.name
            );
        } else {
            debug!("Dropping repeated {} '{}'", collision.kind, collision.name);
        }
    }
}

/// Hook that records conflicting collisions so they can be turned into errors
#[derive(Debug, Default, Clone)]
pub struct CollectConflicts {
    pub conflicts: Vec<Collision>,
}

impl CollectConflicts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with the first conflict recorded, if any
    pub fn into_result(self) -> Result<(), CompositionError> {
        match self.conflicts.into_iter().next() {
            Some(collision) => Err(CompositionError::ConflictingDefinition {
                kind: collision.kind.to_string(),
                name: collision.name,
            }),
            None => Ok(()),
        }
    }
}

impl CollisionHook for CollectConflicts {
    fn on_collision(&mut self, collision: &Collision) {
        LogCollisions.on_collision(collision);
        if collision.conflicting {
            self.conflicts.push(collision.clone());
        }
    }
}

/// Keep the first declaration of every name, preserving order
fn dedup_by_name<T: Declaration>(items: Vec<T>, hook: &mut dyn CollisionHook) -> Vec<T> {
    let mut seen = HashSet::new();
    let mut unique: Vec<T> = Vec::with_capacity(items.len());

    for item in items {
        if seen.insert(item.name().clone()) {
            unique.push(item);
            continue;
        }

        let conflicting = unique
            .iter()
            .find(|kept| kept.name() == item.name())
            .map(|kept| !kept.same_definition(&item))
            .unwrap_or(false);

        hook.on_collision(&Collision {
            kind: T::KIND,
            name: item.name().to_string(),
            conflicting,
        });
    }

    unique
}

/// An immutable bundle of resource types, resources and jobs with unique names
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PipelineFragment {
    resource_types: Vec<ResourceType>,
    resources: Vec<Resource>,
    jobs: Vec<Job>,
}

impl PipelineFragment {
    /// Build a fragment, silently keeping the first of any duplicate names
    pub fn new(resource_types: Vec<ResourceType>, resources: Vec<Resource>, jobs: Vec<Job>) -> Self {
        Self::with_hook(resource_types, resources, jobs, &mut LogCollisions)
    }

    /// Build a fragment, reporting every dropped duplicate to `hook`
    pub fn with_hook(
        resource_types: Vec<ResourceType>,
        resources: Vec<Resource>,
        jobs: Vec<Job>,
        hook: &mut dyn CollisionHook,
    ) -> Self {
        Self {
            resource_types: dedup_by_name(resource_types, hook),
            resources: dedup_by_name(resources, hook),
            jobs: dedup_by_name(jobs, hook),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn resource_types(&self) -> &[ResourceType] {
        &self.resource_types
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn job(&self, name: &str) -> Option<&Job> {
        self.jobs.iter().find(|job| job.name == name)
    }

    pub fn resource(&self, name: &str) -> Option<&Resource> {
        self.resources.iter().find(|resource| resource.name == name)
    }

    pub fn resource_type(&self, name: &str) -> Option<&ResourceType> {
        self.resource_types.iter().find(|rt| rt.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.resource_types.is_empty() && self.resources.is_empty() && self.jobs.is_empty()
    }

    /// Take the collections apart, e.g. to accumulate them elsewhere
    pub fn into_parts(self) -> (Vec<ResourceType>, Vec<Resource>, Vec<Job>) {
        (self.resource_types, self.resources, self.jobs)
    }

    /// Concatenate `self` and `other`, keeping the earliest definition of each name
    pub fn merge(&self, other: &PipelineFragment) -> PipelineFragment {
        self.merge_with(other, &mut LogCollisions)
    }

    /// Like [`merge`](Self::merge), reporting dropped duplicates to `hook`
    pub fn merge_with(&self, other: &PipelineFragment, hook: &mut dyn CollisionHook) -> PipelineFragment {
        let resource_types = self
            .resource_types
            .iter()
            .chain(&other.resource_types)
            .cloned()
            .collect();
        let resources = self.resources.iter().chain(&other.resources).cloned().collect();
        let jobs = self.jobs.iter().chain(&other.jobs).cloned().collect();

        Self::with_hook(resource_types, resources, jobs, hook)
    }

    /// Merge any number of fragments left to right
    pub fn combine<I>(fragments: I) -> PipelineFragment
    where
        I: IntoIterator<Item = PipelineFragment>,
    {
        Self::combine_with(fragments, &mut LogCollisions)
    }

    pub fn combine_with<I>(fragments: I, hook: &mut dyn CollisionHook) -> PipelineFragment
    where
        I: IntoIterator<Item = PipelineFragment>,
    {
        let mut resource_types = Vec::new();
        let mut resources = Vec::new();
        let mut jobs = Vec::new();

        for fragment in fragments {
            let (rt, r, j) = fragment.into_parts();
            resource_types.extend(rt);
            resources.extend(r);
            jobs.extend(j);
        }

        Self::with_hook(resource_types, resources, jobs, hook)
    }
}

impl FromIterator<PipelineFragment> for PipelineFragment {
    fn from_iter<I: IntoIterator<Item = PipelineFragment>>(iter: I) -> Self {
        Self::combine(iter)
    }
}
