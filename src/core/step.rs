//! Step domain model
//!
//! A job's plan is a sequence of [`Step`]s. The enum is closed: every consumer
//! matches all four variants, and serialization emits the Concourse shape where
//! the variant is identified by its leading key (`get`, `put`, `task`,
//! `in_parallel`).

use crate::core::identifier::Identifier;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;

/// A single entry in a job plan
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Get(GetStep),
    Put(PutStep),
    Task(TaskStep),
    InParallel(InParallelStep),
}

impl Serialize for Step {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Step::Get(step) => step.serialize(serializer),
            Step::Put(step) => step.serialize(serializer),
            Step::Task(step) => step.serialize(serializer),
            Step::InParallel(step) => step.serialize(serializer),
        }
    }
}

/// Keys that identify a step variant, checked in this order
const STEP_KEYS: [&str; 4] = ["get", "put", "task", "in_parallel"];

impl<'de> Deserialize<'de> for Step {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let Value::Object(map) = &value else {
            return Err(D::Error::custom(format!("step must be a mapping, found {}", value)));
        };

        let Some(kind) = STEP_KEYS.into_iter().find(|key| map.contains_key(*key)) else {
            let found: Vec<&str> = map.keys().map(String::as_str).collect();
            return Err(D::Error::custom(format!(
                "step needs one of the keys {}, found [{}]",
                STEP_KEYS.join(", "),
                found.join(", ")
            )));
        };

        let step = match kind {
            "get" => serde_json::from_value(value).map(Step::Get),
            "put" => serde_json::from_value(value).map(Step::Put),
            "task" => serde_json::from_value(value).map(Step::Task),
            _ => serde_json::from_value(value).map(Step::InParallel),
        };
        step.map_err(|e| D::Error::custom(format!("invalid {} step: {}", kind, e)))
    }
}

impl Step {
    /// Copy of this step with every `get` trigger switched off, including
    /// those nested inside `in_parallel`
    pub fn without_trigger(&self) -> Step {
        match self {
            Step::Get(get) => Step::Get(GetStep {
                trigger: false,
                ..get.clone()
            }),
            Step::InParallel(group) => Step::InParallel(InParallelStep {
                steps: group.steps.iter().map(Step::without_trigger).collect(),
            }),
            Step::Put(_) | Step::Task(_) => self.clone(),
        }
    }

    /// All non-parallel steps in plan order, descending into `in_parallel`
    pub fn leaves(&self) -> Vec<&Step> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a Step>) {
        match self {
            Step::InParallel(group) => {
                for step in &group.steps {
                    step.collect_leaves(out);
                }
            }
            Step::Get(_) | Step::Put(_) | Step::Task(_) => out.push(self),
        }
    }

    pub fn as_get(&self) -> Option<&GetStep> {
        match self {
            Step::Get(get) => Some(get),
            _ => None,
        }
    }

    pub fn as_put(&self) -> Option<&PutStep> {
        match self {
            Step::Put(put) => Some(put),
            _ => None,
        }
    }

    pub fn as_in_parallel(&self) -> Option<&InParallelStep> {
        match self {
            Step::InParallel(group) => Some(group),
            _ => None,
        }
    }
}

impl From<GetStep> for Step {
    fn from(step: GetStep) -> Self {
        Step::Get(step)
    }
}

impl From<PutStep> for Step {
    fn from(step: PutStep) -> Self {
        Step::Put(step)
    }
}

impl From<TaskStep> for Step {
    fn from(step: TaskStep) -> Self {
        Step::Task(step)
    }
}

impl From<InParallelStep> for Step {
    fn from(step: InParallelStep) -> Self {
        Step::InParallel(step)
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Fetch a version of a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GetStep {
    #[serde(rename = "get")]
    pub resource: Identifier,

    /// Start the job automatically when a new version appears
    #[serde(default, skip_serializing_if = "is_false")]
    pub trigger: bool,

    /// Only accept versions that went through all of these jobs
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub passed: Vec<Identifier>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl GetStep {
    pub fn new(resource: Identifier) -> Self {
        Self {
            resource,
            trigger: false,
            passed: Vec::new(),
            params: None,
        }
    }

    pub fn with_trigger(mut self, trigger: bool) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn with_passed(mut self, passed: Vec<Identifier>) -> Self {
        self.passed = passed;
        self
    }
}

/// Push to (or execute) a resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PutStep {
    #[serde(rename = "put")]
    pub resource: Identifier,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,

    /// Params for the implicit `get` that follows a `put`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub get_params: Option<Value>,
}

impl PutStep {
    pub fn new(resource: Identifier) -> Self {
        Self {
            resource,
            params: None,
            get_params: None,
        }
    }

    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_get_params(mut self, get_params: Value) -> Self {
        self.get_params = Some(get_params);
        self
    }
}

/// Run a script in a container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStep {
    #[serde(rename = "task")]
    pub name: Identifier,

    pub config: TaskConfig,
}

/// Run child steps concurrently; the plan continues once all succeed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InParallelStep {
    #[serde(rename = "in_parallel")]
    pub steps: Vec<Step>,
}

impl InParallelStep {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }
}

/// Worker platform a task runs on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    Darwin,
    Windows,
}

/// Container image for a task, declared inline rather than as a pipeline resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonymousResource {
    #[serde(rename = "type")]
    pub kind: String,

    pub source: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskInput {
    pub name: Identifier,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskOutput {
    pub name: Identifier,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// The command a task executes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    pub path: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<String>,
}

/// Inline task configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    pub platform: Platform,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_resource: Option<AnonymousResource>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<TaskInput>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outputs: Vec<TaskOutput>,

    /// Environment variables for the task; timeouts and the like travel here too
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, String>,

    pub run: Command,
}
