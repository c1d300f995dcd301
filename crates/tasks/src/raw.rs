//! Untyped tasks.
//!
//! [`RawTask`] submits any JSON object under a caller-chosen discriminator and
//! hands back the solution payload as JSON. It covers task kinds that have no
//! dedicated shape in this crate, and is what the command-line client uses.

use protocol::{CaptchaTask, TaskType};
use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawTask {
    #[serde(skip)]
    task_type: TaskType,
    #[serde(flatten)]
    fields: Map<String, Value>,
}

impl RawTask {
    /// Creates a raw task. A `type` key in `fields` is dropped; the
    /// discriminator is always `task_type`.
    pub fn new(task_type: TaskType, mut fields: Map<String, Value>) -> Self {
        fields.remove("type");
        Self { task_type, fields }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }
}

impl CaptchaTask for RawTask {
    type Solution = Value;

    fn task_type(&self) -> &str {
        self.task_type.as_str()
    }
}
