//! The inbound result envelope and its parts.
//!
//! Every response from the service, whether from `/createTask` or
//! `/getTaskResult`, decodes into a [`TaskResult`]. The error block is embedded
//! in the result rather than carried on a separate channel, so callers must
//! check [`TaskResult::service_error`] before trusting `status` or `solution`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{ErrorCode, ServiceError, TaskId};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Progress of a task as reported by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// The solution is available.
    Ready,
    /// The task is queued.
    ///
    /// Also used when the service omits the status (error responses do).
    #[default]
    Idle,
    /// The task is being worked on.
    Processing,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::Idle => "idle",
            Self::Processing => "processing",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Missing, null, and "" all mean the service has nothing to report yet.
impl<'de> Deserialize<'de> for TaskStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref() {
            None | Some("") | Some("idle") => Ok(Self::Idle),
            Some("ready") => Ok(Self::Ready),
            Some("processing") => Ok(Self::Processing),
            Some(other) => Err(serde::de::Error::unknown_variant(
                other,
                &["ready", "idle", "processing"],
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Solution
// ---------------------------------------------------------------------------

/// The opaque solution payload.
///
/// Its shape depends on the task variant; the client never inspects it.
/// Absent until the task is ready, in which case it holds JSON `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Solution(serde_json::Value);

impl Solution {
    pub fn new(value: serde_json::Value) -> Self {
        Self(value)
    }

    /// Returns `true` if the service has not sent a payload.
    pub fn is_empty(&self) -> bool {
        self.0.is_null()
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }

    /// Decodes the payload into a task-specific solution type.
    pub fn decode<S: DeserializeOwned>(&self) -> Result<S, serde_json::Error> {
        S::deserialize(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Error block
// ---------------------------------------------------------------------------

/// The `errorId` / `errorCode` / `errorDescription` triple embedded in every
/// result. An `error_id` of zero means no error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBlock {
    #[serde(default)]
    pub error_id: i64,
    #[serde(
        default,
        deserialize_with = "non_empty_code",
        skip_serializing_if = "Option::is_none"
    )]
    pub error_code: Option<ErrorCode>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub error_description: String,
}

impl ErrorBlock {
    pub fn is_error(&self) -> bool {
        self.error_id != 0
    }

    /// Converts a nonzero block into a [`ServiceError`].
    pub fn to_service_error(&self) -> Option<ServiceError> {
        self.is_error().then(|| ServiceError {
            id: self.error_id,
            code: self.error_code.clone(),
            description: self.error_description.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// Result envelope
// ---------------------------------------------------------------------------

/// A decoded response from the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResult {
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub solution: Solution,
    #[serde(
        default,
        deserialize_with = "non_empty_task_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub task_id: Option<TaskId>,
    #[serde(flatten)]
    pub error: ErrorBlock,
}

impl TaskResult {
    /// Returns `true` only for an error-free result with status `ready`.
    ///
    /// A result with a nonzero error id is never ready, whatever its status.
    pub fn is_ready(&self) -> bool {
        self.status == TaskStatus::Ready && !self.error.is_error()
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_error()
    }

    pub fn service_error(&self) -> Option<ServiceError> {
        self.error.to_service_error()
    }

    /// Decodes the solution payload into `S`.
    pub fn decode_solution<S: DeserializeOwned>(&self) -> Result<S, serde_json::Error> {
        self.solution.decode()
    }
}

// ---------------------------------------------------------------------------
// Field helpers
// ---------------------------------------------------------------------------

/// Treats `null` and `""` as "no code".
fn non_empty_code<'de, D>(deserializer: D) -> Result<Option<ErrorCode>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()).map(ErrorCode::from))
}

/// Treats `null` and `""` as "not yet assigned".
fn non_empty_task_id<'de, D>(deserializer: D) -> Result<Option<TaskId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.and_then(TaskId::new))
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
