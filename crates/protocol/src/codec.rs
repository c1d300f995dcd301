//! Envelope codec.
//!
//! Outbound, every request is a JSON object carrying `clientKey` and `appId`
//! plus exactly one of:
//!
//! - `task`: the task fields with the `type` discriminator injected, when
//!   creating a task;
//! - `taskId`: the identifier of an existing task, when polling.
//!
//! Inbound, every response decodes into a [`TaskResult`].

use serde::Serialize;

use crate::{Credentials, SolveError, TaskId, TaskResult};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a, T: Serialize> {
    client_key: &'a str,
    app_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    task: Option<TypedTask<'a, T>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    task_id: Option<&'a str>,
}

/// Task fields with the discriminator injected alongside them.
#[derive(Serialize)]
struct TypedTask<'a, T: Serialize> {
    #[serde(rename = "type")]
    task_type: &'a str,
    #[serde(flatten)]
    fields: &'a T,
}

/// Encodes a `/createTask` request body.
///
/// `task` must serialise as a JSON object without a `type` key of its own.
pub fn encode_create<T: Serialize>(
    credentials: &Credentials,
    task_type: &str,
    task: &T,
) -> Result<Vec<u8>, SolveError> {
    let envelope = Envelope {
        client_key: credentials.client_key.expose(),
        app_id: credentials.app_id.as_str(),
        task: Some(TypedTask {
            task_type,
            fields: task,
        }),
        task_id: None,
    };
    serde_json::to_vec(&envelope).map_err(|source| SolveError::Encode { source })
}

/// Encodes a `/getTaskResult` request body.
pub fn encode_poll(credentials: &Credentials, task_id: &TaskId) -> Result<Vec<u8>, SolveError> {
    let envelope: Envelope<'_, ()> = Envelope {
        client_key: credentials.client_key.expose(),
        app_id: credentials.app_id.as_str(),
        task: None,
        task_id: Some(task_id.as_str()),
    };
    serde_json::to_vec(&envelope).map_err(|source| SolveError::Encode { source })
}

/// Decodes a response body.
///
/// Absent `solution` and `taskId` fields are expected before completion and
/// never cause a failure.
pub fn decode_result(bytes: &[u8]) -> Result<TaskResult, SolveError> {
    serde_json::from_slice(bytes).map_err(|source| SolveError::MalformedResponse { source })
}
