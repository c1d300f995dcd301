//! Error and retry-policy types for the CapSolver client.
//!
//! [`SolveError`] is the single error type surfaced by every solve operation.
//! It separates the four failure families a caller may want to react to
//! differently:
//!
//! 1. **Transport** — the exchange could not be completed ([`TransportError`]),
//!    or the request could not be serialised.
//! 2. **Decode** — the response envelope or the solution payload could not be
//!    parsed.
//! 3. **Service** — the service reported a nonzero `errorId` ([`ServiceError`]).
//! 4. **Control** — cancellation, a missing task identifier, or a typed solve
//!    that ended without a ready result.
//!
//! [`RetryPolicy`] is advisory. The orchestrator never retries on its own; it
//! only exposes the classification so that callers can decide.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{TaskId, TaskStatus};

// ---------------------------------------------------------------------------
// Retry semantics
// ---------------------------------------------------------------------------

/// Whether an error condition is safe to retry and, if so, after what delay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RetryPolicy {
    /// The operation may be retried.
    Retryable {
        /// Minimum back-off before the next attempt. `None` means retry
        /// immediately or apply the caller's own back-off schedule.
        after: Option<Duration>,
    },
    /// Retrying with the same input will fail the same way.
    NonRetryable,
}

// ---------------------------------------------------------------------------
// Service error codes
// ---------------------------------------------------------------------------

/// The `errorCode` reported by the service alongside a nonzero `errorId`.
///
/// Codes not known to this client decode into [`ErrorCode::Other`] so that a
/// new service-side code never turns an error response into a decode failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ErrorCode {
    /// The service is overloaded.
    ServiceUnavailable,
    /// The account's request-rate limit was exceeded.
    RateLimit,
    /// The task data was malformed; see the description for details.
    InvalidTaskData,
    /// Generic request error.
    BadRequest,
    /// The task identifier does not exist or has expired.
    TaskIdInvalid,
    /// The service gave up on the task after its own deadline.
    TaskTimeout,
    /// Billing for the task failed.
    SettlementFailed,
    /// The client key is wrong.
    KeyDeniedAccess,
    /// The account balance is exhausted.
    ZeroBalance,
    /// The task type is unknown or unsupported.
    TaskNotSupported,
    /// The captcha could not be recognised. No credit is charged.
    CaptchaUnsolvable,
    /// The question code was not recognised.
    UnknownQuestion,
    /// The target site banned the supplied proxy.
    ProxyBanned,
    /// The image does not meet the size requirements.
    InvalidImage,
    /// The image could not be parsed (usually bad base64).
    ParseImageFail,
    /// The caller's IP is temporarily blocked (30 minutes).
    IpBanned,
    /// The client key is temporarily blocked (5 minutes).
    KeyTempBlocked,
    /// A code this client does not know about.
    Other(String),
}

impl ErrorCode {
    /// Returns the wire representation of the code.
    pub fn as_str(&self) -> &str {
        match self {
            // The service spells this one wrong; match it exactly.
            Self::ServiceUnavailable => "ERROR_SERVICE_UNAVALIABLE",
            Self::RateLimit => "ERROR_RATE_LIMIT",
            Self::InvalidTaskData => "ERROR_INVALID_TASK_DATA",
            Self::BadRequest => "ERROR_BAD_REQUEST",
            Self::TaskIdInvalid => "ERROR_TASKID_INVALID",
            Self::TaskTimeout => "ERROR_TASK_TIMEOUT",
            Self::SettlementFailed => "ERROR_SETTLEMENT_FAILED",
            Self::KeyDeniedAccess => "ERROR_KEY_DENIED_ACCESS",
            Self::ZeroBalance => "ERROR_ZERO_BALANCE",
            Self::TaskNotSupported => "ERROR_TASK_NOT_SUPPORTED",
            Self::CaptchaUnsolvable => "ERROR_CAPTCHA_UNSOLVABLE",
            Self::UnknownQuestion => "ERROR_UNKNOWN_QUESTION",
            Self::ProxyBanned => "ERROR_PROXY_BANNED",
            Self::InvalidImage => "ERROR_INVALID_IMAGE",
            Self::ParseImageFail => "ERROR_PARSE_IMAGE_FAIL",
            Self::IpBanned => "ERROR_IP_BANNED",
            Self::KeyTempBlocked => "ERROR_KEY_TEMP_BLOCKED",
            Self::Other(code) => code,
        }
    }

    /// Advice on whether resubmitting the same task could succeed.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            Self::ServiceUnavailable
            | Self::RateLimit
            | Self::TaskTimeout
            | Self::CaptchaUnsolvable => RetryPolicy::Retryable { after: None },
            Self::KeyTempBlocked => RetryPolicy::Retryable {
                after: Some(Duration::from_secs(5 * 60)),
            },
            Self::IpBanned => RetryPolicy::Retryable {
                after: Some(Duration::from_secs(30 * 60)),
            },
            _ => RetryPolicy::NonRetryable,
        }
    }
}

impl From<String> for ErrorCode {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ERROR_SERVICE_UNAVALIABLE" => Self::ServiceUnavailable,
            "ERROR_RATE_LIMIT" => Self::RateLimit,
            "ERROR_INVALID_TASK_DATA" => Self::InvalidTaskData,
            "ERROR_BAD_REQUEST" => Self::BadRequest,
            "ERROR_TASKID_INVALID" => Self::TaskIdInvalid,
            "ERROR_TASK_TIMEOUT" => Self::TaskTimeout,
            "ERROR_SETTLEMENT_FAILED" => Self::SettlementFailed,
            "ERROR_KEY_DENIED_ACCESS" => Self::KeyDeniedAccess,
            "ERROR_ZERO_BALANCE" => Self::ZeroBalance,
            "ERROR_TASK_NOT_SUPPORTED" => Self::TaskNotSupported,
            "ERROR_CAPTCHA_UNSOLVABLE" => Self::CaptchaUnsolvable,
            "ERROR_UNKNOWN_QUESTION" => Self::UnknownQuestion,
            "ERROR_PROXY_BANNED" => Self::ProxyBanned,
            "ERROR_INVALID_IMAGE" => Self::InvalidImage,
            "ERROR_PARSE_IMAGE_FAIL" => Self::ParseImageFail,
            "ERROR_IP_BANNED" => Self::IpBanned,
            "ERROR_KEY_TEMP_BLOCKED" => Self::KeyTempBlocked,
            _ => Self::Other(value),
        }
    }
}

impl From<ErrorCode> for String {
    fn from(code: ErrorCode) -> Self {
        match code {
            ErrorCode::Other(code) => code,
            known => known.as_str().to_owned(),
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Service-reported failures
// ---------------------------------------------------------------------------

/// A failure reported by the service through a nonzero `errorId`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[capsolver] {}: {description}", .code.as_ref().map(ErrorCode::as_str).unwrap_or("ERROR_UNKNOWN"))]
pub struct ServiceError {
    /// The nonzero `errorId`.
    pub id: i64,
    /// The `errorCode`; `None` if the service sent an empty code.
    pub code: Option<ErrorCode>,
    /// The human-readable `errorDescription`.
    pub description: String,
}

impl ServiceError {
    pub fn retry_policy(&self) -> RetryPolicy {
        self.code
            .as_ref()
            .map(ErrorCode::retry_policy)
            .unwrap_or(RetryPolicy::NonRetryable)
    }
}

// ---------------------------------------------------------------------------
// Transport failures
// ---------------------------------------------------------------------------

/// Error returned by a [`crate::Transport`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    /// Description of the failure.
    pub message: String,
    /// HTTP status code, when a response was received at all.
    pub status: Option<u16>,
}

impl TransportError {
    /// The request never produced a response (connect failure, timeout, ...).
    pub fn network(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
        }
    }

    /// The service answered with an unusable HTTP response.
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: Some(status),
        }
    }
}

// ---------------------------------------------------------------------------
// Solve errors
// ---------------------------------------------------------------------------

/// Errors raised by submission, polling, and typed solving.
#[derive(Debug, Error)]
pub enum SolveError {
    /// The exchange with the service could not be completed.
    #[error("Transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The outbound envelope could not be serialised.
    #[error("Failed to encode request: {source}")]
    Encode {
        #[source]
        source: serde_json::Error,
    },

    /// The response body is not a valid result envelope.
    #[error("Malformed response: {source}")]
    MalformedResponse {
        #[source]
        source: serde_json::Error,
    },

    /// The service reported a nonzero `errorId`.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A pending result carried no task identifier to poll with.
    #[error("Task is {status} but the service returned no task identifier")]
    MissingTaskId {
        /// Status of the result that lacked an identifier.
        status: TaskStatus,
    },

    /// The solve was cancelled before reaching a terminal state.
    #[error("Solve cancelled")]
    Cancelled,

    /// A typed solve finished polling without a ready result.
    #[error("Task {} still {status} after polling stopped", .task_id.as_ref().map(TaskId::as_str).unwrap_or("<none>"))]
    NotReady {
        /// Identifier of the unfinished task, if one was assigned.
        task_id: Option<TaskId>,
        /// Last status observed.
        status: TaskStatus,
    },

    /// The solution payload does not match the expected solution shape.
    #[error("Failed to decode solution for task type '{task_type}': {source}")]
    SolutionDecode {
        /// Discriminator of the task whose solution failed to decode.
        task_type: String,
        #[source]
        source: serde_json::Error,
    },
}

impl SolveError {
    /// Advice on whether retrying the whole solve could succeed.
    ///
    /// Network failures and explicit timeouts are retryable; malformed data,
    /// cancellation, and most service codes are not.
    pub fn retry_policy(&self) -> RetryPolicy {
        match self {
            Self::Transport(_) | Self::NotReady { .. } => RetryPolicy::Retryable { after: None },
            Self::Service(err) => err.retry_policy(),
            Self::Encode { .. }
            | Self::MalformedResponse { .. }
            | Self::MissingTaskId { .. }
            | Self::Cancelled
            | Self::SolutionDecode { .. } => RetryPolicy::NonRetryable,
        }
    }

    /// Returns the service error, if this is a service-reported failure.
    pub fn service_error(&self) -> Option<&ServiceError> {
        match self {
            Self::Service(err) => Some(err),
            _ => None,
        }
    }
}
