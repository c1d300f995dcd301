//! Port traits implemented outside this crate.
//!
//! | Trait | Implemented by |
//! |-------|----------------|
//! | [`Transport`] | `transport::HttpTransport`; scripted fakes in tests |
//! | [`CaptchaTask`] | every task shape in the `tasks` crate |

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::TransportError;

/// A single request/response exchange with the service.
///
/// Implementations POST `body` to `url` with `Content-Type: application/json`
/// and return the raw response body. They must not retry and must not
/// interpret the body; status and error handling belong to the solver.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn exchange(&self, url: &str, body: Vec<u8>) -> Result<Vec<u8>, TransportError>;
}

/// A task shape the solver can submit, paired with the solution shape the
/// service returns for it.
///
/// The serialised task must be a JSON object and must not contain a `type`
/// key; the discriminator comes from [`CaptchaTask::task_type`] and is added
/// by the envelope codec.
pub trait CaptchaTask: Serialize + Sync {
    /// Shape of the `solution` payload once the task is ready.
    type Solution: DeserializeOwned;

    /// The wire `type` discriminator for this task.
    ///
    /// Must be a pure function of the task's fields. Several task kinds pick
    /// between a proxy and a proxy-less discriminator depending on whether a
    /// proxy is set.
    fn task_type(&self) -> &str;
}
