//! Task orchestration for the CapSolver client.
//!
//! [`Solver`] drives the submit → poll → complete state machine:
//!
//! ```text
//! Submitting ──ready──────────────────────────────▶ Ready
//!     │  └───errorId != 0─────────────────────────▶ Failed
//!     └──idle/processing──▶ Polling ──ready───────▶ Ready
//!                            │  ▲  └──errorId != 0─▶ Failed
//!                            └──┘ (wait, poll)
//!                            └──budget spent──────▶ last result returned as-is
//! ```
//!
//! Submission and every poll are strictly sequential. The poll budget and the
//! wait before each poll come from [`SolverConfig`]. When the budget runs out
//! the last result is returned unchanged; recognising a non-ready result as a
//! timeout is left to the caller of [`Solver::drive`]. The typed
//! [`Solver::solve`] does that recognition and reports
//! [`SolveError::NotReady`].
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** The solver sequences calls between the envelope
//! codec in [`protocol`] and a [`Transport`]. It knows nothing about concrete
//! task or solution shapes.
//!
//! ## Concurrency
//!
//! A `Solver` holds only immutable state and can be shared (e.g. behind an
//! `Arc`) by any number of concurrent solves. Each solve owns its task
//! identifier and result exclusively.

use std::sync::Arc;

use protocol::{
    codec, CaptchaTask, ClientKey, Credentials, Endpoint, SolveError, SolverConfig, TaskId,
    TaskResult, Transport,
};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// Client for the CapSolver task API.
#[derive(Clone)]
pub struct Solver {
    transport: Arc<dyn Transport>,
    credentials: Credentials,
    config: SolverConfig,
}

impl std::fmt::Debug for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Solver")
            .field("credentials", &self.credentials)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Solver {
    /// Creates a solver. The application identifier comes from `config`.
    pub fn new(transport: Arc<dyn Transport>, client_key: ClientKey, config: SolverConfig) -> Self {
        let credentials = Credentials::new(client_key, config.app_id.clone());
        Self {
            transport,
            credentials,
            config,
        }
    }

    /// The configuration this solver was built with.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Single exchanges
    // -----------------------------------------------------------------------

    /// Creates a task.
    ///
    /// Fails immediately if the service reports an error; no polling is ever
    /// attempted for a task that could not be created. Otherwise the result
    /// may already be ready (synchronous task types) or pending with a task
    /// identifier.
    #[instrument(skip_all, fields(task_type = %task_type))]
    pub async fn submit<T>(&self, task_type: &str, task: &T) -> Result<TaskResult, SolveError>
    where
        T: Serialize + Sync,
    {
        let body = codec::encode_create(&self.credentials, task_type, task)?;
        self.exchange(Endpoint::CreateTask, body).await
    }

    /// Fetches the current state of an existing task.
    #[instrument(skip_all, fields(task_id = %task_id))]
    pub async fn poll(&self, task_id: &TaskId) -> Result<TaskResult, SolveError> {
        let body = codec::encode_poll(&self.credentials, task_id)?;
        self.exchange(Endpoint::GetTaskResult, body).await
    }

    async fn exchange(&self, endpoint: Endpoint, body: Vec<u8>) -> Result<TaskResult, SolveError> {
        let url = self.config.endpoint_url(endpoint);
        debug!(%endpoint, bytes = body.len(), "Sending request");

        let response = self.transport.exchange(&url, body).await?;
        let result = codec::decode_result(&response)?;

        if let Some(err) = result.service_error() {
            warn!(
                %endpoint,
                error_id = err.id,
                error_code = err.code.as_ref().map(|c| c.as_str()).unwrap_or(""),
                description = %err.description,
                "Service reported an error"
            );
            return Err(err.into());
        }

        debug!(%endpoint, status = %result.status, "Received result");
        Ok(result)
    }

    // -----------------------------------------------------------------------
    // State machine
    // -----------------------------------------------------------------------

    /// Submits a task and polls until it is ready, fails, or the poll budget
    /// is spent.
    ///
    /// Returns the last result when the budget runs out, even though it is not
    /// ready.
    pub async fn drive<T>(&self, task_type: &str, task: &T) -> Result<TaskResult, SolveError>
    where
        T: Serialize + Sync,
    {
        self.drive_until(task_type, task, &CancellationToken::new()).await
    }

    /// Like [`Solver::drive`], but abandons the solve with
    /// [`SolveError::Cancelled`] as soon as `cancel` fires.
    ///
    /// Cancellation is observed during the wait before each poll and while an
    /// exchange is in flight (the exchange future is dropped).
    #[instrument(skip_all, fields(task_type = %task_type))]
    pub async fn drive_until<T>(
        &self,
        task_type: &str,
        task: &T,
        cancel: &CancellationToken,
    ) -> Result<TaskResult, SolveError>
    where
        T: Serialize + Sync,
    {
        let mut result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(SolveError::Cancelled),
            res = self.submit(task_type, task) => res?,
        };

        if result.is_ready() {
            info!(task_id = ?result.task_id, "Task ready on submission");
            return Ok(result);
        }

        // The identifier assigned at creation is used for every poll.
        let task_id = result
            .task_id
            .clone()
            .ok_or(SolveError::MissingTaskId {
                status: result.status,
            })?;

        let mut polls = 0;
        while !result.is_ready() && polls < self.config.max_polls {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(SolveError::Cancelled),
                _ = tokio::time::sleep(self.config.poll_interval) => {}
            }

            result = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(SolveError::Cancelled),
                res = self.poll(&task_id) => res?,
            };
            polls += 1;

            if let Some(echoed) = result.task_id.as_ref().filter(|id| **id != task_id) {
                warn!(%task_id, %echoed, "Service echoed a different task identifier");
            }
        }

        if result.is_ready() {
            info!(%task_id, polls, "Task ready");
        } else {
            warn!(
                %task_id,
                polls,
                status = %result.status,
                "Poll budget spent before task was ready"
            );
        }
        Ok(result)
    }

    // -----------------------------------------------------------------------
    // Typed solving
    // -----------------------------------------------------------------------

    /// Solves a typed task and decodes its solution.
    ///
    /// The discriminator is computed once from the task before submission.
    /// A solve that ends without a ready result fails with
    /// [`SolveError::NotReady`].
    pub async fn solve<T: CaptchaTask>(&self, task: &T) -> Result<T::Solution, SolveError> {
        self.solve_until(task, &CancellationToken::new()).await
    }

    /// Like [`Solver::solve`], but cancellable.
    pub async fn solve_until<T: CaptchaTask>(
        &self,
        task: &T,
        cancel: &CancellationToken,
    ) -> Result<T::Solution, SolveError> {
        let task_type = task.task_type();
        let result = self.drive_until(task_type, task, cancel).await?;

        if !result.is_ready() {
            return Err(SolveError::NotReady {
                task_id: result.task_id,
                status: result.status,
            });
        }

        result
            .decode_solution()
            .map_err(|source| SolveError::SolutionDecode {
                task_type: task_type.to_owned(),
                source,
            })
    }
}

#[cfg(test)]
mod tests;
