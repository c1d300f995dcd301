//! Client configuration.
//!
//! [`SolverConfig`] gathers the values that are fixed for the production
//! service (base URL, application identifier, poll budget, poll interval) into
//! one immutable value handed to the solver at construction. Tests substitute
//! a local endpoint, a zero wait, and a small poll budget.

use std::time::Duration;

use crate::AppId;

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.capsolver.com";

/// Application identifier registered for this client.
pub const DEFAULT_APP_ID: &str = "D3119ABC-FF91-42EF-9F18-C4CE4B259E52";

/// Maximum number of `/getTaskResult` calls per solve.
pub const DEFAULT_MAX_POLLS: u32 = 120;

/// Wait before each `/getTaskResult` call.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// The two service operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Submits a new task.
    CreateTask,
    /// Fetches the state of an existing task.
    GetTaskResult,
}

impl Endpoint {
    pub fn path(self) -> &'static str {
        match self {
            Self::CreateTask => "/createTask",
            Self::GetTaskResult => "/getTaskResult",
        }
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Immutable solver configuration.
///
/// The worst-case wall time of a solve is roughly
/// `max_polls * poll_interval` plus the time spent in exchanges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverConfig {
    /// Base URL without a trailing slash.
    pub base_url: String,
    pub app_id: AppId,
    pub max_polls: u32,
    pub poll_interval: Duration,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            app_id: AppId::default(),
            max_polls: DEFAULT_MAX_POLLS,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl SolverConfig {
    /// Overrides the base URL. A trailing `/` is stripped.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let mut url = base_url.into();
        while url.ends_with('/') {
            url.pop();
        }
        self.base_url = url;
        self
    }

    #[must_use]
    pub fn with_app_id(mut self, app_id: AppId) -> Self {
        self.app_id = app_id;
        self
    }

    #[must_use]
    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = max_polls;
        self
    }

    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Returns the full URL for `endpoint`.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }
}
