//! Core domain for the CapSolver client.
//!
//! This crate contains every wire type, newtype identifier, error type, and
//! port trait used by the rest of the workspace. Infrastructure crates
//! implement the traits defined here; the orchestration crate drives them.
//!
//! ## Architectural Layer
//!
//! **Domain + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is exchanged with the service; the `transport` crate
//! defines *how* bytes reach it and the `solver` crate defines *when*.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`TaskId`, `AppId`, `TaskType`) and credentials |
//! | [`types`] | The inbound result envelope (`TaskResult`, `TaskStatus`, `Solution`, `ErrorBlock`) |
//! | [`errors`] | `SolveError`, service error codes, and retry-policy classification |
//! | [`codec`] | Outbound envelope encoding and result decoding |
//! | [`config`] | `SolverConfig` and the production constants |
//! | [`ports`] | The `Transport` and `CaptchaTask` traits |

pub mod codec;
pub mod config;
pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use codec::{decode_result, encode_create, encode_poll};
pub use config::{
    Endpoint, SolverConfig, DEFAULT_APP_ID, DEFAULT_BASE_URL, DEFAULT_MAX_POLLS, DEFAULT_POLL_INTERVAL,
};
pub use errors::{ErrorCode, RetryPolicy, ServiceError, SolveError, TransportError};
pub use identifiers::{AppId, ClientKey, Credentials, TaskId, TaskType};
pub use ports::{CaptchaTask, Transport};
pub use types::{ErrorBlock, Solution, TaskResult, TaskStatus};
