//! Newtype identifiers and credentials.
//!
//! Every string the service hands back (or expects) with a distinct meaning is
//! wrapped in its own type. This prevents accidentally polling with an
//! application identifier, or sending a task identifier as a discriminator,
//! even though all of them are plain strings on the wire.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id! {
    /// Identifies a task created by the service.
    ///
    /// Assigned by `/createTask` for asynchronous task types and reused for
    /// every `/getTaskResult` call until the task reaches a terminal state.
    TaskId
}

string_id! {
    /// Identifies the client application to the service.
    ///
    /// Sent as `appId` on every request; fixed per deployment.
    AppId
}

impl Default for AppId {
    /// The application identifier registered for this client.
    fn default() -> Self {
        Self(crate::config::DEFAULT_APP_ID.to_owned())
    }
}

string_id! {
    /// The `type` discriminator of a task (e.g. `"ReCaptchaV2TaskProxyLess"`).
    TaskType
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// The account API key, sent as `clientKey`.
///
/// `Debug` and `Display` never print the key; use [`ClientKey::expose`] where
/// the raw value is genuinely needed (envelope encoding).
#[derive(Clone, PartialEq, Eq)]
pub struct ClientKey(String);

impl ClientKey {
    /// Creates a client key, returning `None` if the value is empty.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        if v.is_empty() {
            None
        } else {
            Some(Self(v))
        }
    }

    /// Returns the raw key.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ClientKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ClientKey(***)")
    }
}

impl std::fmt::Display for ClientKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("***")
    }
}

/// The credentials attached to every outbound envelope.
///
/// Immutable for the lifetime of a session and shared read-only between any
/// number of concurrent solves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_key: ClientKey,
    pub app_id: AppId,
}

impl Credentials {
    pub fn new(client_key: ClientKey, app_id: AppId) -> Self {
        Self { client_key, app_id }
    }
}
