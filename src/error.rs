/// Error types.
///
/// Gameplay no-ops (firing on cooldown, enemy fire with no enemies left) are
/// not errors.  These enums cover misuse of the session lifecycle and bad
/// configuration input.

use thiserror::Error;

use crate::entities::SessionPhase;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// `start` called while a session is already running.
    #[error("cannot start: session is already running")]
    AlreadyRunning,

    /// `terminate` called outside of a running session.
    #[error("cannot terminate: session is {0:?}, not running")]
    NotRunning(SessionPhase),

    /// `reset` called before the session was terminated.
    #[error("cannot reset: session is {0:?}, not terminated")]
    NotTerminated(SessionPhase),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read settings file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),

    #[error("unknown difficulty '{0}' (expected easy, medium or hard)")]
    UnknownDifficulty(String),
}
