//! Error types for status fetches and wait outcomes.

use std::time::Duration;

use thiserror::Error;

use crate::status::{PollTarget, Status};

/// Failure reported by a single status fetch.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum FetchError {
    /// The API reports that the object does not exist.
    #[error("resource not found")]
    NotFound,
    /// Any other failure (HTTP, authentication, decoding).
    #[error("transport error: {message}")]
    Transport {
        /// Description of the underlying failure.
        message: String,
    },
}

impl FetchError {
    /// Builds a transport error from any displayable message.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

/// Terminal failure of a wait.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum WaitError {
    /// The resource reached a configured error state.
    #[error("{target} reached error state {status}")]
    ErrorState {
        /// Resource being awaited.
        target: PollTarget,
        /// Status that ended the wait.
        status: Status,
    },
    /// The resource reported a status outside every configured set.
    #[error(
        "{target} reported unexpected state {status} (expected one of: {})",
        .expected.join(", ")
    )]
    UnexpectedState {
        /// Resource being awaited.
        target: PollTarget,
        /// Status that ended the wait.
        status: Status,
        /// Statuses the wait knows how to interpret.
        expected: Vec<String>,
    },
    /// The status fetch itself failed.
    #[error("failed to fetch status of {target}: {source}")]
    Fetch {
        /// Resource being awaited.
        target: PollTarget,
        /// Underlying fetch failure.
        source: FetchError,
    },
    /// A target wait kept seeing a missing resource.
    #[error("{target} not found after {checks} consecutive checks")]
    NotFound {
        /// Resource being awaited.
        target: PollTarget,
        /// Number of tolerated not-found polls that were exhausted.
        checks: u32,
    },
    /// The deadline passed before a target state was observed.
    #[error(
        "timeout after {elapsed:?} waiting for {target} (last state: {})",
        .last_status.as_ref().map_or("none", Status::as_str)
    )]
    Timeout {
        /// Resource being awaited.
        target: PollTarget,
        /// Time spent waiting.
        elapsed: Duration,
        /// Last status observed, if any poll completed.
        last_status: Option<Status>,
    },
    /// The caller cancelled the wait.
    #[error("wait for {target} cancelled")]
    Cancelled {
        /// Resource being awaited.
        target: PollTarget,
    },
}

impl WaitError {
    /// Returns `true` when the resource simply was not ready in time, as
    /// opposed to failing outright.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Resource the failed wait was tracking.
    #[must_use]
    pub const fn target(&self) -> &PollTarget {
        match self {
            Self::ErrorState { target, .. }
            | Self::UnexpectedState { target, .. }
            | Self::Fetch { target, .. }
            | Self::NotFound { target, .. }
            | Self::Timeout { target, .. }
            | Self::Cancelled { target } => target,
        }
    }
}
