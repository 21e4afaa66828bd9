//! Shared fixtures for waiter BDD scenarios.

use std::time::Duration;

use piwait::test_support::{ScriptedSource, sample_target};
use piwait::{FetchError, WaitError, WaitSpec, WaitSpecError};
use rstest::fixture;
use thiserror::Error;

/// One scripted answer from the fake resource.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Answer {
    Status(String),
    NotFound,
}

#[derive(Clone, Debug)]
pub struct WaiterContext {
    pub answers: Vec<Answer>,
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub outcome: Option<WaitOutcome>,
}

#[derive(Clone, Debug)]
pub struct WaitOutcome {
    pub result: Result<String, WaitError>,
    pub polls: u32,
}

#[derive(Clone, Debug, Error)]
pub enum WaiterTestError {
    #[error(transparent)]
    Spec(#[from] WaitSpecError),
    #[error("invalid waiter fixture: {0}")]
    Fixture(String),
}

pub type WaiterContextResult = Result<WaiterContext, WaiterTestError>;

#[fixture]
pub fn waiter_context_result() -> WaiterContextResult {
    Ok(WaiterContext {
        answers: Vec::new(),
        timeout: Duration::from_secs(60),
        poll_interval: Duration::from_secs(2),
        outcome: None,
    })
}

#[fixture]
pub fn waiter_context(waiter_context_result: WaiterContextResult) -> WaiterContext {
    waiter_context_result
        .unwrap_or_else(|err| panic!("waiter context fixture should initialise: {err}"))
}

impl WaiterContext {
    /// Readiness configuration used by the scenarios.
    pub fn ready_spec(&self) -> Result<WaitSpec, WaiterTestError> {
        Ok(WaitSpec::builder()
            .pending(["BUILDING"])
            .target(["ACTIVE"])
            .error(["ERROR"])
            .poll_interval(self.poll_interval)
            .timeout(self.timeout)
            .build()?)
    }

    /// Deletion configuration used by the scenarios.
    pub fn absence_spec(&self) -> Result<WaitSpec, WaiterTestError> {
        Ok(WaitSpec::builder()
            .pending(["DELETING"])
            .target([piwait::STATUS_NOT_FOUND])
            .poll_interval(self.poll_interval)
            .timeout(self.timeout)
            .build()?)
    }

    /// Builds a scripted source replaying the configured answers.
    pub fn source(&self) -> Result<ScriptedSource<()>, WaiterTestError> {
        if self.answers.is_empty() {
            return Err(WaiterTestError::Fixture(String::from(
                "no scripted answers configured",
            )));
        }
        Ok(self
            .answers
            .iter()
            .fold(ScriptedSource::new(sample_target()), |source, answer| {
                match answer {
                    Answer::Status(status) => source.then_status(status, ()),
                    Answer::NotFound => source.then_error(FetchError::NotFound),
                }
            }))
    }
}

/// Parses a comma separated status list such as `BUILDING, ACTIVE`.
pub fn parse_answers(statuses: &str) -> Vec<Answer> {
    statuses
        .split(',')
        .map(str::trim)
        .filter(|status| !status.is_empty())
        .map(|status| Answer::Status(status.to_owned()))
        .collect()
}
