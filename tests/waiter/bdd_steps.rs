//! BDD step definitions for the poll-until-state waiter.

use std::time::Duration;

use piwait::{AsyncOperationWaiter, WaitError, WaitSpec};
use rstest_bdd_macros::{given, then, when};
use tokio::runtime::{Builder, Runtime};

use super::test_helpers::{Answer, WaitOutcome, WaiterContext, WaiterTestError, parse_answers};

#[derive(Debug, thiserror::Error)]
pub enum StepError {
    #[error(transparent)]
    Setup(#[from] WaiterTestError),
    #[error("assertion failed: {0}")]
    Assertion(String),
}

#[given("a resource that reports \"{statuses}\"")]
fn resource_reports(mut waiter_context: WaiterContext, statuses: String) -> WaiterContext {
    waiter_context.answers = parse_answers(&statuses);
    waiter_context
}

#[given("a resource that is not found")]
fn resource_not_found(mut waiter_context: WaiterContext) -> WaiterContext {
    waiter_context.answers = vec![Answer::NotFound];
    waiter_context
}

#[given("a timeout of \"{timeout}\" seconds polling every \"{interval}\" seconds")]
fn timeout_and_interval(
    mut waiter_context: WaiterContext,
    timeout: u64,
    interval: u64,
) -> WaiterContext {
    waiter_context.timeout = Duration::from_secs(timeout);
    waiter_context.poll_interval = Duration::from_secs(interval);
    waiter_context
}

#[when("I wait for the resource to become active")]
fn wait_until_active(waiter_context: WaiterContext) -> Result<WaiterContext, StepError> {
    let spec = waiter_context.ready_spec()?;
    run_wait(waiter_context, spec, false)
}

#[when("I wait for the resource to be deleted")]
fn wait_until_deleted(waiter_context: WaiterContext) -> Result<WaiterContext, StepError> {
    let spec = waiter_context.absence_spec()?;
    run_wait(waiter_context, spec, true)
}

#[then("the wait succeeds with status \"{status}\"")]
fn wait_succeeds(waiter_context: &WaiterContext, status: String) -> Result<(), StepError> {
    match &outcome(waiter_context)?.result {
        Ok(actual) if *actual == status => Ok(()),
        Ok(actual) => Err(StepError::Assertion(format!(
            "expected status {status}, got {actual}"
        ))),
        Err(err) => Err(StepError::Assertion(format!(
            "expected success, got failure: {err}"
        ))),
    }
}

#[then("the wait fails in error state \"{status}\"")]
fn wait_fails_in_error_state(
    waiter_context: &WaiterContext,
    status: String,
) -> Result<(), StepError> {
    match &outcome(waiter_context)?.result {
        Err(WaitError::ErrorState { status: actual, .. }) if actual.as_str() == status => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected error state {status}, got {other:?}"
        ))),
    }
}

#[then("the wait fails with an unexpected state \"{status}\"")]
fn wait_fails_unexpected(waiter_context: &WaiterContext, status: String) -> Result<(), StepError> {
    match &outcome(waiter_context)?.result {
        Err(WaitError::UnexpectedState { status: actual, .. }) if actual.as_str() == status => {
            Ok(())
        }
        other => Err(StepError::Assertion(format!(
            "expected unexpected state {status}, got {other:?}"
        ))),
    }
}

#[then("the wait times out")]
fn wait_times_out(waiter_context: &WaiterContext) -> Result<(), StepError> {
    match &outcome(waiter_context)?.result {
        Err(err) if err.is_timeout() => Ok(()),
        other => Err(StepError::Assertion(format!(
            "expected timeout, got {other:?}"
        ))),
    }
}

#[then("the resource was polled \"{count}\" times")]
fn resource_polled(waiter_context: &WaiterContext, count: u32) -> Result<(), StepError> {
    let polls = outcome(waiter_context)?.polls;
    if polls == count {
        Ok(())
    } else {
        Err(StepError::Assertion(format!(
            "expected {count} polls, got {polls}"
        )))
    }
}

fn outcome(waiter_context: &WaiterContext) -> Result<&WaitOutcome, StepError> {
    waiter_context
        .outcome
        .as_ref()
        .ok_or_else(|| StepError::Assertion(String::from("missing outcome")))
}

fn paused_runtime() -> Result<Runtime, StepError> {
    Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .map_err(|err| StepError::Assertion(err.to_string()))
}

fn run_wait(
    mut waiter_context: WaiterContext,
    spec: WaitSpec,
    absence: bool,
) -> Result<WaiterContext, StepError> {
    let runtime = paused_runtime()?;
    let source = waiter_context.source()?;
    let waiter = AsyncOperationWaiter::new(spec);

    let result = runtime.block_on(async {
        let snapshot = if absence {
            waiter.wait_for_absence(&source).await
        } else {
            waiter.wait_for_target(&source).await
        };
        snapshot.map(|found| found.status.as_str().to_owned())
    });

    waiter_context.outcome = Some(WaitOutcome {
        result,
        polls: source.polls(),
    });
    Ok(waiter_context)
}
