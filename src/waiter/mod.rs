//! Generic poll-until-state waiter for asynchronous Power Cloud operations.
//!
//! A create, update, or delete request returns before the remote object has
//! settled. The waiter repeatedly asks a [`StatusSource`] for the current
//! status and stops once a target state, an error state, or the deadline is
//! reached. Polls are strictly sequential and separated by a fixed delay.

mod error;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::status::{PollTarget, StatusSnapshot};
use crate::wait_spec::{Classification, FetchErrorPolicy, WaitSpec};

pub use error::{FetchError, WaitError};

/// Stand-in for an unbounded deadline when a duration would overflow
/// [`Instant`].
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Future returned by [`StatusSource::fetch_status`].
pub type PollFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, FetchError>> + Send + 'a>>;

/// Capability implemented once per awaited resource kind.
pub trait StatusSource {
    /// Object returned alongside the status.
    type Payload;

    /// Remote object being awaited.
    fn target(&self) -> &PollTarget;

    /// Fetches the current status of the remote object.
    fn fetch_status(&self) -> PollFuture<'_, StatusSnapshot<Self::Payload>>;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum WaitMode {
    Target,
    Absence,
}

#[derive(Debug)]
struct LoopState<T> {
    attempts: u32,
    not_found: u32,
    target_hits: u32,
    last: Option<StatusSnapshot<T>>,
}

impl<T> Default for LoopState<T> {
    fn default() -> Self {
        Self {
            attempts: 0,
            not_found: 0,
            target_hits: 0,
            last: None,
        }
    }
}

enum Step<T> {
    Done(StatusSnapshot<T>),
    Continue,
}

/// Polls a [`StatusSource`] until it reports a terminal state.
#[derive(Clone, Debug)]
pub struct AsyncOperationWaiter {
    spec: WaitSpec,
    cancel: Option<CancellationToken>,
}

impl AsyncOperationWaiter {
    /// Creates a waiter for the given configuration.
    #[must_use]
    pub const fn new(spec: WaitSpec) -> Self {
        Self { spec, cancel: None }
    }

    /// Stops the wait promptly once `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Waits until the resource reports a target state.
    ///
    /// Transport errors end the wait immediately. Not-found results are
    /// tolerated up to [`WaitSpec::not_found_checks`] consecutive times to
    /// absorb eventual consistency right after a create.
    ///
    /// # Errors
    ///
    /// Returns [`WaitError`] describing the error state, fetch failure,
    /// timeout, or cancellation that ended the wait.
    pub async fn wait_for_target<S: StatusSource>(
        &self,
        source: &S,
    ) -> Result<StatusSnapshot<S::Payload>, WaitError> {
        self.run(source, WaitMode::Target).await
    }

    /// Waits until the resource is gone.
    ///
    /// A [`FetchError::NotFound`] result, or a status in the target set, ends
    /// the wait successfully. With [`FetchErrorPolicy::TreatAsAbsent`] any
    /// fetch error is also read as the resource being gone.
    ///
    /// # Errors
    ///
    /// Returns [`WaitError`] when the resource reaches an error state, the
    /// fetch fails, the deadline passes, or the wait is cancelled.
    pub async fn wait_for_absence<S: StatusSource>(
        &self,
        source: &S,
    ) -> Result<StatusSnapshot<S::Payload>, WaitError> {
        self.run(source, WaitMode::Absence).await
    }

    async fn run<S: StatusSource>(
        &self,
        source: &S,
        mode: WaitMode,
    ) -> Result<StatusSnapshot<S::Payload>, WaitError> {
        let target = source.target();
        let started = Instant::now();
        let deadline = instant_after(started, self.spec.timeout());
        let mut state = LoopState::default();

        debug!(resource = %target, ?mode, timeout = ?self.spec.timeout(), "waiting");

        if !self.spec.delay().is_zero() {
            self.pause(target, deadline, self.spec.delay()).await?;
        }

        loop {
            if Instant::now() >= deadline {
                return Err(Self::timed_out(target, started, state));
            }

            let Some(fetched) = self.fetch(source, deadline).await? else {
                return Err(Self::timed_out(target, started, state));
            };
            state.attempts += 1;

            if let Step::Done(snapshot) = self.step(target, mode, fetched, &mut state)? {
                info!(
                    resource = %target,
                    status = %snapshot.status,
                    attempts = state.attempts,
                    elapsed = ?started.elapsed(),
                    "wait complete"
                );
                return Ok(snapshot);
            }

            self.pause(target, deadline, self.spec.poll_interval()).await?;
        }
    }

    fn step<T>(
        &self,
        target: &PollTarget,
        mode: WaitMode,
        fetched: Result<StatusSnapshot<T>, FetchError>,
        state: &mut LoopState<T>,
    ) -> Result<Step<T>, WaitError> {
        let snapshot = match fetched {
            Ok(snapshot) => snapshot,
            Err(FetchError::NotFound) => return self.on_not_found(target, mode, state),
            Err(err @ FetchError::Transport { .. }) => {
                if mode == WaitMode::Absence
                    && self.spec.fetch_error_policy() == FetchErrorPolicy::TreatAsAbsent
                {
                    debug!(resource = %target, error = %err, "fetch error read as deletion");
                    return Ok(Step::Done(StatusSnapshot::not_found()));
                }
                return Err(WaitError::Fetch {
                    target: target.clone(),
                    source: err,
                });
            }
        };

        state.not_found = 0;
        let classification = self.spec.classify(&snapshot.status);
        debug!(
            resource = %target,
            attempt = state.attempts,
            status = %snapshot.status,
            ?classification,
            "polled status"
        );

        match classification {
            Classification::Target => {
                state.target_hits += 1;
                if state.target_hits >= self.spec.continuous_target_occurrence() {
                    return Ok(Step::Done(snapshot));
                }
            }
            Classification::Pending => state.target_hits = 0,
            Classification::Error => {
                return Err(WaitError::ErrorState {
                    target: target.clone(),
                    status: snapshot.status,
                });
            }
            Classification::Unexpected => {
                return Err(WaitError::UnexpectedState {
                    target: target.clone(),
                    status: snapshot.status,
                    expected: self.spec.expected_states(),
                });
            }
        }

        state.last = Some(snapshot);
        Ok(Step::Continue)
    }

    fn on_not_found<T>(
        &self,
        target: &PollTarget,
        mode: WaitMode,
        state: &mut LoopState<T>,
    ) -> Result<Step<T>, WaitError> {
        if mode == WaitMode::Absence {
            return Ok(Step::Done(StatusSnapshot::not_found()));
        }

        state.target_hits = 0;
        state.not_found += 1;
        let checks = self.spec.not_found_checks();
        if state.not_found > checks {
            return Err(WaitError::NotFound {
                target: target.clone(),
                checks,
            });
        }
        warn!(
            resource = %target,
            consecutive = state.not_found,
            tolerated = checks,
            "resource not found yet"
        );
        Ok(Step::Continue)
    }

    /// Runs one fetch, racing it against cancellation and the deadline.
    /// Returns `Ok(None)` when the deadline passes mid-fetch.
    async fn fetch<S: StatusSource>(
        &self,
        source: &S,
        deadline: Instant,
    ) -> Result<Option<Result<StatusSnapshot<S::Payload>, FetchError>>, WaitError> {
        if self.is_cancelled() {
            return Err(WaitError::Cancelled {
                target: source.target().clone(),
            });
        }
        tokio::select! {
            biased;
            () = cancelled(self.cancel.as_ref()) => Err(WaitError::Cancelled {
                target: source.target().clone(),
            }),
            () = sleep_until(deadline) => Ok(None),
            result = source.fetch_status() => Ok(Some(result)),
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    /// Sleeps for `duration`, clamped to the deadline.
    async fn pause(
        &self,
        target: &PollTarget,
        deadline: Instant,
        duration: Duration,
    ) -> Result<(), WaitError> {
        let wake = instant_after(Instant::now(), duration).min(deadline);
        tokio::select! {
            biased;
            () = cancelled(self.cancel.as_ref()) => Err(WaitError::Cancelled {
                target: target.clone(),
            }),
            () = sleep_until(wake) => Ok(()),
        }
    }

    fn timed_out<T>(target: &PollTarget, started: Instant, state: LoopState<T>) -> WaitError {
        WaitError::Timeout {
            target: target.clone(),
            elapsed: started.elapsed(),
            last_status: state.last.map(|snapshot| snapshot.status),
        }
    }
}

/// `start + duration`, saturating at [`FAR_FUTURE`] for durations the clock
/// cannot represent.
fn instant_after(start: Instant, duration: Duration) -> Instant {
    start
        .checked_add(duration)
        .unwrap_or_else(|| start + FAR_FUTURE)
}

/// Resolves once `token` is cancelled; pends forever without a token.
async fn cancelled(token: Option<&CancellationToken>) {
    match token {
        Some(token) => token.cancelled().await,
        None => std::future::pending().await,
    }
}
