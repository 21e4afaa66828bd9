//! Configuration for a single wait: which statuses keep it going, which end
//! it, and how long to keep polling.

use std::collections::BTreeSet;
use std::time::Duration;

use thiserror::Error;

use crate::status::Status;

/// Default number of consecutive not-found polls tolerated by target waits.
pub const DEFAULT_NOT_FOUND_CHECKS: u32 = 20;

/// How a transport-level fetch failure is interpreted.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FetchErrorPolicy {
    /// Any transport error ends the wait with a failure.
    #[default]
    Fail,
    /// Absence waits treat any fetch error as the resource being gone.
    /// Target waits still fail.
    TreatAsAbsent,
}

/// Outcome of matching a status against a [`WaitSpec`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Classification {
    /// Still converging; keep polling.
    Pending,
    /// Desired state reached.
    Target,
    /// Explicit failure state.
    Error,
    /// Status appears in none of the configured sets.
    Unexpected,
}

/// Errors raised when a [`WaitSpec`] is inconsistent.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum WaitSpecError {
    /// Raised when a target wait has no target statuses.
    #[error("wait spec has no target states")]
    NoTargets,
    /// Raised when the same status is configured in two sets.
    #[error("status {status} is configured as both {first} and {second}")]
    Overlap {
        /// Status present in both sets.
        status: String,
        /// Name of the first set.
        first: &'static str,
        /// Name of the second set.
        second: &'static str,
    },
    /// Raised when a duration that must be positive is zero.
    #[error("{field} must be greater than zero")]
    ZeroDuration {
        /// Name of the offending field.
        field: &'static str,
    },
}

/// Immutable configuration for one wait operation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WaitSpec {
    pending: BTreeSet<Status>,
    target: BTreeSet<Status>,
    error: BTreeSet<Status>,
    delay: Duration,
    poll_interval: Duration,
    timeout: Duration,
    not_found_checks: u32,
    continuous_target_occurrence: u32,
    fetch_error_policy: FetchErrorPolicy,
}

impl WaitSpec {
    /// Starts a builder for a [`WaitSpec`].
    #[must_use]
    pub fn builder() -> WaitSpecBuilder {
        WaitSpecBuilder::new()
    }

    /// Classifies a status. Error states win over target states so a
    /// misconfigured overlap can never report success for a failure.
    #[must_use]
    pub fn classify(&self, status: &Status) -> Classification {
        if self.error.contains(status) {
            Classification::Error
        } else if self.target.contains(status) {
            Classification::Target
        } else if self.pending.contains(status) {
            Classification::Pending
        } else {
            Classification::Unexpected
        }
    }

    /// Statuses that keep the wait polling.
    #[must_use]
    pub const fn pending(&self) -> &BTreeSet<Status> {
        &self.pending
    }

    /// Statuses that end the wait successfully.
    #[must_use]
    pub const fn target(&self) -> &BTreeSet<Status> {
        &self.target
    }

    /// Statuses that end the wait with a failure.
    #[must_use]
    pub const fn error(&self) -> &BTreeSet<Status> {
        &self.error
    }

    /// Delay before the first poll.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Fixed delay between two polls.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Overall time budget, including the initial delay.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Consecutive not-found polls tolerated by target waits.
    #[must_use]
    pub const fn not_found_checks(&self) -> u32 {
        self.not_found_checks
    }

    /// Consecutive target observations required before succeeding.
    #[must_use]
    pub const fn continuous_target_occurrence(&self) -> u32 {
        self.continuous_target_occurrence
    }

    /// Interpretation of transport errors.
    #[must_use]
    pub const fn fetch_error_policy(&self) -> FetchErrorPolicy {
        self.fetch_error_policy
    }

    /// Returns a copy with a different overall timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns a copy with a different poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Returns a copy with a different initial delay.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Lists the statuses a caller could legitimately observe, used in
    /// unexpected-state diagnostics.
    #[must_use]
    pub fn expected_states(&self) -> Vec<String> {
        self.pending
            .iter()
            .chain(&self.target)
            .chain(&self.error)
            .map(|status| status.as_str().to_owned())
            .collect()
    }

    fn check_disjoint(
        lhs: &BTreeSet<Status>,
        first: &'static str,
        rhs: &BTreeSet<Status>,
        second: &'static str,
    ) -> Result<(), WaitSpecError> {
        match lhs.intersection(rhs).next() {
            Some(status) => Err(WaitSpecError::Overlap {
                status: status.as_str().to_owned(),
                first,
                second,
            }),
            None => Ok(()),
        }
    }

    /// Validates internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`WaitSpecError`] when the target set is empty, two sets
    /// overlap, or the timeout or poll interval is zero.
    pub fn validate(&self) -> Result<(), WaitSpecError> {
        if self.target.is_empty() {
            return Err(WaitSpecError::NoTargets);
        }
        Self::check_disjoint(&self.pending, "pending", &self.target, "target")?;
        Self::check_disjoint(&self.error, "error", &self.target, "target")?;
        Self::check_disjoint(&self.error, "error", &self.pending, "pending")?;
        if self.timeout.is_zero() {
            return Err(WaitSpecError::ZeroDuration { field: "timeout" });
        }
        if self.poll_interval.is_zero() {
            return Err(WaitSpecError::ZeroDuration {
                field: "poll_interval",
            });
        }
        Ok(())
    }
}

/// Builder for [`WaitSpec`] that validates on construction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WaitSpecBuilder {
    pending: BTreeSet<Status>,
    target: BTreeSet<Status>,
    error: BTreeSet<Status>,
    delay: Duration,
    poll_interval: Duration,
    timeout: Duration,
    not_found_checks: u32,
    continuous_target_occurrence: u32,
    fetch_error_policy: FetchErrorPolicy,
}

impl Default for WaitSpecBuilder {
    fn default() -> Self {
        Self {
            pending: BTreeSet::new(),
            target: BTreeSet::new(),
            error: BTreeSet::new(),
            delay: Duration::ZERO,
            poll_interval: Duration::from_secs(10),
            timeout: Duration::from_secs(600),
            not_found_checks: DEFAULT_NOT_FOUND_CHECKS,
            continuous_target_occurrence: 1,
            fetch_error_policy: FetchErrorPolicy::Fail,
        }
    }
}

fn to_statuses<I, S>(values: I) -> BTreeSet<Status>
where
    I: IntoIterator<Item = S>,
    S: Into<Status>,
{
    values.into_iter().map(Into::into).collect()
}

impl WaitSpecBuilder {
    /// Creates a builder with a ten second poll interval and a ten minute
    /// timeout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the statuses that keep the wait polling.
    #[must_use]
    pub fn pending<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Status>,
    {
        self.pending = to_statuses(values);
        self
    }

    /// Sets the statuses that end the wait successfully.
    #[must_use]
    pub fn target<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Status>,
    {
        self.target = to_statuses(values);
        self
    }

    /// Sets the statuses that end the wait with a failure.
    #[must_use]
    pub fn error<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Status>,
    {
        self.error = to_statuses(values);
        self
    }

    /// Sets the delay before the first poll.
    #[must_use]
    pub const fn delay(mut self, value: Duration) -> Self {
        self.delay = value;
        self
    }

    /// Sets the fixed delay between polls.
    #[must_use]
    pub const fn poll_interval(mut self, value: Duration) -> Self {
        self.poll_interval = value;
        self
    }

    /// Sets the overall timeout.
    #[must_use]
    pub const fn timeout(mut self, value: Duration) -> Self {
        self.timeout = value;
        self
    }

    /// Sets how many consecutive not-found polls a target wait tolerates.
    #[must_use]
    pub const fn not_found_checks(mut self, value: u32) -> Self {
        self.not_found_checks = value;
        self
    }

    /// Sets how many consecutive target observations are required. Values
    /// below one are clamped to one.
    #[must_use]
    pub const fn continuous_target_occurrence(mut self, value: u32) -> Self {
        self.continuous_target_occurrence = if value == 0 { 1 } else { value };
        self
    }

    /// Sets the interpretation of transport errors.
    #[must_use]
    pub const fn fetch_error_policy(mut self, value: FetchErrorPolicy) -> Self {
        self.fetch_error_policy = value;
        self
    }

    /// Builds without validation; used for the built-in presets, which are
    /// checked by their own tests.
    pub(crate) fn build_unchecked(self) -> WaitSpec {
        WaitSpec {
            pending: self.pending,
            target: self.target,
            error: self.error,
            delay: self.delay,
            poll_interval: self.poll_interval,
            timeout: self.timeout,
            not_found_checks: self.not_found_checks,
            continuous_target_occurrence: self.continuous_target_occurrence,
            fetch_error_policy: self.fetch_error_policy,
        }
    }

    /// Builds and validates the [`WaitSpec`].
    ///
    /// # Errors
    ///
    /// Returns [`WaitSpecError`] when [`WaitSpec::validate`] rejects the
    /// configuration.
    pub fn build(self) -> Result<WaitSpec, WaitSpecError> {
        let spec = self.build_unchecked();
        spec.validate()?;
        Ok(spec)
    }
}
