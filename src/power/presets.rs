//! Wait configurations for each awaited Power Cloud operation.
//!
//! Pending, target, and error sets together with the delays mirror what the
//! provider has historically used for each resource, so operators see the
//! same pacing and the same time budgets.

use std::time::Duration;

use crate::status::STATUS_NOT_FOUND;
use crate::wait_spec::{FetchErrorPolicy, WaitSpec};

const SECOND: Duration = Duration::from_secs(1);
const MINUTE: Duration = Duration::from_secs(60);

/// Health value that, together with `ACTIVE`, always counts as ready.
pub const HEALTH_OK: &str = "OK";
/// Health value accepted as ready when the caller opts in.
pub const HEALTH_WARNING: &str = "WARNING";

/// Interval between instance readiness polls when waiting for `OK` health.
pub const ACTIVE_POLL_INTERVAL: Duration = Duration::from_secs(2 * 60);
/// Interval between instance readiness polls when `WARNING` health suffices.
pub const WARNING_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Instance status reported once it is running with acceptable health.
pub const INSTANCE_ACTIVE: &str = "ACTIVE";
/// Instance status while building or starting.
pub const INSTANCE_BUILD: &str = "BUILD";
/// Instance status once powered off.
pub const INSTANCE_SHUTOFF: &str = "SHUTOFF";
/// Instance status while stopping.
pub const INSTANCE_STOPPING: &str = "STOPPING";
/// Instance status while a resize is applied.
pub const INSTANCE_RESIZE: &str = "RESIZE";
/// Instance failure status.
pub const INSTANCE_ERROR: &str = "ERROR";
/// Status reported for any resource still visible during deletion.
pub const DELETING: &str = "DELETING";

/// Security group member status once present.
pub const MEMBER_AVAILABLE: &str = "available";
/// Security group member status while converging.
pub const MEMBER_PENDING: &str = "pending";
/// Security group member status once gone.
pub const MEMBER_REMOVED: &str = "removed";

/// Instance running with `OK` health, or `ready_status` health when the
/// caller accepts `WARNING`.
#[must_use]
pub fn instance_available(ready_status: &str) -> WaitSpec {
    let poll_interval = if ready_status == HEALTH_WARNING {
        WARNING_POLL_INTERVAL
    } else {
        ACTIVE_POLL_INTERVAL
    };
    WaitSpec::builder()
        .pending(["PENDING", INSTANCE_BUILD, HEALTH_WARNING])
        .target([INSTANCE_ACTIVE])
        .error([INSTANCE_ERROR])
        .delay(30 * SECOND)
        .poll_interval(poll_interval)
        .timeout(120 * MINUTE)
        .build_unchecked()
}

/// Instance powered off after a stop action.
#[must_use]
pub fn instance_stopped() -> WaitSpec {
    WaitSpec::builder()
        .pending([INSTANCE_STOPPING, INSTANCE_RESIZE, "VERIFY_RESIZE", HEALTH_WARNING])
        .target([INSTANCE_SHUTOFF])
        .error([INSTANCE_ERROR])
        .delay(10 * SECOND)
        .poll_interval(2 * MINUTE)
        .timeout(30 * MINUTE)
        .build_unchecked()
}

/// Instance back to `SHUTOFF` once a processor or memory resize is applied.
#[must_use]
pub fn instance_resized() -> WaitSpec {
    WaitSpec::builder()
        .pending([INSTANCE_RESIZE, "VERIFY_RESIZE"])
        .target([INSTANCE_SHUTOFF])
        .error([INSTANCE_ERROR])
        .delay(10 * SECOND)
        .poll_interval(5 * MINUTE)
        .timeout(60 * MINUTE)
        .build_unchecked()
}

/// Instance gone after a delete request. Any fetch error counts as gone.
#[must_use]
pub fn instance_deleted() -> WaitSpec {
    WaitSpec::builder()
        .pending(["retry", DELETING])
        .target([STATUS_NOT_FOUND])
        .delay(10 * SECOND)
        .poll_interval(10 * SECOND)
        .timeout(10 * MINUTE)
        .fetch_error_policy(FetchErrorPolicy::TreatAsAbsent)
        .build_unchecked()
}

/// Volume ready for use after creation or resize.
#[must_use]
pub fn volume_available() -> WaitSpec {
    WaitSpec::builder()
        .pending(["creating", "retry", "updating"])
        .target(["available", "in-use"])
        .error(["error"])
        .delay(10 * SECOND)
        .poll_interval(10 * SECOND)
        .timeout(30 * MINUTE)
        .build_unchecked()
}

/// Volume gone after a delete request.
#[must_use]
pub fn volume_deleted() -> WaitSpec {
    WaitSpec::builder()
        .pending([DELETING])
        .target([STATUS_NOT_FOUND])
        .error(["error_deleting"])
        .delay(10 * SECOND)
        .poll_interval(10 * SECOND)
        .timeout(10 * MINUTE)
        .build_unchecked()
}

/// Network port allocated. Unattached ports settle as `DOWN`.
#[must_use]
pub fn network_port_available() -> WaitSpec {
    WaitSpec::builder()
        .pending(["retry", INSTANCE_BUILD])
        .target(["ACTIVE", "DOWN"])
        .error([INSTANCE_ERROR])
        .delay(10 * SECOND)
        .poll_interval(10 * SECOND)
        .timeout(10 * MINUTE)
        .build_unchecked()
}

/// vPMEM volume ready after creation.
#[must_use]
pub fn vpmem_available() -> WaitSpec {
    WaitSpec::builder()
        .pending(["creating", "updating"])
        .target(["active"])
        .error(["error"])
        .delay(10 * SECOND)
        .poll_interval(10 * SECOND)
        .timeout(30 * MINUTE)
        .build_unchecked()
}

/// vPMEM volume gone after a delete request.
#[must_use]
pub fn vpmem_deleted() -> WaitSpec {
    WaitSpec::builder()
        .pending([DELETING])
        .target([STATUS_NOT_FOUND])
        .error(["error"])
        .delay(10 * SECOND)
        .poll_interval(10 * SECOND)
        .timeout(10 * MINUTE)
        .build_unchecked()
}

/// DHCP server active after creation.
#[must_use]
pub fn dhcp_available() -> WaitSpec {
    WaitSpec::builder()
        .pending([INSTANCE_BUILD])
        .target(["ACTIVE"])
        .error([INSTANCE_ERROR])
        .delay(10 * SECOND)
        .poll_interval(10 * SECOND)
        .timeout(30 * MINUTE)
        .build_unchecked()
}

/// DHCP server gone after a delete request.
#[must_use]
pub fn dhcp_deleted() -> WaitSpec {
    WaitSpec::builder()
        .pending([DELETING])
        .target([STATUS_NOT_FOUND])
        .error([INSTANCE_ERROR])
        .delay(10 * SECOND)
        .poll_interval(10 * SECOND)
        .timeout(10 * MINUTE)
        .build_unchecked()
}

/// Member listed on its security group. The caller owns the time budget.
#[must_use]
pub fn nsg_member_added(timeout: Duration) -> WaitSpec {
    WaitSpec::builder()
        .pending([MEMBER_PENDING])
        .target([MEMBER_AVAILABLE])
        .delay(10 * SECOND)
        .poll_interval(10 * SECOND)
        .timeout(timeout)
        .build_unchecked()
}

/// Member no longer listed on its security group.
#[must_use]
pub fn nsg_member_removed(timeout: Duration) -> WaitSpec {
    WaitSpec::builder()
        .pending([MEMBER_PENDING])
        .target([MEMBER_REMOVED])
        .delay(10 * SECOND)
        .poll_interval(10 * SECOND)
        .timeout(timeout)
        .build_unchecked()
}

/// Route filter active on its network peer.
#[must_use]
pub fn route_filter_available() -> WaitSpec {
    WaitSpec::builder()
        .pending(["pending", "creating"])
        .target(["active"])
        .error(["error"])
        .delay(10 * SECOND)
        .poll_interval(10 * SECOND)
        .timeout(10 * MINUTE)
        .build_unchecked()
}

/// Route filter gone after a delete request.
#[must_use]
pub fn route_filter_deleted() -> WaitSpec {
    WaitSpec::builder()
        .pending([DELETING])
        .target([STATUS_NOT_FOUND])
        .error(["error"])
        .delay(10 * SECOND)
        .poll_interval(10 * SECOND)
        .timeout(10 * MINUTE)
        .build_unchecked()
}
