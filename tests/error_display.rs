//! Display strings of wait failures, as surfaced by the CLI.

use std::time::Duration;

use piwait::{FetchError, PollTarget, Status, WaitError, WaitSpec, WaitSpecError};

fn target() -> PollTarget {
    PollTarget::new("ws-1", "net-1").with_sub_resource("port-1")
}

#[test]
fn timeout_names_target_and_last_state() {
    let err = WaitError::Timeout {
        target: target(),
        elapsed: Duration::from_secs(600),
        last_status: Some(Status::from("BUILD")),
    };

    assert!(err.is_timeout());
    assert_eq!(
        err.to_string(),
        "timeout after 600s waiting for ws-1/net-1/port-1 (last state: BUILD)"
    );
}

#[test]
fn timeout_without_observation_says_none() {
    let err = WaitError::Timeout {
        target: target(),
        elapsed: Duration::from_secs(5),
        last_status: None,
    };

    assert!(err.to_string().ends_with("(last state: none)"));
}

#[test]
fn error_state_names_status() {
    let err = WaitError::ErrorState {
        target: target(),
        status: Status::from("ERROR"),
    };

    assert!(!err.is_timeout());
    assert_eq!(err.to_string(), "ws-1/net-1/port-1 reached error state ERROR");
}

#[test]
fn fetch_failure_keeps_transport_message() {
    let err = WaitError::Fetch {
        target: target(),
        source: FetchError::transport("connection reset"),
    };

    assert_eq!(
        err.to_string(),
        "failed to fetch status of ws-1/net-1/port-1: transport error: connection reset"
    );
}

#[test]
fn unexpected_state_lists_expected_states() {
    let spec = WaitSpec::builder()
        .pending(["BUILD"])
        .target(["ACTIVE"])
        .error(["ERROR"])
        .build()
        .unwrap_or_else(|err| panic!("spec should build: {err}"));
    let err = WaitError::UnexpectedState {
        target: target(),
        status: Status::from("MIGRATING"),
        expected: spec.expected_states(),
    };

    assert_eq!(
        err.to_string(),
        "ws-1/net-1/port-1 reported unexpected state MIGRATING (expected one of: BUILD, ACTIVE, ERROR)"
    );
}

#[test]
fn overlapping_sets_are_rejected() {
    let err = WaitSpec::builder()
        .pending(["BUILD"])
        .target(["BUILD"])
        .build()
        .err()
        .unwrap_or_else(|| panic!("overlap should be rejected"));

    assert!(matches!(err, WaitSpecError::Overlap { ref status, .. } if status == "BUILD"));
}
