//! Unit tests for the `piwait` CLI binary implementation.

use super::*;
use piwait::PollTarget;
use rstest::rstest;

fn timeout_error() -> CliError {
    CliError::Wait(WaitError::Timeout {
        target: PollTarget::new("cloud-1", "vol-1"),
        elapsed: Duration::from_secs(30),
        last_status: None,
    })
}

#[test]
fn timeouts_exit_with_dedicated_code() {
    assert_eq!(timeout_error().exit_code(), EXIT_TIMEOUT);
}

#[rstest]
#[case(CliError::Config(String::from("missing IAM bearer token")))]
#[case(CliError::Client(String::from("bad endpoint")))]
#[case(CliError::Wait(WaitError::Cancelled {
    target: PollTarget::new("cloud-1", "vol-1"),
}))]
fn other_failures_exit_with_one(#[case] err: CliError) {
    assert_eq!(err.exit_code(), 1);
}

#[rstest]
#[case(Some(45), Some(Duration::from_secs(600)), Some(Duration::from_secs(45)))]
#[case(None, Some(Duration::from_secs(600)), Some(Duration::from_secs(600)))]
#[case(Some(0), None, None)]
#[case(None, None, None)]
fn flag_timeout_overrides_configuration(
    #[case] flag: Option<u64>,
    #[case] configured: Option<Duration>,
    #[case] expected: Option<Duration>,
) {
    assert_eq!(resolve_timeout(flag, configured), expected);
}

#[test]
fn write_error_renders_wait_failures() {
    let mut buf = Vec::new();
    write_error(&mut buf, &timeout_error());
    let rendered = String::from_utf8(buf).unwrap_or_else(|err| panic!("utf8: {err}"));
    assert!(
        rendered.starts_with("timeout after 30s waiting for cloud-1/vol-1"),
        "rendered: {rendered}"
    );
}
