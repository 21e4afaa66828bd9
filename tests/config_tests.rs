//! Unit tests for configuration validation.

use std::time::Duration;

use piwait::{ConfigError, HttpPowerClient, PowerClientError, PowerConfig};
use rstest::*;

#[fixture]
fn valid_config() -> PowerConfig {
    PowerConfig {
        iam_token: String::from("iam-token-example"),
        crn: String::from("crn:v1:bluemix:public:power-iaas:dal12:a/acct:ws-1::"),
        cloud_instance_id: String::from("ws-1"),
        region: String::from("dal"),
        endpoint: None,
        poll_interval_secs: None,
        timeout_secs: None,
    }
}

#[rstest]
fn valid_config_passes_validation(valid_config: PowerConfig) {
    assert_eq!(valid_config.validate(), Ok(()));
}

/// Every required field names its environment variable, the config file,
/// and its TOML key.
#[rstest]
#[case::iam_token("PI_IAM_TOKEN", "iam_token")]
#[case::crn("PI_CRN", "crn")]
#[case::cloud_instance_id("PI_CLOUD_INSTANCE_ID", "cloud_instance_id")]
fn missing_fields_produce_actionable_errors(
    valid_config: PowerConfig,
    #[case] env_var: &str,
    #[case] toml_key: &str,
) {
    let mut cfg = valid_config;
    match toml_key {
        "iam_token" => cfg.iam_token = String::from("   "),
        "crn" => cfg.crn = String::new(),
        _ => cfg.cloud_instance_id = String::new(),
    }

    let Err(ConfigError::MissingField(message)) = cfg.validate() else {
        panic!("expected MissingField error for {toml_key}");
    };
    assert!(message.contains(env_var), "missing env var: {message}");
    assert!(message.contains("piwait.toml"), "missing config file: {message}");
    assert!(message.contains(toml_key), "missing TOML key: {message}");
}

#[rstest]
fn region_is_optional_with_explicit_endpoint(valid_config: PowerConfig) {
    let cfg = PowerConfig {
        region: String::new(),
        endpoint: Some(String::from("http://127.0.0.1:8080/")),
        ..valid_config
    };

    assert_eq!(cfg.validate(), Ok(()));
    assert_eq!(cfg.base_url(), "http://127.0.0.1:8080");
}

#[rstest]
fn region_derives_endpoint(valid_config: PowerConfig) {
    assert_eq!(
        valid_config.base_url(),
        "https://dal.power-iaas.cloud.ibm.com"
    );
}

#[rstest]
#[case::poll_interval(Some(0), None, "poll_interval_secs")]
#[case::timeout(None, Some(0), "timeout_secs")]
fn zero_overrides_are_rejected(
    valid_config: PowerConfig,
    #[case] poll_interval_secs: Option<u64>,
    #[case] timeout_secs: Option<u64>,
    #[case] field: &str,
) {
    let cfg = PowerConfig {
        poll_interval_secs,
        timeout_secs,
        ..valid_config
    };

    let Err(ConfigError::InvalidValue(message)) = cfg.validate() else {
        panic!("expected InvalidValue error for {field}");
    };
    assert!(message.contains(field), "unexpected message: {message}");
}

#[rstest]
fn overrides_convert_to_durations(valid_config: PowerConfig) {
    let cfg = PowerConfig {
        poll_interval_secs: Some(15),
        timeout_secs: Some(900),
        ..valid_config
    };

    assert_eq!(cfg.poll_interval(), Some(Duration::from_secs(15)));
    assert_eq!(cfg.timeout(), Some(Duration::from_secs(900)));
}

#[rstest]
fn client_rejects_invalid_config(valid_config: PowerConfig) {
    let cfg = PowerConfig {
        iam_token: String::new(),
        ..valid_config
    };

    let err = HttpPowerClient::new(&cfg)
        .err()
        .unwrap_or_else(|| panic!("client should reject missing token"));
    assert!(
        matches!(err, PowerClientError::Config(ref message) if message.contains("PI_IAM_TOKEN"))
    );
}

#[rstest]
fn client_is_scoped_to_the_workspace(valid_config: PowerConfig) {
    let client = HttpPowerClient::new(&valid_config)
        .unwrap_or_else(|err| panic!("client should build: {err}"));
    assert_eq!(client.cloud_instance_id(), "ws-1");
}
