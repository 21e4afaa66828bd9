//! Configuration loading via `ortho-config`.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

/// Connection and wait settings for the Power Virtual Server API, derived
/// from environment variables, configuration files, and CLI flags.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(prefix = "PI")]
pub struct PowerConfig {
    /// IAM bearer token used to authenticate every request. Required.
    pub iam_token: String,
    /// CRN of the Power Virtual Server workspace, sent in the `CRN` header.
    pub crn: String,
    /// Workspace (cloud instance) identifier used to scope requests.
    pub cloud_instance_id: String,
    /// Region short name used to derive the API endpoint. Defaults to `dal`.
    #[ortho_config(default = "dal".to_owned())]
    pub region: String,
    /// Explicit API base URL; overrides the region-derived endpoint.
    pub endpoint: Option<String>,
    /// Overrides the poll interval of every wait, in seconds.
    pub poll_interval_secs: Option<u64>,
    /// Overrides the overall timeout of every wait, in seconds.
    pub timeout_secs: Option<u64>,
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
}

impl FieldMetadata {
    const fn new(description: &'static str, env_var: &'static str, toml_key: &'static str) -> Self {
        Self {
            description,
            env_var,
            toml_key,
        }
    }
}

impl PowerConfig {
    fn require_field(value: &str, metadata: &FieldMetadata) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingField(format!(
                "missing {}: set {} or add {} to [power] in piwait.toml",
                metadata.description, metadata.env_var, metadata.toml_key
            )));
        }
        Ok(())
    }

    /// Loads configuration without attempting to parse CLI arguments. Values
    /// still merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("piwait")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Performs semantic validation on required fields. Error messages include
    /// guidance on how to provide missing values via environment variables or
    /// configuration files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a required field is empty,
    /// and [`ConfigError::InvalidValue`] when an override is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::require_field(
            &self.iam_token,
            &FieldMetadata::new("IAM bearer token", "PI_IAM_TOKEN", "iam_token"),
        )?;
        Self::require_field(
            &self.crn,
            &FieldMetadata::new("workspace CRN", "PI_CRN", "crn"),
        )?;
        Self::require_field(
            &self.cloud_instance_id,
            &FieldMetadata::new(
                "workspace ID",
                "PI_CLOUD_INSTANCE_ID",
                "cloud_instance_id",
            ),
        )?;
        if self.endpoint.is_none() {
            Self::require_field(
                &self.region,
                &FieldMetadata::new("region", "PI_REGION", "region"),
            )?;
        }
        if self.poll_interval_secs == Some(0) {
            return Err(ConfigError::InvalidValue(String::from(
                "poll_interval_secs must be greater than zero",
            )));
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue(String::from(
                "timeout_secs must be greater than zero",
            )));
        }
        Ok(())
    }

    /// Base URL of the Power Cloud API, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.endpoint.as_deref().map_or_else(
            || format!("https://{}.power-iaas.cloud.ibm.com", self.region.trim()),
            |endpoint| endpoint.trim().trim_end_matches('/').to_owned(),
        )
    }

    /// Poll interval override, if configured.
    #[must_use]
    pub fn poll_interval(&self) -> Option<Duration> {
        self.poll_interval_secs.map(Duration::from_secs)
    }

    /// Timeout override, if configured.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Indicates a configured value is out of range.
    #[error("invalid configuration value: {0}")]
    InvalidValue(String),
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}
