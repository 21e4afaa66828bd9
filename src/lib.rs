//! Core library for the `piwait` tool.
//!
//! Power Virtual Server create, update, and delete calls return before the
//! remote object has settled. The crate provides a generic poll-until-state
//! waiter ([`AsyncOperationWaiter`]) driven by a [`WaitSpec`], and a Power
//! Cloud layer that pairs each awaited operation with its status source and
//! preset ([`PowerWaits`]).

pub mod config;
pub mod logging;
pub mod power;
pub mod status;
pub mod test_support;
pub mod wait_spec;
pub mod waiter;

pub use config::{ConfigError, PowerConfig};
pub use power::{HttpPowerClient, PowerClient, PowerClientError, PowerWaits};
pub use status::{CloudInstanceId, PollTarget, ResourceId, STATUS_NOT_FOUND, Status, StatusSnapshot};
pub use wait_spec::{
    Classification, DEFAULT_NOT_FOUND_CHECKS, FetchErrorPolicy, WaitSpec, WaitSpecBuilder,
    WaitSpecError,
};
pub use waiter::{AsyncOperationWaiter, FetchError, PollFuture, StatusSource, WaitError};
