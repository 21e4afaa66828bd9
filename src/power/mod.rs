//! Power Virtual Server resources awaited through the generic waiter.
//!
//! [`PowerWaits`] pairs a [`PowerClient`] with the preset for each awaited
//! operation, so callers only name the resource they are waiting on.

mod client;
mod error;
pub mod models;
pub mod presets;
pub mod sources;

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::status::{CloudInstanceId, PollTarget, StatusSnapshot};
use crate::wait_spec::WaitSpec;
use crate::waiter::{AsyncOperationWaiter, StatusSource, WaitError};

pub use client::{ClientFuture, HttpPowerClient, PowerClient};
pub use error::PowerClientError;
pub use models::{
    DhcpServer, NetworkPort, NetworkSecurityGroup, PvmInstance, RouteFilter, Volume, VpmemVolume,
};
use sources::{
    DhcpSource, InstanceProbe, InstanceSource, MemberProbe, MemberSource, NetworkPortSource,
    RouteFilterSource, UntilGone, VolumeSource, VpmemSource,
};

/// Waits for Power Cloud operations within one workspace.
#[derive(Clone, Debug)]
pub struct PowerWaits<C> {
    client: C,
    cloud_instance_id: CloudInstanceId,
    cancel: Option<CancellationToken>,
    poll_interval: Option<Duration>,
    timeout: Option<Duration>,
}

impl<C> PowerWaits<C> {
    /// Creates waits scoped to `cloud_instance_id`.
    #[must_use]
    pub fn new(client: C, cloud_instance_id: impl Into<CloudInstanceId>) -> Self {
        Self {
            client,
            cloud_instance_id: cloud_instance_id.into(),
            cancel: None,
            poll_interval: None,
            timeout: None,
        }
    }

    /// Stops every wait promptly once `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Replaces the poll interval of every preset.
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Option<Duration>) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Replaces the overall timeout of every preset.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Underlying API client.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Workspace the waits are scoped to.
    #[must_use]
    pub const fn cloud_instance_id(&self) -> &CloudInstanceId {
        &self.cloud_instance_id
    }

    fn target(&self, resource_id: &str) -> PollTarget {
        PollTarget::new(self.cloud_instance_id.clone(), resource_id)
    }

    fn waiter(&self, mut spec: WaitSpec) -> AsyncOperationWaiter {
        if let Some(poll_interval) = self.poll_interval {
            spec = spec.with_poll_interval(poll_interval);
        }
        if let Some(timeout) = self.timeout {
            spec = spec.with_timeout(timeout);
        }
        self.cancel
            .iter()
            .fold(AsyncOperationWaiter::new(spec), |plain, token| {
                plain.with_cancellation(token.clone())
            })
    }
}

impl<C: PowerClient + Sync> PowerWaits<C> {
    async fn until_ready<S: StatusSource>(
        &self,
        spec: WaitSpec,
        source: S,
    ) -> Result<StatusSnapshot<S::Payload>, WaitError> {
        let snapshot = self.waiter(spec).wait_for_target(&source).await?;
        info!(resource = %source.target(), status = %snapshot.status, "resource ready");
        Ok(snapshot)
    }

    async fn until_gone<S>(&self, spec: WaitSpec, source: S) -> Result<(), WaitError>
    where
        S: StatusSource + Sync,
        S::Payload: Send,
    {
        let gone = UntilGone::new(source, spec.error().clone());
        self.waiter(spec).wait_for_absence(&gone).await?;
        info!(resource = %gone.target(), "resource deleted");
        Ok(())
    }

    /// Waits for an instance to run with `OK` health, or with `ready_status`
    /// health when the caller accepts `WARNING`.
    ///
    /// # Errors
    ///
    /// Returns [`WaitError`] when the instance fails, the deadline passes,
    /// or the wait is cancelled.
    pub async fn instance_available(
        &self,
        instance_id: &str,
        ready_status: &str,
    ) -> Result<StatusSnapshot<PvmInstance>, WaitError> {
        let probe = InstanceProbe::Available {
            ready_status: ready_status.to_owned(),
        };
        self.until_ready(
            presets::instance_available(ready_status),
            InstanceSource::new(&self.client, self.target(instance_id), probe),
        )
        .await
    }

    /// Waits for an instance to power off.
    ///
    /// # Errors
    ///
    /// Returns [`WaitError`] when the instance fails, the deadline passes,
    /// or the wait is cancelled.
    pub async fn instance_stopped(
        &self,
        instance_id: &str,
    ) -> Result<StatusSnapshot<PvmInstance>, WaitError> {
        self.until_ready(
            presets::instance_stopped(),
            InstanceSource::new(&self.client, self.target(instance_id), InstanceProbe::Stopped),
        )
        .await
    }

    /// Waits for a resize to settle with the instance powered off.
    ///
    /// # Errors
    ///
    /// Returns [`WaitError`] when the instance fails, the deadline passes,
    /// or the wait is cancelled.
    pub async fn instance_resized(
        &self,
        instance_id: &str,
    ) -> Result<StatusSnapshot<PvmInstance>, WaitError> {
        self.until_ready(
            presets::instance_resized(),
            InstanceSource::new(&self.client, self.target(instance_id), InstanceProbe::Resized),
        )
        .await
    }

    /// Waits for an instance to disappear.
    ///
    /// # Errors
    ///
    /// Returns [`WaitError`] when the deadline passes or the wait is
    /// cancelled.
    pub async fn instance_deleted(&self, instance_id: &str) -> Result<(), WaitError> {
        let spec = presets::instance_deleted();
        let source =
            InstanceSource::new(&self.client, self.target(instance_id), InstanceProbe::Deleting);
        self.waiter(spec).wait_for_absence(&source).await?;
        info!(resource = %source.target(), "resource deleted");
        Ok(())
    }

    /// Waits for a volume to become usable.
    ///
    /// # Errors
    ///
    /// Returns [`WaitError`] when the volume fails, the deadline passes, or
    /// the wait is cancelled.
    pub async fn volume_available(
        &self,
        volume_id: &str,
    ) -> Result<StatusSnapshot<Volume>, WaitError> {
        self.until_ready(
            presets::volume_available(),
            VolumeSource::new(&self.client, self.target(volume_id)),
        )
        .await
    }

    /// Waits for a volume to disappear.
    ///
    /// # Errors
    ///
    /// Returns [`WaitError`] when deletion fails, the deadline passes, or
    /// the wait is cancelled.
    pub async fn volume_deleted(&self, volume_id: &str) -> Result<(), WaitError> {
        self.until_gone(
            presets::volume_deleted(),
            VolumeSource::new(&self.client, self.target(volume_id)),
        )
        .await
    }

    /// Waits for a network port to be allocated.
    ///
    /// # Errors
    ///
    /// Returns [`WaitError`] when the port fails, the deadline passes, or
    /// the wait is cancelled.
    pub async fn network_port_available(
        &self,
        network_id: &str,
        port_id: &str,
    ) -> Result<StatusSnapshot<NetworkPort>, WaitError> {
        self.until_ready(
            presets::network_port_available(),
            NetworkPortSource::new(
                &self.client,
                self.target(network_id).with_sub_resource(port_id),
            ),
        )
        .await
    }

    /// Waits for a vPMEM volume to become active.
    ///
    /// # Errors
    ///
    /// Returns [`WaitError`] when the volume fails, the deadline passes, or
    /// the wait is cancelled.
    pub async fn vpmem_available(
        &self,
        volume_id: &str,
    ) -> Result<StatusSnapshot<VpmemVolume>, WaitError> {
        self.until_ready(
            presets::vpmem_available(),
            VpmemSource::new(&self.client, self.target(volume_id)),
        )
        .await
    }

    /// Waits for a vPMEM volume to disappear.
    ///
    /// # Errors
    ///
    /// Returns [`WaitError`] when deletion fails, the deadline passes, or
    /// the wait is cancelled.
    pub async fn vpmem_deleted(&self, volume_id: &str) -> Result<(), WaitError> {
        self.until_gone(
            presets::vpmem_deleted(),
            VpmemSource::new(&self.client, self.target(volume_id)),
        )
        .await
    }

    /// Waits for a DHCP server to become active.
    ///
    /// # Errors
    ///
    /// Returns [`WaitError`] when the server fails, the deadline passes, or
    /// the wait is cancelled.
    pub async fn dhcp_available(
        &self,
        dhcp_id: &str,
    ) -> Result<StatusSnapshot<DhcpServer>, WaitError> {
        self.until_ready(
            presets::dhcp_available(),
            DhcpSource::new(&self.client, self.target(dhcp_id)),
        )
        .await
    }

    /// Waits for a DHCP server to disappear.
    ///
    /// # Errors
    ///
    /// Returns [`WaitError`] when deletion fails, the deadline passes, or
    /// the wait is cancelled.
    pub async fn dhcp_deleted(&self, dhcp_id: &str) -> Result<(), WaitError> {
        self.until_gone(
            presets::dhcp_deleted(),
            DhcpSource::new(&self.client, self.target(dhcp_id)),
        )
        .await
    }

    /// Waits for a member to appear on a security group.
    ///
    /// # Errors
    ///
    /// Returns [`WaitError`] when the deadline passes, the group cannot be
    /// fetched, or the wait is cancelled.
    pub async fn nsg_member_added(
        &self,
        nsg_id: &str,
        member_id: &str,
        timeout: Duration,
    ) -> Result<StatusSnapshot<NetworkSecurityGroup>, WaitError> {
        self.until_ready(
            presets::nsg_member_added(timeout),
            MemberSource::new(
                &self.client,
                self.target(nsg_id).with_sub_resource(member_id),
                MemberProbe::Added,
            ),
        )
        .await
    }

    /// Waits for a member to leave a security group.
    ///
    /// # Errors
    ///
    /// Returns [`WaitError`] when the deadline passes, the group cannot be
    /// fetched, or the wait is cancelled.
    pub async fn nsg_member_removed(
        &self,
        nsg_id: &str,
        member_id: &str,
        timeout: Duration,
    ) -> Result<StatusSnapshot<NetworkSecurityGroup>, WaitError> {
        self.until_ready(
            presets::nsg_member_removed(timeout),
            MemberSource::new(
                &self.client,
                self.target(nsg_id).with_sub_resource(member_id),
                MemberProbe::Removed,
            ),
        )
        .await
    }

    /// Waits for a route filter to become active on its network peer.
    ///
    /// # Errors
    ///
    /// Returns [`WaitError`] when the filter fails, the deadline passes, or
    /// the wait is cancelled.
    pub async fn route_filter_available(
        &self,
        network_peer_id: &str,
        route_filter_id: &str,
    ) -> Result<StatusSnapshot<RouteFilter>, WaitError> {
        self.until_ready(
            presets::route_filter_available(),
            RouteFilterSource::new(
                &self.client,
                self.target(network_peer_id)
                    .with_sub_resource(route_filter_id),
            ),
        )
        .await
    }

    /// Waits for a route filter to disappear.
    ///
    /// # Errors
    ///
    /// Returns [`WaitError`] when deletion fails, the deadline passes, or
    /// the wait is cancelled.
    pub async fn route_filter_deleted(
        &self,
        network_peer_id: &str,
        route_filter_id: &str,
    ) -> Result<(), WaitError> {
        self.until_gone(
            presets::route_filter_deleted(),
            RouteFilterSource::new(
                &self.client,
                self.target(network_peer_id)
                    .with_sub_resource(route_filter_id),
            ),
        )
        .await
    }
}
