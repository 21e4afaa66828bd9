//! Status sources for each awaited Power Cloud resource.
//!
//! A source fetches one resource through a [`PowerClient`] and reduces it to
//! the status token its preset understands.

use std::collections::BTreeSet;

use crate::status::{PollTarget, Status, StatusSnapshot};
use crate::waiter::{PollFuture, StatusSource};

use super::client::PowerClient;
use super::models::{
    DhcpServer, NetworkPort, NetworkSecurityGroup, PvmInstance, RouteFilter, Volume, VpmemVolume,
};
use super::presets::{
    DELETING, HEALTH_OK, INSTANCE_ACTIVE, INSTANCE_BUILD, INSTANCE_ERROR, INSTANCE_RESIZE,
    INSTANCE_SHUTOFF, INSTANCE_STOPPING, MEMBER_AVAILABLE, MEMBER_PENDING, MEMBER_REMOVED,
};

/// What an instance wait is looking for.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum InstanceProbe {
    /// Running with `OK` health, or with the given health status.
    Available {
        /// Health status accepted in addition to `OK`.
        ready_status: String,
    },
    /// Powered off after a stop action.
    Stopped,
    /// Powered off again after a resize.
    Resized,
    /// Still visible after a delete request.
    Deleting,
}

impl InstanceProbe {
    /// Reduces an instance to the status token the matching preset expects.
    #[must_use]
    pub fn status_of(&self, instance: &PvmInstance) -> &'static str {
        if *self == Self::Deleting {
            return DELETING;
        }
        if instance.status == INSTANCE_ERROR {
            return INSTANCE_ERROR;
        }
        let health = instance.health_status();
        match self {
            Self::Available { ready_status } => {
                if instance.status == INSTANCE_ACTIVE
                    && (health == ready_status.as_str() || health == HEALTH_OK)
                {
                    INSTANCE_ACTIVE
                } else {
                    INSTANCE_BUILD
                }
            }
            Self::Stopped | Self::Resized
                if instance.status == INSTANCE_SHUTOFF && health == HEALTH_OK =>
            {
                INSTANCE_SHUTOFF
            }
            Self::Stopped => INSTANCE_STOPPING,
            Self::Resized => INSTANCE_RESIZE,
            Self::Deleting => DELETING,
        }
    }
}

/// Source for virtual server instance waits.
#[derive(Clone, Debug)]
pub struct InstanceSource<'a, C> {
    client: &'a C,
    target: PollTarget,
    probe: InstanceProbe,
}

impl<'a, C> InstanceSource<'a, C> {
    /// Creates a source for the instance identified by `target`.
    #[must_use]
    pub const fn new(client: &'a C, target: PollTarget, probe: InstanceProbe) -> Self {
        Self {
            client,
            target,
            probe,
        }
    }
}

impl<C: PowerClient + Sync> StatusSource for InstanceSource<'_, C> {
    type Payload = PvmInstance;

    fn target(&self) -> &PollTarget {
        &self.target
    }

    fn fetch_status(&self) -> PollFuture<'_, StatusSnapshot<PvmInstance>> {
        Box::pin(async move {
            let instance = self.client.get_instance(self.target.resource_id()).await?;
            let status = self.probe.status_of(&instance);
            Ok(StatusSnapshot::new(status, instance))
        })
    }
}

/// Reports the raw lifecycle status of resources whose API status already
/// matches their preset.
macro_rules! passthrough_source {
    ($(#[$meta:meta])* $name:ident, $model:ty, |$client:ident, $target:ident| $fetch:expr, |$item:ident| $status:expr) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name<'a, C> {
            client: &'a C,
            target: PollTarget,
        }

        impl<'a, C> $name<'a, C> {
            /// Creates a source for the resource identified by `target`.
            #[must_use]
            pub const fn new(client: &'a C, target: PollTarget) -> Self {
                Self { client, target }
            }
        }

        impl<C: PowerClient + Sync> StatusSource for $name<'_, C> {
            type Payload = $model;

            fn target(&self) -> &PollTarget {
                &self.target
            }

            fn fetch_status(&self) -> PollFuture<'_, StatusSnapshot<$model>> {
                Box::pin(async move {
                    let $client = self.client;
                    let $target = &self.target;
                    let $item: $model = $fetch.await?;
                    let status = Status::from($status);
                    Ok(StatusSnapshot::new(status, $item))
                })
            }
        }
    };
}

passthrough_source!(
    /// Source for block storage volume waits.
    VolumeSource,
    Volume,
    |client, target| client.get_volume(target.resource_id()),
    |volume| volume.state.clone()
);

passthrough_source!(
    /// Source for network port waits. The target's resource is the network
    /// and its sub-resource the port.
    NetworkPortSource,
    NetworkPort,
    |client, target| client.get_network_port(
        target.resource_id(),
        target.sub_resource_id().map_or("", |sub| sub.as_str())
    ),
    |port| port.status.clone()
);

passthrough_source!(
    /// Source for vPMEM volume waits.
    VpmemSource,
    VpmemVolume,
    |client, target| client.get_vpmem_volume(target.resource_id()),
    |volume| volume.status.clone()
);

passthrough_source!(
    /// Source for DHCP server waits. A missing status reads as `BUILD`.
    DhcpSource,
    DhcpServer,
    |client, target| client.get_dhcp_server(target.resource_id()),
    |server| server
        .status
        .clone()
        .unwrap_or_else(|| String::from(INSTANCE_BUILD))
);

passthrough_source!(
    /// Source for network peer route filter waits. The target's resource is
    /// the network peer and its sub-resource the route filter.
    RouteFilterSource,
    RouteFilter,
    |client, target| client.get_route_filter(
        target.resource_id(),
        target.sub_resource_id().map_or("", |sub| sub.as_str())
    ),
    |filter| filter.state.clone()
);

/// What a security group member wait is looking for.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MemberProbe {
    /// The member appears in the group.
    Added,
    /// The member no longer appears in the group.
    Removed,
}

impl MemberProbe {
    /// Reduces a group to the member status token.
    #[must_use]
    pub fn status_of(self, group: &NetworkSecurityGroup, member_id: &str) -> &'static str {
        match (self, group.has_member(member_id)) {
            (Self::Added, true) => MEMBER_AVAILABLE,
            (Self::Removed, false) => MEMBER_REMOVED,
            (Self::Added, false) | (Self::Removed, true) => MEMBER_PENDING,
        }
    }
}

/// Source for security group membership waits. The target's resource is
/// the group and its sub-resource the member.
#[derive(Clone, Debug)]
pub struct MemberSource<'a, C> {
    client: &'a C,
    target: PollTarget,
    probe: MemberProbe,
}

impl<'a, C> MemberSource<'a, C> {
    /// Creates a source for the member identified by `target`.
    #[must_use]
    pub const fn new(client: &'a C, target: PollTarget, probe: MemberProbe) -> Self {
        Self {
            client,
            target,
            probe,
        }
    }
}

impl<C: PowerClient + Sync> StatusSource for MemberSource<'_, C> {
    type Payload = NetworkSecurityGroup;

    fn target(&self) -> &PollTarget {
        &self.target
    }

    fn fetch_status(&self) -> PollFuture<'_, StatusSnapshot<NetworkSecurityGroup>> {
        Box::pin(async move {
            let group = self
                .client
                .get_network_security_group(self.target.resource_id())
                .await?;
            let member_id = self
                .target
                .sub_resource_id()
                .map_or("", |member| member.as_str());
            let status = self.probe.status_of(&group, member_id);
            Ok(StatusSnapshot::new(status, group))
        })
    }
}

/// Adapts a source for deletion waits: while the resource is still visible
/// every status except a failure reads as `DELETING`.
#[derive(Clone, Debug)]
pub struct UntilGone<S> {
    inner: S,
    failures: BTreeSet<Status>,
}

impl<S> UntilGone<S> {
    /// Wraps `inner`, passing through any status in `failures` unchanged.
    #[must_use]
    pub const fn new(inner: S, failures: BTreeSet<Status>) -> Self {
        Self { inner, failures }
    }
}

impl<S> StatusSource for UntilGone<S>
where
    S: StatusSource + Sync,
    S::Payload: Send,
{
    type Payload = S::Payload;

    fn target(&self) -> &PollTarget {
        self.inner.target()
    }

    fn fetch_status(&self) -> PollFuture<'_, StatusSnapshot<S::Payload>> {
        Box::pin(async move {
            let mut snapshot = self.inner.fetch_status().await?;
            if !self.failures.contains(&snapshot.status) {
                snapshot.status = Status::from(DELETING);
            }
            Ok(snapshot)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::power::models::{Health, NetworkSecurityGroupMember};
    use rstest::rstest;

    fn instance(status: &str, health: Option<&str>) -> PvmInstance {
        PvmInstance {
            id: String::from("pvm-1"),
            server_name: String::from("lpar"),
            status: status.to_owned(),
            health: health.map(|value| Health {
                status: value.to_owned(),
            }),
        }
    }

    fn available(ready_status: &str) -> InstanceProbe {
        InstanceProbe::Available {
            ready_status: ready_status.to_owned(),
        }
    }

    #[rstest]
    #[case(available("OK"), "ACTIVE", Some("OK"), "ACTIVE")]
    #[case(available("OK"), "ACTIVE", Some("WARNING"), "BUILD")]
    #[case(available("WARNING"), "ACTIVE", Some("WARNING"), "ACTIVE")]
    #[case(available("OK"), "BUILD", None, "BUILD")]
    #[case(available("OK"), "ERROR", None, "ERROR")]
    #[case(InstanceProbe::Stopped, "SHUTOFF", Some("OK"), "SHUTOFF")]
    #[case(InstanceProbe::Stopped, "SHUTOFF", Some("WARNING"), "STOPPING")]
    #[case(InstanceProbe::Stopped, "ACTIVE", Some("OK"), "STOPPING")]
    #[case(InstanceProbe::Resized, "VERIFY_RESIZE", Some("OK"), "RESIZE")]
    #[case(InstanceProbe::Resized, "SHUTOFF", Some("OK"), "SHUTOFF")]
    #[case(InstanceProbe::Deleting, "ERROR", None, "DELETING")]
    fn instance_probe_reduces_status(
        #[case] probe: InstanceProbe,
        #[case] status: &str,
        #[case] health: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(probe.status_of(&instance(status, health)), expected);
    }

    #[rstest]
    #[case(MemberProbe::Added, true, "available")]
    #[case(MemberProbe::Added, false, "pending")]
    #[case(MemberProbe::Removed, true, "pending")]
    #[case(MemberProbe::Removed, false, "removed")]
    fn member_probe_tracks_membership(
        #[case] probe: MemberProbe,
        #[case] present: bool,
        #[case] expected: &str,
    ) {
        let members = present.then(|| {
            vec![NetworkSecurityGroupMember {
                id: String::from("m-1"),
                target: String::from("10.0.0.4"),
                kind: String::from("ipv4-address"),
            }]
        });
        let group = NetworkSecurityGroup {
            id: String::from("nsg-1"),
            name: String::from("web"),
            members,
        };
        assert_eq!(probe.status_of(&group, "m-1"), expected);
    }
}
