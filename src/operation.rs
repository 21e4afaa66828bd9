//! Maps `piwait wait` arguments onto a single Power Cloud wait.

use std::fmt;
use std::time::Duration;

use piwait::power::presets::{HEALTH_OK, HEALTH_WARNING};
use piwait::{PowerClient, PowerWaits, STATUS_NOT_FOUND, Status, WaitError};
use thiserror::Error;

use crate::cli::{ReadyHealth, ResourceKind, Until, WaitCommand};

/// Time budget for security group member waits when none is configured.
pub(crate) const DEFAULT_MEMBER_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// One awaited operation, resolved from the command line.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Operation {
    InstanceAvailable { id: String, ready_status: String },
    InstanceStopped { id: String },
    InstanceResized { id: String },
    InstanceDeleted { id: String },
    VolumeAvailable { id: String },
    VolumeDeleted { id: String },
    NetworkPortAvailable { network_id: String, port_id: String },
    VpmemAvailable { id: String },
    VpmemDeleted { id: String },
    DhcpAvailable { id: String },
    DhcpDeleted { id: String },
    MemberAdded { nsg_id: String, member_id: String },
    MemberRemoved { nsg_id: String, member_id: String },
    RouteFilterAvailable { peer_id: String, filter_id: String },
    RouteFilterDeleted { peer_id: String, filter_id: String },
}

/// Rejected argument combinations.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub(crate) enum OperationError {
    /// The kind needs `--sub`.
    #[error("{kind} waits need --sub <ID>")]
    MissingSubResource { kind: &'static str },
    /// The kind does not nest resources.
    #[error("{kind} waits do not take --sub")]
    UnexpectedSubResource { kind: &'static str },
    /// The kind cannot wait for the requested state.
    #[error("{kind} waits do not support --until {until}")]
    UnsupportedState {
        kind: &'static str,
        until: &'static str,
    },
}

const fn kind_name(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Instance => "instance",
        ResourceKind::Volume => "volume",
        ResourceKind::NetworkPort => "network-port",
        ResourceKind::Vpmem => "vpmem",
        ResourceKind::Dhcp => "dhcp",
        ResourceKind::NsgMember => "nsg-member",
        ResourceKind::RouteFilter => "route-filter",
    }
}

const fn until_name(until: Until) -> &'static str {
    match until {
        Until::Ready => "ready",
        Until::Stopped => "stopped",
        Until::Resized => "resized",
        Until::Deleted => "deleted",
    }
}

const fn health_name(health: ReadyHealth) -> &'static str {
    match health {
        ReadyHealth::Ok => HEALTH_OK,
        ReadyHealth::Warning => HEALTH_WARNING,
    }
}

const fn is_nested(kind: ResourceKind) -> bool {
    matches!(
        kind,
        ResourceKind::NetworkPort | ResourceKind::NsgMember | ResourceKind::RouteFilter
    )
}

impl Operation {
    /// Resolves the wait described by `args`.
    pub(crate) fn from_args(args: &WaitCommand) -> Result<Self, OperationError> {
        let kind = kind_name(args.kind);
        let id = args.id.clone();
        let sub = match (is_nested(args.kind), args.sub_id.clone()) {
            (true, None) => return Err(OperationError::MissingSubResource { kind }),
            (false, Some(_)) => return Err(OperationError::UnexpectedSubResource { kind }),
            (_, sub) => sub.unwrap_or_default(),
        };

        let operation = match (args.kind, args.until) {
            (ResourceKind::Instance, Until::Ready) => Self::InstanceAvailable {
                id,
                ready_status: health_name(args.ready_status).to_owned(),
            },
            (ResourceKind::Instance, Until::Stopped) => Self::InstanceStopped { id },
            (ResourceKind::Instance, Until::Resized) => Self::InstanceResized { id },
            (ResourceKind::Instance, Until::Deleted) => Self::InstanceDeleted { id },
            (ResourceKind::Volume, Until::Ready) => Self::VolumeAvailable { id },
            (ResourceKind::Volume, Until::Deleted) => Self::VolumeDeleted { id },
            (ResourceKind::NetworkPort, Until::Ready) => Self::NetworkPortAvailable {
                network_id: id,
                port_id: sub,
            },
            (ResourceKind::Vpmem, Until::Ready) => Self::VpmemAvailable { id },
            (ResourceKind::Vpmem, Until::Deleted) => Self::VpmemDeleted { id },
            (ResourceKind::Dhcp, Until::Ready) => Self::DhcpAvailable { id },
            (ResourceKind::Dhcp, Until::Deleted) => Self::DhcpDeleted { id },
            (ResourceKind::NsgMember, Until::Ready) => Self::MemberAdded {
                nsg_id: id,
                member_id: sub,
            },
            (ResourceKind::NsgMember, Until::Deleted) => Self::MemberRemoved {
                nsg_id: id,
                member_id: sub,
            },
            (ResourceKind::RouteFilter, Until::Ready) => Self::RouteFilterAvailable {
                peer_id: id,
                filter_id: sub,
            },
            (ResourceKind::RouteFilter, Until::Deleted) => Self::RouteFilterDeleted {
                peer_id: id,
                filter_id: sub,
            },
            _ => {
                return Err(OperationError::UnsupportedState {
                    kind,
                    until: until_name(args.until),
                });
            }
        };
        Ok(operation)
    }

    /// Runs the wait and returns the final status.
    pub(crate) async fn run<C: PowerClient + Sync>(
        &self,
        waits: &PowerWaits<C>,
        member_timeout: Duration,
    ) -> Result<Status, WaitError> {
        let gone = || Status::from(STATUS_NOT_FOUND);
        let status = match self {
            Self::InstanceAvailable { id, ready_status } => {
                waits.instance_available(id, ready_status).await?.status
            }
            Self::InstanceStopped { id } => waits.instance_stopped(id).await?.status,
            Self::InstanceResized { id } => waits.instance_resized(id).await?.status,
            Self::InstanceDeleted { id } => {
                waits.instance_deleted(id).await?;
                gone()
            }
            Self::VolumeAvailable { id } => waits.volume_available(id).await?.status,
            Self::VolumeDeleted { id } => {
                waits.volume_deleted(id).await?;
                gone()
            }
            Self::NetworkPortAvailable {
                network_id,
                port_id,
            } => waits.network_port_available(network_id, port_id).await?.status,
            Self::VpmemAvailable { id } => waits.vpmem_available(id).await?.status,
            Self::VpmemDeleted { id } => {
                waits.vpmem_deleted(id).await?;
                gone()
            }
            Self::DhcpAvailable { id } => waits.dhcp_available(id).await?.status,
            Self::DhcpDeleted { id } => {
                waits.dhcp_deleted(id).await?;
                gone()
            }
            Self::MemberAdded { nsg_id, member_id } => {
                waits
                    .nsg_member_added(nsg_id, member_id, member_timeout)
                    .await?
                    .status
            }
            Self::MemberRemoved { nsg_id, member_id } => {
                waits
                    .nsg_member_removed(nsg_id, member_id, member_timeout)
                    .await?
                    .status
            }
            Self::RouteFilterAvailable { peer_id, filter_id } => {
                waits
                    .route_filter_available(peer_id, filter_id)
                    .await?
                    .status
            }
            Self::RouteFilterDeleted { peer_id, filter_id } => {
                waits.route_filter_deleted(peer_id, filter_id).await?;
                gone()
            }
        };
        Ok(status)
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InstanceAvailable { id, .. }
            | Self::InstanceStopped { id }
            | Self::InstanceResized { id }
            | Self::InstanceDeleted { id } => write!(f, "instance {id}"),
            Self::VolumeAvailable { id } | Self::VolumeDeleted { id } => write!(f, "volume {id}"),
            Self::NetworkPortAvailable {
                network_id,
                port_id,
            } => write!(f, "network-port {network_id}/{port_id}"),
            Self::VpmemAvailable { id } | Self::VpmemDeleted { id } => write!(f, "vpmem {id}"),
            Self::DhcpAvailable { id } | Self::DhcpDeleted { id } => write!(f, "dhcp {id}"),
            Self::MemberAdded { nsg_id, member_id } | Self::MemberRemoved { nsg_id, member_id } => {
                write!(f, "nsg-member {nsg_id}/{member_id}")
            }
            Self::RouteFilterAvailable { peer_id, filter_id }
            | Self::RouteFilterDeleted { peer_id, filter_id } => {
                write!(f, "route-filter {peer_id}/{filter_id}")
            }
        }
    }
}
