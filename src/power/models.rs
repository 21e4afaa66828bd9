//! Typed subsets of the Power Cloud API payloads the waiters inspect.
//!
//! Only the fields needed to derive a status are modelled; everything else
//! in the responses is ignored during deserialisation.

use serde::Deserialize;

/// Health block attached to a virtual server instance.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
pub struct Health {
    /// Health status (`OK`, `WARNING`, `CRITICAL`).
    #[serde(default)]
    pub status: String,
}

/// Virtual server instance (`pvm-instance`).
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PvmInstance {
    /// Instance identifier.
    #[serde(rename = "pvmInstanceID")]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub server_name: String,
    /// Lifecycle status (`BUILD`, `ACTIVE`, `SHUTOFF`, `ERROR`, ...).
    pub status: String,
    /// Health reported by the hypervisor, absent while building.
    #[serde(default)]
    pub health: Option<Health>,
}

impl PvmInstance {
    /// Health status, or an empty string when none is reported.
    #[must_use]
    pub fn health_status(&self) -> &str {
        self.health
            .as_ref()
            .map_or("", |health| health.status.as_str())
    }
}

/// Block storage volume.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Volume {
    /// Volume identifier.
    #[serde(rename = "volumeID")]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Lifecycle state (`creating`, `available`, `in-use`, `error`, ...).
    pub state: String,
}

/// Port on a workspace network.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPort {
    /// Port identifier.
    #[serde(rename = "portID")]
    pub id: String,
    /// Port status (`BUILD`, `DOWN`, `ACTIVE`).
    pub status: String,
    /// Assigned IP address, once allocated.
    #[serde(default)]
    pub ip_address: Option<String>,
    /// Assigned MAC address, once allocated.
    #[serde(default)]
    pub mac_address: Option<String>,
}

/// Virtual persistent memory volume.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VpmemVolume {
    /// Volume identifier.
    #[serde(rename = "uuid")]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Lifecycle status (`creating`, `active`, `error`, `deleting`, ...).
    pub status: String,
}

/// DHCP server attached to a workspace network.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct DhcpServer {
    /// DHCP server identifier.
    pub id: String,
    /// Status (`BUILD`, `ACTIVE`, `ERROR`); absent while provisioning.
    #[serde(default)]
    pub status: Option<String>,
}

/// Member of a network security group.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSecurityGroupMember {
    /// Member identifier.
    pub id: String,
    /// Identifier of the network interface or port the member refers to.
    #[serde(default)]
    pub target: String,
    /// Member kind (`ipv4-address`, `network-interface`, ...).
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Network security group.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
pub struct NetworkSecurityGroup {
    /// Group identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Members of the group; the API omits the field when there are none.
    #[serde(default)]
    pub members: Option<Vec<NetworkSecurityGroupMember>>,
}

impl NetworkSecurityGroup {
    /// Returns `true` when the group lists a member with the given id.
    #[must_use]
    pub fn has_member(&self, member_id: &str) -> bool {
        self.members
            .iter()
            .flatten()
            .any(|member| member.id == member_id)
    }
}

/// Route filter on a network peer.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RouteFilter {
    /// Route filter identifier.
    #[serde(rename = "routeFilterID")]
    pub id: String,
    /// Lifecycle state (`pending`, `active`, `error`, `deleting`).
    pub state: String,
}
