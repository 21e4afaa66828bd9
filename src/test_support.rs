//! Test support utilities shared across unit and integration tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::power::models::{Health, NetworkSecurityGroupMember};
use crate::power::{
    ClientFuture, DhcpServer, NetworkPort, NetworkSecurityGroup, PowerClient, PowerClientError,
    PvmInstance, RouteFilter, Volume, VpmemVolume,
};
use crate::status::{PollTarget, StatusSnapshot};
use crate::waiter::{FetchError, PollFuture, StatusSource};

#[derive(Clone, Debug)]
enum Reply<T> {
    Ready(Result<StatusSnapshot<T>, FetchError>),
    Hang,
}

/// Scripted status source that returns pre-seeded results in FIFO order.
///
/// The final queued result is sticky: once only one remains it is returned
/// for every later poll, which models a resource stuck in one state.
#[derive(Clone, Debug)]
pub struct ScriptedSource<T> {
    target: PollTarget,
    replies: Arc<Mutex<VecDeque<Reply<T>>>>,
    polls: Arc<AtomicU32>,
}

impl<T: Clone + Send + 'static> ScriptedSource<T> {
    /// Creates a source with no queued results for the given target.
    #[must_use]
    pub fn new(target: PollTarget) -> Self {
        Self {
            target,
            replies: Arc::new(Mutex::new(VecDeque::new())),
            polls: Arc::new(AtomicU32::new(0)),
        }
    }

    fn push(self, reply: Reply<T>) -> Self {
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(reply);
        self
    }

    /// Queues a status with a payload.
    #[must_use]
    pub fn then_status(self, status: &str, payload: T) -> Self {
        self.push(Reply::Ready(Ok(StatusSnapshot::new(status, payload))))
    }

    /// Queues a fetch failure.
    #[must_use]
    pub fn then_error(self, error: FetchError) -> Self {
        self.push(Reply::Ready(Err(error)))
    }

    /// Queues a fetch that never completes.
    #[must_use]
    pub fn then_hang(self) -> Self {
        self.push(Reply::Hang)
    }

    /// Number of fetches that started running.
    #[must_use]
    pub fn polls(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }

    fn next_reply(&self) -> Reply<T> {
        let mut replies = self.replies.lock().unwrap_or_else(PoisonError::into_inner);
        let reply = if replies.len() > 1 {
            replies.pop_front()
        } else {
            replies.front().cloned()
        };
        reply.unwrap_or_else(|| {
            Reply::Ready(Err(FetchError::transport("no scripted response available")))
        })
    }
}

impl ScriptedSource<()> {
    /// Convenience constructor queueing payload-less statuses.
    #[must_use]
    pub fn statuses(target: PollTarget, statuses: &[&str]) -> Self {
        statuses
            .iter()
            .fold(Self::new(target), |source, status| source.then_status(status, ()))
    }
}

impl<T: Clone + Send + 'static> StatusSource for ScriptedSource<T> {
    type Payload = T;

    fn target(&self) -> &PollTarget {
        &self.target
    }

    fn fetch_status(&self) -> PollFuture<'_, StatusSnapshot<T>> {
        Box::pin(async move {
            self.polls.fetch_add(1, Ordering::SeqCst);
            match self.next_reply() {
                Reply::Ready(result) => result,
                Reply::Hang => std::future::pending().await,
            }
        })
    }
}

/// Target used throughout the test suites.
#[must_use]
pub fn sample_target() -> PollTarget {
    PollTarget::new("cloud-1", "resource-1")
}

/// Queue of scripted API answers for one resource kind. The last answer is
/// sticky, like [`ScriptedSource`].
#[derive(Debug)]
struct Script<T> {
    answers: Mutex<VecDeque<Result<T, PowerClientError>>>,
}

impl<T> Default for Script<T> {
    fn default() -> Self {
        Self {
            answers: Mutex::new(VecDeque::new()),
        }
    }
}

impl<T: Clone> Script<T> {
    fn push(&self, answer: Result<T, PowerClientError>) {
        self.answers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(answer);
    }

    fn next(&self) -> Result<T, PowerClientError> {
        let mut answers = self.answers.lock().unwrap_or_else(PoisonError::into_inner);
        let answer = if answers.len() > 1 {
            answers.pop_front()
        } else {
            answers.front().cloned()
        };
        answer.unwrap_or_else(|| {
            Err(PowerClientError::Http {
                message: String::from("no scripted answer available"),
            })
        })
    }
}

/// Scripted [`PowerClient`] that answers from per-resource queues and counts
/// every call.
#[derive(Debug, Default)]
pub struct ScriptedPowerClient {
    instances: Script<PvmInstance>,
    volumes: Script<Volume>,
    ports: Script<NetworkPort>,
    vpmem: Script<VpmemVolume>,
    dhcp: Script<DhcpServer>,
    groups: Script<NetworkSecurityGroup>,
    route_filters: Script<RouteFilter>,
    calls: AtomicU32,
}

impl ScriptedPowerClient {
    /// Creates a client with empty queues.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an instance answer.
    #[must_use]
    pub fn then_instance(self, answer: Result<PvmInstance, PowerClientError>) -> Self {
        self.instances.push(answer);
        self
    }

    /// Queues a volume answer.
    #[must_use]
    pub fn then_volume(self, answer: Result<Volume, PowerClientError>) -> Self {
        self.volumes.push(answer);
        self
    }

    /// Queues a network port answer.
    #[must_use]
    pub fn then_port(self, answer: Result<NetworkPort, PowerClientError>) -> Self {
        self.ports.push(answer);
        self
    }

    /// Queues a vPMEM volume answer.
    #[must_use]
    pub fn then_vpmem(self, answer: Result<VpmemVolume, PowerClientError>) -> Self {
        self.vpmem.push(answer);
        self
    }

    /// Queues a DHCP server answer.
    #[must_use]
    pub fn then_dhcp(self, answer: Result<DhcpServer, PowerClientError>) -> Self {
        self.dhcp.push(answer);
        self
    }

    /// Queues a security group answer.
    #[must_use]
    pub fn then_group(self, answer: Result<NetworkSecurityGroup, PowerClientError>) -> Self {
        self.groups.push(answer);
        self
    }

    /// Queues a route filter answer.
    #[must_use]
    pub fn then_route_filter(self, answer: Result<RouteFilter, PowerClientError>) -> Self {
        self.route_filters.push(answer);
        self
    }

    /// Number of API calls issued so far.
    #[must_use]
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn answer<'a, T: Clone + Send + 'a>(&self, script: &Script<T>) -> ClientFuture<'a, T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let answer = script.next();
        Box::pin(async move { answer })
    }
}

impl PowerClient for ScriptedPowerClient {
    fn get_instance<'a>(&'a self, _instance_id: &'a str) -> ClientFuture<'a, PvmInstance> {
        self.answer(&self.instances)
    }

    fn get_volume<'a>(&'a self, _volume_id: &'a str) -> ClientFuture<'a, Volume> {
        self.answer(&self.volumes)
    }

    fn get_network_port<'a>(
        &'a self,
        _network_id: &'a str,
        _port_id: &'a str,
    ) -> ClientFuture<'a, NetworkPort> {
        self.answer(&self.ports)
    }

    fn get_vpmem_volume<'a>(&'a self, _volume_id: &'a str) -> ClientFuture<'a, VpmemVolume> {
        self.answer(&self.vpmem)
    }

    fn get_dhcp_server<'a>(&'a self, _dhcp_id: &'a str) -> ClientFuture<'a, DhcpServer> {
        self.answer(&self.dhcp)
    }

    fn get_network_security_group<'a>(
        &'a self,
        _nsg_id: &'a str,
    ) -> ClientFuture<'a, NetworkSecurityGroup> {
        self.answer(&self.groups)
    }

    fn get_route_filter<'a>(
        &'a self,
        _network_peer_id: &'a str,
        _route_filter_id: &'a str,
    ) -> ClientFuture<'a, RouteFilter> {
        self.answer(&self.route_filters)
    }
}

/// Builds an instance with the given status and optional health.
#[must_use]
pub fn pvm_instance(status: &str, health: Option<&str>) -> PvmInstance {
    PvmInstance {
        id: String::from("pvm-1"),
        server_name: String::from("lpar-1"),
        status: status.to_owned(),
        health: health.map(|value| Health {
            status: value.to_owned(),
        }),
    }
}

/// Builds a volume in the given state.
#[must_use]
pub fn volume(state: &str) -> Volume {
    Volume {
        id: String::from("vol-1"),
        name: String::from("data"),
        state: state.to_owned(),
    }
}

/// Builds a network port with the given status.
#[must_use]
pub fn network_port(status: &str) -> NetworkPort {
    NetworkPort {
        id: String::from("port-1"),
        status: status.to_owned(),
        ip_address: None,
        mac_address: None,
    }
}

/// Builds a vPMEM volume with the given status.
#[must_use]
pub fn vpmem_volume(status: &str) -> VpmemVolume {
    VpmemVolume {
        id: String::from("vpmem-1"),
        name: String::from("pmem"),
        status: status.to_owned(),
    }
}

/// Builds a DHCP server, optionally without a status.
#[must_use]
pub fn dhcp_server(status: Option<&str>) -> DhcpServer {
    DhcpServer {
        id: String::from("dhcp-1"),
        status: status.map(str::to_owned),
    }
}

/// Builds a route filter in the given state.
#[must_use]
pub fn route_filter(state: &str) -> RouteFilter {
    RouteFilter {
        id: String::from("rf-1"),
        state: state.to_owned(),
    }
}

/// Builds a security group listing the given member identifiers.
#[must_use]
pub fn security_group(member_ids: &[&str]) -> NetworkSecurityGroup {
    let members = member_ids
        .iter()
        .map(|id| NetworkSecurityGroupMember {
            id: (*id).to_owned(),
            target: String::from("10.0.0.4"),
            kind: String::from("ipv4-address"),
        })
        .collect();
    NetworkSecurityGroup {
        id: String::from("nsg-1"),
        name: String::from("web"),
        members: Some(members),
    }
}

/// 404 answer for a scripted client.
#[must_use]
pub fn not_found() -> PowerClientError {
    PowerClientError::NotFound {
        resource: String::from("/pcloud/v1/scripted"),
    }
}
