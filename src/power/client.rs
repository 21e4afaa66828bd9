//! Client abstraction over the Power Cloud API and its HTTP implementation.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use crate::config::PowerConfig;

use super::error::PowerClientError;
use super::models::{
    DhcpServer, NetworkPort, NetworkSecurityGroup, PvmInstance, RouteFilter, Volume, VpmemVolume,
};

const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Future returned by client operations.
pub type ClientFuture<'a, T> =
    Pin<Box<dyn Future<Output = Result<T, PowerClientError>> + Send + 'a>>;

/// Read operations the waiters need from the Power Cloud API. Every call is
/// scoped to the workspace the client was built for.
pub trait PowerClient {
    /// Fetches a virtual server instance.
    fn get_instance<'a>(&'a self, instance_id: &'a str) -> ClientFuture<'a, PvmInstance>;

    /// Fetches a block storage volume.
    fn get_volume<'a>(&'a self, volume_id: &'a str) -> ClientFuture<'a, Volume>;

    /// Fetches a port on a workspace network.
    fn get_network_port<'a>(
        &'a self,
        network_id: &'a str,
        port_id: &'a str,
    ) -> ClientFuture<'a, NetworkPort>;

    /// Fetches a virtual persistent memory volume.
    fn get_vpmem_volume<'a>(&'a self, volume_id: &'a str) -> ClientFuture<'a, VpmemVolume>;

    /// Fetches a DHCP server.
    fn get_dhcp_server<'a>(&'a self, dhcp_id: &'a str) -> ClientFuture<'a, DhcpServer>;

    /// Fetches a network security group with its members.
    fn get_network_security_group<'a>(
        &'a self,
        nsg_id: &'a str,
    ) -> ClientFuture<'a, NetworkSecurityGroup>;

    /// Fetches a route filter on a network peer.
    fn get_route_filter<'a>(
        &'a self,
        network_peer_id: &'a str,
        route_filter_id: &'a str,
    ) -> ClientFuture<'a, RouteFilter>;
}

/// [`PowerClient`] backed by the Power Cloud REST API.
#[derive(Clone, Debug)]
pub struct HttpPowerClient {
    http: reqwest::Client,
    base_url: String,
    iam_token: String,
    crn: String,
    cloud_instance_id: String,
}

impl HttpPowerClient {
    /// Builds a client from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`PowerClientError::Config`] when the configuration fails
    /// validation and [`PowerClientError::Http`] when the HTTP client cannot
    /// be constructed.
    pub fn new(config: &PowerConfig) -> Result<Self, PowerClientError> {
        config
            .validate()
            .map_err(|err| PowerClientError::Config(err.to_string()))?;
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: config.base_url(),
            iam_token: config.iam_token.trim().to_owned(),
            crn: config.crn.trim().to_owned(),
            cloud_instance_id: config.cloud_instance_id.trim().to_owned(),
        })
    }

    /// Workspace every request is scoped to.
    #[must_use]
    pub fn cloud_instance_id(&self) -> &str {
        &self.cloud_instance_id
    }

    fn pcloud_path(&self, suffix: &str) -> String {
        format!(
            "/pcloud/v1/cloud-instances/{}/{suffix}",
            self.cloud_instance_id
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, path: String) -> Result<T, PowerClientError> {
        let url = format!("{}{path}", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.iam_token)
            .header("CRN", &self.crn)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        if status == StatusCode::NOT_FOUND {
            return Err(PowerClientError::NotFound { resource: path });
        }
        if !status.is_success() {
            return Err(PowerClientError::Status {
                code: status.as_u16(),
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        serde_json::from_slice(&body).map_err(|err| PowerClientError::Decode {
            resource: path,
            message: err.to_string(),
        })
    }
}

impl PowerClient for HttpPowerClient {
    fn get_instance<'a>(&'a self, instance_id: &'a str) -> ClientFuture<'a, PvmInstance> {
        Box::pin(async move {
            self.get_json(self.pcloud_path(&format!("pvm-instances/{instance_id}")))
                .await
        })
    }

    fn get_volume<'a>(&'a self, volume_id: &'a str) -> ClientFuture<'a, Volume> {
        Box::pin(async move {
            self.get_json(self.pcloud_path(&format!("volumes/{volume_id}")))
                .await
        })
    }

    fn get_network_port<'a>(
        &'a self,
        network_id: &'a str,
        port_id: &'a str,
    ) -> ClientFuture<'a, NetworkPort> {
        Box::pin(async move {
            self.get_json(self.pcloud_path(&format!("networks/{network_id}/ports/{port_id}")))
                .await
        })
    }

    fn get_vpmem_volume<'a>(&'a self, volume_id: &'a str) -> ClientFuture<'a, VpmemVolume> {
        Box::pin(async move {
            self.get_json(format!("/v1/vpmem-volumes/{volume_id}"))
                .await
        })
    }

    fn get_dhcp_server<'a>(&'a self, dhcp_id: &'a str) -> ClientFuture<'a, DhcpServer> {
        Box::pin(async move {
            self.get_json(self.pcloud_path(&format!("services/dhcp/{dhcp_id}")))
                .await
        })
    }

    fn get_network_security_group<'a>(
        &'a self,
        nsg_id: &'a str,
    ) -> ClientFuture<'a, NetworkSecurityGroup> {
        Box::pin(async move {
            self.get_json(format!("/v1/network-security-groups/{nsg_id}"))
                .await
        })
    }

    fn get_route_filter<'a>(
        &'a self,
        network_peer_id: &'a str,
        route_filter_id: &'a str,
    ) -> ClientFuture<'a, RouteFilter> {
        Box::pin(async move {
            self.get_json(format!(
                "/v1/network-peers/{network_peer_id}/route-filters/{route_filter_id}"
            ))
            .await
        })
    }
}
