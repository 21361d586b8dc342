/// Discovery of this service's own reachable address
use crate::error::{DirectoryError, Result};
use async_trait::async_trait;
use std::net::IpAddr;
use tokio::net::UdpSocket;
use tracing::debug;

/// Any routable address works: connecting a UDP socket sends nothing, it only
/// makes the kernel pick the outgoing interface.
const ROUTE_PROBE: &str = "8.8.8.8:80";

/// Source of the `host:port` handed to backends for callback URLs
#[async_trait]
pub trait AddressProvider: Send + Sync {
    async fn host_port(&self) -> Result<String>;
}

/// Configured host if any, else the IPv4 the routing table picks
#[derive(Debug, Clone)]
pub struct LocalAddressProvider {
    advertised_host: Option<String>,
    port: u16,
}

impl LocalAddressProvider {
    pub fn new(advertised_host: Option<String>, port: u16) -> Self {
        Self {
            advertised_host,
            port,
        }
    }

    async fn discover_ipv4() -> Result<IpAddr> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        socket.connect(ROUTE_PROBE).await?;
        let ip = socket.local_addr()?.ip();
        if ip.is_unspecified() {
            return Err(DirectoryError::address_discovery(
                "no IPv4 interface with a route",
            ));
        }
        Ok(ip)
    }
}

#[async_trait]
impl AddressProvider for LocalAddressProvider {
    async fn host_port(&self) -> Result<String> {
        let host = match &self.advertised_host {
            Some(host) if !host.is_empty() => host.clone(),
            _ => Self::discover_ipv4()
                .await
                .map_err(|e| DirectoryError::address_discovery(e.to_string()))?
                .to_string(),
        };
        let host_port = format!("{}:{}", host, self.port);
        debug!("host:port: {}", host_port);
        Ok(host_port)
    }
}

/// Always answers the same `host:port`
#[derive(Debug, Clone)]
pub struct FixedAddress(pub String);

#[async_trait]
impl AddressProvider for FixedAddress {
    async fn host_port(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}
