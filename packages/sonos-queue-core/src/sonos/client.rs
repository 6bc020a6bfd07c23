//! Concrete implementation of the Sonos client traits.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use crate::protocol_constants::SOAP_TIMEOUT_SECS;
use crate::sonos::content_directory::{self, BrowseResult};
use crate::sonos::discovery::{self, DiscoveryConfig, DiscoveryResult, Speaker};
use crate::sonos::soap::SoapResult;
use crate::sonos::traits::{
    SonosContentDirectory, SonosDiscovery, SonosTopology, SonosTransportInfo,
};
use crate::sonos::transport;
use crate::sonos::types::{PositionInfo, TransportState, ZoneGroup};
use crate::sonos::zone_groups;

/// Concrete implementation of Sonos client traits.
///
/// This struct wraps the free functions of the protocol modules to provide
/// a testable, injectable interface for Sonos operations.
#[derive(Clone)]
pub struct SonosClientImpl {
    /// HTTP client for Sonos communication.
    client: Client,
    /// Discovery configuration.
    discovery_config: DiscoveryConfig,
}

impl std::fmt::Debug for SonosClientImpl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SonosClientImpl")
            .field("client", &"Client")
            .field("discovery_config", &self.discovery_config)
            .finish()
    }
}

impl SonosClientImpl {
    /// Creates a new SonosClientImpl with the given HTTP client.
    ///
    /// # Arguments
    /// * `client` - The HTTP client to use for all Sonos communication
    #[must_use]
    pub fn new(client: Client) -> Self {
        Self::with_discovery_config(client, DiscoveryConfig::default())
    }

    /// Creates a new SonosClientImpl with custom discovery configuration.
    ///
    /// # Arguments
    /// * `client` - The HTTP client to use for all Sonos communication
    /// * `discovery_config` - Static speakers, SSDP window and fallback
    #[must_use]
    pub fn with_discovery_config(client: Client, discovery_config: DiscoveryConfig) -> Self {
        Self {
            client,
            discovery_config,
        }
    }

    /// Builds an HTTP client with the SOAP timeout applied.
    ///
    /// # Errors
    /// Fails only if the TLS backend cannot be initialized.
    pub fn default_http_client() -> reqwest::Result<Client> {
        Client::builder()
            .timeout(Duration::from_secs(SOAP_TIMEOUT_SECS))
            .build()
    }

    pub fn discovery_config(&self) -> &DiscoveryConfig {
        &self.discovery_config
    }
}

#[async_trait]
impl SonosTopology for SonosClientImpl {
    async fn get_zone_groups(&self, ip: &str) -> SoapResult<Vec<ZoneGroup>> {
        zone_groups::get_zone_groups(&self.client, ip).await
    }
}

#[async_trait]
impl SonosDiscovery for SonosClientImpl {
    async fn discover_speakers(&self) -> DiscoveryResult<Vec<Speaker>> {
        discovery::discover_speakers(&self.discovery_config).await
    }
}

#[async_trait]
impl SonosContentDirectory for SonosClientImpl {
    async fn browse(
        &self,
        ip: &str,
        object_id: &str,
        start: u32,
        count: u32,
    ) -> SoapResult<BrowseResult> {
        content_directory::browse(&self.client, ip, object_id, start, count).await
    }

    async fn get_queue_size(&self, ip: &str) -> SoapResult<Option<u32>> {
        content_directory::get_queue_size(&self.client, ip).await
    }
}

#[async_trait]
impl SonosTransportInfo for SonosClientImpl {
    async fn get_transport_state(&self, ip: &str) -> SoapResult<TransportState> {
        transport::get_transport_state(&self.client, ip).await
    }

    async fn get_position_info(&self, ip: &str) -> SoapResult<PositionInfo> {
        transport::get_position_info(&self.client, ip).await
    }
}
