//! Trait abstractions for Sonos operations.
//!
//! These traits enable dependency injection for testability and modularity.
//! Services depend on traits rather than concrete implementations.

use async_trait::async_trait;

use crate::sonos::content_directory::BrowseResult;
use crate::sonos::discovery::{DiscoveryResult, Speaker};
use crate::sonos::soap::SoapResult;
use crate::sonos::types::{PositionInfo, TransportState, ZoneGroup};

/// Trait for Sonos topology operations.
#[async_trait]
pub trait SonosTopology: Send + Sync {
    /// Fetches the current zone groups from a Sonos speaker.
    ///
    /// # Arguments
    /// * `ip` - IP address of any Sonos speaker on the network
    async fn get_zone_groups(&self, ip: &str) -> SoapResult<Vec<ZoneGroup>>;
}

/// Trait for Sonos speaker discovery operations.
#[async_trait]
pub trait SonosDiscovery: Send + Sync {
    /// Performs one discovery attempt on the local network.
    async fn discover_speakers(&self) -> DiscoveryResult<Vec<Speaker>>;
}

/// Trait for ContentDirectory listings.
///
/// Used by the item sources that feed [`crate::collection::PagedCollector`].
#[async_trait]
pub trait SonosContentDirectory: Send + Sync {
    /// Lists up to `count` children of `object_id` starting at `start`.
    ///
    /// # Arguments
    /// * `ip` - IP address of the speaker holding the container
    /// * `object_id` - Container id (`Q:0`, `SQ:`, `SQ:3`, ...)
    /// * `start` - 0-based index of the first child
    /// * `count` - Maximum number of children to return
    async fn browse(
        &self,
        ip: &str,
        object_id: &str,
        start: u32,
        count: u32,
    ) -> SoapResult<BrowseResult>;

    /// Reads the queue length of the speaker at `ip`, if it reports one.
    async fn get_queue_size(&self, ip: &str) -> SoapResult<Option<u32>>;
}

/// Trait for read-only transport status.
#[async_trait]
pub trait SonosTransportInfo: Send + Sync {
    /// Gets the playback state of a coordinator.
    async fn get_transport_state(&self, ip: &str) -> SoapResult<TransportState>;

    /// Gets the current track and elapsed time of a coordinator.
    async fn get_position_info(&self, ip: &str) -> SoapResult<PositionInfo>;
}

/// Combined trait for discovery plus topology plus queue probing.
///
/// Used by [`crate::services::SonosDeviceDiscovery`], which needs all three
/// to turn raw speakers into coordinator-aware device records.
pub trait SonosTopologyClient: SonosDiscovery + SonosTopology + SonosContentDirectory {}

impl<T: SonosDiscovery + SonosTopology + SonosContentDirectory> SonosTopologyClient for T {}

/// Combined trait for all Sonos operations used by the command-line tools.
pub trait SonosClient: SonosTopologyClient + SonosTransportInfo {}

impl<T: SonosTopologyClient + SonosTransportInfo> SonosClient for T {}
