//! Sonos speaker discovery and content queries.
//!
//! This module provides functionality for discovering Sonos speakers on the
//! local network and reading their queues, saved playlists and transport
//! status using UPnP/SOAP.
//!
//! # Module Structure
//!
//! - `types` - Domain types for tracks, playlists, zone groups and devices
//! - `services` - UPnP service definitions (URNs, paths)
//! - `traits` - Trait abstractions for testability
//! - `client` - `SonosClientImpl` concrete trait implementation
//! - `zone_groups` - Zone group topology parsing and retrieval
//! - `content_directory` - Browse requests and paged item sources
//! - `didl` - DIDL-Lite parsing for browse results
//! - `transport` - Read-only transport state and position queries
//! - `discovery` - SSDP multicast/broadcast and static speaker discovery
//! - `soap` - Low-level SOAP protocol implementation
//! - `utils` - Shared utility functions

pub mod client;
pub mod content_directory;
pub(crate) mod didl;
pub mod discovery;
pub mod services;
pub mod soap;
pub mod traits;
pub(crate) mod transport;
pub mod types;
pub mod utils;
pub(crate) mod zone_groups;

#[cfg(test)]
pub(crate) mod test_fixtures;

// Re-export domain types
pub use services::SonosService;
pub use types::{
    Device, DeviceRole, PlaylistRef, PositionInfo, Track, TransportState, ZoneGroup,
    ZoneGroupMember,
};

// Re-export content access
pub use content_directory::{find_playlist, BrowseResult, PlaylistIndexSource, TrackSource};

// Re-export trait abstractions
pub use traits::{
    SonosClient, SonosContentDirectory, SonosDiscovery, SonosTopology, SonosTopologyClient,
    SonosTransportInfo,
};

// Re-export concrete implementation
pub use client::SonosClientImpl;
