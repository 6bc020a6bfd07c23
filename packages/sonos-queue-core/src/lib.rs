//! Sonos Queue Core - queue and playlist retrieval for Sonos systems.
//!
//! Reads a coordinator's play queue or a saved playlist completely, page by
//! page, and reports entries that repeat a track already seen earlier.
//!
//! # Architecture
//!
//! - [`collection`]: paged retrieval ([`PagedCollector`]) and duplicate analysis ([`dedup`])
//! - [`services`]: coordinator selection with bounded discovery retry
//! - [`sonos`]: Sonos discovery, topology and ContentDirectory access (UPnP/SOAP)
//! - [`error`]: Centralized error types
//!
//! The library performs no output of its own; callers receive structured
//! values and decide how to present them.

#![warn(clippy::all)]

pub mod collection;
pub mod error;
pub mod protocol_constants;
pub mod services;
pub mod sonos;

// Re-export commonly used types at the crate root
pub use collection::{
    dedup, CollectError, CollectOptions, CollectResult, Collection, DedupResult, Duplicate,
    ItemSource, Page, PagedCollector, TotalPolicy,
};
pub use error::{DiscoveryResult, QueueError, QueueResult, SoapResult};

// Re-export Sonos types
pub use sonos::discovery::{DiscoveryConfig, Speaker};
pub use sonos::types::{Device, DeviceRole, PlaylistRef, PositionInfo, Track, TransportState, ZoneGroup};
pub use sonos::{
    find_playlist, PlaylistIndexSource, SonosClient, SonosClientImpl, SonosTopologyClient,
    TrackSource,
};

// Re-export service types
pub use services::{
    CoordinatorLocator, DeviceCapabilities, DeviceDiscovery, DeviceFilter, Located, LocatorConfig,
    SonosDeviceDiscovery,
};
