//! Device selection services.
//!
//! - `coordinator_locator` - bounded-retry discovery and device filtering
//! - `device_discovery` - Sonos topology-backed discovery source

pub mod coordinator_locator;
pub mod device_discovery;

pub use coordinator_locator::{
    CoordinatorLocator, DeviceCapabilities, DeviceDiscovery, DeviceFilter, Located, LocatorConfig,
};
pub use device_discovery::SonosDeviceDiscovery;
