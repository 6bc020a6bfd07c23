//! Shared types for Sonos speaker discovery.

use serde::Serialize;
use thiserror::Error;

/// Discovery method identifier for tracking which method found a speaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DiscoveryMethod {
    /// SSDP multicast to 239.255.255.250:1900
    SsdpMulticast,
    /// SSDP broadcast (directed per-interface + limited 255.255.255.255)
    SsdpBroadcast,
    /// Configured static IP address.
    Static,
}

impl std::fmt::Display for DiscoveryMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SsdpMulticast => write!(f, "SSDP multicast"),
            Self::SsdpBroadcast => write!(f, "SSDP broadcast"),
            Self::Static => write!(f, "static"),
        }
    }
}

/// Errors that can occur during discovery.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Failed to bind UDP socket for discovery.
    #[error("failed to bind UDP socket: {0}")]
    SocketBind(#[source] std::io::Error),

    /// No usable network interfaces found.
    #[error("no usable network interfaces found")]
    NoInterfaces,

    /// A configured speaker address is not a valid IPv4 address.
    #[error("invalid speaker address: {0}")]
    InvalidAddress(String),
}

/// Convenient Result alias for speaker discovery operations.
pub type DiscoveryResult<T> = Result<T, DiscoveryError>;

/// A speaker that answered discovery (or was configured statically).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Speaker {
    /// IP address of the speaker.
    pub ip: String,
    /// Canonical UUID (normalized RINCON_xxx); empty for static entries.
    pub uuid: String,
    /// SSDP LOCATION URL if available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// How the speaker was found.
    pub method: DiscoveryMethod,
}

/// Normalizes a Sonos UUID to canonical form for deduplication.
///
/// Handles the shapes seen in SSDP and topology data:
/// - `uuid:` prefix (from UPnP UDN)
/// - `::urn:schemas-upnp-org:device:ZonePlayer:1` suffix (from USN)
/// - `_MS`, `_MR`, `_LR` suffixes (root device + subdevices)
pub fn normalize_uuid(raw: &str) -> String {
    let mut uuid = raw.strip_prefix("uuid:").unwrap_or(raw);

    if let Some(idx) = uuid.find("::") {
        uuid = &uuid[..idx];
    }

    const SUFFIXES: &[&str] = &["_MS", "_MR", "_LR"];
    loop {
        let before = uuid.len();
        for suffix in SUFFIXES {
            if let Some(stripped) = uuid.strip_suffix(suffix) {
                uuid = stripped;
            }
        }
        if uuid.len() == before {
            break;
        }
    }

    uuid.to_string()
}

/// Virtual interface prefixes to filter out during discovery.
pub const VIRTUAL_INTERFACE_PREFIXES: &[&str] = &[
    "lo", "docker", "veth", "br-", "virbr", "vmnet", "vbox", "tun", "tap",
];

/// Checks if an interface name belongs to a virtual/container interface.
pub fn is_virtual_interface(name: &str) -> bool {
    let name_lower = name.to_lowercase();
    VIRTUAL_INTERFACE_PREFIXES
        .iter()
        .any(|prefix| name_lower.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_uuid_strips_prefix_and_suffix() {
        assert_eq!(
            normalize_uuid("uuid:RINCON_ABC123::urn:schemas-upnp-org:device:ZonePlayer:1"),
            "RINCON_ABC123"
        );
    }

    #[test]
    fn normalize_uuid_strips_device_suffixes() {
        assert_eq!(normalize_uuid("RINCON_ABC123_MR"), "RINCON_ABC123");
        assert_eq!(normalize_uuid("RINCON_ABC123_MS_LR"), "RINCON_ABC123");
    }

    #[test]
    fn virtual_interfaces() {
        assert!(is_virtual_interface("docker0"));
        assert!(is_virtual_interface("veth1234"));
        assert!(!is_virtual_interface("eth0"));
        assert!(!is_virtual_interface("wlan0"));
    }
}
