//! SSDP-based Sonos speaker discovery.
//!
//! Supports multicast (239.255.255.250) and broadcast discovery for
//! networks with different multicast configurations. Both use the same
//! socket for send AND receive since devices reply unicast back to the
//! sending socket/port.

use local_ip_address::list_afinet_netifas;
use socket2::{Domain, Protocol, Socket, Type};
use std::collections::HashSet;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::timeout;

use super::types::{
    is_virtual_interface, normalize_uuid, DiscoveryError, DiscoveryMethod, DiscoveryResult,
    Speaker,
};

/// Standard SSDP multicast address and port (protocol specification).
const MULTICAST_ADDR: &str = "239.255.255.250:1900";

/// Limited broadcast address for fallback.
const LIMITED_BROADCAST_ADDR: &str = "255.255.255.255:1900";

/// SSDP search target for Sonos ZonePlayer devices.
const SONOS_SEARCH_TARGET: &str = "urn:schemas-upnp-org:device:ZonePlayer:1";

/// Build the M-SEARCH message.
///
/// HOST always uses the multicast address, even when sending via broadcast.
fn build_msearch_message(mx: u64) -> String {
    format!(
        "M-SEARCH * HTTP/1.1\r\n\
         HOST: 239.255.255.250:1900\r\n\
         MAN: \"ssdp:discover\"\r\n\
         MX: {}\r\n\
         ST: {}\r\n\r\n",
        mx, SONOS_SEARCH_TARGET
    )
}

/// Returns the value of an HTTP-style header line, matching the name
/// ASCII case-insensitively.
fn header_value<'a>(response: &'a str, name: &str) -> Option<&'a str> {
    response.lines().find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim()
            .eq_ignore_ascii_case(name)
            .then(|| value.trim())
    })
}

/// Parses an SSDP response and extracts speaker info.
///
/// Returns None unless the USN carries a Sonos `RINCON_` UUID.
fn parse_ssdp_response(response: &str, src_ip: &str, method: DiscoveryMethod) -> Option<Speaker> {
    let usn = header_value(response, "usn")?;
    let uuid_start = usn.to_ascii_lowercase().find("uuid:")?;
    let uuid = normalize_uuid(&usn[uuid_start + 5..]);

    // Sonos UUIDs are always uppercase RINCON_
    if !uuid.starts_with("RINCON_") {
        return None;
    }

    Some(Speaker {
        ip: src_ip.to_string(),
        uuid,
        location: header_value(response, "location").map(str::to_string),
        method,
    })
}

/// Network interface information for discovery.
#[derive(Debug, Clone)]
pub struct InterfaceInfo {
    /// Interface name (e.g., "en0", "eth0").
    pub name: String,
    /// IPv4 address bound to this interface.
    pub ip: Ipv4Addr,
    /// Broadcast address for this interface (assumes /24).
    pub broadcast: Ipv4Addr,
}

/// Gets all usable network interfaces for discovery.
///
/// Filters out virtual/container interfaces and loopback.
pub fn get_interfaces() -> Vec<InterfaceInfo> {
    list_afinet_netifas()
        .unwrap_or_else(|e| {
            log::warn!("[SSDP] Failed to list network interfaces: {}", e);
            Vec::new()
        })
        .into_iter()
        .filter_map(|(name, addr)| {
            if is_virtual_interface(&name) {
                log::trace!("[SSDP] Skipping virtual interface: {}", name);
                return None;
            }
            match addr {
                IpAddr::V4(ipv4) if !ipv4.is_loopback() => {
                    let octets = ipv4.octets();
                    Some(InterfaceInfo {
                        name,
                        ip: ipv4,
                        broadcast: Ipv4Addr::new(octets[0], octets[1], octets[2], 255),
                    })
                }
                _ => None,
            }
        })
        .collect()
}

/// Creates a UDP socket bound to a specific interface.
fn create_socket(iface_ip: Ipv4Addr, enable_broadcast: bool) -> DiscoveryResult<UdpSocket> {
    let bind_addr = SocketAddr::new(IpAddr::V4(iface_ip), 0);

    let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))
        .map_err(DiscoveryError::SocketBind)?;

    if let Err(e) = socket.set_reuse_address(true) {
        log::warn!("[SSDP] Failed to set SO_REUSEADDR on {}: {}", iface_ip, e);
    }

    // UPnP 1.0 recommends TTL of 4 for SSDP multicast
    if let Err(e) = socket.set_multicast_ttl_v4(4) {
        log::warn!("[SSDP] Failed to set multicast TTL on {}: {}", iface_ip, e);
    }

    if enable_broadcast {
        if let Err(e) = socket.set_broadcast(true) {
            log::warn!("[SSDP] Failed to set SO_BROADCAST on {}: {}", iface_ip, e);
        }
    }

    socket
        .set_nonblocking(true)
        .map_err(DiscoveryError::SocketBind)?;
    socket
        .bind(&bind_addr.into())
        .map_err(DiscoveryError::SocketBind)?;

    let std_socket: std::net::UdpSocket = socket.into();
    UdpSocket::from_std(std_socket).map_err(DiscoveryError::SocketBind)
}

/// Configuration for SSDP discovery.
#[derive(Debug, Clone)]
pub struct SsdpConfig {
    /// Number of M-SEARCH packets to send.
    pub send_count: u64,
    /// Delay between M-SEARCH resends.
    pub retry_delay: Duration,
    /// Total listening window.
    pub discovery_timeout: Duration,
    /// MX value (max response delay in seconds).
    pub mx_value: u64,
}

impl Default for SsdpConfig {
    fn default() -> Self {
        Self {
            send_count: 2,
            retry_delay: Duration::from_millis(800),
            discovery_timeout: Duration::from_secs(3),
            mx_value: 1,
        }
    }
}

/// Discovers Sonos speakers using SSDP multicast on all non-virtual interfaces.
pub async fn discover_multicast(config: &SsdpConfig) -> DiscoveryResult<Vec<Speaker>> {
    discover_ssdp(config, DiscoveryMethod::SsdpMulticast).await
}

/// Discovers Sonos speakers using directed and limited broadcast.
pub async fn discover_broadcast(config: &SsdpConfig) -> DiscoveryResult<Vec<Speaker>> {
    discover_ssdp(config, DiscoveryMethod::SsdpBroadcast).await
}

/// Sends M-SEARCH on one interface and collects replies until the window closes.
async fn search_interface(
    iface: InterfaceInfo,
    socket: UdpSocket,
    config: SsdpConfig,
    method: DiscoveryMethod,
) -> Vec<Speaker> {
    let msg = build_msearch_message(config.mx_value);
    let targets: Vec<String> = match method {
        DiscoveryMethod::SsdpBroadcast => vec![
            format!("{}:1900", iface.broadcast),
            LIMITED_BROADCAST_ADDR.to_string(),
        ],
        _ => vec![MULTICAST_ADDR.to_string()],
    };

    let send = async {
        for i in 0..config.send_count {
            if i > 0 {
                tokio::time::sleep(config.retry_delay).await;
            }
            for target in &targets {
                if let Err(e) = socket.send_to(msg.as_bytes(), target).await {
                    log::warn!(
                        "[SSDP] Failed to send M-SEARCH on {} to {}: {}",
                        iface.name,
                        target,
                        e
                    );
                }
            }
        }
    };

    let recv = async {
        let mut found = Vec::new();
        let mut buf = [0u8; 2048];
        let start = std::time::Instant::now();

        while start.elapsed() < config.discovery_timeout {
            let remaining = config.discovery_timeout.saturating_sub(start.elapsed());
            match timeout(remaining, socket.recv_from(&mut buf)).await {
                Ok(Ok((amt, src))) => {
                    let response = String::from_utf8_lossy(&buf[..amt]);
                    if let Some(speaker) =
                        parse_ssdp_response(&response, &src.ip().to_string(), method)
                    {
                        log::debug!(
                            "[SSDP] Found {} at {} via {} ({})",
                            speaker.uuid,
                            speaker.ip,
                            iface.name,
                            method
                        );
                        found.push(speaker);
                    }
                }
                Ok(Err(e)) => {
                    log::warn!("[SSDP] Socket recv error on {}: {}", iface.name, e);
                }
                Err(_) => break,
            }
        }
        found
    };

    let ((), found) = tokio::join!(send, recv);
    found
}

async fn discover_ssdp(config: &SsdpConfig, method: DiscoveryMethod) -> DiscoveryResult<Vec<Speaker>> {
    let interfaces = get_interfaces();
    if interfaces.is_empty() {
        return Err(DiscoveryError::NoInterfaces);
    }

    let use_broadcast = method == DiscoveryMethod::SsdpBroadcast;
    let mut searches = Vec::new();
    for iface in interfaces {
        match create_socket(iface.ip, use_broadcast) {
            Ok(socket) => searches.push(search_interface(iface, socket, config.clone(), method)),
            Err(e) => log::warn!(
                "[SSDP] Failed to create socket for {} ({}): {}",
                iface.name,
                iface.ip,
                e
            ),
        }
    }

    if searches.is_empty() {
        return Err(DiscoveryError::NoInterfaces);
    }

    log::debug!("[SSDP] {} search on {} interface(s)", method, searches.len());

    let mut discovered: Vec<Speaker> = futures::future::join_all(searches)
        .await
        .into_iter()
        .flatten()
        .collect();

    let mut seen = HashSet::new();
    discovered.retain(|s| seen.insert(s.uuid.clone()));
    discovered.sort_by(|a, b| a.uuid.cmp(&b.uuid));

    log::debug!(
        "[SSDP] {} discovery complete: {} unique speaker(s)",
        method,
        discovered.len()
    );

    Ok(discovered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn msearch_targets_zone_players() {
        let msg = build_msearch_message(1);
        assert!(msg.starts_with("M-SEARCH * HTTP/1.1\r\n"));
        assert!(msg.contains("HOST: 239.255.255.250:1900"));
        assert!(msg.contains("MX: 1"));
        assert!(msg.contains("ST: urn:schemas-upnp-org:device:ZonePlayer:1"));
        assert!(msg.ends_with("\r\n\r\n"));
    }

    #[test]
    fn parses_sonos_response() {
        let response = "HTTP/1.1 200 OK\r\n\
CACHE-CONTROL: max-age=1800\r\n\
LOCATION: http://192.168.1.10:1400/xml/device_description.xml\r\n\
SERVER: Linux UPnP/1.0 Sonos/63.2-88230\r\n\
USN: uuid:RINCON_ABC12345678901400::urn:schemas-upnp-org:device:ZonePlayer:1\r\n\r\n";
        let speaker =
            parse_ssdp_response(response, "192.168.1.10", DiscoveryMethod::SsdpMulticast).unwrap();
        assert_eq!(speaker.ip, "192.168.1.10");
        assert_eq!(speaker.uuid, "RINCON_ABC12345678901400");
        assert_eq!(
            speaker.location.as_deref(),
            Some("http://192.168.1.10:1400/xml/device_description.xml")
        );
    }

    #[test]
    fn parses_lowercase_headers() {
        let response = "HTTP/1.1 200 OK\r\n\
location: http://192.168.1.10:1400/xml/device_description.xml\r\n\
usn: UUID:RINCON_ABC12345678901400::urn:schemas-upnp-org:device:ZonePlayer:1\r\n\r\n";
        let speaker =
            parse_ssdp_response(response, "192.168.1.10", DiscoveryMethod::SsdpBroadcast).unwrap();
        assert_eq!(speaker.uuid, "RINCON_ABC12345678901400");
        assert!(speaker.location.is_some());
    }

    #[test]
    fn ignores_non_sonos_devices() {
        let response = "HTTP/1.1 200 OK\r\n\
LOCATION: http://192.168.1.20:80/description.xml\r\n\
USN: uuid:some-other-device\r\n\r\n";
        assert!(
            parse_ssdp_response(response, "192.168.1.20", DiscoveryMethod::SsdpMulticast).is_none()
        );
    }

    #[test]
    fn header_lookup_keeps_colons_in_value() {
        let response = "LOCATION: http://10.0.0.2:1400/x.xml\r\n";
        assert_eq!(
            header_value(response, "Location"),
            Some("http://10.0.0.2:1400/x.xml")
        );
    }
}
