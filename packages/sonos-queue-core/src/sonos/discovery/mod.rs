//! Sonos speaker discovery.
//!
//! Speakers are found by, in order of preference:
//! 1. Static addresses from configuration (no network probing)
//! 2. SSDP multicast on every usable interface
//! 3. SSDP broadcast, when multicast finds nothing and the fallback is enabled
//!
//! One call is one discovery attempt. Retrying absent results is the job of
//! [`crate::services::CoordinatorLocator`].

pub mod ssdp;
pub mod types;

use std::net::Ipv4Addr;
use std::time::Duration;

pub use ssdp::SsdpConfig;
pub use types::{DiscoveryError, DiscoveryMethod, DiscoveryResult, Speaker};

use crate::protocol_constants::DEFAULT_DISCOVERY_TIMEOUT_MS;

/// Configuration for one discovery attempt.
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    /// Known speaker addresses. When non-empty, SSDP is skipped entirely.
    pub static_speakers: Vec<String>,
    /// Listening window for each SSDP method.
    pub timeout: Duration,
    /// Try broadcast when multicast returns no speakers.
    pub broadcast_fallback: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            static_speakers: Vec::new(),
            timeout: Duration::from_millis(DEFAULT_DISCOVERY_TIMEOUT_MS),
            broadcast_fallback: true,
        }
    }
}

impl DiscoveryConfig {
    fn ssdp(&self) -> SsdpConfig {
        SsdpConfig {
            discovery_timeout: self.timeout,
            ..SsdpConfig::default()
        }
    }
}

/// Builds speaker records from configured addresses.
///
/// # Errors
/// Returns [`DiscoveryError::InvalidAddress`] for an entry that is not an
/// IPv4 address.
pub fn static_speakers(addresses: &[String]) -> DiscoveryResult<Vec<Speaker>> {
    addresses
        .iter()
        .map(|raw| {
            let ip = raw.trim();
            ip.parse::<Ipv4Addr>()
                .map_err(|_| DiscoveryError::InvalidAddress(raw.clone()))?;
            Ok(Speaker {
                ip: ip.to_string(),
                uuid: String::new(),
                location: None,
                method: DiscoveryMethod::Static,
            })
        })
        .collect()
}

/// Performs a single discovery attempt.
///
/// An empty result is not an error: the caller decides whether to retry.
pub async fn discover_speakers(config: &DiscoveryConfig) -> DiscoveryResult<Vec<Speaker>> {
    if !config.static_speakers.is_empty() {
        let speakers = static_speakers(&config.static_speakers)?;
        log::debug!("[Discovery] Using {} static speaker(s)", speakers.len());
        return Ok(speakers);
    }

    let ssdp_config = config.ssdp();
    let found = ssdp::discover_multicast(&ssdp_config).await?;
    if !found.is_empty() || !config.broadcast_fallback {
        return Ok(found);
    }

    log::debug!("[Discovery] Multicast found nothing, trying broadcast");
    ssdp::discover_broadcast(&ssdp_config).await
}
