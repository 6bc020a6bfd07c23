//! Sonos-backed [`DeviceDiscovery`].
//!
//! Turns raw speakers into [`Device`] records by reading the zone group
//! topology, which is the only place coordinator roles are recorded.

use std::sync::Arc;

use async_trait::async_trait;

use super::coordinator_locator::DeviceDiscovery;
use crate::sonos::discovery::Speaker;
use crate::sonos::traits::SonosTopologyClient;
use crate::sonos::types::{Device, DeviceRole, ZoneGroup};

/// Discovery source producing coordinator-aware [`Device`] records.
pub struct SonosDeviceDiscovery {
    sonos: Arc<dyn SonosTopologyClient>,
    probe_queues: bool,
}

impl SonosDeviceDiscovery {
    /// Creates a new SonosDeviceDiscovery.
    ///
    /// # Arguments
    /// * `sonos` - Sonos client for discovery, topology and queue probing
    /// * `probe_queues` - Read each coordinator's queue length after discovery
    pub fn new(sonos: Arc<dyn SonosTopologyClient>, probe_queues: bool) -> Self {
        Self {
            sonos,
            probe_queues,
        }
    }

    /// Reads the topology from the first seed that answers.
    async fn read_topology(&self, seeds: &[Speaker]) -> Option<Vec<ZoneGroup>> {
        for seed in seeds {
            match self.sonos.get_zone_groups(&seed.ip).await {
                Ok(groups) if !groups.is_empty() => return Some(groups),
                Ok(_) => log::debug!("[Sonos] {} reported no zone groups", seed.ip),
                Err(e) if e.is_unreachable() => {
                    log::debug!("[Sonos] {} unreachable: {}", seed.ip, e)
                }
                Err(e) => log::warn!("[Sonos] Topology from {} failed: {}", seed.ip, e),
            }
        }
        None
    }

    async fn probe_queue(&self, device: &mut Device) {
        match self.sonos.get_queue_size(&device.ip).await {
            Ok(depth) => device.queue_depth = depth,
            Err(e) => log::warn!(
                "[Sonos] Queue probe of {} ({}) failed: {}",
                device.zone_name,
                device.ip,
                e
            ),
        }
    }
}

/// Flattens zone groups into devices, in group order then member order.
pub fn devices_from_groups(groups: &[ZoneGroup]) -> Vec<Device> {
    groups
        .iter()
        .flat_map(|group| {
            let label = group.short_label();
            group.members.iter().map(move |member| Device {
                uuid: member.uuid.clone(),
                ip: member.ip.clone(),
                zone_name: member.zone_name.clone(),
                group_id: group.id.clone(),
                group_name: group.name.clone(),
                group_label: label.clone(),
                role: if member.uuid == group.coordinator_uuid {
                    DeviceRole::Coordinator
                } else {
                    DeviceRole::Member
                },
                queue_depth: None,
            })
        })
        .collect()
}

#[async_trait]
impl DeviceDiscovery for SonosDeviceDiscovery {
    type Device = Device;

    async fn discover(&self) -> Option<Vec<Device>> {
        let seeds = match self.sonos.discover_speakers().await {
            Ok(seeds) if !seeds.is_empty() => seeds,
            Ok(_) => {
                log::warn!("[Sonos] Discovery found no speakers");
                return None;
            }
            Err(e) => {
                log::warn!("[Sonos] Discovery failed: {}", e);
                return None;
            }
        };

        let Some(groups) = self.read_topology(&seeds).await else {
            log::warn!(
                "[Sonos] None of {} discovered speaker(s) returned a topology",
                seeds.len()
            );
            return None;
        };

        let mut devices = devices_from_groups(&groups);
        if self.probe_queues {
            for device in devices
                .iter_mut()
                .filter(|d| d.role == DeviceRole::Coordinator)
            {
                self.probe_queue(device).await;
            }
        }

        log::debug!(
            "[Sonos] {} device(s) in {} group(s)",
            devices.len(),
            groups.len()
        );
        (!devices.is_empty()).then_some(devices)
    }
}
