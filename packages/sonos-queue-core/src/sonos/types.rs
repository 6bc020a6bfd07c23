//! Domain types for Sonos topology, content and transport status.

use serde::Serialize;
use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Content
// ─────────────────────────────────────────────────────────────────────────────

/// One entry of a queue or saved playlist, as described by DIDL-Lite.
///
/// `uri` is the track's content URI and serves as its identity when looking
/// for duplicates; entries without one fall back to their object id. The
/// remaining fields are carried through for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// ContentDirectory object id (e.g. `Q:0/12`, `S://...`).
    pub item_id: String,
    /// Parent container id.
    pub parent_id: String,
    /// `dc:title`.
    pub title: String,
    /// `dc:creator` (artist).
    pub creator: String,
    /// `upnp:album`.
    pub album: String,
    /// Content URI from the first `<res>` element (empty if none).
    pub uri: String,
    /// `upnp:class` (e.g. `object.item.audioItem.musicTrack`).
    pub class: String,
}

impl Track {
    /// Returns the identity used for duplicate detection.
    #[must_use]
    pub fn identity(&self) -> &str {
        if self.uri.is_empty() {
            &self.item_id
        } else {
            &self.uri
        }
    }
}

/// A saved ("Sonos") playlist container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistRef {
    /// ContentDirectory object id, e.g. `SQ:3`.
    pub item_id: String,
    /// User-visible playlist name.
    pub title: String,
}

// ─────────────────────────────────────────────────────────────────────────────
// Transport Status
// ─────────────────────────────────────────────────────────────────────────────

/// Playback transport state reported by `GetTransportInfo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TransportState {
    Playing,
    Paused,
    Stopped,
    Transitioning,
}

impl TransportState {
    /// Short lowercase label used in status listings.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Playing => "playing",
            Self::Paused => "paused",
            Self::Stopped => "stopped",
            Self::Transitioning => "transitioning",
        }
    }
}

impl std::fmt::Display for TransportState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when parsing an unknown transport state string.
#[derive(Debug, Clone, Error)]
#[error("unknown transport state")]
pub struct ParseTransportStateError;

impl std::str::FromStr for TransportState {
    type Err = ParseTransportStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLAYING" => Ok(Self::Playing),
            "PAUSED_PLAYBACK" | "PAUSED" => Ok(Self::Paused),
            "STOPPED" => Ok(Self::Stopped),
            "TRANSITIONING" => Ok(Self::Transitioning),
            _ => Err(ParseTransportStateError),
        }
    }
}

/// Current track position reported by `GetPositionInfo`.
#[derive(Debug, Clone, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PositionInfo {
    /// 1-based track number within the queue (0 when nothing is loaded).
    pub track: u32,
    /// Track duration in "H:MM:SS".
    pub track_duration: String,
    /// URI of the current track.
    pub track_uri: String,
    /// Elapsed time in "H:MM:SS".
    pub rel_time: String,
    /// Parsed `TrackMetaData`, when the speaker supplies any.
    pub track_meta: Option<Track>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Zone Groups
// ─────────────────────────────────────────────────────────────────────────────

/// A speaker within a Sonos zone group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ZoneGroupMember {
    /// Unique identifier in RINCON_xxxxx format.
    pub uuid: String,
    /// Local IP address of the speaker.
    pub ip: String,
    /// User-configured room name.
    pub zone_name: String,
}

/// A Sonos zone group: one coordinator plus the speakers following it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ZoneGroup {
    /// Zone group identifier.
    pub id: String,
    /// Human-readable name (coordinator's zone name first).
    pub name: String,
    /// UUID of the group coordinator.
    pub coordinator_uuid: String,
    /// IP address of the group coordinator.
    pub coordinator_ip: String,
    /// All speakers in this group (including the coordinator).
    ///
    /// Zone Bridges (BOOST devices) are filtered out as they cannot play audio.
    pub members: Vec<ZoneGroupMember>,
}

impl ZoneGroup {
    /// Short label in the style of the Sonos app: first room name
    /// (alphabetically) plus a count of the others, e.g. `"Kitchen + 2"`.
    #[must_use]
    pub fn short_label(&self) -> String {
        let mut names: Vec<&str> = self.members.iter().map(|m| m.zone_name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        match names.split_first() {
            Some((first, [])) => (*first).to_string(),
            Some((first, rest)) => format!("{} + {}", first, rest.len()),
            None => self.name.clone(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Devices
// ─────────────────────────────────────────────────────────────────────────────

/// Role of a device within its group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum DeviceRole {
    /// Owns the group's shared queue; target of queue/playlist operations.
    Coordinator,
    /// Follows a coordinator.
    Member,
}

impl std::fmt::Display for DeviceRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Coordinator => write!(f, "coordinator"),
            Self::Member => write!(f, "member"),
        }
    }
}

/// A discovered speaker resolved against the zone group topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub uuid: String,
    pub ip: String,
    pub zone_name: String,
    /// Id of the group the device belongs to.
    pub group_id: String,
    /// Display name of that group.
    pub group_name: String,
    /// Short group label (`"Kitchen + 2"`).
    pub group_label: String,
    pub role: DeviceRole,
    /// Number of tracks in the queue; only known for probed coordinators.
    pub queue_depth: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_the_uri() {
        let track = Track {
            item_id: "Q:0/1".into(),
            uri: "x-file-cifs://nas/a.flac".into(),
            ..Default::default()
        };
        assert_eq!(track.identity(), "x-file-cifs://nas/a.flac");
    }

    #[test]
    fn identity_without_uri_falls_back_to_item_id() {
        let first = Track {
            item_id: "SQ:7/1".into(),
            ..Default::default()
        };
        let second = Track {
            item_id: "SQ:7/2".into(),
            ..Default::default()
        };
        assert_eq!(first.identity(), "SQ:7/1");
        assert_ne!(first.identity(), second.identity());
    }

    fn member(name: &str) -> ZoneGroupMember {
        ZoneGroupMember {
            uuid: format!("RINCON_{}", name.to_uppercase()),
            ip: "192.168.1.10".into(),
            zone_name: name.into(),
        }
    }

    fn group(names: &[&str]) -> ZoneGroup {
        ZoneGroup {
            id: "G1".into(),
            name: names.join(", "),
            coordinator_uuid: "RINCON_X".into(),
            coordinator_ip: "192.168.1.10".into(),
            members: names.iter().map(|n| member(n)).collect(),
        }
    }

    #[test]
    fn short_label_single_room() {
        assert_eq!(group(&["Kitchen"]).short_label(), "Kitchen");
    }

    #[test]
    fn short_label_sorts_and_counts_others() {
        assert_eq!(
            group(&["Office", "Kitchen", "Bedroom"]).short_label(),
            "Bedroom + 2"
        );
    }

    #[test]
    fn short_label_collapses_stereo_pair() {
        assert_eq!(group(&["Living Room", "Living Room"]).short_label(), "Living Room");
    }

    #[test]
    fn transport_state_parses_sonos_strings() {
        assert_eq!("PLAYING".parse::<TransportState>().ok(), Some(TransportState::Playing));
        assert_eq!(
            "PAUSED_PLAYBACK".parse::<TransportState>().ok(),
            Some(TransportState::Paused)
        );
        assert_eq!("STOPPED".parse::<TransportState>().ok(), Some(TransportState::Stopped));
        assert!("BOGUS".parse::<TransportState>().is_err());
    }
}
