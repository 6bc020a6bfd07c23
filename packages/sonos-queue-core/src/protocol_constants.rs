//! Fixed protocol constants and retrieval defaults.
//!
//! The UPnP/Sonos values are defined by the devices themselves and changing
//! them would break protocol compliance. The retrieval defaults are tuned for
//! the embedded hardware on the other end of the wire.

// ─────────────────────────────────────────────────────────────────────────────
// HTTP/SOAP
// ─────────────────────────────────────────────────────────────────────────────

/// Sonos speaker control port.
pub const SONOS_PORT: u16 = 1400;

/// Timeout for SOAP HTTP requests (seconds).
///
/// 10 seconds is reasonable for LAN operations.
pub const SOAP_TIMEOUT_SECS: u64 = 10;

// ─────────────────────────────────────────────────────────────────────────────
// ContentDirectory Object IDs
// ─────────────────────────────────────────────────────────────────────────────

/// Object ID of a coordinator's playback queue.
pub const QUEUE_OBJECT_ID: &str = "Q:0";

/// Object ID of the saved ("Sonos") playlist container.
pub const SAVED_PLAYLISTS_OBJECT_ID: &str = "SQ:";

// ─────────────────────────────────────────────────────────────────────────────
// Paged Retrieval
// ─────────────────────────────────────────────────────────────────────────────

/// Page size used when reading a coordinator's queue.
pub const DEFAULT_QUEUE_PAGE_SIZE: u32 = 400;

/// Page size used when reading a saved playlist.
pub const DEFAULT_PLAYLIST_PAGE_SIZE: u32 = 300;

/// Extra requests allowed beyond the latched total before a collection
/// is declared stalled.
pub const DEFAULT_STALL_SLACK: u32 = 3;

// ─────────────────────────────────────────────────────────────────────────────
// Coordinator Lookup
// ─────────────────────────────────────────────────────────────────────────────

/// Discovery attempts before giving up on finding any device.
pub const DEFAULT_DISCOVERY_ATTEMPTS: u32 = 5;

/// Fixed wait between discovery attempts (milliseconds).
pub const DEFAULT_DISCOVERY_BACKOFF_MS: u64 = 1000;

/// How long one SSDP discovery round listens for replies (milliseconds).
pub const DEFAULT_DISCOVERY_TIMEOUT_MS: u64 = 3000;
