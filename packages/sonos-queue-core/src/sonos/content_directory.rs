//! ContentDirectory browsing: queues, saved playlists and the playlist index.
//!
//! Every listing goes through `Browse` with `BrowseDirectChildren`, which
//! returns at most `RequestedCount` entries plus the size of the whole
//! container. The item sources at the bottom of this module adapt that to
//! [`ItemSource`] so [`crate::collection::PagedCollector`] can walk them.

use async_trait::async_trait;
use reqwest::Client;

use crate::collection::{ItemSource, Page};
use crate::protocol_constants::{QUEUE_OBJECT_ID, SAVED_PLAYLISTS_OBJECT_ID};
use crate::sonos::didl::{container_child_count, parse_didl_lite, DidlLite};
use crate::sonos::services::SonosService;
use crate::sonos::soap::{SoapError, SoapRequestBuilder, SoapResult};
use crate::sonos::traits::SonosContentDirectory;
use crate::sonos::types::{PlaylistRef, Track};
use crate::sonos::utils::{extract_xml_text, extract_xml_u32};

/// One `Browse` response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseResult {
    /// Parsed entries of this window.
    pub didl: DidlLite,
    /// Entries the speaker claims to have returned.
    pub number_returned: u32,
    /// Size of the whole container.
    pub total_matches: u32,
}

/// Parses a `BrowseResponse` SOAP body.
///
/// # Errors
/// Returns `SoapError::Parse` if `TotalMatches` or `NumberReturned` is
/// missing, or if the embedded DIDL-Lite is malformed.
pub fn parse_browse_response(response: &str) -> SoapResult<BrowseResult> {
    let total_matches = extract_xml_u32(response, "TotalMatches")
        .ok_or_else(|| SoapError::Parse("missing TotalMatches in BrowseResponse".into()))?;
    let number_returned = extract_xml_u32(response, "NumberReturned")
        .ok_or_else(|| SoapError::Parse("missing NumberReturned in BrowseResponse".into()))?;

    let didl = match extract_xml_text(response, "Result") {
        Some(result) => parse_didl_lite(&result)?,
        None => DidlLite::default(),
    };

    let parsed = didl.items.len() + didl.containers.len();
    if parsed != number_returned as usize {
        log::warn!(
            "[Sonos] Browse reported {} entries but {} were parsed",
            number_returned,
            parsed
        );
    }

    Ok(BrowseResult {
        didl,
        number_returned,
        total_matches,
    })
}

/// Lists up to `count` children of `object_id`, starting at `start`.
///
/// # Arguments
/// * `client` - The HTTP client to use for the request
/// * `ip` - IP address of the speaker holding the container
/// * `object_id` - Container id (`Q:0`, `SQ:`, `SQ:3`, ...)
/// * `start` - 0-based index of the first child to return
/// * `count` - Maximum number of children to return
pub async fn browse(
    client: &Client,
    ip: &str,
    object_id: &str,
    start: u32,
    count: u32,
) -> SoapResult<BrowseResult> {
    log::trace!(
        "[Sonos] Browse {} on {} (start={}, count={})",
        object_id,
        ip,
        start,
        count
    );

    let response = SoapRequestBuilder::new(client, ip)
        .service(SonosService::ContentDirectory)
        .action("Browse")
        .arg("ObjectID", object_id)
        .arg("BrowseFlag", "BrowseDirectChildren")
        .arg("Filter", "*")
        .arg("StartingIndex", start.to_string())
        .arg("RequestedCount", count.to_string())
        .arg("SortCriteria", "")
        .send()
        .await?;

    parse_browse_response(&response)
}

/// Reads the queue length without listing it.
///
/// Returns `None` when the speaker does not report a `childCount` for the
/// queue container.
pub async fn get_queue_size(client: &Client, ip: &str) -> SoapResult<Option<u32>> {
    let response = SoapRequestBuilder::new(client, ip)
        .service(SonosService::ContentDirectory)
        .action("Browse")
        .arg("ObjectID", QUEUE_OBJECT_ID)
        .arg("BrowseFlag", "BrowseMetadata")
        .arg("Filter", "*")
        .arg("StartingIndex", "0")
        .arg("RequestedCount", "0")
        .arg("SortCriteria", "")
        .send()
        .await?;

    Ok(extract_xml_text(&response, "Result").and_then(|didl| container_child_count(&didl)))
}

/// Returns the first saved playlist with exactly this title.
pub fn find_playlist<'p>(playlists: &'p [PlaylistRef], title: &str) -> Option<&'p PlaylistRef> {
    playlists.iter().find(|p| p.title == title)
}

// ─────────────────────────────────────────────────────────────────────────────
// Item Sources
// ─────────────────────────────────────────────────────────────────────────────

/// Rejects a window whose usable entries do not account for every entry the
/// speaker returned.
///
/// The collector continues from the number of entries it received, so a
/// skipped entry would shift every later window back onto entries already
/// read.
fn check_listing(
    result: &BrowseResult,
    object_id: &str,
    wanted: usize,
    foreign_kind: &str,
    foreign: usize,
) -> SoapResult<()> {
    if foreign > 0 {
        return Err(SoapError::Parse(format!(
            "{} listing contains {} unexpected {}",
            object_id, foreign, foreign_kind
        )));
    }
    if wanted != result.number_returned as usize {
        return Err(SoapError::Parse(format!(
            "{} listing returned {} entries but {} were parsed",
            object_id, result.number_returned, wanted
        )));
    }
    Ok(())
}

/// Tracks of one container: a coordinator's queue or a saved playlist.
pub struct TrackSource<'a> {
    client: &'a dyn SonosContentDirectory,
    ip: &'a str,
    object_id: String,
}

impl<'a> TrackSource<'a> {
    pub fn new(client: &'a dyn SonosContentDirectory, ip: &'a str, object_id: impl Into<String>) -> Self {
        Self {
            client,
            ip,
            object_id: object_id.into(),
        }
    }

    /// The play queue of the coordinator at `ip`.
    pub fn queue(client: &'a dyn SonosContentDirectory, ip: &'a str) -> Self {
        Self::new(client, ip, QUEUE_OBJECT_ID)
    }

    /// The saved playlist `playlist`, read through the speaker at `ip`.
    pub fn playlist(client: &'a dyn SonosContentDirectory, ip: &'a str, playlist: &PlaylistRef) -> Self {
        Self::new(client, ip, playlist.item_id.clone())
    }

    pub fn object_id(&self) -> &str {
        &self.object_id
    }
}

#[async_trait]
impl<'a> ItemSource for TrackSource<'a> {
    type Item = Track;

    async fn fetch(&self, start: u32, max_items: u32) -> SoapResult<Page<Track>> {
        let result = self
            .client
            .browse(self.ip, &self.object_id, start, max_items)
            .await?;
        check_listing(
            &result,
            &self.object_id,
            result.didl.items.len(),
            "containers",
            result.didl.containers.len(),
        )?;
        Ok(Page::new(result.didl.items, result.total_matches))
    }
}

/// The saved-playlist index (`SQ:`).
pub struct PlaylistIndexSource<'a> {
    client: &'a dyn SonosContentDirectory,
    ip: &'a str,
}

impl<'a> PlaylistIndexSource<'a> {
    pub fn new(client: &'a dyn SonosContentDirectory, ip: &'a str) -> Self {
        Self { client, ip }
    }
}

#[async_trait]
impl<'a> ItemSource for PlaylistIndexSource<'a> {
    type Item = PlaylistRef;

    async fn fetch(&self, start: u32, max_items: u32) -> SoapResult<Page<PlaylistRef>> {
        let result = self
            .client
            .browse(self.ip, SAVED_PLAYLISTS_OBJECT_ID, start, max_items)
            .await?;
        check_listing(
            &result,
            SAVED_PLAYLISTS_OBJECT_ID,
            result.didl.containers.len(),
            "items",
            result.didl.items.len(),
        )?;
        Ok(Page::new(result.didl.containers, result.total_matches))
    }
}
