//! Presentation of collections, analyses and device status.
//!
//! Text renderers return lines instead of printing so they can be tested;
//! `main` owns stdout.

use std::collections::HashMap;

use clap::ValueEnum;
use serde::Serialize;
use sonos_queue_core::{
    DedupResult, Device, Duplicate, PlaylistRef, PositionInfo, QueueError, Track, TransportState,
};

/// Output format selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
}

/// Renders a value as pretty-printed JSON.
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// A failed command, as printed with `--format json`.
///
/// Carries the `type`/`details` of the first [`QueueError`] in the chain
/// when there is one.
#[derive(Debug, Serialize)]
pub struct ErrorReport<'a> {
    #[serde(flatten)]
    pub error: Option<&'a QueueError>,
    pub code: &'static str,
    /// Full context chain, outermost first.
    pub message: String,
}

pub fn error_report(err: &anyhow::Error) -> ErrorReport<'_> {
    let error = err.chain().find_map(|e| e.downcast_ref::<QueueError>());
    ErrorReport {
        error,
        code: error.map_or("internal_error", QueueError::code),
        message: format!("{:#}", err),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Collections
// ─────────────────────────────────────────────────────────────────────────────

/// Structured result of inspecting one queue or playlist.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionReport<'a> {
    /// Queue owner or playlist title.
    pub name: &'a str,
    pub total_count: u32,
    pub unique: &'a [&'a Track],
    /// Omitted when only unique entries were requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duplicates: Option<&'a [Duplicate<&'a Track>]>,
}

/// `"%4d title - album / creator"`.
pub fn entry_line(position: usize, track: &Track) -> String {
    format!(
        "{:4} {} - {} / {}",
        position, track.title, track.album, track.creator
    )
}

/// Lists every entry with duplicates flagged, then a duplicate summary.
///
/// With `unique_only`, repeats are skipped and no summary is printed;
/// first occurrences keep their original positions.
pub fn collection_lines(
    kind: &str,
    items: &[Track],
    analysis: &DedupResult<&Track>,
    unique_only: bool,
) -> Vec<String> {
    let repeats: HashMap<usize, usize> = analysis
        .duplicates
        .iter()
        .map(|d| (d.position, d.first_seen))
        .collect();

    let mut lines = Vec::with_capacity(items.len() + 2);
    for (index, track) in items.iter().enumerate() {
        let position = index + 1;
        match repeats.get(&position) {
            Some(_) if unique_only => {}
            Some(first) => {
                lines.push(entry_line(position, track));
                lines.push(format!("  DUPLICATE: seen first at {}", first));
            }
            None => lines.push(entry_line(position, track)),
        }
    }

    if !unique_only && analysis.has_duplicates() {
        lines.push(String::new());
        lines.push(format!(
            "{} has {} duplicates",
            kind,
            analysis.duplicates.len()
        ));
        for d in &analysis.duplicates {
            lines.push(format!(
                "  {} seen first at {}",
                entry_line(d.position, d.item),
                d.first_seen
            ));
        }
    }

    lines
}

/// `"SQ:3 - 'Dinner'"`.
pub fn playlist_line(playlist: &PlaylistRef) -> String {
    format!("{} - '{}'", playlist.item_id, playlist.title)
}

// ─────────────────────────────────────────────────────────────────────────────
// Devices and Status
// ─────────────────────────────────────────────────────────────────────────────

pub fn device_line(device: &Device) -> String {
    let queue = match device.queue_depth {
        Some(depth) => depth.to_string(),
        None => "-".to_string(),
    };
    format!(
        "{:<20} {:<11} {:<24} {:>5}  {}",
        device.zone_name,
        device.role.to_string(),
        device.group_label,
        queue,
        device.ip
    )
}

/// Playback status of one coordinator.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NowPlaying {
    pub group_label: String,
    pub state: TransportState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionInfo>,
}

/// `"%15s  %7s  title - album / artist   position / duration"`.
///
/// The track part is left empty when stopped or when the speaker gives no
/// title (line-in, some radio streams).
pub fn now_playing_line(status: &NowPlaying) -> String {
    let track = status
        .position
        .as_ref()
        .filter(|_| status.state != TransportState::Stopped)
        .and_then(|p| {
            let meta = p.track_meta.as_ref().filter(|m| !m.title.is_empty())?;
            Some(format!(
                "{} - {} / {}   {} / {}",
                meta.title, meta.album, meta.creator, p.rel_time, p.track_duration
            ))
        })
        .unwrap_or_default();

    format!(
        "{:>15}  {:>7}  {}",
        status.group_label,
        status.state.label(),
        track
    )
    .trim_end()
    .to_string()
}
