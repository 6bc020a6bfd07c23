//! Read-only AVTransport status queries.

use reqwest::Client;

use crate::sonos::didl::parse_didl_lite;
use crate::sonos::services::SonosService;
use crate::sonos::soap::{SoapError, SoapRequestBuilder, SoapResult};
use crate::sonos::types::{PositionInfo, TransportState};
use crate::sonos::utils::{extract_xml_text, extract_xml_u32};

/// Parses a `GetTransportInfoResponse` body.
pub fn parse_transport_info(response: &str) -> SoapResult<TransportState> {
    let raw = extract_xml_text(response, "CurrentTransportState")
        .ok_or_else(|| SoapError::Parse("missing CurrentTransportState".into()))?;
    raw.trim()
        .parse()
        .map_err(|_| SoapError::Parse(format!("unknown transport state: {}", raw)))
}

/// Parses a `GetPositionInfoResponse` body.
///
/// `TrackMetaData` is often `NOT_IMPLEMENTED` or empty for radio and line-in
/// sources; anything that does not yield an item leaves `track_meta` unset.
pub fn parse_position_info(response: &str) -> PositionInfo {
    let track_meta = extract_xml_text(response, "TrackMetaData")
        .filter(|meta| meta.trim_start().starts_with('<'))
        .and_then(|meta| match parse_didl_lite(&meta) {
            Ok(didl) => didl.items.into_iter().next(),
            Err(e) => {
                log::debug!("[Sonos] Ignoring unparsable TrackMetaData: {}", e);
                None
            }
        });

    PositionInfo {
        track: extract_xml_u32(response, "Track").unwrap_or(0),
        track_duration: extract_xml_text(response, "TrackDuration").unwrap_or_default(),
        track_uri: extract_xml_text(response, "TrackURI").unwrap_or_default(),
        rel_time: extract_xml_text(response, "RelTime").unwrap_or_else(|| "0:00:00".to_string()),
        track_meta,
    }
}

/// Gets the playback state of a coordinator.
///
/// # Arguments
/// * `client` - The HTTP client to use for the request
/// * `ip` - IP address of the group coordinator
pub async fn get_transport_state(client: &Client, ip: &str) -> SoapResult<TransportState> {
    let response = SoapRequestBuilder::new(client, ip)
        .service(SonosService::AVTransport)
        .action("GetTransportInfo")
        .instance_id()
        .send()
        .await?;

    parse_transport_info(&response)
}

/// Gets the current track and position of a coordinator.
///
/// # Arguments
/// * `client` - The HTTP client to use for the request
/// * `ip` - IP address of the group coordinator
pub async fn get_position_info(client: &Client, ip: &str) -> SoapResult<PositionInfo> {
    let response = SoapRequestBuilder::new(client, ip)
        .service(SonosService::AVTransport)
        .action("GetPositionInfo")
        .instance_id()
        .send()
        .await?;

    Ok(parse_position_info(&response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sonos::test_fixtures::{POSITION_INFO, TRANSPORT_INFO_PAUSED};

    #[test]
    fn parses_paused_state() {
        assert_eq!(
            parse_transport_info(TRANSPORT_INFO_PAUSED).unwrap(),
            TransportState::Paused
        );
    }

    #[test]
    fn unknown_state_is_a_parse_error() {
        let response = "<CurrentTransportState>REWINDING</CurrentTransportState>";
        assert!(matches!(
            parse_transport_info(response),
            Err(SoapError::Parse(_))
        ));
    }

    #[test]
    fn parses_position_with_metadata() {
        let info = parse_position_info(POSITION_INFO);

        assert_eq!(info.track, 3);
        assert_eq!(info.track_duration, "0:05:37");
        assert_eq!(info.rel_time, "0:01:12");
        assert_eq!(info.track_uri, "x-file-cifs://nas/music/kind_of_blue/03.flac");
        let meta = info.track_meta.unwrap();
        assert_eq!(meta.title, "Blue in Green");
        assert_eq!(meta.creator, "Miles Davis");
        assert_eq!(meta.album, "Kind of Blue");
    }

    #[test]
    fn not_implemented_metadata_is_ignored() {
        let response = "<Track>1</Track><TrackMetaData>NOT_IMPLEMENTED</TrackMetaData>\
                        <TrackURI>x-rincon-mp3radio://example</TrackURI>";
        let info = parse_position_info(response);

        assert_eq!(info.track, 1);
        assert!(info.track_meta.is_none());
        assert_eq!(info.rel_time, "0:00:00");
    }
}
