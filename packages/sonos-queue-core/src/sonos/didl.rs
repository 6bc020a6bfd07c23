//! DIDL-Lite parsing for ContentDirectory results.
//!
//! Sonos returns queue entries, playlist entries and the saved-playlist
//! index as DIDL-Lite documents embedded (escaped) in the `Result` field of
//! a `BrowseResponse`. This module turns the already-unescaped document into
//! [`Track`] and [`PlaylistRef`] values.

use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::sonos::soap::{SoapError, SoapResult};
use crate::sonos::types::{PlaylistRef, Track};
use crate::sonos::utils::{decode_entities, get_xml_attr};

/// Parsed content of one DIDL-Lite document, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DidlLite {
    pub items: Vec<Track>,
    pub containers: Vec<PlaylistRef>,
}

/// Which field of the element being built a text node belongs to.
#[derive(Clone, Copy)]
enum Field {
    Title,
    Creator,
    Artist,
    Album,
    Res,
    Class,
}

fn field_for(local_name: &[u8]) -> Option<Field> {
    match local_name {
        b"title" => Some(Field::Title),
        b"creator" => Some(Field::Creator),
        b"artist" => Some(Field::Artist),
        b"album" => Some(Field::Album),
        b"res" => Some(Field::Res),
        b"class" => Some(Field::Class),
        _ => None,
    }
}

/// Parses a DIDL-Lite document into items and containers.
///
/// # Field Mapping
/// - `dc:title`, `upnp:album`, `upnp:class` map directly
/// - `dc:creator` is the artist; `upnp:artist` is used only when no creator is given
/// - the first `<res>` text becomes the track URI (the identity for duplicate detection)
///
/// An empty document yields an empty result.
///
/// # Errors
/// Returns `SoapError::Parse` on malformed XML, so a page is never silently
/// truncated.
pub fn parse_didl_lite(xml: &str) -> SoapResult<DidlLite> {
    let mut didl = DidlLite::default();
    if xml.trim().is_empty() {
        return Ok(didl);
    }

    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut current_item: Option<Track> = None;
    let mut current_container: Option<PlaylistRef> = None;
    let mut artist_fallback = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"item" => {
                    current_item = Some(Track {
                        item_id: get_xml_attr(e, b"id").unwrap_or_default(),
                        parent_id: get_xml_attr(e, b"parentID").unwrap_or_default(),
                        ..Default::default()
                    });
                    artist_fallback.clear();
                }
                b"container" => {
                    current_container = Some(PlaylistRef {
                        item_id: get_xml_attr(e, b"id").unwrap_or_default(),
                        title: String::new(),
                    });
                }
                name => {
                    let in_entry = current_item.is_some() || current_container.is_some();
                    if let Some(field) = field_for(name).filter(|_| in_entry) {
                        let text = reader
                            .read_text(e.name())
                            .map_err(|err| SoapError::Parse(format!("DIDL-Lite: {}", err)))?;
                        let text = decode_entities(&text);

                        if let Some(item) = current_item.as_mut() {
                            match field {
                                Field::Title => item.title = text,
                                Field::Creator => item.creator = text,
                                Field::Artist => artist_fallback = text,
                                Field::Album => item.album = text,
                                Field::Res if item.uri.is_empty() => {
                                    item.uri = text.trim().to_string()
                                }
                                Field::Res => {}
                                Field::Class => item.class = text,
                            }
                        } else if let Some(container) = current_container.as_mut() {
                            if let Field::Title = field {
                                container.title = text;
                            }
                        }
                    }
                }
            },
            Ok(Event::Empty(ref e)) if e.local_name().as_ref() == b"container" => {
                didl.containers.push(PlaylistRef {
                    item_id: get_xml_attr(e, b"id").unwrap_or_default(),
                    title: String::new(),
                });
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"item" => {
                    if let Some(mut item) = current_item.take() {
                        if item.creator.is_empty() {
                            item.creator = std::mem::take(&mut artist_fallback);
                        }
                        didl.items.push(item);
                    }
                }
                b"container" => {
                    if let Some(container) = current_container.take() {
                        didl.containers.push(container);
                    }
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(SoapError::Parse(format!("DIDL-Lite: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    Ok(didl)
}

/// Returns the `childCount` attribute of the first container in a DIDL-Lite
/// document (as returned by a `BrowseMetadata` request).
pub fn container_child_count(xml: &str) -> Option<u32> {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e))
                if e.local_name().as_ref() == b"container" =>
            {
                return get_xml_attr(e, b"childCount").and_then(|c| c.trim().parse().ok());
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
        buf.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sonos::test_fixtures::{DIDL_PLAYLIST_INDEX, DIDL_QUEUE_PAGE};

    #[test]
    fn parses_queue_items_in_order() {
        let didl = parse_didl_lite(DIDL_QUEUE_PAGE).unwrap();
        assert_eq!(didl.items.len(), 3);
        assert!(didl.containers.is_empty());

        let first = &didl.items[0];
        assert_eq!(first.item_id, "Q:0/1");
        assert_eq!(first.parent_id, "Q:0");
        assert_eq!(first.title, "Blue in Green");
        assert_eq!(first.creator, "Miles Davis");
        assert_eq!(first.album, "Kind of Blue");
        assert_eq!(first.uri, "x-file-cifs://nas/music/kind_of_blue/03.flac");
        assert_eq!(first.class, "object.item.audioItem.musicTrack");

        assert_eq!(didl.items[1].title, "Tom & Jerry");
        assert_eq!(didl.items[2].uri, didl.items[0].uri);
    }

    #[test]
    fn falls_back_to_upnp_artist() {
        let xml = r#"<DIDL-Lite xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:upnp="urn:schemas-upnp-org:metadata-1-0/upnp/" xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/"><item id="Q:0/1" parentID="Q:0"><dc:title>So What</dc:title><upnp:artist>Miles Davis</upnp:artist><res>x-file-cifs://a.flac</res></item></DIDL-Lite>"#;
        let didl = parse_didl_lite(xml).unwrap();
        assert_eq!(didl.items[0].creator, "Miles Davis");
    }

    #[test]
    fn item_without_res_keeps_empty_uri() {
        let xml = r#"<DIDL-Lite><item id="1" parentID="0"><dc:title>Ghost</dc:title></item></DIDL-Lite>"#;
        let didl = parse_didl_lite(xml).unwrap();
        assert_eq!(didl.items.len(), 1);
        assert_eq!(didl.items[0].uri, "");
    }

    #[test]
    fn parses_playlist_containers() {
        let didl = parse_didl_lite(DIDL_PLAYLIST_INDEX).unwrap();
        assert!(didl.items.is_empty());
        assert_eq!(
            didl.containers,
            vec![
                PlaylistRef {
                    item_id: "SQ:3".into(),
                    title: "Dinner".into()
                },
                PlaylistRef {
                    item_id: "SQ:7".into(),
                    title: "Road Trip".into()
                },
            ]
        );
    }

    #[test]
    fn empty_document_is_empty() {
        assert_eq!(parse_didl_lite("  ").unwrap(), DidlLite::default());
    }

    #[test]
    fn malformed_document_is_an_error() {
        let result = parse_didl_lite("<DIDL-Lite><item id=\"1\"><dc:title>x</dc:creator></item>");
        assert!(matches!(result, Err(SoapError::Parse(_))));
    }

    #[test]
    fn reads_child_count() {
        let xml = r#"<DIDL-Lite><container id="Q:0" parentID="Q:" childCount="57" restricted="true"><dc:title>Queue</dc:title></container></DIDL-Lite>"#;
        assert_eq!(container_child_count(xml), Some(57));
        assert_eq!(container_child_count("<DIDL-Lite/>"), None);
    }
}
