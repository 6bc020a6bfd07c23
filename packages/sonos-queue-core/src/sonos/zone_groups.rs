//! Zone group topology parsing and retrieval.
//!
//! The topology is the only authoritative source of which speaker
//! coordinates which group, so device roles are derived from it.

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use reqwest::Client;

use crate::sonos::services::SonosService;
use crate::sonos::soap::{SoapRequestBuilder, SoapResult};
use crate::sonos::types::{ZoneGroup, ZoneGroupMember};
use crate::sonos::utils::{extract_ip_from_location, extract_xml_text, get_xml_attr};

/// Builds a group name: coordinator's room first, then the other distinct rooms.
fn group_name(coordinator_zone_name: Option<String>, members: &[ZoneGroupMember]) -> String {
    let mut names: Vec<&str> = Vec::new();
    if let Some(coord_name) = coordinator_zone_name.as_deref() {
        names.push(coord_name);
    }
    for m in members {
        let name = m.zone_name.as_str();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names.join(", ")
}

/// Parses ZoneGroupState XML into a vector of ZoneGroup structures.
///
/// Expects the raw ZoneGroupState XML (already unescaped).
///
/// # Filtering
/// - Zone Bridges (`IsZoneBridge="1"`) are skipped as they cannot play audio.
/// - Members without UUID, Location or ZoneName are skipped.
/// - Groups left without members or without a resolvable coordinator are dropped.
pub fn parse_zone_group_xml(xml: &str) -> Vec<ZoneGroup> {
    let mut groups = Vec::new();
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();

    let mut current_coordinator_uuid: Option<String> = None;
    let mut current_group_id = String::new();
    let mut current_members: Vec<ZoneGroupMember> = Vec::new();
    let mut coordinator_ip: Option<String> = None;
    let mut coordinator_zone_name: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"ZoneGroup" => {
                    current_group_id = get_xml_attr(e, b"ID").unwrap_or_default();
                    current_coordinator_uuid = get_xml_attr(e, b"Coordinator");
                    current_members.clear();
                    coordinator_ip = None;
                    coordinator_zone_name = None;
                }
                b"ZoneGroupMember" => {
                    if get_xml_attr(e, b"IsZoneBridge").as_deref() == Some("1") {
                        log::trace!("[Sonos] Skipping zone bridge in topology");
                    } else if let Some(member) = parse_member(e) {
                        if current_coordinator_uuid.as_ref() == Some(&member.uuid) {
                            coordinator_ip = Some(member.ip.clone());
                            coordinator_zone_name = Some(member.zone_name.clone());
                        }
                        current_members.push(member);
                    }
                }
                _ => {}
            },
            Ok(Event::End(ref e)) if e.name().as_ref() == b"ZoneGroup" => {
                if let (Some(coord_uuid), Some(coord_ip)) =
                    (current_coordinator_uuid.take(), coordinator_ip.take())
                {
                    if !current_members.is_empty() {
                        groups.push(ZoneGroup {
                            id: current_group_id.clone(),
                            name: group_name(coordinator_zone_name.take(), &current_members),
                            coordinator_uuid: coord_uuid,
                            coordinator_ip: coord_ip,
                            members: std::mem::take(&mut current_members),
                        });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!("[Sonos] XML parse error in zone groups: {}", e);
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    groups
}

fn parse_member(e: &quick_xml::events::BytesStart) -> Option<ZoneGroupMember> {
    let uuid = get_xml_attr(e, b"UUID")?;
    let location = get_xml_attr(e, b"Location")?;
    let ip = extract_ip_from_location(&location)?;
    let zone_name = get_xml_attr(e, b"ZoneName")?;
    Some(ZoneGroupMember {
        uuid,
        ip,
        zone_name,
    })
}

/// Fetches the current zone groups from a Sonos speaker and parses the topology.
///
/// # Arguments
/// * `client` - The HTTP client to use for the request
/// * `ip` - IP address of any Sonos speaker on the network
pub async fn get_zone_groups(client: &Client, ip: &str) -> SoapResult<Vec<ZoneGroup>> {
    let response = SoapRequestBuilder::new(client, ip)
        .service(SonosService::ZoneGroupTopology)
        .action("GetZoneGroupState")
        .send()
        .await?;

    let Some(decoded_xml) = extract_xml_text(&response, "ZoneGroupState") else {
        return Ok(vec![]);
    };

    Ok(parse_zone_group_xml(&decoded_xml))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member_xml(uuid: &str, ip: &str, zone_name: &str) -> String {
        format!(
            r#"<ZoneGroupMember UUID="{uuid}" Location="http://{ip}:1400/xml/device_description.xml" ZoneName="{zone_name}" Icon="x-rincon-roomicon:living" />"#
        )
    }

    fn group_xml(id: &str, coordinator_uuid: &str, members: &[String]) -> String {
        format!(
            r#"<ZoneGroup Coordinator="{coordinator_uuid}" ID="{id}">{}</ZoneGroup>"#,
            members.join("")
        )
    }

    fn zone_groups_xml(groups: &[String]) -> String {
        format!("<ZoneGroups>{}</ZoneGroups>", groups.join(""))
    }

    #[test]
    fn single_speaker_group() {
        let xml = zone_groups_xml(&[group_xml(
            "G1",
            "RINCON_KITCHEN",
            &[member_xml("RINCON_KITCHEN", "192.168.1.10", "Kitchen")],
        )]);

        let groups = parse_zone_group_xml(&xml);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].name, "Kitchen");
        assert_eq!(groups[0].coordinator_ip, "192.168.1.10");
    }

    #[test]
    fn coordinator_name_comes_first() {
        let xml = zone_groups_xml(&[group_xml(
            "G1",
            "RINCON_OFFICE",
            &[
                member_xml("RINCON_KITCHEN", "192.168.1.10", "Kitchen"),
                member_xml("RINCON_OFFICE", "192.168.1.20", "Office"),
            ],
        )]);

        let groups = parse_zone_group_xml(&xml);
        assert_eq!(groups[0].name, "Office, Kitchen");
        assert_eq!(groups[0].coordinator_uuid, "RINCON_OFFICE");
        assert_eq!(groups[0].members.len(), 2);
    }

    #[test]
    fn zone_bridges_are_skipped() {
        let bridge = r#"<ZoneGroupMember UUID="RINCON_BOOST" Location="http://192.168.1.2:1400/xml/device_description.xml" ZoneName="BOOST" IsZoneBridge="1" />"#.to_string();
        let xml = zone_groups_xml(&[
            group_xml("G0", "RINCON_BOOST", &[bridge]),
            group_xml(
                "G1",
                "RINCON_KITCHEN",
                &[member_xml("RINCON_KITCHEN", "192.168.1.10", "Kitchen")],
            ),
        ]);

        let groups = parse_zone_group_xml(&xml);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].id, "G1");
    }

    #[test]
    fn multiple_groups_keep_document_order() {
        let xml = zone_groups_xml(&[
            group_xml(
                "G2",
                "RINCON_OFFICE",
                &[member_xml("RINCON_OFFICE", "192.168.1.20", "Office")],
            ),
            group_xml(
                "G1",
                "RINCON_KITCHEN",
                &[member_xml("RINCON_KITCHEN", "192.168.1.10", "Kitchen")],
            ),
        ]);

        let ids: Vec<_> = parse_zone_group_xml(&xml)
            .into_iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(ids, vec!["G2", "G1"]);
    }
}
