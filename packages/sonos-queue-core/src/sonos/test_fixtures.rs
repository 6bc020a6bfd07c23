//! Shared test fixtures for SOAP and DIDL-Lite payloads.
//!
//! These constants are used by multiple test modules to avoid duplication.

/// Three queue entries; the third repeats the first track's URI.
pub const DIDL_QUEUE_PAGE: &str = r#"<DIDL-Lite xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:upnp="urn:schemas-upnp-org:metadata-1-0/upnp/" xmlns:r="urn:schemas-rinconnetworks-com:metadata-1-0/" xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/">
  <item id="Q:0/1" parentID="Q:0" restricted="true">
    <res protocolInfo="x-file-cifs:*:audio/flac:*" duration="0:05:37">x-file-cifs://nas/music/kind_of_blue/03.flac</res>
    <upnp:albumArtURI>/getaa?u=x-file-cifs%3a%2f%2fnas%2fmusic%2fkind_of_blue%2f03.flac</upnp:albumArtURI>
    <dc:title>Blue in Green</dc:title>
    <upnp:class>object.item.audioItem.musicTrack</upnp:class>
    <dc:creator>Miles Davis</dc:creator>
    <upnp:album>Kind of Blue</upnp:album>
  </item>
  <item id="Q:0/2" parentID="Q:0" restricted="true">
    <res protocolInfo="x-file-cifs:*:audio/mpeg:*">x-file-cifs://nas/music/cartoons/01.mp3</res>
    <dc:title>Tom &amp; Jerry</dc:title>
    <upnp:class>object.item.audioItem.musicTrack</upnp:class>
    <dc:creator>Scott Bradley</dc:creator>
    <upnp:album>Cartoon Classics</upnp:album>
  </item>
  <item id="Q:0/3" parentID="Q:0" restricted="true">
    <res protocolInfo="x-file-cifs:*:audio/flac:*" duration="0:05:37">x-file-cifs://nas/music/kind_of_blue/03.flac</res>
    <dc:title>Blue in Green</dc:title>
    <upnp:class>object.item.audioItem.musicTrack</upnp:class>
    <dc:creator>Miles Davis</dc:creator>
    <upnp:album>Kind of Blue</upnp:album>
  </item>
</DIDL-Lite>"#;

/// Saved playlist index (`SQ:`) with two playlists.
pub const DIDL_PLAYLIST_INDEX: &str = r#"<DIDL-Lite xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:upnp="urn:schemas-upnp-org:metadata-1-0/upnp/" xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/"><container id="SQ:3" parentID="SQ:" restricted="true"><dc:title>Dinner</dc:title><upnp:class>object.container.playlistContainer</upnp:class></container><container id="SQ:7" parentID="SQ:" restricted="true"><dc:title>Road Trip</dc:title><upnp:class>object.container.playlistContainer</upnp:class></container></DIDL-Lite>"#;

/// Complete `BrowseResponse` envelope: one escaped item, 1 returned of 812.
pub const BROWSE_RESPONSE: &str = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/"><s:Body><u:BrowseResponse xmlns:u="urn:schemas-upnp-org:service:ContentDirectory:1"><Result>&lt;DIDL-Lite xmlns:dc=&quot;http://purl.org/dc/elements/1.1/&quot; xmlns:upnp=&quot;urn:schemas-upnp-org:metadata-1-0/upnp/&quot; xmlns=&quot;urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/&quot;&gt;&lt;item id=&quot;Q:0/401&quot; parentID=&quot;Q:0&quot; restricted=&quot;true&quot;&gt;&lt;res&gt;x-sonos-spotify:spotify%3atrack%3a4u7EnebtmKWzUH433cf5Qv?sid=9&amp;amp;flags=8224&lt;/res&gt;&lt;dc:title&gt;Bohemian Rhapsody&lt;/dc:title&gt;&lt;dc:creator&gt;Queen&lt;/dc:creator&gt;&lt;upnp:album&gt;A Night at the Opera&lt;/upnp:album&gt;&lt;/item&gt;&lt;/DIDL-Lite&gt;</Result><NumberReturned>1</NumberReturned><TotalMatches>812</TotalMatches><UpdateID>42</UpdateID></u:BrowseResponse></s:Body></s:Envelope>"#;

/// `BrowseResponse` for an empty queue.
pub const BROWSE_RESPONSE_EMPTY: &str = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body><u:BrowseResponse xmlns:u="urn:schemas-upnp-org:service:ContentDirectory:1"><Result>&lt;DIDL-Lite xmlns=&quot;urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/&quot;&gt;&lt;/DIDL-Lite&gt;</Result><NumberReturned>0</NumberReturned><TotalMatches>0</TotalMatches><UpdateID>1</UpdateID></u:BrowseResponse></s:Body></s:Envelope>"#;

/// `GetTransportInfoResponse` while paused.
pub const TRANSPORT_INFO_PAUSED: &str = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body><u:GetTransportInfoResponse xmlns:u="urn:schemas-upnp-org:service:AVTransport:1"><CurrentTransportState>PAUSED_PLAYBACK</CurrentTransportState><CurrentTransportStatus>OK</CurrentTransportStatus><CurrentSpeed>1</CurrentSpeed></u:GetTransportInfoResponse></s:Body></s:Envelope>"#;

/// `GetPositionInfoResponse` with escaped track metadata.
pub const POSITION_INFO: &str = r#"<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/"><s:Body><u:GetPositionInfoResponse xmlns:u="urn:schemas-upnp-org:service:AVTransport:1"><Track>3</Track><TrackDuration>0:05:37</TrackDuration><TrackMetaData>&lt;DIDL-Lite xmlns:dc=&quot;http://purl.org/dc/elements/1.1/&quot; xmlns:upnp=&quot;urn:schemas-upnp-org:metadata-1-0/upnp/&quot; xmlns=&quot;urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/&quot;&gt;&lt;item id=&quot;-1&quot; parentID=&quot;-1&quot; restricted=&quot;true&quot;&gt;&lt;res&gt;x-file-cifs://nas/music/kind_of_blue/03.flac&lt;/res&gt;&lt;dc:title&gt;Blue in Green&lt;/dc:title&gt;&lt;dc:creator&gt;Miles Davis&lt;/dc:creator&gt;&lt;upnp:album&gt;Kind of Blue&lt;/upnp:album&gt;&lt;/item&gt;&lt;/DIDL-Lite&gt;</TrackMetaData><TrackURI>x-file-cifs://nas/music/kind_of_blue/03.flac</TrackURI><RelTime>0:01:12</RelTime><AbsTime>NOT_IMPLEMENTED</AbsTime><RelCount>2147483647</RelCount><AbsCount>2147483647</AbsCount></u:GetPositionInfoResponse></s:Body></s:Envelope>"#;
