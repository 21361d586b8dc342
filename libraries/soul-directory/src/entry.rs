//! Listing entries and their DIDL-Lite fragments.
//!
//! Entries live for one request: the root provider or a backend builds them,
//! the dispatcher serializes them in order and drops them.

use crate::error::Result;
use crate::object_id::ObjectId;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;

/// Opening of every `Result` document
pub const DIDL_HEADER: &str = concat!(
    r#"<?xml version="1.0" encoding="utf-8"?>"#,
    r#"<DIDL-Lite xmlns="urn:schemas-upnp-org:metadata-1-0/DIDL-Lite/""#,
    r#" xmlns:dc="http://purl.org/dc/elements/1.1/""#,
    r#" xmlns:upnp="urn:schemas-upnp-org:metadata-1-0/upnp/""#,
    r#" xmlns:dlna="urn:schemas-dlna-org:metadata-1-0/">"#,
);

/// Closing of every `Result` document
pub const DIDL_TRAILER: &str = "</DIDL-Lite>";

/// Default UPnP class for containers
pub const CONTAINER_CLASS: &str = "object.container";

/// Default UPnP class for items
pub const MUSIC_TRACK_CLASS: &str = "object.item.audioItem.musicTrack";

/// Semantic kind of a directory node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Container,
    Item,
}

/// Playable resource attached to an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub uri: String,
    pub protocol_info: String,
    /// `H:MM:SS` as DIDL-Lite expects it
    pub duration: Option<String>,
    pub size: Option<u64>,
}

impl Resource {
    pub fn new(uri: impl Into<String>, mime: &str) -> Self {
        Self {
            uri: uri.into(),
            protocol_info: format!("http-get:*:{mime}:*"),
            duration: None,
            size: None,
        }
    }

    /// Set duration from whole seconds
    pub fn with_duration_secs(mut self, secs: u64) -> Self {
        self.duration = Some(format!(
            "{}:{:02}:{:02}",
            secs / 3600,
            (secs % 3600) / 60,
            secs % 60
        ));
        self
    }
}

/// One node of the directory tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListingEntry {
    pub kind: EntryKind,
    pub id: ObjectId,
    pub parent_id: ObjectId,
    pub title: String,
    pub upnp_class: String,
    /// Item attribute bag, keyed by DIDL element name (`upnp:artist`, ...)
    pub properties: BTreeMap<String, String>,
    pub resource: Option<Resource>,
}

impl ListingEntry {
    /// Create a container entry
    pub fn container(id: ObjectId, parent_id: ObjectId, title: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::Container,
            id,
            parent_id,
            title: title.into(),
            upnp_class: CONTAINER_CLASS.to_string(),
            properties: BTreeMap::new(),
            resource: None,
        }
    }

    /// Create an item entry
    pub fn item(id: ObjectId, parent_id: ObjectId, title: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::Item,
            id,
            parent_id,
            title: title.into(),
            upnp_class: MUSIC_TRACK_CLASS.to_string(),
            properties: BTreeMap::new(),
            resource: None,
        }
    }

    pub fn with_class(mut self, upnp_class: impl Into<String>) -> Self {
        self.upnp_class = upnp_class.into();
        self
    }

    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(name.into(), value.into());
        self
    }

    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resource = Some(resource);
        self
    }

    pub fn is_container(&self) -> bool {
        self.kind == EntryKind::Container
    }

    /// Serialize to a single DIDL-Lite element
    pub fn didl(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        self.write_didl(&mut writer)?;
        into_string(writer.into_inner())
    }

    /// Write this entry as one element; containers carry no item attributes
    pub fn write_didl<W: Write>(&self, writer: &mut Writer<W>) -> std::io::Result<()> {
        let tag = match self.kind {
            EntryKind::Container => "container",
            EntryKind::Item => "item",
        };

        let mut start = BytesStart::new(tag);
        start.push_attribute(("id", self.id.as_str()));
        start.push_attribute(("parentID", self.parent_id.as_str()));
        start.push_attribute(("restricted", "1"));
        if self.is_container() {
            start.push_attribute(("searchable", "1"));
        }
        writer.write_event(Event::Start(start))?;

        write_text_element(writer, "dc:title", &self.title)?;
        write_text_element(writer, "upnp:class", &self.upnp_class)?;

        if self.kind == EntryKind::Item {
            for (name, value) in &self.properties {
                write_text_element(writer, name, value)?;
            }
            if let Some(res) = &self.resource {
                let mut start = BytesStart::new("res");
                start.push_attribute(("protocolInfo", res.protocol_info.as_str()));
                if let Some(duration) = &res.duration {
                    start.push_attribute(("duration", duration.as_str()));
                }
                if let Some(size) = res.size {
                    start.push_attribute(("size", size.to_string().as_str()));
                }
                writer.write_event(Event::Start(start))?;
                writer.write_event(Event::Text(BytesText::new(&res.uri)))?;
                writer.write_event(Event::End(BytesEnd::new("res")))?;
            }
        }

        writer.write_event(Event::End(BytesEnd::new(tag)))
    }
}

/// Full `Result` document: header, entries in order, trailer
pub fn didl_document(entries: &[ListingEntry]) -> Result<String> {
    let mut writer = Writer::new(Vec::from(DIDL_HEADER.as_bytes()));
    for entry in entries {
        entry.write_didl(&mut writer)?;
    }
    let mut out = writer.into_inner();
    out.extend_from_slice(DIDL_TRAILER.as_bytes());
    into_string(out)
}

fn write_text_element<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &str,
) -> std::io::Result<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(value)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))
}

fn into_string(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_fragment() {
        let entry = ListingEntry::container(ObjectId::new("0$tidal$"), ObjectId::root(), "Tidal");
        assert_eq!(
            entry.didl().unwrap(),
            concat!(
                r#"<container id="0$tidal$" parentID="0" restricted="1" searchable="1">"#,
                "<dc:title>Tidal</dc:title><upnp:class>object.container</upnp:class>",
                "</container>"
            )
        );
    }

    #[test]
    fn test_item_fragment_with_properties_and_resource() {
        let entry = ListingEntry::item(
            ObjectId::for_backend("tidal", "/track/7"),
            ObjectId::for_backend("tidal", "/album/3"),
            "Song",
        )
        .with_property("upnp:artist", "Band")
        .with_property("upnp:album", "Record")
        .with_resource(
            Resource::new("http://10.0.0.2:49152/tidal/track?id=7&fmt=flac", "audio/flac")
                .with_duration_secs(3725),
        );

        let didl = entry.didl().unwrap();
        assert!(didl.starts_with(r#"<item id="0$tidal$/track/7" parentID="0$tidal$/album/3" restricted="1">"#));
        assert!(!didl.contains("searchable"));
        // BTreeMap ordering: album before artist
        assert!(didl.contains("<upnp:album>Record</upnp:album><upnp:artist>Band</upnp:artist>"));
        assert!(didl.contains(r#"<res protocolInfo="http-get:*:audio/flac:*" duration="1:02:05">"#));
        assert!(didl.contains("id=7&amp;fmt=flac</res>"));
        assert!(didl.ends_with("</item>"));
    }

    #[test]
    fn test_container_ignores_item_attributes() {
        let entry = ListingEntry::container(ObjectId::new("0$tidal$/a"), ObjectId::new("0$tidal$"), "A")
            .with_property("upnp:artist", "ignored");
        assert!(!entry.didl().unwrap().contains("upnp:artist"));
    }

    #[test]
    fn test_markup_is_escaped() {
        let entry = ListingEntry::container(
            ObjectId::new("0$tidal$\"x\""),
            ObjectId::root(),
            "Rock & <Roll>",
        );
        let didl = entry.didl().unwrap();
        assert!(didl.contains("Rock &amp; &lt;Roll&gt;"));
        assert!(didl.contains("id=\"0$tidal$&quot;x&quot;\""));
    }

    #[test]
    fn test_document_keeps_order_and_framing() {
        let a = ListingEntry::container(ObjectId::new("0$t$a"), ObjectId::root(), "A");
        let b = ListingEntry::container(ObjectId::new("0$t$b"), ObjectId::root(), "B");
        let doc = didl_document(&[b.clone(), a.clone()]).unwrap();

        assert!(doc.starts_with(DIDL_HEADER));
        assert!(doc.ends_with(DIDL_TRAILER));
        let pos_b = doc.find(&b.didl().unwrap()).unwrap();
        let pos_a = doc.find(&a.didl().unwrap()).unwrap();
        assert!(pos_b < pos_a);
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(didl_document(&[]).unwrap(), format!("{DIDL_HEADER}{DIDL_TRAILER}"));
    }
}
