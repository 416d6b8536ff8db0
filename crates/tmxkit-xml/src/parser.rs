//! Parse XML text into an [`XmlElement`] tree.

use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::{Error, Result, XmlElement};

impl XmlElement {
    /// Parse XML text and return its root element.
    ///
    /// # Example
    ///
    /// ```
    /// use tmxkit_xml::XmlElement;
    ///
    /// let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
    /// <tileset name="terrain" tilewidth="16" tileheight="16">
    ///     <image source="terrain.png" width="64" height="64"/>
    /// </tileset>"#;
    ///
    /// let root = XmlElement::parse_str(xml).unwrap();
    /// assert_eq!(root.child("image").and_then(|i| i.attr("source")), Some("terrain.png"));
    /// ```
    pub fn parse_str(xml: &str) -> Result<Self> {
        Self::parse_reader(xml.as_bytes())
    }

    /// Parse XML bytes and return the root element.
    pub fn parse_bytes(xml: &[u8]) -> Result<Self> {
        let xml_str = std::str::from_utf8(xml).map_err(Error::Utf8)?;
        Self::parse_str(xml_str)
    }

    /// Parse XML from a buffered byte stream and return the root element.
    pub fn parse_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut reader = Reader::from_reader(reader);
        let mut buf = Vec::new();

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => {
                    stack.push(element_from_start(&e)?);
                }
                Ok(Event::Empty(e)) => {
                    // Self-closing element
                    let element = element_from_start(&e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::End(_)) => {
                    let mut element = stack
                        .pop()
                        .ok_or_else(|| Error::Xml("unmatched closing tag".to_string()))?;
                    element.trim_text();
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Text(e)) => {
                    if let Some(element) = stack.last_mut() {
                        let text = e.unescape().map_err(|e| Error::Xml(e.to_string()))?;
                        element.append_text(&text);
                    }
                }
                Ok(Event::CData(e)) => {
                    if let Some(element) = stack.last_mut() {
                        let bytes = e.into_inner();
                        element.append_text(std::str::from_utf8(&bytes)?);
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {} // Ignore other events (declarations, comments, etc.)
                Err(e) => {
                    return Err(Error::Xml(format!(
                        "XML parse error at position {}: {}",
                        reader.error_position(),
                        e
                    )))
                }
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            return Err(Error::Xml(format!("unclosed element <{}>", open.name())));
        }

        root.ok_or(Error::NoRoot)
    }
}

/// Build an element (without children) from a start or empty tag.
fn element_from_start(e: &BytesStart<'_>) -> Result<XmlElement> {
    let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut element = XmlElement::new(tag);

    for attr in e.attributes() {
        let attr = attr.map_err(|e| Error::Xml(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::Xml(e.to_string()))?
            .into_owned();
        element.push_attribute(key, value);
    }

    Ok(element)
}

/// Attach a finished element to its parent, or make it the root.
fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.push_child(element);
    } else if root.is_some() {
        return Err(Error::Xml(format!(
            "multiple root elements: found <{}> after the root",
            element.name()
        )));
    } else {
        *root = Some(element);
    }
    Ok(())
}
