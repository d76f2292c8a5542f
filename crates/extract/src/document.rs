//! Parsing of Calibre `metadata.opf` descriptors.

use std::str::FromStr;

use exn::ResultExt;
use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use tracing::instrument;

use crate::consts;
use crate::error::{Error, ErrorKind, Result};
use crate::models::{Collections, SeriesIndex, non_empty};

/// A single element of the descriptor, flattened out of the tree.
#[derive(Debug, Clone)]
struct Element {
    namespace: Option<String>,
    local_name: String,
    attributes: Vec<(String, String)>,
    /// Direct text content (children's text is not included).
    text: String,
}
impl Element {
    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    fn is(&self, namespace: &str, local_name: &str) -> bool {
        self.namespace.as_deref() == Some(namespace) && self.local_name == local_name
    }
}

/// An immutable, fully parsed descriptor.
///
/// The document is read once, up front; all accessors are cheap lookups over
/// the elements in document order. Wherever a field could legally repeat, the
/// *first* occurrence wins.
///
/// # Examples
///
/// ```
/// use calmirror_extract::OpfDocument;
/// let opf = r#"<?xml version="1.0" encoding="utf-8"?>
/// <package xmlns="http://www.idpf.org/2007/opf" version="2.0">
///   <metadata xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:opf="http://www.idpf.org/2007/opf">
///     <dc:title>The Great Adventure</dc:title>
///     <dc:creator opf:role="aut">Jane Doe</dc:creator>
///     <meta name="calibre:series" content="Fantasy Series"/>
///     <meta name="calibre:series_index" content="1"/>
///   </metadata>
/// </package>"#;
///
/// let document: OpfDocument = opf.parse().unwrap();
/// assert_eq!(document.title(), Some("The Great Adventure"));
/// assert_eq!(document.series(), Some("Fantasy Series"));
/// assert_eq!(document.series_index().unwrap().to_string(), "1");
/// assert_eq!(document.author(), Some("Jane Doe"));
/// ```
#[derive(Debug, Clone)]
pub struct OpfDocument {
    elements: Vec<Element>,
}

impl FromStr for OpfDocument {
    type Err = Error;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl OpfDocument {
    /// Parses descriptor text.
    ///
    /// # Errors
    /// - [`ErrorKind::Empty`] if the text is empty or whitespace.
    /// - [`ErrorKind::MalformedXml`] if the text is not well-formed XML.
    /// - [`ErrorKind::MissingRoot`] if there is no root element.
    #[instrument(level = "trace", skip(text), fields(text_size = text.len()))]
    pub fn parse(text: &str) -> Result<Self> {
        if text.trim().is_empty() {
            exn::bail!(ErrorKind::Empty);
        }
        let mut reader = NsReader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut elements: Vec<Element> = Vec::new();
        // Indices into `elements` of every currently open tag.
        let mut open: Vec<usize> = Vec::new();
        let mut root_seen = false;
        loop {
            match reader.read_resolved_event() {
                Ok((namespace, Event::Start(start))) => {
                    let namespace = owned_namespace(namespace);
                    if open.is_empty() && root_seen {
                        exn::bail!(malformed(&reader, "multiple root elements"));
                    }
                    root_seen = true;
                    elements.push(element(namespace, &start)?);
                    open.push(elements.len() - 1);
                },
                Ok((namespace, Event::Empty(start))) => {
                    let namespace = owned_namespace(namespace);
                    if open.is_empty() && root_seen {
                        exn::bail!(malformed(&reader, "multiple root elements"));
                    }
                    root_seen = true;
                    elements.push(element(namespace, &start)?);
                },
                Ok((_, Event::End(_))) => {
                    if open.pop().is_none() {
                        exn::bail!(malformed(&reader, "unexpected closing tag"));
                    }
                },
                Ok((_, Event::Text(text))) => {
                    let text = text.unescape().or_raise(|| malformed(&reader, "invalid text content"))?;
                    match open.last() {
                        Some(&index) => elements[index].text.push_str(&text),
                        None => exn::bail!(malformed(&reader, "text outside of root element")),
                    }
                },
                Ok((_, Event::CData(data))) => match open.last() {
                    Some(&index) => elements[index].text.push_str(&String::from_utf8_lossy(&data.into_inner())),
                    None => exn::bail!(malformed(&reader, "character data outside of root element")),
                },
                Ok((_, Event::Eof)) => break,
                // Declarations, comments, processing instructions and doctypes carry no metadata.
                Ok(_) => {},
                Err(e) => return Err(e).or_raise(|| malformed(&reader, "unreadable XML")),
            }
        }
        if !open.is_empty() {
            exn::bail!(ErrorKind::MalformedXml(format!("{} unclosed element(s) at end of document", open.len())));
        }
        if !root_seen {
            exn::bail!(ErrorKind::MissingRoot);
        }
        Ok(Self { elements })
    }

    /// Text of the first `<dc:title>`.
    pub fn title(&self) -> Option<&str> {
        self.dublin_core(consts::DC_TITLE)
    }

    /// Text of the first `<dc:creator>`.
    pub fn author(&self) -> Option<&str> {
        self.dublin_core(consts::DC_CREATOR)
    }

    /// Series name from the `calibre:series` entry.
    pub fn series(&self) -> Option<&str> {
        self.meta(consts::META_SERIES).and_then(non_empty)
    }

    /// Series position from the `calibre:series_index` entry. Values that
    /// aren't plain decimal numbers are treated as absent.
    pub fn series_index(&self) -> Option<SeriesIndex> {
        let raw = self.meta(consts::META_SERIES_INDEX).and_then(non_empty)?;
        match raw.parse() {
            Ok(index) => Some(index),
            Err(e) => {
                tracing::debug!(error = ?e, "Ignoring unparsable series index");
                None
            },
        }
    }

    /// Collections listed in the given custom column (e.g. `#ext_library`).
    pub fn collections(&self, column: &str) -> Collections {
        let key = format!("{}{column}", consts::META_USER_METADATA_PREFIX);
        Collections::from_payload(self.meta(&key))
    }

    /// Returns `true` if `collection` is listed in the default external
    /// library column. Never fails: anything ambiguous means "not a member".
    pub fn is_member_of(&self, collection: &str) -> bool {
        self.collections(consts::DEFAULT_COLLECTION_COLUMN).contains(collection)
    }

    fn dublin_core(&self, local_name: &str) -> Option<&str> {
        self.elements
            .iter()
            .find(|el| el.is(consts::DC_NAMESPACE, local_name))
            .and_then(|el| non_empty(&el.text))
    }

    /// Value of the first custom metadata entry for `key`.
    ///
    /// OPF 2 stores entries as `<meta name="key" content="value"/>`, OPF 3 as
    /// `<meta property="key">value</meta>`. Whichever appears first is used;
    /// a `name` entry without `content` has no value.
    fn meta(&self, key: &str) -> Option<&str> {
        self.elements.iter().find_map(|el| {
            if el.attribute("name") == Some(key) {
                Some(el.attribute("content"))
            } else if el.attribute("property") == Some(key) {
                Some(Some(el.text.as_str()))
            } else {
                None
            }
        })?
    }
}

fn malformed(reader: &NsReader<&[u8]>, reason: &str) -> ErrorKind {
    ErrorKind::MalformedXml(format!("{reason} at byte {}", reader.buffer_position()))
}

fn owned_namespace(namespace: ResolveResult<'_>) -> Option<String> {
    match namespace {
        ResolveResult::Bound(Namespace(ns)) => Some(String::from_utf8_lossy(ns).into_owned()),
        ResolveResult::Unbound | ResolveResult::Unknown(_) => None,
    }
}

fn element(namespace: Option<String>, start: &BytesStart<'_>) -> Result<Element> {
    let local_name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute =
            attribute.or_raise(|| ErrorKind::MalformedXml(format!("invalid attribute on <{local_name}>")))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .or_raise(|| ErrorKind::MalformedXml(format!("invalid value for attribute `{key}` on <{local_name}>")))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(Element { namespace, local_name, attributes, text: String::new() })
}
