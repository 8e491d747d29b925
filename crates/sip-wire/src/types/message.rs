//! # Messages with lazily decoded headers
//!
//! A [`Message`] holds the start line, the header fields found by the
//! scanner and the body. Header values stay raw byte views until they are
//! asked for through a typed accessor:
//!
//! - [`Message::header`] for headers that occur once, returning the value
//! - [`Message::header_multi`] for headers that may repeat, returning a
//!   [`Container`] over all occurrences
//!
//! Both create the header when it is absent. Use [`Message::exists`] to test
//! for presence without creating or decoding anything.
//!
//! Headers that were never handed out for modification are written back
//! exactly as received by [`Message::encode`].
//!
//! ```rust
//! use bytes::Bytes;
//! use rvoip_sip_wire::prelude::*;
//!
//! let data = Bytes::from_static(
//!     b"SIP/2.0 200 OK\r\nVia: SIP/2.0/UDP pc33.example.com;branch=z9hG4bK776\r\n\
//!       CSeq: 1 INVITE\r\nContent-Length: 0\r\n\r\n",
//! );
//! let mut message = Message::from_datagram(data.clone()).unwrap();
//! assert!(message.is_response());
//! assert_eq!(message.header_multi(h::Vias).len(), 1);
//!
//! message.header(h::CSeq).unwrap().sequence = 2;
//! assert!(message.encode().starts_with(b"SIP/2.0 200 OK\r\nVia: SIP/2.0/UDP"));
//! ```

use std::fmt;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::error::{DecodeError, Error, Result};
use crate::parser::scanner::{MessageScanner, ScanStatus};
use crate::types::category::{FieldKind, ParserCategory};
use crate::types::container::Container;
use crate::types::field::RawField;
use crate::types::field_list::FieldList;
use crate::types::headers::header_id::HeaderId;
use crate::types::headers::typed::{MultiHeader, SingleHeader};
use crate::types::string_category::StringCategory;
use crate::types::uint32::UInt32Category;

// One entry of the header order used for encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Slot {
    Known(HeaderId),
    Unknown(String),
}

/// A SIP message with lazily decoded header fields.
#[derive(Clone)]
pub struct Message {
    // chunks the field views point into
    buffers: Vec<Bytes>,
    start_line: RawField,
    fields: Vec<Option<FieldList>>,
    unknown: Vec<(String, FieldList)>,
    order: Vec<Slot>,
    body: Option<Bytes>,
    invalid: Vec<String>,
}

impl Default for Message {
    fn default() -> Self {
        Message {
            buffers: Vec::new(),
            start_line: RawField::default(),
            fields: vec![None; HeaderId::COUNT],
            unknown: Vec::new(),
            order: Vec::new(),
            body: None,
            invalid: Vec::new(),
        }
    }
}

impl Message {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scans a complete datagram.
    ///
    /// Everything after the header block becomes the body, cut to
    /// Content-Length when that header is present and valid.
    pub fn from_datagram(data: Bytes) -> Result<Message> {
        let mut scanner = MessageScanner::new();
        let result = scanner.scan(data.clone());
        if let Some(err) = result.error() {
            return Err(err.clone().into());
        }
        if !result.status.contains(ScanStatus::HEADERS_COMPLETE) {
            return Err(Error::Incomplete(
                "datagram ended inside the header block".to_string(),
            ));
        }

        let mut message = scanner.take_message();
        let mut body = data.slice(result.consumed..);
        if let Some(length) = message.declared_content_length() {
            if length < body.len() {
                debug!("truncating body of {} bytes to Content-Length {}", body.len(), length);
                body.truncate(length);
            }
        }
        if !body.is_empty() {
            message.body = Some(body);
        }
        Ok(message)
    }

    // Content-Length as received, decoded without caching.
    fn declared_content_length(&self) -> Option<usize> {
        let field = self.fields[HeaderId::ContentLength.index()].as_ref()?.front()?;
        let value = field.decode_detached(FieldKind::UInt32).ok()?;
        UInt32Category::from_owned(value).map(|v| v.value as usize)
    }

    pub(crate) fn bind_buffer(&mut self, buffer: Bytes) {
        self.buffers.push(buffer);
    }

    pub(crate) fn set_start_line_view(&mut self, view: Bytes) {
        self.start_line = RawField::from_view(view);
    }

    /// Adds one scanned header line. `id` is `None` for unregistered names.
    pub(crate) fn add_scanned(
        &mut self,
        id: Option<HeaderId>,
        name: &[u8],
        line: Bytes,
        values: Vec<Bytes>,
    ) {
        match id {
            Some(id) => match &mut self.fields[id.index()] {
                Some(list) => {
                    if !id.is_multi() && !list.is_empty() {
                        let reason = format!("Multiple values in single-value header {}", id);
                        warn!("{}", reason);
                        self.invalid.push(reason);
                    }
                    list.push_scanned(line, values);
                }
                slot @ None => {
                    let mut list = FieldList::new();
                    list.push_scanned(line, values);
                    *slot = Some(list);
                    self.order.push(Slot::Known(id));
                }
            },
            None => {
                let name = String::from_utf8_lossy(name);
                match self.unknown_position(&name) {
                    Some(i) => self.unknown[i].1.push_scanned(line, values),
                    None => {
                        let mut list = FieldList::new();
                        list.push_scanned(line, values);
                        self.unknown.push((name.to_string(), list));
                        self.order.push(Slot::Unknown(name.into_owned()));
                    }
                }
            }
        }
    }

    fn unknown_position(&self, name: &str) -> Option<usize> {
        self.unknown
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    // The list for `id`, created empty and put last in the order if absent.
    fn list_or_insert(&mut self, id: HeaderId) -> &mut FieldList {
        let order = &mut self.order;
        self.fields[id.index()].get_or_insert_with(|| {
            order.push(Slot::Known(id));
            FieldList::new()
        })
    }

    /// The value of a single-value header.
    ///
    /// An absent header is created with the empty value of its type. A
    /// present one is decoded on first access. If the header occurred more
    /// than once the first occurrence is returned.
    pub fn header<H: SingleHeader>(&mut self, _header: H) -> Result<&mut H::Value> {
        let id = H::ID;
        let list = self.list_or_insert(id);
        if list.is_empty() {
            list.push_back(H::Value::default().into_value());
        }
        let field = list
            .front_mut()
            .ok_or_else(|| DecodeError::new(id.canonical_name(), "header has no value"))?;
        let value = field
            .materialize(H::Value::KIND)
            .map_err(|e| e.in_header(id.canonical_name()))?;
        H::Value::from_value_mut(value)
            .ok_or_else(|| DecodeError::new(id.canonical_name(), "value has a different type").into())
    }

    /// All values of a multi-value header.
    ///
    /// Every occurrence is decoded on the first call. An occurrence that
    /// does not decode keeps its error, which the container reports through
    /// [`Container::errors`], while its siblings stay readable.
    pub fn header_multi<H: MultiHeader>(&mut self, _header: H) -> Container<'_, H::Value> {
        let list = self.list_or_insert(H::ID);
        if let Err(e) = list.materialize_all(H::Value::KIND) {
            debug!("{} has values that do not decode: {}", H::ID, e);
        }
        Container::new(list)
    }

    /// True if the header has at least one value. Nothing is decoded.
    pub fn exists(&self, id: impl Into<HeaderId>) -> bool {
        self.fields[id.into().index()]
            .as_ref()
            .is_some_and(|list| !list.is_empty())
    }

    /// Drops every occurrence of the header without decoding it.
    pub fn remove(&mut self, id: impl Into<HeaderId>) -> Option<FieldList> {
        let id = id.into();
        self.order.retain(|slot| *slot != Slot::Known(id));
        self.fields[id.index()].take()
    }

    /// The raw field list of a header, if present.
    pub fn raw_header(&self, id: impl Into<HeaderId>) -> Option<&FieldList> {
        self.fields[id.into().index()].as_ref()
    }

    /// True if a header with this unregistered name is present.
    pub fn exists_unknown(&self, name: &str) -> bool {
        self.unknown_position(name)
            .is_some_and(|i| !self.unknown[i].1.is_empty())
    }

    /// All values of an unregistered header as plain text.
    ///
    /// Registered names are refused, they have typed accessors.
    pub fn header_unknown(&mut self, name: &str) -> Result<Container<'_, StringCategory>> {
        if HeaderId::lookup(name.as_bytes()).is_some() {
            return Err(DecodeError::new(name, "registered header, use the typed accessor").into());
        }
        let index = match self.unknown_position(name) {
            Some(i) => i,
            None => {
                self.unknown.push((name.to_string(), FieldList::new()));
                self.order.push(Slot::Unknown(name.to_string()));
                self.unknown.len() - 1
            }
        };
        let list = &mut self.unknown[index].1;
        if let Err(e) = list.materialize_all(FieldKind::StringCategory) {
            debug!("{} has values that do not decode: {}", name, e);
        }
        Ok(Container::new(list))
    }

    /// The raw field list of an unregistered header, if present.
    pub fn raw_unknown(&self, name: &str) -> Option<&FieldList> {
        self.unknown_position(name).map(|i| &self.unknown[i].1)
    }

    pub fn remove_unknown(&mut self, name: &str) -> Option<FieldList> {
        let index = self.unknown_position(name)?;
        let (stored, list) = self.unknown.remove(index);
        self.order.retain(|slot| *slot != Slot::Unknown(stored.clone()));
        Some(list)
    }

    /// Decodes every header value.
    ///
    /// Nothing is marked modified, so encoding output does not change. The
    /// first error in header order is returned after all headers were
    /// attempted.
    pub fn parse_all(&mut self) -> Result<()> {
        let mut first_error: Option<DecodeError> = None;
        for slot in &self.order {
            let outcome = match slot {
                Slot::Known(id) => match &mut self.fields[id.index()] {
                    Some(list) => list
                        .materialize_all(id.kind())
                        .map_err(|e| e.in_header(id.canonical_name())),
                    None => Ok(()),
                },
                Slot::Unknown(name) => match self
                    .unknown
                    .iter_mut()
                    .find(|(n, _)| n.eq_ignore_ascii_case(name))
                {
                    Some((_, list)) => list
                        .materialize_all(FieldKind::StringCategory)
                        .map_err(|e| e.in_header(name)),
                    None => Ok(()),
                },
            };
            if let Err(e) = outcome {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Replaces the body and sets Content-Length to its size.
    pub fn set_body(&mut self, body: impl Into<Bytes>) {
        let body: Bytes = body.into();
        let length = UInt32Category::new(content_length_of(body.len())).into_value();
        let list = self.list_or_insert(HeaderId::ContentLength);
        *list = FieldList::from_value(length);
        self.body = if body.is_empty() { None } else { Some(body) };
    }

    /// Problems found while scanning that did not stop the scan.
    pub fn invalid_reasons(&self) -> &[String] {
        &self.invalid
    }

    pub fn is_valid(&self) -> bool {
        self.invalid.is_empty()
    }

    /// The request or status line.
    pub fn start_line(&self) -> String {
        let mut out = Vec::new();
        self.start_line.encode_value(&mut out);
        String::from_utf8_lossy(&out).into_owned()
    }

    pub fn set_start_line(&mut self, line: impl Into<String>) {
        self.start_line = RawField::synthetic(StringCategory::new(line).into_value());
    }

    /// True for a status line such as `SIP/2.0 200 OK`.
    pub fn is_response(&self) -> bool {
        self.start_line().starts_with("SIP/")
    }

    /// True for a request line such as `INVITE sip:bob@biloxi.com SIP/2.0`.
    pub fn is_request(&self) -> bool {
        let line = self.start_line();
        !line.starts_with("SIP/")
            && line
                .rsplit(' ')
                .next()
                .is_some_and(|version| version.starts_with("SIP/"))
    }

    /// Writes the message: start line, headers in order of first
    /// appearance, blank line and body.
    pub fn encode(&self) -> Bytes {
        let mut out = Vec::new();
        self.encode_into(&mut out);
        Bytes::from(out)
    }

    pub fn encode_into(&self, out: &mut Vec<u8>) {
        self.start_line.encode_value(out);
        out.extend_from_slice(b"\r\n");
        for slot in &self.order {
            match slot {
                Slot::Known(id) => {
                    if let Some(list) = &self.fields[id.index()] {
                        list.encode(id.canonical_name(), out);
                    }
                }
                Slot::Unknown(name) => {
                    if let Some(i) = self.unknown_position(name) {
                        self.unknown[i].1.encode(&self.unknown[i].0, out);
                    }
                }
            }
        }
        out.extend_from_slice(b"\r\n");
        if let Some(body) = &self.body {
            out.extend_from_slice(body);
        }
    }
}

impl PartialEq for Message {
    fn eq(&self, other: &Self) -> bool {
        self.start_line == other.start_line
            && self.fields == other.fields
            && self.unknown == other.unknown
            && self.order == other.order
            && self.body == other.body
            && self.invalid == other.invalid
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("start_line", &self.start_line())
            .field("headers", &self.order)
            .field("body_len", &self.body.as_ref().map_or(0, |b| b.len()))
            .field("invalid", &self.invalid)
            .finish()
    }
}

// Content-Length is a 32 bit value; larger bodies are announced as the
// largest value it can carry.
fn content_length_of(len: usize) -> u32 {
    u32::try_from(len).unwrap_or_else(|_| {
        warn!("body of {} bytes exceeds the Content-Length range", len);
        u32::MAX
    })
}
