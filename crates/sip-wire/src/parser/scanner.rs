//! # Incremental header scanner
//!
//! [`MessageScanner`] walks the header block of a message one byte at a time
//! with a small state machine. It never decodes a header value. It only
//! records where each header line, name and value starts and ends, resolves
//! the header name to a [`HeaderId`], and attaches `Bytes` views of the
//! values to a [`Message`].
//!
//! Input may arrive in arbitrary pieces. When a call runs out of bytes the
//! result carries [`ScanStatus::NEED_MORE_DATA`] and `consumed` marks the
//! first byte the scanner still needs. The next call must pass
//! `chunk[consumed..]` followed by the newly received bytes; bytes the
//! scanner already looked at are not examined again.
//!
//! ```rust
//! use bytes::Bytes;
//! use rvoip_sip_wire::prelude::*;
//!
//! let mut scanner = MessageScanner::new();
//! let first = Bytes::from_static(b"OPTIONS sip:bob@example.com SIP/2.0\r\nCSeq: 1 OPT");
//! let result = scanner.scan(first.clone());
//! assert!(result.status.contains(ScanStatus::NEED_MORE_DATA));
//!
//! let mut rest = first[result.consumed..].to_vec();
//! rest.extend_from_slice(b"IONS\r\n\r\n");
//! let result = scanner.scan(Bytes::from(rest));
//! assert!(result.status.contains(ScanStatus::HEADERS_COMPLETE));
//!
//! let mut message = scanner.take_message();
//! assert_eq!(message.header(h::CSeq).unwrap().method, "OPTIONS");
//! ```

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use bytes::Bytes;
use tracing::{debug, trace};

use crate::config::ScannerConfig;
use crate::error::{ScanError, ScanErrorKind};
use crate::types::headers::header_id::{HeaderId, Tokenizing};
use crate::types::message::Message;

use super::char_class::{classify, CharClass};

/// Position of the scanner in the header grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanState {
    NewMessage,
    AfterLeadingCRLF,
    StartLine,
    AfterStartLineCRLF,
    BuildingHeaderName,
    WhitespaceBeforeColon,
    WhitespaceAfterColon,
    EmptyHeaderCRLF,
    EmptyHeaderContinuation,
    BuildingFieldValue,
    AfterValueCRLF,
    CheckContinuation,
    CheckEndOfHeaders,
    InQuotedString,
    InQuotedStringEscape,
    InAngleBrackets,
    InAngleBracketsQuotedString,
    InAngleBracketsQuotedStringEscape,
    EndOfMessage,
}

/// Outcome flags of a [`MessageScanner::scan`] call.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ScanStatus(u8);

impl ScanStatus {
    /// The blank line ending the header block was reached
    pub const HEADERS_COMPLETE: ScanStatus = ScanStatus(0x01);
    /// The input is malformed, see [`ScanResult::error`]
    pub const PARSE_ERROR: ScanStatus = ScanStatus(0x02);
    /// Views into this chunk were attached to the message
    pub const DATA_BOUND_TO_MESSAGE: ScanStatus = ScanStatus(0x04);
    /// The chunk ended inside the header block
    pub const NEED_MORE_DATA: ScanStatus = ScanStatus(0x08);

    pub const fn empty() -> Self {
        ScanStatus(0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: ScanStatus) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ScanStatus {
    type Output = ScanStatus;

    fn bitor(self, rhs: ScanStatus) -> ScanStatus {
        ScanStatus(self.0 | rhs.0)
    }
}

impl BitOrAssign for ScanStatus {
    fn bitor_assign(&mut self, rhs: ScanStatus) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for ScanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names = [
            (ScanStatus::HEADERS_COMPLETE, "HEADERS_COMPLETE"),
            (ScanStatus::PARSE_ERROR, "PARSE_ERROR"),
            (ScanStatus::DATA_BOUND_TO_MESSAGE, "DATA_BOUND_TO_MESSAGE"),
            (ScanStatus::NEED_MORE_DATA, "NEED_MORE_DATA"),
        ];
        let set: Vec<&str> = names
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        write!(f, "ScanStatus({})", set.join(" | "))
    }
}

/// Result of one [`MessageScanner::scan`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    /// With `HEADERS_COMPLETE` the offset of the body, with `NEED_MORE_DATA`
    /// the first byte to pass again on the next call, with `PARSE_ERROR` the
    /// offset of the offending byte
    pub consumed: usize,
    /// Bytes a stream transport may drop to resynchronize after an error
    pub discardable: usize,
    pub status: ScanStatus,
    error: Option<ScanError>,
}

impl ScanResult {
    pub fn error(&self) -> Option<&ScanError> {
        self.error.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.status.contains(ScanStatus::HEADERS_COMPLETE)
    }

    pub fn needs_more_data(&self) -> bool {
        self.status.contains(ScanStatus::NEED_MORE_DATA)
    }
}

// A header whose name was seen but whose last line may still continue.
#[derive(Debug, Clone)]
struct PendingHeader {
    start: usize,
    name_end: usize,
    id: Option<HeaderId>,
    values: Vec<(usize, usize)>,
}

/// Restartable scanner for the header block of one message.
///
/// After `HEADERS_COMPLETE` the message is taken with
/// [`take_message`](MessageScanner::take_message) and the scanner is
/// [`reset`](MessageScanner::reset) before the next message. After a
/// `PARSE_ERROR` every further call reports the same error until `reset`.
#[derive(Debug)]
pub struct MessageScanner {
    config: ScannerConfig,
    state: ScanState,
    mode: Tokenizing,
    // state to resume after a line fold inside a value
    fold_return: ScanState,
    message: Message,
    // leading bytes of the next chunk that were already examined
    carried: usize,
    // first byte still needed, relative to the current chunk
    anchor: usize,
    start_line_start: usize,
    pending: Option<PendingHeader>,
    value_start: usize,
    value_end: usize,
    header_count: usize,
    block_bytes: usize,
    line_bytes: usize,
    failed: Option<ScanError>,
}

impl Default for MessageScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageScanner {
    pub fn new() -> Self {
        Self::build(ScannerConfig::default())
    }

    /// A scanner with custom limits. The configuration is validated first.
    pub fn with_config(config: ScannerConfig) -> crate::Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: ScannerConfig) -> Self {
        MessageScanner {
            config,
            state: ScanState::NewMessage,
            mode: Tokenizing::Single,
            fold_return: ScanState::BuildingFieldValue,
            message: Message::new(),
            carried: 0,
            anchor: 0,
            start_line_start: 0,
            pending: None,
            value_start: 0,
            value_end: 0,
            header_count: 0,
            block_bytes: 0,
            line_bytes: 0,
            failed: None,
        }
    }

    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// The message built so far.
    pub fn message(&self) -> &Message {
        &self.message
    }

    /// Hands over the message, leaving an empty one behind.
    pub fn take_message(&mut self) -> Message {
        std::mem::take(&mut self.message)
    }

    /// Forgets all progress so the next byte starts a new message.
    pub fn reset(&mut self) {
        *self = MessageScanner::build(self.config.clone());
    }

    /// Scans `chunk`, skipping the bytes carried over from the previous call.
    pub fn scan(&mut self, chunk: Bytes) -> ScanResult {
        let start = self.carried;
        self.scan_from(chunk, start)
    }

    /// Scans `chunk` starting at `start_offset`. Bytes before the offset must
    /// be the ones the previous call asked to be passed again.
    pub fn scan_from(&mut self, chunk: Bytes, start_offset: usize) -> ScanResult {
        if let Some(err) = &self.failed {
            return ScanResult {
                consumed: 0,
                discardable: 0,
                status: ScanStatus::PARSE_ERROR,
                error: Some(err.clone()),
            };
        }
        if self.state == ScanState::EndOfMessage {
            return ScanResult {
                consumed: 0,
                discardable: 0,
                status: ScanStatus::HEADERS_COMPLETE,
                error: None,
            };
        }

        let len = chunk.len();
        let mut bound = false;
        self.anchor = 0;

        for i in start_offset.min(len)..len {
            let c = chunk[i];
            if let Err(kind) = self.step(&chunk, i, c, &mut bound) {
                return self.fail(chunk, i, kind, bound);
            }
            if self.state == ScanState::EndOfMessage {
                let consumed = i + 1;
                self.carried = 0;
                let mut status = ScanStatus::HEADERS_COMPLETE;
                if bound {
                    status |= ScanStatus::DATA_BOUND_TO_MESSAGE;
                    self.message.bind_buffer(chunk);
                }
                debug!(
                    "header block complete: {} header lines, body at {}",
                    self.header_count, consumed
                );
                return ScanResult {
                    consumed,
                    discardable: consumed,
                    status,
                    error: None,
                };
            }
        }

        let consumed = self.anchor;
        self.rebase(consumed);
        self.carried = len - consumed;
        let mut status = ScanStatus::NEED_MORE_DATA;
        if bound {
            status |= ScanStatus::DATA_BOUND_TO_MESSAGE;
            self.message.bind_buffer(chunk);
        }
        trace!("need more data, {} bytes carried in {:?}", self.carried, self.state);
        ScanResult {
            consumed,
            discardable: consumed,
            status,
            error: None,
        }
    }

    fn step(
        &mut self,
        chunk: &Bytes,
        i: usize,
        c: u8,
        bound: &mut bool,
    ) -> Result<(), ScanErrorKind> {
        use ScanState::*;

        let class = classify(c);
        let comma_mode = self.mode == Tokenizing::CommaSeparated;

        match (self.state, class) {
            (NewMessage, CharClass::Cr) => {
                self.anchor = i + 1;
                self.state = AfterLeadingCRLF;
            }
            (NewMessage, CharClass::Lf) => return Err(ScanErrorKind::BareLf),
            (NewMessage, _) => {
                self.start_line_start = i;
                self.anchor = i;
                self.state = StartLine;
            }
            (AfterLeadingCRLF, CharClass::Lf) => {
                self.anchor = i + 1;
                self.state = NewMessage;
            }
            (AfterLeadingCRLF, _) => return Err(ScanErrorKind::CrWithoutLf),

            (StartLine, CharClass::Cr) => self.state = AfterStartLineCRLF,
            (StartLine, CharClass::Lf) => return Err(ScanErrorKind::BareLf),
            (StartLine, _) => {}
            (AfterStartLineCRLF, CharClass::Lf) => {
                self.message
                    .set_start_line_view(chunk.slice(self.start_line_start..i - 1));
                *bound = true;
                self.anchor = i + 1;
                self.state = CheckContinuation;
            }
            (AfterStartLineCRLF, _) => return Err(ScanErrorKind::CrWithoutLf),

            (BuildingHeaderName, CharClass::Token) => {}
            (BuildingHeaderName, CharClass::Colon) => {
                if let Some(pending) = self.pending.as_mut() {
                    pending.name_end = i;
                }
                self.resolve_name(chunk);
            }
            (BuildingHeaderName, CharClass::Whitespace) => {
                if let Some(pending) = self.pending.as_mut() {
                    pending.name_end = i;
                }
                self.state = WhitespaceBeforeColon;
            }
            (BuildingHeaderName | WhitespaceBeforeColon, CharClass::Cr | CharClass::Lf) => {
                return Err(ScanErrorKind::MissingColon)
            }
            (BuildingHeaderName, _) => return Err(ScanErrorKind::InvalidHeaderName),
            (WhitespaceBeforeColon, CharClass::Whitespace) => {}
            (WhitespaceBeforeColon, CharClass::Colon) => self.resolve_name(chunk),
            (WhitespaceBeforeColon, _) => return Err(ScanErrorKind::InvalidHeaderName),

            (WhitespaceAfterColon, CharClass::Whitespace) => {}
            (WhitespaceAfterColon, CharClass::Cr) => self.state = EmptyHeaderCRLF,
            (WhitespaceAfterColon, CharClass::Lf) => return Err(ScanErrorKind::BareLf),
            (WhitespaceAfterColon, CharClass::Comma) if comma_mode => {
                return Err(ScanErrorKind::UnexpectedComma)
            }
            (WhitespaceAfterColon, _) => {
                self.value_start = i;
                self.state = match class {
                    CharClass::DQuote if comma_mode => InQuotedString,
                    CharClass::LessThan if comma_mode => InAngleBrackets,
                    _ => BuildingFieldValue,
                };
            }
            (EmptyHeaderCRLF, CharClass::Lf) => self.state = EmptyHeaderContinuation,
            (EmptyHeaderCRLF, _) => return Err(ScanErrorKind::CrWithoutLf),
            (EmptyHeaderContinuation, CharClass::Whitespace) => self.state = WhitespaceAfterColon,
            (EmptyHeaderContinuation, _) => {
                self.close_header(chunk, i, true);
                *bound = true;
                self.begin_line(i, class)?;
            }

            (BuildingFieldValue, CharClass::Cr) => self.end_value_line(i),
            (BuildingFieldValue, CharClass::Lf) => return Err(ScanErrorKind::BareLf),
            (BuildingFieldValue, CharClass::Comma) if comma_mode => {
                let end = trim_end(chunk, self.value_start, i);
                if let Some(pending) = self.pending.as_mut() {
                    pending.values.push((self.value_start, end));
                }
                self.state = WhitespaceAfterColon;
            }
            (BuildingFieldValue, CharClass::DQuote) if comma_mode => self.state = InQuotedString,
            (BuildingFieldValue, CharClass::LessThan) if comma_mode => self.state = InAngleBrackets,
            (BuildingFieldValue, _) => {}

            (
                InQuotedString | InAngleBrackets | InAngleBracketsQuotedString,
                CharClass::Cr,
            ) => self.end_value_line(i),
            (
                InQuotedString | InAngleBrackets | InAngleBracketsQuotedString,
                CharClass::Lf,
            ) => return Err(ScanErrorKind::BareLf),
            (InQuotedString, CharClass::DQuote) => self.state = BuildingFieldValue,
            (InQuotedString, CharClass::Backslash) => self.state = InQuotedStringEscape,
            (InQuotedString, _) => {}
            (
                InQuotedStringEscape | InAngleBracketsQuotedStringEscape,
                CharClass::Cr | CharClass::Lf,
            ) => return Err(ScanErrorKind::UnterminatedValue),
            (InQuotedStringEscape, _) => self.state = InQuotedString,
            (InAngleBrackets, CharClass::GreaterThan) => self.state = BuildingFieldValue,
            (InAngleBrackets, CharClass::DQuote) => self.state = InAngleBracketsQuotedString,
            (InAngleBrackets, _) => {}
            (InAngleBracketsQuotedString, CharClass::DQuote) => self.state = InAngleBrackets,
            (InAngleBracketsQuotedString, CharClass::Backslash) => {
                self.state = InAngleBracketsQuotedStringEscape
            }
            (InAngleBracketsQuotedString, _) => {}
            (InAngleBracketsQuotedStringEscape, _) => self.state = InAngleBracketsQuotedString,

            (AfterValueCRLF, CharClass::Lf) => self.state = CheckContinuation,
            (AfterValueCRLF, _) => return Err(ScanErrorKind::CrWithoutLf),

            (CheckContinuation, CharClass::Whitespace) => {
                if self.pending.is_none() {
                    return Err(ScanErrorKind::LeadingWhitespace);
                }
                self.state = self.fold_return;
            }
            (CheckContinuation, _) => {
                if self.pending.is_some() {
                    if self.fold_return != BuildingFieldValue {
                        return Err(ScanErrorKind::UnterminatedValue);
                    }
                    self.close_header(chunk, i, false);
                    *bound = true;
                }
                self.begin_line(i, class)?;
            }

            (CheckEndOfHeaders, CharClass::Lf) => self.state = EndOfMessage,
            (CheckEndOfHeaders, _) => return Err(ScanErrorKind::CrWithoutLf),

            (EndOfMessage, _) => {}
        }

        if !matches!(self.state, NewMessage | AfterLeadingCRLF) {
            self.count_block_byte(c)?;
        }
        Ok(())
    }

    fn count_block_byte(&mut self, c: u8) -> Result<(), ScanErrorKind> {
        self.block_bytes += 1;
        if self.block_bytes > self.config.max_header_block {
            return Err(ScanErrorKind::HeaderBlockTooLarge);
        }
        match c {
            b'\n' => self.line_bytes = 0,
            b'\r' => {}
            _ => {
                self.line_bytes += 1;
                if self.line_bytes > self.config.max_line_length {
                    return Err(ScanErrorKind::LineTooLong);
                }
            }
        }
        Ok(())
    }

    // First byte of a line after a complete header or the start line.
    fn begin_line(&mut self, i: usize, class: CharClass) -> Result<(), ScanErrorKind> {
        match class {
            CharClass::Cr => {
                self.anchor = i;
                self.state = ScanState::CheckEndOfHeaders;
            }
            CharClass::Token => {
                self.header_count += 1;
                if self.header_count > self.config.max_headers {
                    return Err(ScanErrorKind::TooManyHeaders);
                }
                self.anchor = i;
                self.pending = Some(PendingHeader {
                    start: i,
                    name_end: i,
                    id: None,
                    values: Vec::new(),
                });
                self.state = ScanState::BuildingHeaderName;
            }
            CharClass::Lf => return Err(ScanErrorKind::BareLf),
            CharClass::Whitespace => return Err(ScanErrorKind::LeadingWhitespace),
            _ => return Err(ScanErrorKind::InvalidHeaderName),
        }
        Ok(())
    }

    fn resolve_name(&mut self, chunk: &Bytes) {
        if let Some(pending) = self.pending.as_mut() {
            let name = &chunk[pending.start..pending.name_end];
            pending.id = HeaderId::lookup(name);
            self.mode = pending
                .id
                .map_or(Tokenizing::Single, HeaderId::tokenizing);
            trace!(
                "header name {:?} resolved to {:?}",
                String::from_utf8_lossy(name),
                pending.id
            );
        }
        self.state = ScanState::WhitespaceAfterColon;
    }

    fn end_value_line(&mut self, i: usize) {
        self.value_end = i;
        self.fold_return = self.state;
        self.state = ScanState::AfterValueCRLF;
    }

    // Emits the pending header. `i` is the first byte of the next line, so
    // the CRLF ending the header is at `i - 2`.
    fn close_header(&mut self, chunk: &Bytes, i: usize, empty_line: bool) {
        let Some(mut pending) = self.pending.take() else {
            return;
        };
        let line_end = i - 2;
        if !empty_line {
            let end = trim_end(chunk, self.value_start, self.value_end);
            pending.values.push((self.value_start, end));
        } else if pending.values.is_empty() {
            pending.values.push((line_end, line_end));
        }

        let line = chunk.slice(pending.start..line_end);
        let values: Vec<Bytes> = pending
            .values
            .iter()
            .map(|&(start, end)| chunk.slice(start..end))
            .collect();
        trace!(
            "scanned header {:?} with {} value(s)",
            String::from_utf8_lossy(&chunk[pending.start..pending.name_end]),
            values.len()
        );
        self.message.add_scanned(
            pending.id,
            &chunk[pending.start..pending.name_end],
            line,
            values,
        );
    }

    fn fail(&mut self, chunk: Bytes, i: usize, kind: ScanErrorKind, bound: bool) -> ScanResult {
        let error = ScanError::new(i, kind);
        let discardable = chunk[i..]
            .iter()
            .position(|&c| c == b'\n')
            .map_or(chunk.len(), |p| i + p + 1);
        debug!("{}", error);

        let mut status = ScanStatus::PARSE_ERROR;
        if bound {
            status |= ScanStatus::DATA_BOUND_TO_MESSAGE;
            self.message.bind_buffer(chunk);
        }
        self.failed = Some(error.clone());
        ScanResult {
            consumed: i,
            discardable,
            status,
            error: Some(error),
        }
    }

    // Shifts every remembered position so that `by` becomes offset zero.
    fn rebase(&mut self, by: usize) {
        self.start_line_start = self.start_line_start.saturating_sub(by);
        self.value_start = self.value_start.saturating_sub(by);
        self.value_end = self.value_end.saturating_sub(by);
        if let Some(pending) = self.pending.as_mut() {
            pending.start -= by;
            pending.name_end -= by;
            for (start, end) in pending.values.iter_mut() {
                *start -= by;
                *end -= by;
            }
        }
    }
}

fn trim_end(chunk: &[u8], start: usize, mut end: usize) -> usize {
    while end > start && matches!(chunk[end - 1], b' ' | b'\t' | b'\r' | b'\n') {
        end -= 1;
    }
    end
}
