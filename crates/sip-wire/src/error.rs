use std::fmt;
use thiserror::Error;

/// What went wrong while scanning the header block of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScanErrorKind {
    /// A CR that is not immediately followed by LF
    CrWithoutLf,
    /// A LF that is not preceded by CR
    BareLf,
    /// A header line ended before its name was terminated by a colon
    MissingColon,
    /// A byte that cannot appear in a header name
    InvalidHeaderName,
    /// A line starting with whitespace where no header value is open
    LeadingWhitespace,
    /// A comma at the start of a comma separated value
    UnexpectedComma,
    /// A quoted string or angle bracket that was still open at end of line
    UnterminatedValue,
    /// A single line exceeded the configured limit
    LineTooLong,
    /// More header fields than the configured limit
    TooManyHeaders,
    /// The header block grew past the configured limit
    HeaderBlockTooLarge,
}

impl fmt::Display for ScanErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ScanErrorKind::CrWithoutLf => "CR not followed by LF",
            ScanErrorKind::BareLf => "LF without preceding CR",
            ScanErrorKind::MissingColon => "header name not terminated by a colon",
            ScanErrorKind::InvalidHeaderName => "invalid character in header name",
            ScanErrorKind::LeadingWhitespace => "continuation line without a header",
            ScanErrorKind::UnexpectedComma => "empty element in comma separated header",
            ScanErrorKind::UnterminatedValue => "unterminated quoted string or angle bracket",
            ScanErrorKind::LineTooLong => "header line too long",
            ScanErrorKind::TooManyHeaders => "too many header fields",
            ScanErrorKind::HeaderBlockTooLarge => "header block too large",
        };
        f.write_str(text)
    }
}

/// Malformed byte grammar found by the scanner.
///
/// `offset` is relative to the chunk passed to the failing `scan` call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Scan error at offset {offset}: {kind}")]
pub struct ScanError {
    pub offset: usize,
    pub kind: ScanErrorKind,
}

impl ScanError {
    pub fn new(offset: usize, kind: ScanErrorKind) -> Self {
        ScanError { offset, kind }
    }
}

/// A single header or parameter value did not match its grammar.
///
/// The error is cached next to the value that failed, so asking for the same
/// field again returns the same error without decoding twice.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to decode {target}: {reason}")]
pub struct DecodeError {
    /// Header or parameter the error belongs to
    pub target: String,
    pub reason: String,
}

impl DecodeError {
    pub fn new(target: impl Into<String>, reason: impl Into<String>) -> Self {
        DecodeError {
            target: target.into(),
            reason: reason.into(),
        }
    }

    /// Qualifies the target with the header the value was found in.
    pub fn in_header(mut self, header: &str) -> Self {
        if !self.target.starts_with(header) {
            self.target = format!("{} {}", header, self.target);
        }
        self
    }
}

/// Errors returned by this crate
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The byte stream is not a well formed header block
    #[error(transparent)]
    Scan(#[from] ScanError),

    /// A header or parameter value could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Input ended before the header block was complete
    #[error("Incomplete message: {0}")]
    Incomplete(String),

    /// Invalid scanner configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl Error {
    /// Returns the decode error if this is one.
    pub fn as_decode(&self) -> Option<&DecodeError> {
        match self {
            Error::Decode(e) => Some(e),
            _ => None,
        }
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode(_))
    }
}

/// Result type for operations in this crate
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_qualified_once() {
        let err = DecodeError::new("ttl parameter", "not an integer").in_header("Via");
        assert_eq!(err.target, "Via ttl parameter");
        let again = err.clone().in_header("Via");
        assert_eq!(again, err);
        assert_eq!(err.to_string(), "Failed to decode Via ttl parameter: not an integer");
    }

    #[test]
    fn test_scan_error_display() {
        let err = ScanError::new(12, ScanErrorKind::BareLf);
        assert_eq!(err.to_string(), "Scan error at offset 12: LF without preceding CR");
        let wrapped: Error = err.into();
        assert!(!wrapped.is_decode());
    }
}
