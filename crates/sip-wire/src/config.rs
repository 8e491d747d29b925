//! Scanner limits
//!
//! The scanner accepts arbitrarily fragmented input, so a peer on a stream
//! transport could keep a header block open forever. These limits bound the
//! work done per message. All of them are checked while scanning; exceeding
//! one is reported as a scan error like any other malformed input.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default upper bound on the header block (64KB - 1)
pub const MAX_HEADER_BLOCK: usize = 65535;

/// Default maximum number of header lines in a single message
pub const MAX_HEADERS: usize = 256;

/// Default maximum length of one physical header line
pub const MAX_HEADER_LINE_LENGTH: usize = 8192;

/// Limits applied by [`MessageScanner`](crate::parser::scanner::MessageScanner).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Bytes from the start line up to and including the blank line
    pub max_header_block: usize,
    /// Header lines, counting each continued line once
    pub max_headers: usize,
    /// Bytes on a single physical line, excluding CRLF
    pub max_line_length: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        ScannerConfig {
            max_header_block: MAX_HEADER_BLOCK,
            max_headers: MAX_HEADERS,
            max_line_length: MAX_HEADER_LINE_LENGTH,
        }
    }
}

impl ScannerConfig {
    /// A configuration without any limits, for trusted input and tests.
    pub fn unlimited() -> Self {
        ScannerConfig {
            max_header_block: usize::MAX,
            max_headers: usize::MAX,
            max_line_length: usize::MAX,
        }
    }

    pub fn with_max_header_block(mut self, limit: usize) -> Self {
        self.max_header_block = limit;
        self
    }

    pub fn with_max_headers(mut self, limit: usize) -> Self {
        self.max_headers = limit;
        self
    }

    pub fn with_max_line_length(mut self, limit: usize) -> Self {
        self.max_line_length = limit;
        self
    }

    /// Rejects limits that would refuse every message.
    pub fn validate(&self) -> Result<()> {
        if self.max_header_block == 0 {
            return Err(Error::Config("max_header_block must be positive".to_string()));
        }
        if self.max_line_length == 0 {
            return Err(Error::Config("max_line_length must be positive".to_string()));
        }
        Ok(())
    }
}
