//! Byte level parsing
//!
//! [`scanner`] splits a message into its start line and header fields. The
//! remaining modules are the nom building blocks the header value grammars
//! are written with.

use nom::IResult;

pub mod char_class;
pub mod scanner;
pub mod separators;
pub mod token;
pub mod utils;
pub mod whitespace;

pub use scanner::{MessageScanner, ScanResult, ScanState, ScanStatus};

/// Result type of the nom parsers in this crate
pub type ParseResult<'a, O> = IResult<&'a [u8], O>;
