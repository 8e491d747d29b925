//! # rvoip-sip-wire
//!
//! Incremental SIP message scanner with lazily decoded headers.
//!
//! The crate turns a byte stream into messages without buffering a whole
//! message up front and without parsing header text nobody asks for:
//!
//! - [`MessageScanner`](parser::scanner::MessageScanner) accepts the input
//!   in pieces of any size and records where each header value lies
//! - header names are resolved to a [`HeaderId`](types::headers::HeaderId)
//!   with a perfect hash, compact forms included
//! - values are decoded the first time a typed accessor asks for them, and
//!   the outcome is cached
//! - headers that were never modified are written back byte for byte
//!
//! ## Example
//!
//! ```rust
//! use bytes::Bytes;
//! use rvoip_sip_wire::prelude::*;
//!
//! let data = Bytes::from_static(
//!     b"REGISTER sip:registrar.biloxi.com SIP/2.0\r\n\
//!       Via: SIP/2.0/UDP bobspc.biloxi.com:5060;branch=z9hG4bKnashds7\r\n\
//!       CSeq: 1826 REGISTER\r\n\
//!       X-Custom: hello\r\n\
//!       Content-Length: 0\r\n\r\n",
//! );
//!
//! let mut scanner = MessageScanner::new();
//! let result = scanner.scan(data.clone());
//! assert!(result.status.contains(ScanStatus::HEADERS_COMPLETE));
//!
//! let mut message = scanner.take_message();
//! let via = message.header_multi(h::Vias).front().cloned().unwrap();
//! assert_eq!(via.host, "bobspc.biloxi.com");
//! assert_eq!(message.header(h::CSeq)?.sequence, 1826);
//! assert!(message.exists_unknown("x-custom"));
//! # Ok::<(), rvoip_sip_wire::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod hash;
pub mod parser;
pub mod types;

pub use config::ScannerConfig;
pub use error::{DecodeError, Error, Result, ScanError, ScanErrorKind};
pub use parser::scanner::{MessageScanner, ScanResult, ScanState, ScanStatus};
pub use types::message::Message;

/// Everything needed to scan messages and read their headers
pub mod prelude {
    pub use crate::config::ScannerConfig;
    pub use crate::error::{DecodeError, Error, Result, ScanError, ScanErrorKind};
    pub use crate::parser::scanner::{MessageScanner, ScanResult, ScanState, ScanStatus};
    pub use crate::types::auth::Auth;
    pub use crate::types::call_id::CallIdCategory;
    pub use crate::types::category::{FieldKind, FieldValue, ParserCategory};
    pub use crate::types::container::Container;
    pub use crate::types::cseq::CSeqCategory;
    pub use crate::types::date::DateCategory;
    pub use crate::types::field::RawField;
    pub use crate::types::field_list::FieldList;
    pub use crate::types::generic_uri::GenericUri;
    pub use crate::types::headers::{h, HeaderId, HeaderType, MultiHeader, SingleHeader};
    pub use crate::types::message::Message;
    pub use crate::types::mime::Mime;
    pub use crate::types::name_addr::NameAddr;
    pub use crate::types::params::{p, ParamId, ParamKind, ParamValue, ParameterList};
    pub use crate::types::rack::RAckCategory;
    pub use crate::types::string_category::StringCategory;
    pub use crate::types::token::Token;
    pub use crate::types::uint32::UInt32Category;
    pub use crate::types::uri::Uri;
    pub use crate::types::via::Via;
    pub use crate::types::warning::WarningCategory;
}
