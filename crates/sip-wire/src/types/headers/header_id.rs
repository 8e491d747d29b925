//! # Header identities
//!
//! Every header this crate understands has a small integer identity,
//! [`HeaderId`]. The identity selects three things that never change at
//! runtime:
//!
//! - the canonical name written when a header is re-encoded from its
//!   structured form,
//! - whether the header may occur more than once (its multi-value attribute),
//! - the grammar its values are decoded with ([`FieldKind`]).
//!
//! Names are resolved with [`HeaderId::lookup`], which is case-insensitive,
//! understands the compact forms from RFC 3261 Section 7.3.3 and returns
//! `None` for anything unregistered. Unregistered headers are not an error;
//! the message keeps them in a separate list and writes them back untouched.
//!
//! ```rust
//! use rvoip_sip_wire::prelude::*;
//!
//! assert_eq!(HeaderId::lookup(b"call-id"), Some(HeaderId::CallId));
//! assert_eq!(HeaderId::lookup(b"i"), Some(HeaderId::CallId));
//! assert_eq!(HeaderId::CallId.canonical_name(), "Call-ID");
//! assert!(HeaderId::Via.is_multi());
//! assert_eq!(HeaderId::lookup(b"X-Custom"), None);
//! ```

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::hash::PerfectHash;
use crate::types::category::FieldKind;

/// Static description of one header identity.
#[derive(Debug, Clone, Copy)]
pub struct HeaderDef {
    pub id: HeaderId,
    pub name: &'static str,
    pub compact: Option<&'static str>,
    pub multi: bool,
    pub kind: FieldKind,
}

macro_rules! define_headers {
    ($( $(#[$meta:meta])* $variant:ident => $name:literal, $compact:expr, $multi:literal, $kind:ident; )*) => {
        /// Identity of a header known to this crate
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[repr(u8)]
        pub enum HeaderId {
            $( $(#[$meta])* $variant, )*
        }

        const HEADER_DEFS: &[HeaderDef] = &[
            $( HeaderDef {
                id: HeaderId::$variant,
                name: $name,
                compact: $compact,
                multi: $multi,
                kind: FieldKind::$kind,
            }, )*
        ];

        impl HeaderId {
            /// All identities in declaration order
            pub const ALL: &'static [HeaderId] = &[ $( HeaderId::$variant, )* ];
        }
    };
}

define_headers! {
    /// Via: path taken by the request so far
    Via => "Via", Some("v"), true, Via;
    /// Max-Forwards: hop limit
    MaxForwards => "Max-Forwards", None, false, UInt32;
    Route => "Route", None, true, NameAddr;
    RecordRoute => "Record-Route", None, true, NameAddr;
    Path => "Path", None, true, NameAddr;
    ServiceRoute => "Service-Route", None, true, NameAddr;
    ProxyRequire => "Proxy-Require", None, true, Token;
    Require => "Require", None, true, Token;
    Supported => "Supported", Some("k"), true, Token;
    Unsupported => "Unsupported", None, true, Token;
    Allow => "Allow", None, true, Token;
    AllowEvents => "Allow-Events", Some("u"), true, Token;
    Accept => "Accept", None, true, Mime;
    AcceptEncoding => "Accept-Encoding", None, true, Token;
    AcceptLanguage => "Accept-Language", None, true, Token;
    ContentLanguage => "Content-Language", None, true, Token;
    ContentDisposition => "Content-Disposition", None, false, Token;
    ContentEncoding => "Content-Encoding", Some("e"), false, Token;
    /// Content-Type: media type of the body
    ContentType => "Content-Type", Some("c"), false, Mime;
    /// Content-Length: size of the body in bytes
    ContentLength => "Content-Length", Some("l"), false, UInt32;
    MimeVersion => "MIME-Version", None, false, Token;
    /// Call-ID: unique identifier of the dialog
    CallId => "Call-ID", Some("i"), false, CallId;
    /// CSeq: command sequence number and method
    CSeq => "CSeq", None, false, CSeq;
    From => "From", Some("f"), false, NameAddr;
    To => "To", Some("t"), false, NameAddr;
    Contact => "Contact", Some("m"), true, NameAddr;
    ReplyTo => "Reply-To", None, false, NameAddr;
    ReferTo => "Refer-To", Some("r"), false, NameAddr;
    ReferredBy => "Referred-By", Some("b"), false, NameAddr;
    Expires => "Expires", None, false, UInt32;
    MinExpires => "Min-Expires", None, false, UInt32;
    SessionExpires => "Session-Expires", Some("x"), false, UInt32;
    MinSE => "Min-SE", None, false, UInt32;
    RSeq => "RSeq", None, false, UInt32;
    RAck => "RAck", None, false, RAck;
    RetryAfter => "Retry-After", None, false, UInt32;
    Date => "Date", None, false, Date;
    Timestamp => "Timestamp", None, false, StringCategory;
    Subject => "Subject", Some("s"), false, StringCategory;
    Server => "Server", None, false, StringCategory;
    UserAgent => "User-Agent", None, false, StringCategory;
    Organization => "Organization", None, false, StringCategory;
    Priority => "Priority", None, false, Token;
    Event => "Event", Some("o"), false, Token;
    SubscriptionState => "Subscription-State", None, false, Token;
    InReplyTo => "In-Reply-To", None, true, CallId;
    Replaces => "Replaces", None, false, CallId;
    Warning => "Warning", None, true, Warning;
    CallInfo => "Call-Info", None, true, GenericUri;
    AlertInfo => "Alert-Info", None, true, GenericUri;
    ErrorInfo => "Error-Info", None, true, GenericUri;
    Authorization => "Authorization", None, true, Auth;
    ProxyAuthorization => "Proxy-Authorization", None, true, Auth;
    WwwAuthenticate => "WWW-Authenticate", None, true, Auth;
    ProxyAuthenticate => "Proxy-Authenticate", None, true, Auth;
    AuthenticationInfo => "Authentication-Info", None, false, Auth;
    Reason => "Reason", None, true, Token;
    Privacy => "Privacy", None, true, Token;
    PAssertedIdentity => "P-Asserted-Identity", None, true, NameAddr;
    PPreferredIdentity => "P-Preferred-Identity", None, true, NameAddr;
    SipETag => "SIP-ETag", None, false, Token;
    SipIfMatch => "SIP-If-Match", None, false, Token;
}

static HEADER_TABLE: LazyLock<PerfectHash<HeaderId>> = LazyLock::new(|| {
    let mut keys: Vec<(&'static str, HeaderId)> = Vec::with_capacity(HEADER_DEFS.len() * 2);
    for def in HEADER_DEFS {
        keys.push((def.name, def.id));
        if let Some(compact) = def.compact {
            keys.push((compact, def.id));
        }
    }
    PerfectHash::build(&keys)
});

/// Whether the scanner splits a header's values at top-level commas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tokenizing {
    /// The whole line (with continuations) is one value
    Single,
    /// Values are separated by commas outside quotes and angle brackets
    CommaSeparated,
}

impl HeaderId {
    /// Number of known header identities
    pub const COUNT: usize = HEADER_DEFS.len();

    /// Resolves a header name, ignoring case. Compact forms are accepted.
    pub fn lookup(name: &[u8]) -> Option<HeaderId> {
        HEADER_TABLE.get(name)
    }

    pub fn def(self) -> &'static HeaderDef {
        &HEADER_DEFS[self as usize]
    }

    /// Position of this identity in per-message field arrays
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn canonical_name(self) -> &'static str {
        self.def().name
    }

    pub fn compact_form(self) -> Option<&'static str> {
        self.def().compact
    }

    /// True if the header may legally occur more than once.
    pub fn is_multi(self) -> bool {
        self.def().multi
    }

    pub fn kind(self) -> FieldKind {
        self.def().kind
    }

    /// How the scanner delimits values of this header.
    ///
    /// Only multi-value headers are split, and only when their grammar has
    /// no bare commas of its own. Authorization values, for example, carry
    /// comma separated parameters and stay whole.
    pub fn tokenizing(self) -> Tokenizing {
        if self.is_multi() && self.kind().is_comma_tokenizing() {
            Tokenizing::CommaSeparated
        } else {
            Tokenizing::Single
        }
    }
}

impl fmt::Display for HeaderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}
