//! # Field categories
//!
//! Every header value is decoded with one of a small set of grammars. A
//! [`FieldKind`] names the grammar, [`FieldValue`] holds a decoded value of
//! any grammar, and [`ParserCategory`] is implemented by each grammar's
//! structured type so typed accessors can move between the two.
//!
//! Decoding always sees the value with folds already replaced by a single
//! space and surrounding whitespace trimmed. Encoding is the type's
//! `Display` implementation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::parser::whitespace::owsp;
use crate::parser::ParseResult;

use super::auth::Auth;
use super::call_id::CallIdCategory;
use super::cseq::CSeqCategory;
use super::date::DateCategory;
use super::generic_uri::GenericUri;
use super::mime::Mime;
use super::name_addr::NameAddr;
use super::rack::RAckCategory;
use super::string_category::StringCategory;
use super::token::Token;
use super::uint32::UInt32Category;
use super::via::Via;
use super::warning::WarningCategory;

/// A structured header value type.
pub trait ParserCategory:
    Clone + Default + PartialEq + fmt::Debug + fmt::Display + Sized + 'static
{
    const KIND: FieldKind;

    /// Decodes an unfolded, trimmed header value.
    fn decode(text: &[u8]) -> Result<Self, DecodeError>;

    fn into_value(self) -> FieldValue;

    fn from_value(value: &FieldValue) -> Option<&Self>;

    fn from_value_mut(value: &mut FieldValue) -> Option<&mut Self>;

    fn from_owned(value: FieldValue) -> Option<Self>;
}

macro_rules! define_categories {
    ($( $kind:ident => $ty:ty, $comma:literal; )*) => {
        /// Grammar a header value is decoded with
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum FieldKind {
            $( $kind, )*
        }

        impl FieldKind {
            /// True if several values of this grammar may share one line,
            /// separated by commas.
            pub fn is_comma_tokenizing(self) -> bool {
                match self {
                    $( FieldKind::$kind => $comma, )*
                }
            }
        }

        /// A decoded header value of any grammar
        #[derive(Debug, Clone, PartialEq)]
        pub enum FieldValue {
            $( $kind($ty), )*
        }

        impl FieldValue {
            /// Decodes `text` with the grammar of `kind`.
            pub fn decode(kind: FieldKind, text: &[u8]) -> Result<FieldValue, DecodeError> {
                match kind {
                    $( FieldKind::$kind => <$ty as ParserCategory>::decode(text).map(FieldValue::$kind), )*
                }
            }

            /// The empty value of a grammar, used when a header is created on
            /// access.
            pub fn default_for(kind: FieldKind) -> FieldValue {
                match kind {
                    $( FieldKind::$kind => FieldValue::$kind(<$ty>::default()), )*
                }
            }

            pub fn kind(&self) -> FieldKind {
                match self {
                    $( FieldValue::$kind(_) => FieldKind::$kind, )*
                }
            }
        }

        impl fmt::Display for FieldValue {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $( FieldValue::$kind(v) => fmt::Display::fmt(v, f), )*
                }
            }
        }

        $(
            impl ParserCategory for $ty {
                const KIND: FieldKind = FieldKind::$kind;

                fn decode(text: &[u8]) -> Result<Self, DecodeError> {
                    <$ty>::parse(text)
                }

                fn into_value(self) -> FieldValue {
                    FieldValue::$kind(self)
                }

                fn from_value(value: &FieldValue) -> Option<&Self> {
                    match value {
                        FieldValue::$kind(v) => Some(v),
                        _ => None,
                    }
                }

                fn from_value_mut(value: &mut FieldValue) -> Option<&mut Self> {
                    match value {
                        FieldValue::$kind(v) => Some(v),
                        _ => None,
                    }
                }

                fn from_owned(value: FieldValue) -> Option<Self> {
                    match value {
                        FieldValue::$kind(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

define_categories! {
    Token => Token, true;
    NameAddr => NameAddr, true;
    UInt32 => UInt32Category, true;
    CallId => CallIdCategory, true;
    CSeq => CSeqCategory, true;
    Date => DateCategory, false;
    Via => Via, true;
    Mime => Mime, true;
    GenericUri => GenericUri, true;
    Auth => Auth, false;
    Warning => WarningCategory, true;
    RAck => RAckCategory, true;
    StringCategory => StringCategory, false;
}

/// Runs `parser` over the whole of `text`.
///
/// Trailing whitespace is allowed, anything else left over is an error
/// naming `what`.
pub(crate) fn parse_complete<'a, O>(
    what: &str,
    text: &'a [u8],
    parser: impl FnOnce(&'a [u8]) -> ParseResult<'a, O>,
) -> Result<O, DecodeError> {
    let (rem, value) = parser(text).map_err(|_| {
        DecodeError::new(what, format!("cannot parse '{}'", String::from_utf8_lossy(text)))
    })?;
    let rem = match owsp(rem) {
        Ok((rem, _)) => rem,
        Err(_) => rem,
    };
    if !rem.is_empty() {
        return Err(DecodeError::new(
            what,
            format!("unexpected '{}'", String::from_utf8_lossy(rem)),
        ));
    }
    Ok(value)
}
