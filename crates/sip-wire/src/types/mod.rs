//! Message model and header value types
//!
//! Fields move through three layers: a [`RawField`] holds the bytes of one
//! value and caches its decoded form, a [`FieldList`] holds every value of
//! one header, and a [`Message`] holds the lists of all headers. The
//! remaining modules are the value grammars.

pub mod auth;
pub mod call_id;
pub mod category;
pub mod container;
pub mod cseq;
pub mod date;
pub mod field;
pub mod field_list;
pub mod generic_uri;
pub mod headers;
pub mod message;
pub mod mime;
pub mod name_addr;
pub mod params;
pub mod rack;
pub mod string_category;
pub mod token;
pub mod uint32;
pub mod uri;
pub mod via;
pub mod warning;

pub use auth::Auth;
pub use call_id::CallIdCategory;
pub use category::{FieldKind, FieldValue, ParserCategory};
pub use container::Container;
pub use cseq::CSeqCategory;
pub use date::DateCategory;
pub use field::RawField;
pub use field_list::FieldList;
pub use generic_uri::GenericUri;
pub use headers::{h, HeaderId, HeaderType, MultiHeader, SingleHeader};
pub use message::Message;
pub use mime::Mime;
pub use name_addr::NameAddr;
pub use params::{p, ParamId, ParamKind, ParamValue, ParameterList};
pub use rack::RAckCategory;
pub use string_category::StringCategory;
pub use token::Token;
pub use uint32::UInt32Category;
pub use uri::Uri;
pub use via::Via;
pub use warning::WarningCategory;
