//! Header identities and typed header markers

pub mod header_id;
pub mod typed;

pub use header_id::{HeaderDef, HeaderId, Tokenizing};
pub use typed::{h, HeaderType, MultiHeader, SingleHeader};
