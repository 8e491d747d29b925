use std::fmt;

use nom::{
    combinator::opt,
    sequence::{preceded, tuple},
};

use crate::error::DecodeError;
use crate::parser::token::{comment, parse_u32, to_string};
use crate::parser::whitespace::owsp;
use crate::types::category::parse_complete;
use crate::types::params::ParameterList;

/// An unsigned integer with an optional comment and parameters.
///
/// Covers Content-Length, Max-Forwards, Expires, Min-Expires, RSeq,
/// Session-Expires (`1800;refresher=uac`) and Retry-After
/// (`120 (in a meeting);duration=3600`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UInt32Category {
    pub value: u32,
    pub comment: Option<String>,
    pub params: ParameterList,
}

impl UInt32Category {
    pub fn new(value: u32) -> Self {
        UInt32Category {
            value,
            ..Default::default()
        }
    }

    pub fn parse(text: &[u8]) -> Result<Self, DecodeError> {
        let (value, comment, params) = parse_complete(
            "integer",
            text,
            tuple((
                parse_u32,
                opt(preceded(owsp, comment)),
                ParameterList::parse_semicolon,
            )),
        )?;
        Ok(UInt32Category {
            value,
            comment: comment.map(to_string),
            params,
        })
    }
}

impl fmt::Display for UInt32Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)?;
        if let Some(comment) = &self.comment {
            write!(f, " ({})", comment)?;
        }
        write!(f, "{}", self.params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::params::p;

    #[test]
    fn test_plain_number() {
        let v = UInt32Category::parse(b"7200").unwrap();
        assert_eq!(v.value, 7200);
        assert_eq!(v.to_string(), "7200");
    }

    #[test]
    fn test_retry_after_with_comment() {
        let mut v = UInt32Category::parse(b"120 (I'm in a meeting);duration=3600").unwrap();
        assert_eq!(v.value, 120);
        assert_eq!(v.comment.as_deref(), Some("I'm in a meeting"));
        assert_eq!(*v.params.param(p::Duration).unwrap(), 3600);
        assert_eq!(v.to_string(), "120 (I'm in a meeting);duration=3600");
    }

    #[test]
    fn test_invalid() {
        assert!(UInt32Category::parse(b"").is_err());
        assert!(UInt32Category::parse(b"-5").is_err());
        assert!(UInt32Category::parse(b"4294967296").is_err());
        assert!(UInt32Category::parse(b"12abc").is_err());
    }
}
