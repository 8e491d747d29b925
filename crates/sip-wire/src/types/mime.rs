use std::fmt;

use nom::sequence::tuple;

use crate::error::DecodeError;
use crate::parser::separators::slash;
use crate::parser::token::{to_string, token};
use crate::types::category::parse_complete;
use crate::types::params::ParameterList;

/// media-type = m-type SLASH m-subtype *(SEMI m-parameter)
///
/// Content-Type and Accept values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mime {
    pub media_type: String,
    pub subtype: String,
    pub params: ParameterList,
}

impl Mime {
    pub fn new(media_type: impl Into<String>, subtype: impl Into<String>) -> Self {
        Mime {
            media_type: media_type.into(),
            subtype: subtype.into(),
            params: ParameterList::new(),
        }
    }

    pub fn parse(text: &[u8]) -> Result<Self, DecodeError> {
        let (media_type, _, subtype, params) = parse_complete(
            "media type",
            text,
            tuple((token, slash, token, ParameterList::parse_semicolon)),
        )?;
        Ok(Mime {
            media_type: to_string(media_type),
            subtype: to_string(subtype),
            params,
        })
    }

    /// Case-insensitive comparison of type and subtype.
    pub fn is(&self, media_type: &str, subtype: &str) -> bool {
        self.media_type.eq_ignore_ascii_case(media_type) && self.subtype.eq_ignore_ascii_case(subtype)
    }
}

impl fmt::Display for Mime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}{}", self.media_type, self.subtype, self.params)
    }
}
