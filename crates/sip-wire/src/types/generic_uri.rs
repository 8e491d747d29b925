use std::fmt;

use nom::{
    bytes::complete::take_till1,
    sequence::{delimited, pair},
};

use crate::error::DecodeError;
use crate::parser::separators::{laquot, raquot};
use crate::parser::token::to_string;
use crate::types::category::parse_complete;
use crate::types::params::ParameterList;

/// An absolute URI in angle brackets with parameters.
///
/// Call-Info, Alert-Info and Error-Info carry URIs of any scheme
/// (`<http://www.example.com/alice/photo.jpg>;purpose=icon`), so the URI is
/// kept as text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenericUri {
    pub uri: String,
    pub params: ParameterList,
}

impl GenericUri {
    pub fn new(uri: impl Into<String>) -> Self {
        GenericUri {
            uri: uri.into(),
            params: ParameterList::new(),
        }
    }

    pub fn parse(text: &[u8]) -> Result<Self, DecodeError> {
        let (uri, params) = parse_complete(
            "URI",
            text,
            pair(
                delimited(laquot, take_till1(|c| c == b'>'), raquot),
                ParameterList::parse_semicolon,
            ),
        )?;
        if !uri.contains(&b':') {
            return Err(DecodeError::new("URI", format!("'{}' is not absolute", to_string(uri))));
        }
        Ok(GenericUri {
            uri: to_string(uri),
            params,
        })
    }
}

impl fmt::Display for GenericUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>{}", self.uri, self.params)
    }
}
