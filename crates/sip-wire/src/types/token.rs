use std::fmt;

use nom::sequence::pair;

use crate::error::DecodeError;
use crate::parser::token::{to_string, token};
use crate::types::category::parse_complete;
use crate::types::params::ParameterList;

/// A token with optional parameters.
///
/// Used by headers such as Allow, Supported, Event, Priority,
/// Subscription-State and Content-Disposition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Token {
    pub value: String,
    pub params: ParameterList,
}

impl Token {
    pub fn new(value: impl Into<String>) -> Self {
        Token {
            value: value.into(),
            params: ParameterList::new(),
        }
    }

    pub fn parse(text: &[u8]) -> Result<Self, DecodeError> {
        let (value, params) = parse_complete("token", text, pair(token, ParameterList::parse_semicolon))?;
        Ok(Token {
            value: to_string(value),
            params,
        })
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.params)
    }
}
