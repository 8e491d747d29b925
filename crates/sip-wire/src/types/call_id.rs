use std::fmt;

use nom::{
    bytes::complete::tag,
    combinator::{opt, recognize},
    sequence::pair,
};

use crate::error::DecodeError;
use crate::parser::token::{to_string, word};
use crate::types::category::parse_complete;
use crate::types::params::ParameterList;

/// callid = word [ "@" word ], with parameters for Replaces
/// (`abc@host;to-tag=1;from-tag=2`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CallIdCategory {
    pub value: String,
    pub params: ParameterList,
}

impl CallIdCategory {
    pub fn new(value: impl Into<String>) -> Self {
        CallIdCategory {
            value: value.into(),
            params: ParameterList::new(),
        }
    }

    pub fn parse(text: &[u8]) -> Result<Self, DecodeError> {
        let (value, params) = parse_complete(
            "Call-ID",
            text,
            pair(
                recognize(pair(word, opt(pair(tag(b"@"), word)))),
                ParameterList::parse_semicolon,
            ),
        )?;
        Ok(CallIdCategory {
            value: to_string(value),
            params,
        })
    }
}

impl fmt::Display for CallIdCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.params)
    }
}
