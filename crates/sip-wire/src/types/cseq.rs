use std::fmt;

use nom::sequence::separated_pair;

use crate::error::DecodeError;
use crate::parser::token::{parse_u32, to_string, token};
use crate::parser::whitespace::lws;
use crate::types::category::parse_complete;

/// CSeq = 1*DIGIT LWS Method
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CSeqCategory {
    pub sequence: u32,
    pub method: String,
}

impl CSeqCategory {
    pub fn new(sequence: u32, method: impl Into<String>) -> Self {
        CSeqCategory {
            sequence,
            method: method.into(),
        }
    }

    pub fn parse(text: &[u8]) -> Result<Self, DecodeError> {
        let (sequence, method) = parse_complete("CSeq", text, separated_pair(parse_u32, lws, token))?;
        Ok(CSeqCategory {
            sequence,
            method: to_string(method),
        })
    }
}

impl fmt::Display for CSeqCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.sequence, self.method)
    }
}
