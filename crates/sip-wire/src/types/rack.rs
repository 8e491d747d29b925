use std::fmt;

use nom::sequence::tuple;

use crate::error::DecodeError;
use crate::parser::token::{parse_u32, to_string, token};
use crate::parser::whitespace::lws;
use crate::types::category::parse_complete;

/// RAck = response-num LWS CSeq-num LWS Method (RFC 3262)
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct RAckCategory {
    pub response_num: u32,
    pub cseq_num: u32,
    pub method: String,
}

impl RAckCategory {
    pub fn parse(text: &[u8]) -> Result<Self, DecodeError> {
        let (response_num, _, cseq_num, _, method) =
            parse_complete("RAck", text, tuple((parse_u32, lws, parse_u32, lws, token)))?;
        Ok(RAckCategory {
            response_num,
            cseq_num,
            method: to_string(method),
        })
    }
}

impl fmt::Display for RAckCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.response_num, self.cseq_num, self.method)
    }
}
