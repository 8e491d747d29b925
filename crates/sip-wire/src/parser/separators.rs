use nom::{
    bytes::complete::tag,
    combinator::recognize,
    sequence::{delimited, pair, terminated},
};

use super::whitespace::owsp;
use super::ParseResult;

// Separators with the surrounding optional whitespace RFC 3261 allows.

pub fn semi(input: &[u8]) -> ParseResult<&[u8]> {
    recognize(delimited(owsp, tag(b";"), owsp))(input)
}

pub fn comma(input: &[u8]) -> ParseResult<&[u8]> {
    recognize(delimited(owsp, tag(b","), owsp))(input)
}

pub fn equal(input: &[u8]) -> ParseResult<&[u8]> {
    recognize(delimited(owsp, tag(b"="), owsp))(input)
}

pub fn slash(input: &[u8]) -> ParseResult<&[u8]> {
    recognize(delimited(owsp, tag(b"/"), owsp))(input)
}

pub fn laquot(input: &[u8]) -> ParseResult<&[u8]> {
    // LAQUOT = SWS "<"
    recognize(pair(owsp, tag(b"<")))(input)
}

pub fn raquot(input: &[u8]) -> ParseResult<&[u8]> {
    // RAQUOT = ">" SWS
    recognize(terminated(tag(b">"), owsp))(input)
}
