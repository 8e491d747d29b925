use std::fmt;

use nom::{
    bytes::complete::{tag, take_till1},
    combinator::opt,
    sequence::{delimited, preceded},
};

use crate::error::DecodeError;
use crate::parser::separators::{laquot, raquot};
use crate::parser::token::{is_token, quoted_string, to_string, write_quoted};
use crate::parser::utils::trim;
use crate::parser::whitespace::owsp;
use crate::parser::ParseResult;
use crate::types::category::parse_complete;
use crate::types::params::ParameterList;
use crate::types::uri::Uri;

/// An address with optional display name and header parameters.
///
/// Used by From, To, Contact, Route, Record-Route, Refer-To and similar
/// headers. Both the `name-addr` form (`"Bob" <sip:bob@biloxi.com>;tag=1`)
/// and the bare `addr-spec` form (`sip:bob@biloxi.com;tag=1`) are accepted;
/// in the bare form, parameters after the URI belong to the header. The
/// Contact wildcard `*` is represented by `wildcard`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameAddr {
    pub display_name: Option<String>,
    pub uri: Uri,
    pub params: ParameterList,
    pub wildcard: bool,
}

fn angle_uri(input: &[u8]) -> ParseResult<&[u8]> {
    delimited(laquot, take_till1(|c| c == b'>'), raquot)(input)
}

fn display_and_uri(input: &[u8]) -> ParseResult<(Option<String>, &[u8])> {
    let (input, _) = owsp(input)?;
    if input.first() == Some(&b'"') {
        let (rem, display) = quoted_string(input)?;
        let (rem, uri) = angle_uri(rem)?;
        return Ok((rem, (Some(display), uri)));
    }
    // unquoted display name: everything up to '<'
    let (rem, display) = opt(take_till1(|c| c == b'<'))(input)?;
    let (rem, uri) = angle_uri(rem)?;
    let display = display.map(trim).filter(|d| !d.is_empty()).map(to_string);
    Ok((rem, (display, uri)))
}

fn addr_spec(input: &[u8]) -> ParseResult<&[u8]> {
    preceded(owsp, take_till1(|c| c == b';' || c == b' ' || c == b'\t'))(input)
}

impl NameAddr {
    pub fn new(uri: Uri) -> Self {
        NameAddr {
            uri,
            ..Default::default()
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn parse(text: &[u8]) -> Result<Self, DecodeError> {
        if text == b"*" {
            return Ok(NameAddr {
                wildcard: true,
                ..Default::default()
            });
        }
        let bracketed = text.contains(&b'<');
        let (display_name, uri, params) = if bracketed {
            let ((display, uri), params) = parse_complete("address", text, |i| {
                nom::sequence::pair(display_and_uri, ParameterList::parse_semicolon)(i)
            })?;
            (display, uri, params)
        } else {
            let (uri, params) = parse_complete("address", text, |i| {
                nom::sequence::pair(addr_spec, ParameterList::parse_semicolon)(i)
            })?;
            (None, uri, params)
        };
        let uri = Uri::parse(trim(uri))?;
        Ok(NameAddr {
            display_name,
            uri,
            params,
            wildcard: false,
        })
    }
}

impl fmt::Display for NameAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.wildcard {
            return f.write_str("*");
        }
        if let Some(name) = &self.display_name {
            if name.split(' ').all(is_token) {
                write!(f, "{} ", name)?;
            } else {
                let mut quoted = String::new();
                write_quoted(name, &mut quoted);
                write!(f, "{} ", quoted)?;
            }
        }
        write!(f, "<{}>{}", self.uri, self.params)
    }
}
