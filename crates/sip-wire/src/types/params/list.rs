//! # Parameter lists
//!
//! Every structured value that can carry `;name=value` decorations holds a
//! [`ParameterList`]. Parameters are split out when the enclosing header is
//! decoded, but their values are only decoded when asked for: a header with
//! a malformed `ttl` still yields its `branch`, and the `ttl` error is
//! reported only to the caller that reads `ttl`.
//!
//! Parameters that were never accessed are written back exactly as they were
//! received, including names in their original case, quoting and unknown
//! parameters.
//!
//! ```rust
//! use rvoip_sip_wire::prelude::*;
//!
//! let mut params = ParameterList::parse_str(";branch=z9hG4bK776;ttl=xyz;x-foo").unwrap();
//! assert_eq!(params.param(p::Branch).unwrap(), "z9hG4bK776");
//! assert!(params.param(p::Ttl).is_err());
//! assert!(params.has_unknown("X-FOO"));
//! assert_eq!(params.to_string(), ";branch=z9hG4bK776;ttl=xyz;x-foo");
//! ```

use std::fmt;

use nom::{
    branch::alt,
    bytes::complete::take_while1,
    combinator::opt,
    multi::many0,
    sequence::{pair, preceded},
};

use crate::error::{DecodeError, Error, Result};
use crate::parser::separators::{comma, equal, semi};
use crate::parser::token::{quoted_string_raw, to_string};
use crate::parser::whitespace::owsp;
use crate::parser::ParseResult;

use super::param_id::ParamId;
use super::registry::{registry, ParamValue};
use super::typed::{ParamType, ParamValueType};

/// How parameters are delimited when written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParamStyle {
    /// `;a=1;b` after a value
    #[default]
    Semicolon,
    /// `a=1, b=2` as in credentials and challenges
    Comma,
}

/// One `name[=value]` decoration.
#[derive(Debug, Clone)]
pub struct Parameter {
    id: Option<ParamId>,
    /// Name as received, or the canonical name when created locally
    name: String,
    /// Value text as received, quotes included
    literal: Option<String>,
    decoded: Option<std::result::Result<ParamValue, DecodeError>>,
    /// Set once the value was handed out mutably
    modified: bool,
}

impl Parameter {
    fn scanned(name: &str, literal: Option<&str>) -> Self {
        Parameter {
            id: ParamId::lookup(name.as_bytes()),
            name: name.to_string(),
            literal: literal.map(str::to_string),
            decoded: None,
            modified: false,
        }
    }

    pub fn id(&self) -> Option<ParamId> {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Value text as received, if any.
    pub fn literal(&self) -> Option<&str> {
        self.literal.as_deref()
    }

    pub fn is_decoded(&self) -> bool {
        self.decoded.is_some()
    }

    fn decode(&mut self, id: ParamId) -> std::result::Result<&mut ParamValue, DecodeError> {
        let literal = self.literal.as_deref();
        let slot = self
            .decoded
            .get_or_insert_with(|| registry().decode(id, literal));
        match slot {
            Ok(value) => Ok(value),
            Err(e) => Err(e.clone()),
        }
    }

    fn encode(&self, out: &mut String) {
        match (&self.decoded, self.id) {
            (Some(Ok(value)), Some(id)) if self.modified => {
                out.push_str(&self.name);
                let mut text = String::new();
                if value.encode(id.def().quoted, &mut text) {
                    out.push('=');
                    out.push_str(&text);
                }
            }
            _ => {
                out.push_str(&self.name);
                if let Some(literal) = &self.literal {
                    out.push('=');
                    out.push_str(literal);
                }
            }
        }
    }

    /// Name in lower case with the value as it would be written.
    fn comparable(&self) -> (String, Option<String>) {
        let mut text = String::new();
        self.encode(&mut text);
        let value = text.split_once('=').map(|(_, v)| v.to_string());
        (self.name.to_ascii_lowercase(), value)
    }
}

fn is_value_char(c: u8) -> bool {
    !matches!(c, b';' | b',' | b'?' | b'>' | b'<' | b'"' | b'=' | b' ' | b'\t' | b'\r' | b'\n')
}

fn param_name(input: &[u8]) -> ParseResult<&[u8]> {
    take_while1(|c: u8| c != b'=' && is_value_char(c))(input)
}

fn param_value(input: &[u8]) -> ParseResult<&[u8]> {
    alt((quoted_string_raw, take_while1(is_value_char)))(input)
}

// generic-param = token [ EQUAL gen-value ]
fn generic_param(input: &[u8]) -> ParseResult<(&[u8], Option<&[u8]>)> {
    pair(param_name, opt(preceded(equal, param_value)))(input)
}

/// Ordered parameters of one structured value.
#[derive(Debug, Clone, Default)]
pub struct ParameterList {
    params: Vec<Parameter>,
    style: ParamStyle,
}

impl ParameterList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_style(style: ParamStyle) -> Self {
        ParameterList {
            params: Vec::new(),
            style,
        }
    }

    pub fn style(&self) -> ParamStyle {
        self.style
    }

    /// Parses `*(SEMI generic-param)`, stopping at the first byte that does
    /// not continue the list.
    pub fn parse_semicolon(input: &[u8]) -> ParseResult<ParameterList> {
        let (rem, pairs) = many0(preceded(semi, generic_param))(input)?;
        Ok((rem, Self::from_pairs(pairs, ParamStyle::Semicolon)))
    }

    /// Parses `generic-param *(COMMA generic-param)` as used by credentials
    /// and challenges.
    pub fn parse_comma(input: &[u8]) -> ParseResult<ParameterList> {
        let (rem, first) = preceded(owsp, generic_param)(input)?;
        let (rem, rest) = many0(preceded(comma, generic_param))(rem)?;
        let mut pairs = Vec::with_capacity(rest.len() + 1);
        pairs.push(first);
        pairs.extend(rest);
        Ok((rem, Self::from_pairs(pairs, ParamStyle::Comma)))
    }

    /// Parses a complete `;`-style list, e.g. `";branch=z9hG4bK776;lr"`.
    pub fn parse_str(text: &str) -> Result<ParameterList> {
        let (rem, list) = Self::parse_semicolon(text.as_bytes())
            .map_err(|_| DecodeError::new("parameters", format!("cannot parse '{}'", text)))?;
        let (rem, _) = owsp(rem).map_err(|_| DecodeError::new("parameters", "invalid input"))?;
        if !rem.is_empty() {
            return Err(DecodeError::new(
                "parameters",
                format!("unexpected '{}'", String::from_utf8_lossy(rem)),
            )
            .into());
        }
        Ok(list)
    }

    fn from_pairs(pairs: Vec<(&[u8], Option<&[u8]>)>, style: ParamStyle) -> ParameterList {
        let params = pairs
            .into_iter()
            .map(|(name, value)| {
                let name = to_string(name);
                let value = value.map(to_string);
                Parameter::scanned(&name, value.as_deref())
            })
            .collect();
        ParameterList { params, style }
    }

    fn position(&self, id: ParamId) -> Option<usize> {
        self.params.iter().position(|p| p.id == Some(id))
    }

    fn position_unknown(&self, name: &str) -> Option<usize> {
        self.params
            .iter()
            .position(|p| p.id.is_none() && p.name.eq_ignore_ascii_case(name))
    }

    /// Returns the decoded value of a parameter, creating it with an empty
    /// value if it is absent.
    ///
    /// Decoding happens on first access and the result, including a failure,
    /// is cached.
    pub fn param<P: ParamType>(&mut self, _param: P) -> Result<&mut P::Value> {
        let id = P::ID;
        let index = match self.position(id) {
            Some(i) => i,
            None => {
                self.params.push(Parameter {
                    id: Some(id),
                    name: id.canonical_name().to_string(),
                    literal: None,
                    decoded: Some(Ok(ParamValue::default_for(id.kind()))),
                    modified: true,
                });
                self.params.len() - 1
            }
        };
        let entry = &mut self.params[index];
        entry.modified = true;
        let value = entry.decode(id).map_err(Error::Decode)?;
        <P::Value as ParamValueType>::project(value).ok_or_else(|| {
            Error::Decode(DecodeError::new(
                format!("{} parameter", id),
                "value has a different kind",
            ))
        })
    }

    /// Decodes a parameter without creating it or marking it modified.
    pub fn get(&mut self, id: ParamId) -> Option<Result<&ParamValue>> {
        let index = self.position(id)?;
        Some(
            self.params[index]
                .decode(id)
                .map(|v| &*v)
                .map_err(Error::Decode),
        )
    }

    /// Replaces a parameter's value, appending it when absent.
    pub fn set<P: ParamType>(&mut self, param: P, value: P::Value) -> Result<()> {
        *self.param(param)? = value;
        Ok(())
    }

    /// True if the parameter is present. Never creates or decodes it.
    pub fn exists_param<P: ParamType>(&self, _param: P) -> bool {
        self.position(P::ID).is_some()
    }

    pub fn remove_param<P: ParamType>(&mut self, _param: P) {
        self.params.retain(|p| p.id != Some(P::ID));
    }

    pub fn has_unknown(&self, name: &str) -> bool {
        self.position_unknown(name).is_some()
    }

    /// Literal value of an unrecognized parameter, `Some("")` when it has no
    /// value.
    pub fn unknown_value(&self, name: &str) -> Option<&str> {
        self.position_unknown(name)
            .map(|i| self.params[i].literal.as_deref().unwrap_or(""))
    }

    /// Adds or replaces an unrecognized parameter. The value is written as
    /// given, so callers quote it themselves when needed.
    pub fn set_unknown(&mut self, name: &str, value: Option<&str>) {
        match self.position_unknown(name) {
            Some(i) => self.params[i].literal = value.map(str::to_string),
            None => self.params.push(Parameter {
                id: None,
                name: name.to_string(),
                literal: value.map(str::to_string),
                decoded: None,
                modified: true,
            }),
        }
    }

    pub fn remove_unknown(&mut self, name: &str) {
        self.params
            .retain(|p| !(p.id.is_none() && p.name.eq_ignore_ascii_case(name)));
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Parameter> {
        self.params.iter()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Writes the list in its style, with the leading `;` for the
    /// semicolon style.
    pub fn encode(&self, out: &mut String) {
        for (i, param) in self.params.iter().enumerate() {
            match self.style {
                ParamStyle::Semicolon => out.push(';'),
                ParamStyle::Comma if i > 0 => out.push_str(", "),
                ParamStyle::Comma => {}
            }
            param.encode(out);
        }
    }
}

impl PartialEq for ParameterList {
    fn eq(&self, other: &Self) -> bool {
        self.params.len() == other.params.len()
            && self
                .params
                .iter()
                .zip(other.params.iter())
                .all(|(a, b)| a.comparable() == b.comparable())
    }
}

impl fmt::Display for ParameterList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        self.encode(&mut out);
        f.write_str(&out)
    }
}
