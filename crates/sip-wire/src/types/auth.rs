use std::fmt;

use nom::sequence::{pair, preceded};

use crate::error::DecodeError;
use crate::parser::token::{to_string, token};
use crate::parser::whitespace::{lws, owsp};
use crate::types::category::parse_complete;
use crate::types::params::{ParamStyle, ParameterList};

/// Credentials or a challenge: an auth scheme followed by comma separated
/// parameters.
///
/// Authorization, Proxy-Authorization, WWW-Authenticate and
/// Proxy-Authenticate values start with a scheme (`Digest realm="x",
/// nonce="y"`); Authentication-Info has parameters only, in which case
/// `scheme` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Auth {
    pub scheme: String,
    pub params: ParameterList,
}

impl Default for Auth {
    fn default() -> Self {
        Auth {
            scheme: String::new(),
            params: ParameterList::with_style(ParamStyle::Comma),
        }
    }
}

impl Auth {
    pub fn new(scheme: impl Into<String>) -> Self {
        Auth {
            scheme: scheme.into(),
            ..Default::default()
        }
    }

    pub fn parse(text: &[u8]) -> Result<Self, DecodeError> {
        // a leading token followed by '=' is a parameter, not a scheme
        let params_only = match preceded(owsp, token)(text) {
            Ok((rem, _)) => {
                let rem = owsp(rem).map(|(r, _)| r).unwrap_or(rem);
                rem.first() == Some(&b'=')
            }
            Err(_) => false,
        };

        if params_only {
            let params = parse_complete("credentials", text, ParameterList::parse_comma)?;
            return Ok(Auth {
                scheme: String::new(),
                params,
            });
        }

        let (scheme, rest) = parse_complete("credentials", text, |i| {
            let (i, scheme) = token(i)?;
            if i.is_empty() {
                return Ok((i, (scheme, None)));
            }
            let (i, params) = preceded(lws, ParameterList::parse_comma)(i)?;
            Ok((i, (scheme, Some(params))))
        })?;
        Ok(Auth {
            scheme: to_string(scheme),
            params: rest.unwrap_or_else(|| ParameterList::with_style(ParamStyle::Comma)),
        })
    }
}

impl fmt::Display for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.scheme.is_empty(), self.params.is_empty()) {
            (true, _) => write!(f, "{}", self.params),
            (false, true) => f.write_str(&self.scheme),
            (false, false) => write!(f, "{} {}", self.scheme, self.params),
        }
    }
}
