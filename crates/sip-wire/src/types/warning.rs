use std::fmt;

use nom::{
    bytes::complete::{take_while1, take_while_m_n},
    combinator::map_res,
    sequence::tuple,
};

use crate::error::DecodeError;
use crate::parser::token::{quoted_string, to_string, write_quoted};
use crate::parser::whitespace::lws;
use crate::types::category::parse_complete;

/// warning-value = warn-code SP warn-agent SP warn-text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WarningCategory {
    pub code: u16,
    /// host[:port] or a pseudonym
    pub agent: String,
    pub text: String,
}

impl WarningCategory {
    pub fn new(code: u16, agent: impl Into<String>, text: impl Into<String>) -> Self {
        WarningCategory {
            code,
            agent: agent.into(),
            text: text.into(),
        }
    }

    pub fn parse(text: &[u8]) -> Result<Self, DecodeError> {
        let (code, _, agent, _, warn_text) = parse_complete(
            "Warning",
            text,
            tuple((
                map_res(take_while_m_n(3, 3, |c: u8| c.is_ascii_digit()), |d: &[u8]| {
                    to_string(d).parse::<u16>()
                }),
                lws,
                take_while1(|c: u8| !c.is_ascii_whitespace() && c != b'"'),
                lws,
                quoted_string,
            )),
        )?;
        Ok(WarningCategory {
            code,
            agent: to_string(agent),
            text: warn_text,
        })
    }
}

impl fmt::Display for WarningCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut quoted = String::new();
        write_quoted(&self.text, &mut quoted);
        write!(f, "{:03} {} {}", self.code, self.agent, quoted)
    }
}
