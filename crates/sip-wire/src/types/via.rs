//! # Via header values
//!
//! ```text
//! Via: SIP/2.0/UDP pc33.atlanta.com:5060;branch=z9hG4bK776asdhds;received=192.0.2.1
//! ```
//!
//! A Via value names the protocol and transport a hop used, the address
//! responses go back to (`sent-by`), and parameters such as `branch`,
//! `received`, `rport`, `maddr` and `ttl`. Several values may be joined with
//! commas on one line or spread over several Via lines; each value is one
//! [`Via`].
//!
//! Parameters are decoded on access. A value with a malformed `ttl` still
//! decodes, and only reading `ttl` reports the problem:
//!
//! ```rust
//! use rvoip_sip_wire::prelude::*;
//!
//! let mut via = Via::parse(b"SIP/2.0/UDP a.example.com:5060;branch=ok;ttl=xyz").unwrap();
//! assert_eq!(via.transport, "UDP");
//! assert_eq!(via.port, Some(5060));
//! assert_eq!(via.params.param(p::Branch).unwrap(), "ok");
//! assert!(via.params.param(p::Ttl).is_err());
//! ```

use std::fmt;

use nom::{bytes::complete::take_while1, sequence::tuple};

use crate::error::DecodeError;
use crate::parser::separators::slash;
use crate::parser::token::{to_string, token};
use crate::parser::whitespace::lws;
use crate::types::category::parse_complete;
use crate::types::params::ParameterList;
use crate::types::uri::split_host_port;

#[derive(Debug, Clone, PartialEq)]
pub struct Via {
    pub protocol_name: String,
    pub protocol_version: String,
    pub transport: String,
    pub host: String,
    pub port: Option<u16>,
    pub params: ParameterList,
}

impl Default for Via {
    fn default() -> Self {
        Via {
            protocol_name: "SIP".to_string(),
            protocol_version: "2.0".to_string(),
            transport: "UDP".to_string(),
            host: String::new(),
            port: None,
            params: ParameterList::new(),
        }
    }
}

fn is_sent_by_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'.' | b'-' | b'_' | b'[' | b']' | b':')
}

impl Via {
    pub fn new(transport: impl Into<String>, host: impl Into<String>, port: Option<u16>) -> Self {
        Via {
            transport: transport.into(),
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn parse(text: &[u8]) -> Result<Self, DecodeError> {
        let (name, _, version, _, transport, _, sent_by, params) = parse_complete(
            "Via",
            text,
            tuple((
                token,
                slash,
                token,
                slash,
                token,
                lws,
                take_while1(is_sent_by_char),
                ParameterList::parse_semicolon,
            )),
        )?;
        let (host, port) = split_host_port(sent_by).ok_or_else(|| {
            DecodeError::new("Via", format!("invalid sent-by '{}'", String::from_utf8_lossy(sent_by)))
        })?;
        Ok(Via {
            protocol_name: to_string(name),
            protocol_version: to_string(version),
            transport: to_string(transport),
            host,
            port,
            params,
        })
    }

    /// `host[:port]` as written in the value.
    pub fn sent_by(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        }
    }
}

impl fmt::Display for Via {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{} {}{}",
            self.protocol_name,
            self.protocol_version,
            self.transport,
            self.sent_by(),
            self.params
        )
    }
}
