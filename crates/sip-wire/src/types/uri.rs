//! # URIs inside header values
//!
//! A light URI model: `sip:` and `sips:` URIs are split into user, host,
//! port, parameters and headers; any other scheme keeps everything after
//! the colon as opaque text. URI parameters use the same lazily decoded
//! [`ParameterList`] as header parameters, so `;lr` or `;transport=tcp` can
//! be read with the typed parameter markers.
//!
//! ```rust
//! use rvoip_sip_wire::prelude::*;
//! use rvoip_sip_wire::types::uri::Uri;
//!
//! let mut uri = Uri::parse(b"sip:alice@atlanta.com:5060;transport=tcp").unwrap();
//! assert_eq!(uri.user.as_deref(), Some("alice"));
//! assert_eq!(uri.host, "atlanta.com");
//! assert_eq!(uri.port, Some(5060));
//! assert_eq!(uri.params.param(p::Transport).unwrap(), "tcp");
//!
//! let tel = Uri::parse(b"tel:+1-201-555-0123").unwrap();
//! assert_eq!(tel.opaque.as_deref(), Some("+1-201-555-0123"));
//! ```

use std::fmt;

use crate::error::DecodeError;
use crate::parser::token::to_string;
use crate::types::params::ParameterList;

#[derive(Debug, Clone, PartialEq)]
pub struct Uri {
    pub scheme: String,
    pub user: Option<String>,
    pub host: String,
    pub port: Option<u16>,
    pub params: ParameterList,
    pub headers: Option<String>,
    /// Everything after `scheme:` for schemes other than sip and sips
    pub opaque: Option<String>,
}

impl Default for Uri {
    fn default() -> Self {
        Uri {
            scheme: "sip".to_string(),
            user: None,
            host: String::new(),
            port: None,
            params: ParameterList::new(),
            headers: None,
            opaque: None,
        }
    }
}

fn is_scheme_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'+' || c == b'-' || c == b'.'
}

fn uri_error(text: &[u8], reason: &str) -> DecodeError {
    DecodeError::new("URI", format!("'{}': {}", String::from_utf8_lossy(text), reason))
}

impl Uri {
    pub fn sip(user: Option<&str>, host: impl Into<String>) -> Self {
        Uri {
            user: user.map(str::to_string),
            host: host.into(),
            ..Default::default()
        }
    }

    /// Parses a complete URI with no surrounding text.
    pub fn parse(text: &[u8]) -> Result<Self, DecodeError> {
        let colon = text
            .iter()
            .position(|&c| c == b':')
            .ok_or_else(|| uri_error(text, "missing scheme"))?;
        let (scheme, rest) = (&text[..colon], &text[colon + 1..]);
        if scheme.is_empty() || !scheme.iter().all(|&c| is_scheme_char(c)) {
            return Err(uri_error(text, "invalid scheme"));
        }
        if rest.is_empty() || rest.iter().any(|c| c.is_ascii_whitespace()) {
            return Err(uri_error(text, "invalid characters"));
        }

        let mut uri = Uri {
            scheme: to_string(scheme),
            ..Default::default()
        };
        if !(scheme.eq_ignore_ascii_case(b"sip") || scheme.eq_ignore_ascii_case(b"sips")) {
            uri.opaque = Some(to_string(rest));
            return Ok(uri);
        }

        let (main, headers) = match rest.iter().position(|&c| c == b'?') {
            Some(q) => (&rest[..q], Some(&rest[q + 1..])),
            None => (rest, None),
        };
        uri.headers = headers.map(to_string);

        // user part may itself contain ';', so look for '@' first
        let (user, host_and_params) = match main.iter().rposition(|&c| c == b'@') {
            Some(at) => (Some(&main[..at]), &main[at + 1..]),
            None => (None, main),
        };
        if let Some(user) = user {
            if user.is_empty() {
                return Err(uri_error(text, "empty user"));
            }
            uri.user = Some(to_string(user));
        }

        let (hostport, params) = match host_and_params.iter().position(|&c| c == b';') {
            Some(semi) => (&host_and_params[..semi], &host_and_params[semi..]),
            None => (host_and_params, &b""[..]),
        };
        let (host, port) = split_host_port(hostport).ok_or_else(|| uri_error(text, "invalid host or port"))?;
        uri.host = host;
        uri.port = port;

        let params = std::str::from_utf8(params).map_err(|_| uri_error(text, "invalid UTF-8"))?;
        uri.params = ParameterList::parse_str(params).map_err(|_| uri_error(text, "invalid parameters"))?;
        Ok(uri)
    }

    /// True for `sips:` URIs.
    pub fn is_secure(&self) -> bool {
        self.scheme.eq_ignore_ascii_case("sips")
    }
}

/// Splits `host[:port]`, where host may be a bracketed IPv6 reference.
pub(crate) fn split_host_port(hostport: &[u8]) -> Option<(String, Option<u16>)> {
    let (host, port) = if hostport.first() == Some(&b'[') {
        let close = hostport.iter().position(|&c| c == b']')?;
        let rest = &hostport[close + 1..];
        let port = match rest {
            [] => None,
            [b':', digits @ ..] => Some(digits),
            _ => return None,
        };
        (&hostport[..=close], port)
    } else {
        match hostport.iter().position(|&c| c == b':') {
            Some(colon) => (&hostport[..colon], Some(&hostport[colon + 1..])),
            None => (hostport, None),
        }
    };
    if host.is_empty()
        || !host
            .iter()
            .all(|&c| c.is_ascii_alphanumeric() || matches!(c, b'.' | b'-' | b'_' | b'[' | b']' | b':'))
    {
        return None;
    }
    let port = match port {
        Some(digits) => Some(std::str::from_utf8(digits).ok()?.parse::<u16>().ok()?),
        None => None,
    };
    Some((to_string(host), port))
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.scheme)?;
        if let Some(opaque) = &self.opaque {
            return f.write_str(opaque);
        }
        if let Some(user) = &self.user {
            write!(f, "{}@", user)?;
        }
        f.write_str(&self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        write!(f, "{}", self.params)?;
        if let Some(headers) = &self.headers {
            write!(f, "?{}", headers)?;
        }
        Ok(())
    }
}
