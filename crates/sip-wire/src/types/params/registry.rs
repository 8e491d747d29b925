//! # Parameter registry
//!
//! Binds every [`ParamId`] to the function that decodes its value and the
//! name it is written back with. The registry is built on first use and is
//! immutable afterwards, so it can be shared freely between threads.
//!
//! ```rust
//! use rvoip_sip_wire::types::params::{registry, ParamId, ParamValue};
//!
//! let reg = registry();
//! assert_eq!(reg.decode(ParamId::Ttl, Some("16")), Ok(ParamValue::Integer(16)));
//! assert!(reg.decode(ParamId::Ttl, Some("xyz")).is_err());
//! assert!(reg.decode(ParamId::Lr, Some("1")).is_err());
//! assert_eq!(reg.canonical_name(ParamId::Lr), "lr");
//! ```

use std::fmt;
use std::sync::LazyLock;

use ordered_float::NotNan;
use serde::{Deserialize, Serialize};

use crate::error::DecodeError;
use crate::parser::token::{is_token, unquote, write_quoted};

use super::param_id::{ParamId, ParamKind};

/// A decoded parameter value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParamValue {
    Text(String),
    Integer(u32),
    Float(NotNan<f32>),
    Exists(()),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Text(_) => ParamKind::Text,
            ParamValue::Integer(_) => ParamKind::Integer,
            ParamValue::Float(_) => ParamKind::Float,
            ParamValue::Exists(_) => ParamKind::Exists,
        }
    }

    /// The empty value of a kind, used when a parameter is created on access.
    pub fn default_for(kind: ParamKind) -> ParamValue {
        match kind {
            ParamKind::Text => ParamValue::Text(String::new()),
            ParamKind::Integer => ParamValue::Integer(0),
            ParamKind::Float => ParamValue::Float(NotNan::default()),
            ParamKind::Exists => ParamValue::Exists(()),
        }
    }

    /// Writes the value part, without the name or `=`. Returns false for
    /// presence-only values, which have nothing to write.
    pub fn encode(&self, quoted: bool, out: &mut String) -> bool {
        match self {
            ParamValue::Text(text) => {
                if quoted || !is_token(text) {
                    write_quoted(text, out);
                } else {
                    out.push_str(text);
                }
                true
            }
            ParamValue::Integer(n) => {
                out.push_str(&n.to_string());
                true
            }
            ParamValue::Float(q) => {
                out.push_str(&format_float(q.into_inner()));
                true
            }
            ParamValue::Exists(()) => false,
        }
    }
}

// q-values carry at most three decimals
fn format_float(value: f32) -> String {
    let text = format!("{:.3}", value);
    let text = text.trim_end_matches('0');
    text.trim_end_matches('.').to_string()
}

type DecodeFn = fn(ParamId, Option<&str>) -> Result<ParamValue, DecodeError>;

fn target(id: ParamId) -> String {
    format!("{} parameter", id.canonical_name())
}

fn decode_text(_id: ParamId, value: Option<&str>) -> Result<ParamValue, DecodeError> {
    match value {
        Some(v) => Ok(ParamValue::Text(unquote(v.as_bytes()))),
        // a missing value is an empty one, e.g. rport in a request
        None => Ok(ParamValue::Text(String::new())),
    }
}

fn decode_integer(id: ParamId, value: Option<&str>) -> Result<ParamValue, DecodeError> {
    let text = value.ok_or_else(|| DecodeError::new(target(id), "missing value"))?;
    text.trim()
        .parse::<u32>()
        .map(ParamValue::Integer)
        .map_err(|_| DecodeError::new(target(id), format!("'{}' is not an unsigned integer", text)))
}

fn decode_float(id: ParamId, value: Option<&str>) -> Result<ParamValue, DecodeError> {
    let text = value.ok_or_else(|| DecodeError::new(target(id), "missing value"))?;
    let parsed = text
        .trim()
        .parse::<f32>()
        .map_err(|_| DecodeError::new(target(id), format!("'{}' is not a number", text)))?;
    NotNan::new(parsed)
        .map(ParamValue::Float)
        .map_err(|_| DecodeError::new(target(id), "NaN is not a valid value"))
}

fn decode_exists(id: ParamId, value: Option<&str>) -> Result<ParamValue, DecodeError> {
    match value {
        None => Ok(ParamValue::Exists(())),
        Some(v) => Err(DecodeError::new(
            target(id),
            format!("presence-only parameter has value '{}'", v),
        )),
    }
}

/// Decode functions and canonical names indexed by parameter identity.
pub struct ParameterRegistry {
    decoders: Vec<DecodeFn>,
    names: Vec<&'static str>,
}

impl fmt::Debug for ParameterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterRegistry")
            .field("entries", &self.names.len())
            .finish()
    }
}

static REGISTRY: LazyLock<ParameterRegistry> = LazyLock::new(|| {
    let mut decoders: Vec<DecodeFn> = Vec::with_capacity(ParamId::COUNT);
    let mut names = Vec::with_capacity(ParamId::COUNT);
    for &id in ParamId::ALL {
        let decoder: DecodeFn = match id.kind() {
            ParamKind::Text => decode_text,
            ParamKind::Integer => decode_integer,
            ParamKind::Float => decode_float,
            ParamKind::Exists => decode_exists,
        };
        decoders.push(decoder);
        names.push(id.canonical_name());
    }
    ParameterRegistry { decoders, names }
});

/// The process-wide parameter registry.
pub fn registry() -> &'static ParameterRegistry {
    &REGISTRY
}

impl ParameterRegistry {
    /// Decodes `value` with the function bound to `id`.
    pub fn decode(&self, id: ParamId, value: Option<&str>) -> Result<ParamValue, DecodeError> {
        (self.decoders[id.index()])(id, value)
    }

    pub fn canonical_name(&self, id: ParamId) -> &'static str {
        self.names[id.index()]
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_values_are_unquoted() {
        let reg = registry();
        assert_eq!(
            reg.decode(ParamId::Realm, Some("\"atlanta.com\"")),
            Ok(ParamValue::Text("atlanta.com".to_string()))
        );
        assert_eq!(
            reg.decode(ParamId::Branch, Some("z9hG4bK776")),
            Ok(ParamValue::Text("z9hG4bK776".to_string()))
        );
        assert_eq!(reg.decode(ParamId::Rport, None), Ok(ParamValue::Text(String::new())));
    }

    #[test]
    fn test_integer_values() {
        let reg = registry();
        assert_eq!(reg.decode(ParamId::Expires, Some("3600")), Ok(ParamValue::Integer(3600)));
        let err = reg.decode(ParamId::Ttl, Some("xyz")).unwrap_err();
        assert_eq!(err.target, "ttl parameter");
        assert!(reg.decode(ParamId::Ttl, None).is_err());
        assert!(reg.decode(ParamId::Ttl, Some("-1")).is_err());
    }

    #[test]
    fn test_float_values() {
        let reg = registry();
        let q = reg.decode(ParamId::Q, Some("0.7")).unwrap();
        assert_eq!(q, ParamValue::Float(NotNan::new(0.7).unwrap()));
        assert!(reg.decode(ParamId::Q, Some("high")).is_err());
        assert!(reg.decode(ParamId::Q, Some("NaN")).is_err());
    }

    #[test]
    fn test_presence_only() {
        let reg = registry();
        assert_eq!(reg.decode(ParamId::Lr, None), Ok(ParamValue::Exists(())));
        assert!(reg.decode(ParamId::Lr, Some("true")).is_err());
    }

    #[test]
    fn test_encode_values() {
        let mut out = String::new();
        assert!(ParamValue::Float(NotNan::new(0.5).unwrap()).encode(false, &mut out));
        assert_eq!(out, "0.5");

        let mut out = String::new();
        ParamValue::Text("has space".into()).encode(false, &mut out);
        assert_eq!(out, "\"has space\"");

        let mut out = String::new();
        ParamValue::Text("x".into()).encode(true, &mut out);
        assert_eq!(out, "\"x\"");

        let mut out = String::new();
        assert!(!ParamValue::Exists(()).encode(false, &mut out));
        assert!(out.is_empty());
    }

    #[test]
    fn test_registry_covers_every_param() {
        assert_eq!(registry().len(), ParamId::COUNT);
        for &id in ParamId::ALL {
            assert_eq!(registry().canonical_name(id), id.canonical_name());
        }
    }
}
