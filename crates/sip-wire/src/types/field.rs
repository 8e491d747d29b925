use bytes::Bytes;
use tracing::{debug, trace};

use crate::error::DecodeError;
use crate::parser::utils::{trim, unfold};
use crate::types::category::{FieldKind, FieldValue};

/// One header value occurrence.
///
/// A field scanned from the wire holds a view of its value bytes and is
/// decoded the first time it is materialized. The outcome, a value or a
/// [`DecodeError`], is cached, so later calls never decode again. A field
/// created by the application starts out parsed and has no bytes until the
/// message is encoded.
#[derive(Debug, Clone, Default)]
pub struct RawField {
    view: Option<Bytes>,
    structured: Option<Result<FieldValue, DecodeError>>,
}

fn decode_view(view: Option<&Bytes>, kind: FieldKind) -> Result<FieldValue, DecodeError> {
    let bytes: &[u8] = view.map(|b| &b[..]).unwrap_or(&[]);
    let unfolded = unfold(bytes);
    let result = FieldValue::decode(kind, trim(&unfolded));
    match &result {
        Ok(_) => trace!("decoded {:?} value", kind),
        Err(e) => debug!("{}", e),
    }
    result
}

impl RawField {
    /// A field backed by bytes of a received message.
    pub fn from_view(view: Bytes) -> Self {
        RawField {
            view: Some(view),
            structured: None,
        }
    }

    /// A field built from a structured value.
    pub fn synthetic(value: FieldValue) -> Self {
        RawField {
            view: None,
            structured: Some(Ok(value)),
        }
    }

    /// True once decoding was attempted, successfully or not.
    pub fn is_parsed(&self) -> bool {
        self.structured.is_some()
    }

    /// The raw value bytes, if the field came from the wire.
    pub fn view(&self) -> Option<&Bytes> {
        self.view.as_ref()
    }

    /// Decodes the field with the grammar of `kind` unless it was decoded
    /// before, and returns the cached outcome.
    pub fn materialize(&mut self, kind: FieldKind) -> Result<&mut FieldValue, DecodeError> {
        let view = self.view.as_ref();
        let slot = self.structured.get_or_insert_with(|| decode_view(view, kind));
        match slot {
            Ok(value) => Ok(value),
            Err(e) => Err(e.clone()),
        }
    }

    /// Decodes without caching the result.
    pub fn decode_detached(&self, kind: FieldKind) -> Result<FieldValue, DecodeError> {
        match &self.structured {
            Some(result) => result.clone(),
            None => decode_view(self.view.as_ref(), kind),
        }
    }

    /// The decoded value, if the field was decoded successfully.
    pub fn structured(&self) -> Option<&FieldValue> {
        match &self.structured {
            Some(Ok(value)) => Some(value),
            _ => None,
        }
    }

    pub fn structured_mut(&mut self) -> Option<&mut FieldValue> {
        match &mut self.structured {
            Some(Ok(value)) => Some(value),
            _ => None,
        }
    }

    pub fn decode_error(&self) -> Option<&DecodeError> {
        match &self.structured {
            Some(Err(e)) => Some(e),
            _ => None,
        }
    }

    pub fn into_structured(self) -> Option<FieldValue> {
        match self.structured {
            Some(Ok(value)) => Some(value),
            _ => None,
        }
    }

    /// Writes the value: the structured form when there is one, otherwise
    /// the received bytes unchanged.
    pub fn encode_value(&self, out: &mut Vec<u8>) {
        match (&self.structured, &self.view) {
            (Some(Ok(value)), _) => out.extend_from_slice(value.to_string().as_bytes()),
            (_, Some(view)) => out.extend_from_slice(view),
            (_, None) => {}
        }
    }
}

impl PartialEq for RawField {
    fn eq(&self, other: &Self) -> bool {
        self.view == other.view && self.structured == other.structured
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::cseq::CSeqCategory;
    use crate::types::category::ParserCategory;

    #[test]
    fn test_materialize_once() {
        let mut field = RawField::from_view(Bytes::from_static(b"314159 REGISTER"));
        assert!(!field.is_parsed());
        let value = field.materialize(FieldKind::CSeq).unwrap();
        CSeqCategory::from_value_mut(value).unwrap().sequence = 1;
        assert!(field.is_parsed());
        // cached value is returned, not a fresh decode of the bytes
        let again = field.materialize(FieldKind::CSeq).unwrap();
        assert_eq!(CSeqCategory::from_value(again).unwrap().sequence, 1);
    }

    #[test]
    fn test_error_is_cached() {
        let mut field = RawField::from_view(Bytes::from_static(b"not a cseq"));
        let err = field.materialize(FieldKind::CSeq).unwrap_err();
        assert!(field.is_parsed());
        assert_eq!(field.decode_error(), Some(&err));
        assert_eq!(field.materialize(FieldKind::CSeq).unwrap_err(), err);
        assert!(field.structured().is_none());
    }

    #[test]
    fn test_fold_becomes_single_space() {
        let mut field = RawField::from_view(Bytes::from_static(b"314159\r\n   REGISTER"));
        let value = field.materialize(FieldKind::CSeq).unwrap();
        assert_eq!(value.to_string(), "314159 REGISTER");
    }

    #[test]
    fn test_synthetic_has_no_view() {
        let field = RawField::synthetic(CSeqCategory::new(2, "BYE").into_value());
        assert!(field.is_parsed());
        assert!(field.view().is_none());
        let mut out = Vec::new();
        field.encode_value(&mut out);
        assert_eq!(out, b"2 BYE");
    }

    #[test]
    fn test_unparsed_encodes_raw_bytes() {
        let field = RawField::from_view(Bytes::from_static(b"314159   REGISTER"));
        let mut out = Vec::new();
        field.encode_value(&mut out);
        assert_eq!(out, b"314159   REGISTER");
        assert!(field.decode_detached(FieldKind::CSeq).is_ok());
        assert!(!field.is_parsed());
    }
}
