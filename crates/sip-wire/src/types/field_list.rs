use std::collections::vec_deque;
use std::collections::VecDeque;

use bytes::Bytes;

use crate::error::DecodeError;
use crate::types::category::{FieldKind, FieldValue};
use crate::types::field::RawField;

/// All occurrences of one header in wire order.
///
/// Besides the individual values, the list remembers the header lines they
/// were scanned from. As long as nothing changes the list, encoding writes
/// those lines back byte for byte, whatever their spelling, folding or comma
/// layout. Any mutable access marks the list touched, after which each
/// value is written on its own `Name: value` line.
///
/// Elements are addressed by index. An index obtained while iterating
/// read-only refers to the same element in `get_mut` and `erase`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldList {
    fields: VecDeque<RawField>,
    lines: Vec<Bytes>,
    touched: bool,
}

impl FieldList {
    pub fn new() -> Self {
        Self::default()
    }

    /// A list holding one value created by the application.
    pub fn from_value(value: FieldValue) -> Self {
        let mut list = FieldList::new();
        list.push_back(value);
        list
    }

    /// Adds the values scanned from one header line.
    pub(crate) fn push_scanned(&mut self, line: Bytes, values: Vec<Bytes>) {
        self.lines.push(line);
        self.fields.extend(values.into_iter().map(RawField::from_view));
    }

    pub(crate) fn touch(&mut self) {
        self.touched = true;
    }

    /// True once the list was handed out for modification.
    pub fn is_touched(&self) -> bool {
        self.touched
    }

    /// Header lines as received, without their CRLF.
    pub fn lines(&self) -> &[Bytes] {
        &self.lines
    }

    pub fn front(&self) -> Option<&RawField> {
        self.fields.front()
    }

    pub fn back(&self) -> Option<&RawField> {
        self.fields.back()
    }

    pub fn front_mut(&mut self) -> Option<&mut RawField> {
        self.touched = true;
        self.fields.front_mut()
    }

    pub fn back_mut(&mut self) -> Option<&mut RawField> {
        self.touched = true;
        self.fields.back_mut()
    }

    pub fn get(&self, index: usize) -> Option<&RawField> {
        self.fields.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut RawField> {
        self.touched = true;
        self.fields.get_mut(index)
    }

    pub fn push_front(&mut self, value: FieldValue) {
        self.touched = true;
        self.fields.push_front(RawField::synthetic(value));
    }

    pub fn push_back(&mut self, value: FieldValue) {
        self.touched = true;
        self.fields.push_back(RawField::synthetic(value));
    }

    /// Removes and returns the element at `index`.
    pub fn erase(&mut self, index: usize) -> Option<RawField> {
        let removed = self.fields.remove(index)?;
        self.touched = true;
        Some(removed)
    }

    /// True if some element equals `value`.
    ///
    /// Decoded elements are compared as they are. Raw elements are decoded
    /// with the grammar of `value` for the comparison only, nothing is
    /// cached, so a lookup with a value of another grammar leaves the list
    /// as it was. Elements that fail to decode never match.
    pub fn find(&self, value: &FieldValue) -> bool {
        let kind = value.kind();
        self.fields.iter().any(|field| {
            if field.is_parsed() {
                field.structured() == Some(value)
            } else {
                matches!(field.decode_detached(kind), Ok(v) if v == *value)
            }
        })
    }

    /// A new list with the elements in reverse order.
    pub fn reverse(&self) -> FieldList {
        FieldList {
            fields: self.fields.iter().rev().cloned().collect(),
            lines: Vec::new(),
            touched: true,
        }
    }

    /// Appends copies of all elements of `other`, raw or decoded.
    pub fn append(&mut self, other: &FieldList) {
        self.touched = true;
        self.fields.extend(other.fields.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> vec_deque::Iter<'_, RawField> {
        self.fields.iter()
    }

    pub fn iter_mut(&mut self) -> vec_deque::IterMut<'_, RawField> {
        self.touched = true;
        self.fields.iter_mut()
    }

    /// Decodes every element that was not decoded yet.
    ///
    /// All elements are attempted; the first failure, in list order, is
    /// returned.
    pub fn materialize_all(&mut self, kind: FieldKind) -> Result<(), DecodeError> {
        let mut first_error = None;
        for field in self.fields.iter_mut() {
            if let Err(e) = field.materialize(kind) {
                first_error.get_or_insert(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Writes the header lines for this list.
    pub fn encode(&self, name: &str, out: &mut Vec<u8>) {
        if !self.touched {
            for line in &self.lines {
                out.extend_from_slice(line);
                out.extend_from_slice(b"\r\n");
            }
            return;
        }
        for field in &self.fields {
            out.extend_from_slice(name.as_bytes());
            out.extend_from_slice(b": ");
            field.encode_value(out);
            out.extend_from_slice(b"\r\n");
        }
    }
}

impl<'a> IntoIterator for &'a FieldList {
    type Item = &'a RawField;
    type IntoIter = vec_deque::Iter<'a, RawField>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}
