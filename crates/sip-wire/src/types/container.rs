use std::fmt;
use std::marker::PhantomData;

use crate::error::DecodeError;
use crate::types::category::ParserCategory;
use crate::types::field_list::FieldList;

/// Typed view of a multi-value header.
///
/// Returned by `Message::header_multi` after every element of the list was
/// decoded. An element that failed to decode stays in the list with its
/// [`DecodeError`]: the typed accessors (`front`, `get`, `iter`, ...) pass
/// over it, [`Container::entries`] and [`Container::errors`] report it.
/// Changes go straight to the message's [`FieldList`].
pub struct Container<'a, T: ParserCategory> {
    list: &'a mut FieldList,
    _marker: PhantomData<T>,
}

impl<'a, T: ParserCategory> Container<'a, T> {
    /// Wraps a list whose elements are all decoded as `T`.
    pub(crate) fn new(list: &'a mut FieldList) -> Self {
        list.touch();
        Container {
            list,
            _marker: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn front(&self) -> Option<&T> {
        self.list.front().and_then(|f| f.structured()).and_then(T::from_value)
    }

    pub fn back(&self) -> Option<&T> {
        self.list.back().and_then(|f| f.structured()).and_then(T::from_value)
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        self.list
            .front_mut()
            .and_then(|f| f.structured_mut())
            .and_then(T::from_value_mut)
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        self.list
            .back_mut()
            .and_then(|f| f.structured_mut())
            .and_then(T::from_value_mut)
    }

    /// The element at `index`, `None` when out of range or when that element
    /// did not decode.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.list.get(index).and_then(|f| f.structured()).and_then(T::from_value)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.list
            .get_mut(index)
            .and_then(|f| f.structured_mut())
            .and_then(T::from_value_mut)
    }

    /// The decode error of the element at `index`, if it has one.
    pub fn error(&self, index: usize) -> Option<&DecodeError> {
        self.list.get(index).and_then(|f| f.decode_error())
    }

    /// Positions and errors of the elements that did not decode.
    pub fn errors(&self) -> impl Iterator<Item = (usize, &DecodeError)> + '_ {
        self.list
            .iter()
            .enumerate()
            .filter_map(|(i, f)| f.decode_error().map(|e| (i, e)))
    }

    /// True if every element decoded.
    pub fn is_valid(&self) -> bool {
        self.errors().next().is_none()
    }

    /// Every element in order, decoded or not. Positions match `get`,
    /// `erase` and the raw [`FieldList`].
    pub fn entries(&self) -> impl DoubleEndedIterator<Item = Result<&T, &DecodeError>> + '_ {
        self.list.iter().filter_map(|f| match f.decode_error() {
            Some(e) => Some(Err(e)),
            None => f.structured().and_then(T::from_value).map(Ok),
        })
    }

    pub fn push_front(&mut self, value: T) {
        self.list.push_front(value.into_value());
    }

    pub fn push_back(&mut self, value: T) {
        self.list.push_back(value.into_value());
    }

    /// Removes the element at `index` and returns it if it had decoded.
    pub fn erase(&mut self, index: usize) -> Option<T> {
        self.list
            .erase(index)
            .and_then(|f| f.into_structured())
            .and_then(T::from_owned)
    }

    pub fn find(&self, value: &T) -> bool {
        self.iter().any(|v| v == value)
    }

    /// Reverses the order of the elements in place.
    pub fn reverse(&mut self) {
        *self.list = self.list.reverse();
    }

    /// Appends copies of `values`.
    pub fn append(&mut self, values: &[T]) {
        for value in values {
            self.list.push_back(value.clone().into_value());
        }
    }

    /// The decoded elements in order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &T> + '_ {
        self.list
            .iter()
            .filter_map(|f| f.structured())
            .filter_map(T::from_value)
    }

    pub fn iter_mut(&mut self) -> impl DoubleEndedIterator<Item = &mut T> + '_ {
        self.list
            .iter_mut()
            .filter_map(|f| f.structured_mut())
            .filter_map(T::from_value_mut)
    }

    /// Copies the elements out.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T: ParserCategory> fmt::Debug for Container<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries()).finish()
    }
}
