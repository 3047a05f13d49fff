//! Read-only projection of operands onto the values they use.

use std::{iter::FusedIterator, ops::Index, slice};

use crate::{Operand, Value};

/// An array view that projects a slice of [`Operand`]s onto their [`Value`]s.
///
/// This is how a node hands out its operand values without exposing the operands
/// themselves. It has no storage of its own: every access reads through to the
/// underlying operand.
///
/// # Examples
///
/// ```rust,ignore
/// let values = graph.operand_values(add);
/// assert_eq!(values.len(), 2);
/// assert_eq!(values[0], lhs);
/// assert_eq!(values.slice(1, 1).first(), Some(rhs));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct OperandValues<'a> {
    operands: &'a [Operand],
}

impl<'a> OperandValues<'a> {
    /// Creates a projection over `operands`.
    #[must_use]
    pub fn new(operands: &'a [Operand]) -> Self {
        Self { operands }
    }

    /// Returns the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operands.len()
    }

    /// Returns `true` if there are no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operands.is_empty()
    }

    /// Returns the first value.
    #[must_use]
    pub fn first(&self) -> Option<Value> {
        self.operands.first().map(Operand::get)
    }

    /// Returns the last value.
    #[must_use]
    pub fn last(&self) -> Option<Value> {
        self.operands.last().map(Operand::get)
    }

    /// Returns the value at `index`, or `None` if out of range.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Value> {
        self.operands.get(index).map(Operand::get)
    }

    /// Returns the sub-view of `len` values starting at `start`.
    ///
    /// # Panics
    ///
    /// Panics if `start + len` exceeds the length of this view.
    #[must_use]
    pub fn slice(&self, start: usize, len: usize) -> OperandValues<'a> {
        Self::new(&self.operands[start..start + len])
    }

    /// Returns the underlying operands.
    #[must_use]
    pub fn operands(&self) -> &'a [Operand] {
        self.operands
    }

    /// Returns an iterator over the values.
    #[must_use]
    pub fn iter(&self) -> OperandValuesIter<'a> {
        OperandValuesIter {
            inner: self.operands.iter(),
        }
    }

    /// Collects the values into a vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Value> {
        self.iter().collect()
    }
}

impl Index<usize> for OperandValues<'_> {
    type Output = Value;

    fn index(&self, index: usize) -> &Value {
        self.operands[index].value_ref()
    }
}

impl<'a> IntoIterator for OperandValues<'a> {
    type Item = Value;
    type IntoIter = OperandValuesIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> IntoIterator for &OperandValues<'a> {
    type Item = Value;
    type IntoIter = OperandValuesIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the values of an [`OperandValues`] view.
#[derive(Debug, Clone)]
pub struct OperandValuesIter<'a> {
    inner: slice::Iter<'a, Operand>,
}

impl Iterator for OperandValuesIter<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        self.inner.next().map(Operand::get)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for OperandValuesIter<'_> {
    fn next_back(&mut self) -> Option<Value> {
        self.inner.next_back().map(Operand::get)
    }
}

impl ExactSizeIterator for OperandValuesIter<'_> {}

impl FusedIterator for OperandValuesIter<'_> {}
