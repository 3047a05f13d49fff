//! Operand storage for consumer nodes.
//!
//! Two storage shapes are provided, both embedded directly in the owning node:
//!
//! - [`FixedOperandList`] - exactly `N` operands, known at compile time
//! - [`TailAllocatedOperandList`] - `N` fixed operands followed by a run of dynamic
//!   operands whose count is fixed at construction (`N = 0` is spelled
//!   [`VariadicOperandList`])
//!
//! The tail-allocated list keeps fixed and dynamic operands in one contiguous buffer,
//! fixed slots first, so a node's whole operand list is a single slice and operand
//! positions never move. [`TailAllocatedOperandList::required_extra_bytes`] reports
//! the size of the dynamic run for callers that account for node memory.
//!
//! Neither list is `Clone`, because operands are not. Positional indexing is read-only:
//! operands change what they use through [`crate::Graph::set_operand`] only.
//!
//! ```compile_fail
//! use usechain::{FixedOperandList, NodeId, Operand, Value};
//!
//! let mut list = FixedOperandList::new(NodeId::default(), [Value::INVALID]);
//! list[0] = Operand::new(NodeId::default(), Value::INVALID);
//! ```

use std::{
    mem,
    ops::Index,
};

use crate::{NodeId, Operand, OperandValues, Value};

/// Common access to a node's operand storage.
pub trait OperandList {
    /// Returns the full list of operands.
    fn as_array(&self) -> &[Operand];

    /// Returns the full list of operands, mutably.
    ///
    /// The graph uses this to patch use-list links; callers must not move operands
    /// between slots.
    fn as_array_mut(&mut self) -> &mut [Operand];

    /// Returns the dynamic operands.
    fn dynamic_as_array(&self) -> &[Operand];

    /// Returns the dynamic operands, mutably.
    fn dynamic_as_array_mut(&mut self) -> &mut [Operand];

    /// Returns the values of all operands.
    fn as_value_array(&self) -> OperandValues<'_> {
        OperandValues::new(self.as_array())
    }

    /// Returns the values of the dynamic operands.
    fn dynamic_values_as_array(&self) -> OperandValues<'_> {
        OperandValues::new(self.dynamic_as_array())
    }
}

/// A constant-size list of the operands of a node.
///
/// The arity is part of the type, so passing the wrong number of values is a compile
/// error.
///
/// # Examples
///
/// ```rust,ignore
/// let id = graph.insert_with(|id| Binary {
///     base: ValueBase::new(Kind::Add, Ty::I32),
///     operands: FixedOperandList::new(id, [lhs, rhs]),
/// });
/// ```
#[derive(Debug)]
pub struct FixedOperandList<const N: usize> {
    buffer: [Operand; N],
}

impl<const N: usize> FixedOperandList<N> {
    /// Creates the list for `user`, one operand per value, in order.
    #[must_use]
    pub fn new(user: NodeId, values: [Value; N]) -> Self {
        Self {
            buffer: values.map(|value| Operand::new(user, value)),
        }
    }

    /// Returns the number of operands (`N`).
    #[must_use]
    pub const fn len(&self) -> usize {
        N
    }

    /// Returns `true` if `N` is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }
}

impl<const N: usize> OperandList for FixedOperandList<N> {
    fn as_array(&self) -> &[Operand] {
        &self.buffer
    }

    fn as_array_mut(&mut self) -> &mut [Operand] {
        &mut self.buffer
    }

    fn dynamic_as_array(&self) -> &[Operand] {
        &[]
    }

    fn dynamic_as_array_mut(&mut self) -> &mut [Operand] {
        &mut []
    }
}

impl<const N: usize> Index<usize> for FixedOperandList<N> {
    type Output = Operand;

    fn index(&self, index: usize) -> &Operand {
        &self.buffer[index]
    }
}

/// An operand list with `N` fixed operands followed by a dynamically sized run.
///
/// The number of dynamic operands is set permanently at construction. Fixed operands
/// occupy positions `0..N`, dynamic ones `N..N + dynamic_count`.
///
/// # Examples
///
/// ```rust,ignore
/// // call callee(args...): the callee is fixed, the arguments are dynamic
/// let id = graph.insert_with(|id| Call {
///     base: ValueBase::new(Kind::Call, Ty::I32),
///     operands: TailAllocatedOperandList::new(id, &args, [callee]),
/// });
/// ```
#[derive(Debug)]
pub struct TailAllocatedOperandList<const N: usize> {
    num_extra: usize,
    buffer: Box<[Operand]>,
}

/// A tail-allocated list without fixed operands.
pub type VariadicOperandList = TailAllocatedOperandList<0>;

impl<const N: usize> TailAllocatedOperandList<N> {
    /// Given the number of dynamic operands, returns the number of bytes the dynamic
    /// run occupies beyond the fixed operands.
    #[must_use]
    pub const fn required_extra_bytes(dynamic_count: usize) -> usize {
        mem::size_of::<Operand>() * dynamic_count
    }

    /// Creates the list for `user`.
    ///
    /// The dynamic values come first in the argument list but are placed after the
    /// fixed ones: positions `0..N` hold `fixed`, positions `N..` hold `dynamic` in
    /// order.
    #[must_use]
    pub fn new(user: NodeId, dynamic: &[Value], fixed: [Value; N]) -> Self {
        let mut buffer = Vec::with_capacity(N + dynamic.len());
        buffer.extend(fixed.into_iter().map(|value| Operand::new(user, value)));
        buffer.extend(dynamic.iter().map(|value| Operand::new(user, *value)));

        Self {
            num_extra: dynamic.len(),
            buffer: buffer.into_boxed_slice(),
        }
    }

    /// Returns the number of fixed operands (`N`).
    #[must_use]
    pub const fn fixed_count(&self) -> usize {
        N
    }

    /// Returns the number of dynamic operands.
    #[must_use]
    pub const fn dynamic_count(&self) -> usize {
        self.num_extra
    }

    /// Returns the total number of operands.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns `true` if there are no operands at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns the fixed operands.
    #[must_use]
    pub fn fixed_as_array(&self) -> &[Operand] {
        &self.buffer[..N]
    }
}

impl VariadicOperandList {
    /// Creates a list that holds only dynamic operands.
    #[must_use]
    pub fn from_dynamic(user: NodeId, dynamic: &[Value]) -> Self {
        Self::new(user, dynamic, [])
    }
}

impl<const N: usize> OperandList for TailAllocatedOperandList<N> {
    fn as_array(&self) -> &[Operand] {
        &self.buffer
    }

    fn as_array_mut(&mut self) -> &mut [Operand] {
        &mut self.buffer
    }

    fn dynamic_as_array(&self) -> &[Operand] {
        &self.buffer[N..]
    }

    fn dynamic_as_array_mut(&mut self) -> &mut [Operand] {
        &mut self.buffer[N..]
    }
}

impl<const N: usize> Index<usize> for TailAllocatedOperandList<N> {
    type Output = Operand;

    fn index(&self, index: usize) -> &Operand {
        &self.buffer[index]
    }
}
