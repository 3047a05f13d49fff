//! Use nodes (operands) and the storage they live in.
//!
//! An [`Operand`] is a slot owned by a consumer node. It names one [`Value`] and is
//! threaded into the use list of that value's producer, so that every consumer of a
//! producer can be found without a separate def-use index.
//!
//! # Architecture
//!
//! - `Operand` / [`OperandRef`] - the use node and its stable identity
//! - `iter` - forward traversal of a producer's use list
//! - `values` - [`OperandValues`], a read-only projection from operands to values
//! - `list` - [`FixedOperandList`] and [`TailAllocatedOperandList`] storage
//!
//! # Use-List Layout
//!
//! Each producer's use list is a singly linked chain through [`Operand`]'s `next`
//! field, with insertion at the head. For O(1) removal from any position every operand
//! also records which slot currently points at it: either the producer's head or the
//! `next` field of the previous operand (`UseSlot`). Because nodes live in an arena,
//! both links are expressed as arena identities ([`OperandRef`], [`NodeId`]) rather
//! than addresses.
//!
//! Linking and unlinking need simultaneous access to the operand, its neighbours and
//! the producer, so they are performed by [`crate::Graph`]. The operand itself exposes
//! only read access; [`crate::Graph::set_operand`] is the single mutation entry point.

mod iter;
mod list;
mod values;

use std::fmt;

pub use iter::{UseCursor, ValueBaseUseIter, ValueUseIter};
pub use list::{FixedOperandList, OperandList, TailAllocatedOperandList, VariadicOperandList};
pub use values::{OperandValues, OperandValuesIter};

use crate::{NodeId, Value};

/// Stable identity of an operand: the owning node and the operand's position in that
/// node's operand storage.
///
/// Operands are never relocated once their node is in the graph, so this reference
/// stays valid until the owning node is removed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OperandRef {
    user: NodeId,
    index: u32,
}

impl OperandRef {
    /// Creates a reference to operand `index` of `user`.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not fit into 32 bits.
    #[must_use]
    pub fn new(user: NodeId, index: usize) -> Self {
        let Ok(index) = u32::try_from(index) else {
            panic!("operand index {index} exceeds the 32-bit operand limit");
        };
        Self { user, index }
    }

    /// Returns the node that owns the operand.
    #[must_use]
    pub const fn user(self) -> NodeId {
        self.user
    }

    /// Returns the operand's position in its owner's operand storage.
    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

impl fmt::Debug for OperandRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}[{}]", self.user, self.index)
    }
}

/// The slot that currently points at a linked operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UseSlot {
    /// The use-list head of the given producer.
    Head(NodeId),
    /// The `next` field of the given operand.
    Next(OperandRef),
}

/// A reference to a value, stored as an operand of a consumer node.
///
/// Operands are created unlinked by the operand lists and linked when their owning
/// node is inserted into a [`crate::Graph`]. They are not `Clone`: a copy would sit
/// in no use list while claiming to use a value.
///
/// An operand holding [`Value::INVALID`] is never linked.
pub struct Operand {
    value: Value,
    user: NodeId,
    next: Option<OperandRef>,
    back: Option<UseSlot>,
}

impl Operand {
    /// Creates an unlinked operand of `user` referencing `value`.
    #[must_use]
    pub fn new(user: NodeId, value: Value) -> Self {
        Self {
            value,
            user,
            next: None,
            back: None,
        }
    }

    /// Returns the value currently used by this operand.
    #[must_use]
    pub fn get(&self) -> Value {
        self.value
    }

    /// Returns the node that owns this operand.
    #[must_use]
    pub fn user(&self) -> NodeId {
        self.user
    }

    /// Returns `true` if this operand is threaded into a use list.
    #[must_use]
    pub fn is_linked(&self) -> bool {
        self.back.is_some()
    }

    pub(crate) fn value_ref(&self) -> &Value {
        &self.value
    }

    pub(crate) fn set_value(&mut self, value: Value) {
        self.value = value;
    }

    pub(crate) fn next(&self) -> Option<OperandRef> {
        self.next
    }

    pub(crate) fn set_next(&mut self, next: Option<OperandRef>) {
        self.next = next;
    }

    pub(crate) fn back(&self) -> Option<UseSlot> {
        self.back
    }

    pub(crate) fn set_back(&mut self, back: Option<UseSlot>) {
        self.back = back;
    }
}

impl fmt::Debug for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operand")
            .field("value", &self.value)
            .field("user", &self.user)
            .field("linked", &self.is_linked())
            .finish()
    }
}
