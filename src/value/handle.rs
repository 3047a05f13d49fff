//! Value handles: the identity of one result of one producer.
//!
//! A [`Value`] names "result *i* of node *P*". It is the key type passes use for
//! value-numbering maps, worklists and replacement tables, so it is small, `Copy`,
//! hashable and totally ordered.
//!
//! # Design Rationale
//!
//! ## Explicit pair instead of a tagged pointer
//!
//! Producers live in a [`crate::Graph`] arena and are addressed by generational
//! [`NodeId`] keys, so the handle is a plain two-field struct: the producer key and a
//! small result index. The index is bounded to [`RESULT_INDEX_BITS`] bits, which keeps
//! the packed [opaque form](Value::to_opaque) injective.
//!
//! ## Ordering
//!
//! Handles are ordered by their packed opaque form. Packing is injective, so the order
//! is a strict total order consistent with `==` and safe to use as a `BTreeMap` key.
//!
//! ## The invalid handle
//!
//! [`Value::INVALID`] (also `Value::default()`) has no producer. It is not an error by
//! itself: it is the "absent" sentinel callers check with [`Value::is_valid`].

use std::{cmp::Ordering, fmt};

use slotmap::{Key, KeyData};

use crate::{Error, Result};

slotmap::new_key_type! {
    /// Identity of a node (and therefore of its value base) inside a [`crate::Graph`].
    ///
    /// Keys are generational: a key of a removed node never aliases a node inserted
    /// later into the same slot.
    pub struct NodeId;
}

/// The number of bits available for the result index of a [`Value`].
///
/// Producers with more than `1 << RESULT_INDEX_BITS` results cannot be addressed.
pub const RESULT_INDEX_BITS: u32 = 4;

/// Largest result index a [`Value`] can carry.
pub const MAX_RESULT_INDEX: u32 = (1 << RESULT_INDEX_BITS) - 1;

/// A use of a specific result of a value base.
///
/// # Examples
///
/// ```rust
/// use usechain::{NodeId, Value};
///
/// let invalid = Value::default();
/// assert!(!invalid.is_valid());
/// assert_eq!(Value::from_opaque(invalid.to_opaque()), invalid);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Value {
    def: Option<NodeId>,
    result: u8,
}

impl Value {
    /// The invalid handle: no producer, result 0.
    pub const INVALID: Self = Self {
        def: None,
        result: 0,
    };

    /// Creates a handle for result `result` of `def`.
    ///
    /// # Arguments
    ///
    /// * `def` - The producing node
    /// * `result` - The result index, at most [`MAX_RESULT_INDEX`]
    ///
    /// # Panics
    ///
    /// Panics if `result` does not fit into [`RESULT_INDEX_BITS`] bits.
    #[must_use]
    pub fn new(def: NodeId, result: u32) -> Self {
        match Self::try_new(def, result) {
            Ok(value) => value,
            Err(err) => panic!("{err}"),
        }
    }

    /// Creates a handle for result `result` of `def`, reporting overflow as an error.
    ///
    /// A null `def` (`NodeId::default()`) produces an invalid handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ResultIndexOverflow`] if `result` exceeds [`MAX_RESULT_INDEX`].
    pub fn try_new(def: NodeId, result: u32) -> Result<Self> {
        if result > MAX_RESULT_INDEX {
            return Err(Error::ResultIndexOverflow {
                index: result,
                bits: RESULT_INDEX_BITS,
            });
        }

        Ok(Self {
            def: (!def.is_null()).then_some(def),
            #[allow(clippy::cast_possible_truncation)]
            result: result as u8,
        })
    }

    /// Returns the producing node, or `None` for the invalid handle.
    #[must_use]
    pub const fn def(self) -> Option<NodeId> {
        self.def
    }

    /// Returns the result index within the producer.
    #[must_use]
    pub const fn result_index(self) -> u32 {
        self.result as u32
    }

    /// Returns `true` if this handle names a producer.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.def.is_some()
    }

    /// Packs the handle into an opaque integer.
    ///
    /// The producer key occupies the high bits and the result index the low
    /// [`RESULT_INDEX_BITS`] bits. Invalid handles pack into `0..=MAX_RESULT_INDEX`,
    /// since a live key never has an all-zero representation.
    #[must_use]
    pub fn to_opaque(self) -> u128 {
        let key = self.def.map_or(0, |def| def.data().as_ffi());
        (u128::from(key) << RESULT_INDEX_BITS) | u128::from(self.result)
    }

    /// Unpacks a handle produced by [`Value::to_opaque`].
    #[must_use]
    pub fn from_opaque(raw: u128) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        let result = (raw & u128::from(MAX_RESULT_INDEX)) as u8;
        #[allow(clippy::cast_possible_truncation)]
        let key = (raw >> RESULT_INDEX_BITS) as u64;

        let def = (key != 0).then(|| NodeId::from(KeyData::from_ffi(key)));
        Self { def, result }
    }
}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_opaque().cmp(&other.to_opaque())
    }
}

impl From<NodeId> for Value {
    /// Result 0 of `def`.
    fn from(def: NodeId) -> Self {
        Self::new(def, 0)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.def {
            Some(def) => write!(f, "{def:?}#{}", self.result),
            None => write!(f, "<invalid>"),
        }
    }
}
