//! The producer side of a value: kind, result types and the use-list head.

use std::slice;

use crate::OperandRef;

/// Result type information of a value base.
///
/// Most nodes produce exactly one result, so the single-type case is stored inline;
/// multi-result nodes carry an ordered list. The choice is made once at construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResultTypes<T> {
    /// A node with exactly one result.
    Single(T),
    /// A node with an ordered list of results (possibly empty).
    List(Box<[T]>),
}

impl<T> ResultTypes<T> {
    /// Returns the result types as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::Single(ty) => slice::from_ref(ty),
            Self::List(types) => types,
        }
    }

    /// Returns the number of results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Returns `true` if there are no results.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

/// The base of every node that can produce results consumed elsewhere in the IR.
///
/// A value base is embedded in the caller's node type and reached through
/// [`crate::IrNode::value_base`]. It records:
///
/// - the node's kind, an opaque tag from the caller's taxonomy, fixed at construction
/// - the type of each result
/// - the head of the node's use list, shared by all of its results
///
/// The use-list head is maintained by [`crate::Graph`]; it cannot be written from
/// outside this crate. A value base is deliberately not `Clone`: a copy would claim
/// the same use list as its source.
///
/// # Examples
///
/// ```rust
/// use usechain::ValueBase;
///
/// let single = ValueBase::new("add", "i32");
/// assert_eq!(single.num_results(), 1);
/// assert_eq!(*single.ty(0), "i32");
///
/// let pair = ValueBase::with_types("divmod", vec!["i32", "i32"]);
/// assert_eq!(pair.types(), &["i32", "i32"]);
/// assert!(pair.use_empty());
/// ```
#[derive(Debug)]
pub struct ValueBase<K, T> {
    kind: K,
    types: ResultTypes<T>,
    first_use: Option<OperandRef>,
}

impl<K: Copy, T> ValueBase<K, T> {
    /// Creates a single-result value base.
    #[must_use]
    pub fn new(kind: K, ty: T) -> Self {
        Self::from_result_types(kind, ResultTypes::Single(ty))
    }

    /// Creates a value base with an ordered list of result types.
    #[must_use]
    pub fn with_types(kind: K, types: impl Into<Box<[T]>>) -> Self {
        Self::from_result_types(kind, ResultTypes::List(types.into()))
    }

    /// Creates a value base from already classified result types.
    #[must_use]
    pub fn from_result_types(kind: K, types: ResultTypes<T>) -> Self {
        Self {
            kind,
            types,
            first_use: None,
        }
    }

    /// Returns the kind tag.
    #[must_use]
    pub fn kind(&self) -> K {
        self.kind
    }

    /// Returns the stored result type information.
    #[must_use]
    pub fn result_types(&self) -> &ResultTypes<T> {
        &self.types
    }

    /// Returns all result types in order.
    #[must_use]
    pub fn types(&self) -> &[T] {
        self.types.as_slice()
    }

    /// Returns the type of result `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not a result of this node. A single-result node only
    /// defines index 0.
    #[must_use]
    pub fn ty(&self, index: usize) -> &T {
        let types = self.types();
        match types.get(index) {
            Some(ty) => ty,
            None => panic!(
                "result {index} out of range for a node with {} result(s)",
                types.len()
            ),
        }
    }

    /// Returns the number of results.
    #[must_use]
    pub fn num_results(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no operand uses any result of this node. O(1).
    #[must_use]
    pub fn use_empty(&self) -> bool {
        self.first_use.is_none()
    }

    /// Returns the head of the use list.
    #[must_use]
    pub fn first_use(&self) -> Option<OperandRef> {
        self.first_use
    }

    pub(crate) fn set_first_use(&mut self, first_use: Option<OperandRef>) {
        self.first_use = first_use;
    }
}
