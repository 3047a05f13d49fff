use thiserror::Error;

use crate::{NodeId, Value};

macro_rules! use_list_corrupted {
    // Single string version
    ($msg:expr) => {
        crate::Error::UseListCorrupted {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::UseListCorrupted {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which covers every failure the checked entry points of this
/// library can report.
///
/// The use-list layer is a pure data structure: most contract violations are caller bugs
/// and the panicking entry points (`Value::new`, `Graph::remove`, `Graph::value_type`, ...)
/// abort on them. Each of those has a checked counterpart returning this type, so callers
/// that work with untrusted input (deserialized IR, fuzzers, verifiers) can recover.
///
/// # Error Categories
///
/// ## Handle Errors
/// - [`Error::ResultIndexOverflow`] - Result index does not fit the handle's index bits
/// - [`Error::InvalidValue`] - The invalid sentinel handle was dereferenced
/// - [`Error::DanglingValue`] - The handle names a node that is no longer in the graph
/// - [`Error::ResultOutOfRange`] - The handle names a result its producer does not have
///
/// ## Graph Errors
/// - [`Error::UnknownNode`] - The node id is not (or no longer) part of the graph
/// - [`Error::ValueInUse`] - A node was removed while other nodes still use it
/// - [`Error::UseListCorrupted`] - Structural verification found a broken use list
///
/// # Examples
///
/// ```rust
/// use usechain::{Error, Value};
///
/// match Value::try_new(Default::default(), 1000) {
///     Err(Error::ResultIndexOverflow { index, bits }) => {
///         println!("result {index} needs more than {bits} bits");
///     }
///     other => println!("{other:?}"),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A result index exceeds the representable bit width of a value handle.
    ///
    /// Value handles store their result index in [`crate::RESULT_INDEX_BITS`] bits.
    /// Producers with more results than that cannot be addressed.
    #[error("Result index {index} does not fit into {bits} bits")]
    ResultIndexOverflow {
        /// The rejected result index
        index: u32,
        /// The number of bits available for result indices
        bits: u32,
    },

    /// The invalid (default) value handle was dereferenced.
    ///
    /// The invalid handle is a legal "absent" sentinel, but it has no producer and
    /// therefore no type and no use list.
    #[error("Dereferenced the invalid value handle")]
    InvalidValue,

    /// The value handle names a producer that is not part of the graph.
    #[error("Value {0} refers to a node that is not part of the graph")]
    DanglingValue(Value),

    /// The value handle names a result index its producer does not define.
    #[error("Value {value} refers to result {}, but its producer has {results} result(s)", value.result_index())]
    ResultOutOfRange {
        /// The offending handle
        value: Value,
        /// The number of results the producer defines
        results: usize,
    },

    /// The node id is not part of the graph.
    #[error("Node {0:?} is not part of the graph")]
    UnknownNode(NodeId),

    /// A node was removed while operands of other nodes still reference it.
    ///
    /// A value base must never be destroyed with a non-empty use list. Rebind or drop
    /// the remaining uses (see `Graph::replace_all_uses_with` and
    /// `Graph::drop_all_references`) before removing the producer.
    #[error("Node {node:?} is still used by {uses} operand(s)")]
    ValueInUse {
        /// The node that was about to be removed
        node: NodeId,
        /// Number of operands in other nodes that still use it
        uses: usize,
    },

    /// The structural verification of a use list failed.
    ///
    /// This indicates that operand storage was modified behind the graph's back (for
    /// example by swapping operands through `IrNode::operands_mut`) or a bug in this
    /// library. The error records where the inconsistency was detected.
    ///
    /// # Fields
    ///
    /// * `message` - Description of the inconsistency
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Use list corrupted - {file}:{line}: {message}")]
    UseListCorrupted {
        /// The message to be printed for the corruption
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },
}
