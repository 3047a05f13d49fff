//! # usechain Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the usechain library. Import this module to get quick access to everything a pass
//! needs to build nodes and walk their def-use edges.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all usechain operations
pub use crate::Error;

/// The result type used throughout usechain
pub use crate::Result;

/// Arena capacity and verification settings
pub use crate::GraphConfig;

// ================================================================================================
// Graph
// ================================================================================================

/// The node arena and the trait its nodes implement
pub use crate::{Graph, IrNode};

// ================================================================================================
// Values and Operands
// ================================================================================================

/// Value handles and the producer side of a node
pub use crate::{NodeId, ResultTypes, Value, ValueBase};

/// Use nodes and their identities
pub use crate::{Operand, OperandRef, OperandValues};

/// Operand storage
pub use crate::{FixedOperandList, OperandList, TailAllocatedOperandList, VariadicOperandList};

/// Detached use-list traversal
pub use crate::UseCursor;
