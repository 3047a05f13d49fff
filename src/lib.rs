// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # usechain
//!
//! Def-use plumbing for SSA-style compiler IRs: value handles, operands and intrusive
//! use lists.
//!
//! Every node that produces results embeds a [`ValueBase`]. Every node that consumes
//! values owns [`Operand`]s, and each operand is threaded into the use list of the
//! producer it references. That makes "who uses this value?" an O(uses) walk without a
//! separately maintained def-use index, and keeps rewrites such as
//! replace-all-uses-with cheap.
//!
//! ## Features
//!
//! - **Compact value handles** - [`Value`] names one result of one producer; it is
//!   `Copy`, hashable, totally ordered and packs into an opaque integer
//! - **O(1) use-list edits** - insertion at the head and removal from any position
//! - **Per-result filtering** - one use list per producer, filtered by result index
//!   on demand
//! - **Operand storage** - fixed-arity lists and fixed-plus-dynamic lists in a single
//!   allocation
//! - **Structural verification** - [`Graph::verify`] checks every link, optionally
//!   after each mutation
//!
//! ## Quick Start
//!
//! ```rust
//! use usechain::{FixedOperandList, Graph, IrNode, Operand, OperandList, Value, ValueBase};
//!
//! #[derive(Debug)]
//! struct Node {
//!     base: ValueBase<&'static str, &'static str>,
//!     operands: FixedOperandList<2>,
//! }
//!
//! impl IrNode for Node {
//!     type Kind = &'static str;
//!     type Type = &'static str;
//!
//!     fn value_base(&self) -> &ValueBase<Self::Kind, Self::Type> {
//!         &self.base
//!     }
//!     fn value_base_mut(&mut self) -> &mut ValueBase<Self::Kind, Self::Type> {
//!         &mut self.base
//!     }
//!     fn operands(&self) -> &[Operand] {
//!         self.operands.as_array()
//!     }
//!     fn operands_mut(&mut self) -> &mut [Operand] {
//!         self.operands.as_array_mut()
//!     }
//! }
//!
//! let mut graph = Graph::new();
//! let leaf = |id| Node {
//!     base: ValueBase::new("const", "i32"),
//!     operands: FixedOperandList::new(id, [Value::INVALID; 2]),
//! };
//! let a = graph.insert_with(leaf);
//! let b = graph.insert_with(leaf);
//! let add = graph.insert_with(|id| Node {
//!     base: ValueBase::new("add", "i32"),
//!     operands: FixedOperandList::new(id, [a.into(), a.into()]),
//! });
//!
//! assert_eq!(graph.use_count(a), 2);
//! assert_eq!(graph.replace_all_uses_with(a.into(), b.into()), 2);
//! assert!(graph.use_empty(a));
//! assert_eq!(graph.operand_values(add).to_vec(), vec![Value::from(b); 2]);
//!
//! graph.remove(a);
//! assert_eq!(graph.len(), 2);
//! ```
//!
//! ## Architecture
//!
//! - [`value`] - [`Value`] handles, [`NodeId`] and the producer-side [`ValueBase`]
//! - [`operand`] - [`Operand`], the use iterators, [`OperandValues`] and the operand
//!   storage lists
//! - [`graph`] - the [`Graph`] arena that owns nodes and edits use lists
//! - [`GraphConfig`] - arena capacity and verification settings
//! - [`Error`] and [`Result`] - error handling for the checked entry points
//!
//! ## Logging
//!
//! Mutations emit [`tracing`] events at `trace` level (insertion, rebinding, removal)
//! and `debug` level (replace-all-uses-with). The crate never installs a subscriber.

#[macro_use]
pub(crate) mod error;

mod config;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use usechain::prelude::*;
///
/// let config = GraphConfig::checked().with_capacity(64);
/// assert!(config.verify_after_mutation);
/// ```
pub mod prelude;

/// The node arena and the use-list algorithm.
pub mod graph;

/// Operands, use-list traversal and operand storage.
pub mod operand;

/// Value handles and value bases.
pub mod value;

/// `usechain` Result type
///
/// A type alias for `std::result::Result<T, Error>` where the error type is always
/// [`Error`].
///
/// # Examples
///
/// ```rust
/// use usechain::{Result, Value};
///
/// fn result_one(def: usechain::NodeId) -> Result<Value> {
///     Value::try_new(def, 1)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `usechain` Error type
///
/// See [`Error`] for the individual variants.
pub use error::Error;

/// Graph configuration. See [`GraphConfig`].
pub use config::GraphConfig;

pub use graph::{Graph, InContext, IrNode};
pub use operand::{
    FixedOperandList, Operand, OperandList, OperandRef, OperandValues, OperandValuesIter,
    TailAllocatedOperandList, UseCursor, ValueBaseUseIter, ValueUseIter, VariadicOperandList,
};
pub use value::{NodeId, ResultTypes, Value, ValueBase, MAX_RESULT_INDEX, RESULT_INDEX_BITS};
