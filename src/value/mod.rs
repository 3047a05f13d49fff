//! Value identity: handles and value bases.
//!
//! - `handle` - [`Value`], the copyable identity of one result of one producer
//! - `base` - [`ValueBase`], the producer-side record embedded in every node

mod base;
mod handle;

pub use base::{ResultTypes, ValueBase};
pub use handle::{NodeId, Value, MAX_RESULT_INDEX, RESULT_INDEX_BITS};
