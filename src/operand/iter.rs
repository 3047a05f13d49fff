//! Traversal of use lists.
//!
//! A producer shares one physical use list across all of its results. Two borrowing
//! iterators walk it:
//!
//! - [`ValueBaseUseIter`] yields every operand that uses any result of the producer
//! - [`ValueUseIter`] yields only operands that use one specific result, skipping the
//!   others; its cost is proportional to all uses of the producer
//!
//! Both borrow the graph, so the use list cannot change underneath them. Passes that
//! rewrite uses while walking them use [`UseCursor`], which holds no borrow and has
//! already stepped past the operand it returns, so that operand may be rebound or
//! unlinked before the next step. Rewriting any *other* operand of the same use list
//! between steps invalidates the cursor.

use std::iter::FusedIterator;

use crate::{Graph, IrNode, NodeId, OperandRef, Value};

/// Returns `cur` or the first operand after it whose value uses result `result`.
fn skip_to_result<N: IrNode>(
    graph: &Graph<N>,
    mut cur: Option<OperandRef>,
    result: u32,
) -> Option<OperandRef> {
    while let Some(op) = cur {
        let operand = graph.operand(op);
        if operand.get().result_index() == result {
            break;
        }
        cur = operand.next();
    }
    cur
}

/// Iterator over all uses of a value base.
pub struct ValueBaseUseIter<'g, N: IrNode> {
    graph: &'g Graph<N>,
    cur: Option<OperandRef>,
}

impl<'g, N: IrNode> ValueBaseUseIter<'g, N> {
    pub(crate) fn new(graph: &'g Graph<N>, def: NodeId) -> Self {
        Self {
            graph,
            cur: graph.value_base(def).first_use(),
        }
    }
}

impl<N: IrNode> Clone for ValueBaseUseIter<'_, N> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph,
            cur: self.cur,
        }
    }
}

impl<N: IrNode> Iterator for ValueBaseUseIter<'_, N> {
    type Item = OperandRef;

    fn next(&mut self) -> Option<OperandRef> {
        let cur = self.cur?;
        self.cur = self.graph.operand(cur).next();
        Some(cur)
    }
}

impl<N: IrNode> FusedIterator for ValueBaseUseIter<'_, N> {}

/// Iterator over the uses of one specific result of a value base.
pub struct ValueUseIter<'g, N: IrNode> {
    graph: &'g Graph<N>,
    cur: Option<OperandRef>,
    result: u32,
}

impl<'g, N: IrNode> ValueUseIter<'g, N> {
    pub(crate) fn new(graph: &'g Graph<N>, value: Value) -> Self {
        let Some(def) = value.def() else {
            panic!("cannot iterate the uses of the invalid value handle");
        };
        let result = value.result_index();

        Self {
            graph,
            cur: skip_to_result(graph, graph.value_base(def).first_use(), result),
            result,
        }
    }
}

impl<N: IrNode> Clone for ValueUseIter<'_, N> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph,
            cur: self.cur,
            result: self.result,
        }
    }
}

impl<N: IrNode> Iterator for ValueUseIter<'_, N> {
    type Item = OperandRef;

    fn next(&mut self) -> Option<OperandRef> {
        let cur = self.cur?;
        self.cur = skip_to_result(self.graph, self.graph.operand(cur).next(), self.result);
        Some(cur)
    }
}

impl<N: IrNode> FusedIterator for ValueUseIter<'_, N> {}

/// A detached position in a use list.
///
/// The cursor stores only the operand it will return next. [`UseCursor::next`]
/// returns that operand after advancing past it, so the caller may mutate the
/// returned operand (typically with [`Graph::set_operand`]) before stepping again.
///
/// # Examples
///
/// ```rust,ignore
/// let mut cursor = graph.value_use_cursor(old);
/// while let Some(op) = cursor.next(&graph) {
///     graph.set_operand(op, new);
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UseCursor {
    next: Option<OperandRef>,
    result: Option<u32>,
}

impl UseCursor {
    pub(crate) fn all<N: IrNode>(graph: &Graph<N>, def: NodeId) -> Self {
        Self {
            next: graph.value_base(def).first_use(),
            result: None,
        }
    }

    pub(crate) fn of_value<N: IrNode>(graph: &Graph<N>, value: Value) -> Self {
        let Some(def) = value.def() else {
            panic!("cannot iterate the uses of the invalid value handle");
        };
        let result = value.result_index();

        Self {
            next: skip_to_result(graph, graph.value_base(def).first_use(), result),
            result: Some(result),
        }
    }

    /// Returns the operand at the cursor and advances past it.
    #[allow(clippy::should_implement_trait)]
    pub fn next<N: IrNode>(&mut self, graph: &Graph<N>) -> Option<OperandRef> {
        let cur = self.next?;
        let after = graph.operand(cur).next();
        self.next = match self.result {
            Some(result) => skip_to_result(graph, after, result),
            None => after,
        };
        Some(cur)
    }

    /// Returns the operand the next call to [`UseCursor::next`] will return.
    #[must_use]
    pub fn peek(&self) -> Option<OperandRef> {
        self.next
    }

    /// Returns `true` if the cursor has no operands left.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.next.is_none()
    }
}
