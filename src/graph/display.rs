//! Debug rendering of a node together with its def-use neighbourhood.

use std::fmt;

use crate::{Graph, IrNode, NodeId};

/// Displays a node with the values it uses and the operands that use it.
///
/// Created by [`Graph::display_in_context`]. The output has one line per operand,
/// then the node itself, then one line per use:
///
/// ```text
///   operand[0] = NodeId(1v1)#0
///   operand[1] = NodeId(2v1)#0
/// NodeId(3v1): Add -> [I32]
///   used by NodeId(4v1)[0]
/// ```
pub struct InContext<'g, N: IrNode> {
    graph: &'g Graph<N>,
    id: NodeId,
}

impl<N: IrNode> fmt::Display for InContext<'_, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(node) = self.graph.get(self.id) else {
            return writeln!(f, "{:?}: <removed>", self.id);
        };

        for (index, operand) in node.operands().iter().enumerate() {
            writeln!(f, "  operand[{index}] = {}", operand.get())?;
        }

        let base = node.value_base();
        writeln!(f, "{:?}: {:?} -> {:?}", self.id, base.kind(), base.types())?;

        for op in self.graph.uses(self.id) {
            writeln!(f, "  used by {op:?}")?;
        }
        Ok(())
    }
}

impl<N: IrNode> Graph<N> {
    /// Returns a [`fmt::Display`] adapter that prints node `id` in context.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// tracing::debug!("rewriting\n{}", graph.display_in_context(add));
    /// ```
    #[must_use]
    pub fn display_in_context(&self, id: NodeId) -> InContext<'_, N> {
        InContext { graph: self, id }
    }
}
