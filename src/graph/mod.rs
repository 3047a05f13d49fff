//! The node arena and the use-list algorithm.
//!
//! A [`Graph`] owns every node of one IR unit and is the only place where use lists
//! change. Node types are supplied by the caller through the [`IrNode`] trait: the
//! graph never looks at a node's kind or payload, only at its [`ValueBase`] and its
//! operand storage.
//!
//! # Use-List Maintenance
//!
//! - **Insert** ([`Graph::insert_with`]): every operand of the new node is linked at
//!   the head of its producer's use list. O(1) per operand.
//! - **Rebind** ([`Graph::set_operand`]): the operand is unlinked from its current
//!   list, its value is overwritten, and it is linked into the new list. Unlinking
//!   comes first so the old list is patched, not the new one.
//! - **Remove** ([`Graph::remove`]): the node's operands are unlinked, then the node
//!   is released. Removing a node that operands of other nodes still use is a
//!   contract violation.
//!
//! Removal from any position is O(1) because each linked operand records the slot
//! that points at it (the producer's head or the previous operand's `next`).
//!
//! # Usage
//!
//! ```rust,ignore
//! use usechain::{FixedOperandList, Graph, IrNode, Operand, OperandList, Value, ValueBase};
//!
//! let mut graph = Graph::new();
//! let a = graph.insert_with(|_| Node::constant(1));
//! let b = graph.insert_with(|_| Node::constant(2));
//! let add = graph.insert_with(|id| Node::binary(id, Kind::Add, a.into(), b.into()));
//!
//! assert_eq!(graph.use_count(a), 1);
//! graph.replace_all_uses_with(a.into(), b.into());
//! assert!(graph.use_empty(a));
//! graph.remove(a);
//! ```

mod display;
mod verify;

use std::{fmt, ops::Index};

use slotmap::SlotMap;
use tracing::{debug, error, trace};

use crate::{
    operand::UseSlot, Error, GraphConfig, NodeId, Operand, OperandRef, OperandValues, Result,
    UseCursor, Value, ValueBase, ValueBaseUseIter, ValueUseIter,
};

pub use display::InContext;

/// A node type that can live in a [`Graph`].
///
/// Implementors embed a [`ValueBase`] and, for consumers, one operand storage
/// ([`crate::FixedOperandList`], [`crate::TailAllocatedOperandList`]) whose operands
/// were created with the node's own id as their user.
///
/// # Examples
///
/// ```rust
/// use usechain::{FixedOperandList, IrNode, Operand, OperandList, ValueBase};
///
/// struct Binary {
///     base: ValueBase<&'static str, &'static str>,
///     operands: FixedOperandList<2>,
/// }
///
/// impl IrNode for Binary {
///     type Kind = &'static str;
///     type Type = &'static str;
///
///     fn value_base(&self) -> &ValueBase<Self::Kind, Self::Type> {
///         &self.base
///     }
///
///     fn value_base_mut(&mut self) -> &mut ValueBase<Self::Kind, Self::Type> {
///         &mut self.base
///     }
///
///     fn operands(&self) -> &[Operand] {
///         self.operands.as_array()
///     }
///
///     fn operands_mut(&mut self) -> &mut [Operand] {
///         self.operands.as_array_mut()
///     }
/// }
/// ```
pub trait IrNode {
    /// The kind tag of the caller's node taxonomy.
    type Kind: Copy + Ord + fmt::Debug;

    /// The caller's type representation.
    type Type: fmt::Debug;

    /// Returns the node's value base.
    fn value_base(&self) -> &ValueBase<Self::Kind, Self::Type>;

    /// Returns the node's value base, mutably.
    fn value_base_mut(&mut self) -> &mut ValueBase<Self::Kind, Self::Type>;

    /// Returns the node's operands. Nodes without operands keep the default.
    fn operands(&self) -> &[Operand] {
        &[]
    }

    /// Returns the node's operands, mutably.
    ///
    /// The graph patches use-list links through this slice. It must return the same
    /// operands, in the same order, as [`IrNode::operands`].
    fn operands_mut(&mut self) -> &mut [Operand] {
        &mut []
    }
}

/// Arena of IR nodes with intrusive use lists.
///
/// The graph is single-threaded: every mutation takes `&mut self`, and the borrowing
/// iterators ([`Graph::uses`], [`Graph::value_uses`]) hold `&self`, so a use list
/// cannot change while it is being iterated. Rewrites during traversal use a
/// [`UseCursor`].
#[derive(Debug)]
pub struct Graph<N: IrNode> {
    nodes: SlotMap<NodeId, N>,
    config: GraphConfig,
}

impl<N: IrNode> Default for Graph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: IrNode> Graph<N> {
    /// Creates an empty graph with the default configuration.
    ///
    /// **Warning**: In debug builds the default is [`GraphConfig::checked`], which
    /// verifies the whole graph after every mutation. Each insertion, rebind and
    /// removal then costs O(total operands) instead of O(1). Use
    /// [`Graph::with_config`] with [`GraphConfig::fast`] for large graphs.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    /// Creates an empty graph with the given configuration.
    #[must_use]
    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            nodes: SlotMap::with_capacity_and_key(config.initial_capacity),
            config,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns `true` if `id` names a node of this graph.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Returns the node `id`, if present.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&N> {
        self.nodes.get(id)
    }

    /// Returns the node `id` mutably, if present.
    ///
    /// The node's payload may be changed freely. Its operands must not be replaced,
    /// reordered or swapped: use [`Graph::set_operand`] to change what they use.
    /// [`Graph::verify`] detects violations.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut N> {
        self.nodes.get_mut(id)
    }

    /// Iterates over all nodes in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &N)> + '_ {
        self.nodes.iter()
    }

    /// Iterates over all node ids in arena order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys()
    }

    /// Returns the value base of node `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not part of the graph.
    #[must_use]
    pub fn value_base(&self, id: NodeId) -> &ValueBase<N::Kind, N::Type> {
        self[id].value_base()
    }

    /// Inserts a node built by `build` and links all of its operands.
    ///
    /// `build` receives the id the node will have, which its operands must name as
    /// their user.
    ///
    /// # Panics
    ///
    /// Panics if an operand names another user, is already linked, or uses a value
    /// whose producer is not part of the graph. The node is not inserted in that case.
    pub fn insert_with<F>(&mut self, build: F) -> NodeId
    where
        F: FnOnce(NodeId) -> N,
    {
        let id = self.nodes.insert_with_key(build);

        if let Err(message) = self.check_new_operands(id) {
            self.nodes.remove(id);
            panic!("{message}");
        }

        let count = self.nodes[id].operands().len();
        for index in 0..count {
            self.link(OperandRef::new(id, index));
        }

        trace!(node = ?id, operands = count, "inserted node");
        self.check_after_mutation();
        id
    }

    fn check_new_operands(&self, id: NodeId) -> std::result::Result<(), String> {
        for (index, operand) in self.nodes[id].operands().iter().enumerate() {
            if operand.user() != id {
                return Err(format!(
                    "operand {index} of node {id:?} was created for node {:?}",
                    operand.user()
                ));
            }
            if operand.is_linked() {
                return Err(format!("operand {index} of node {id:?} is already linked"));
            }
            if let Some(def) = operand.get().def() {
                // A node may use its own results.
                if def != id && !self.nodes.contains_key(def) {
                    return Err(format!(
                        "operand {index} of node {id:?} uses {}, whose producer is not part of the graph",
                        operand.get()
                    ));
                }
            }
        }
        Ok(())
    }

    /// Returns the operand `op`.
    ///
    /// # Panics
    ///
    /// Panics if `op` does not name an operand of a node in this graph.
    #[must_use]
    pub fn operand(&self, op: OperandRef) -> &Operand {
        match self.try_operand(op) {
            Some(operand) => operand,
            None => panic!("operand {op:?} is not part of the graph"),
        }
    }

    /// Returns the operand `op`, if present.
    #[must_use]
    pub fn try_operand(&self, op: OperandRef) -> Option<&Operand> {
        self.nodes.get(op.user())?.operands().get(op.index())
    }

    /// Returns the values used by the operands of node `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not part of the graph.
    #[must_use]
    pub fn operand_values(&self, id: NodeId) -> OperandValues<'_> {
        OperandValues::new(self[id].operands())
    }

    /// Makes operand `op` use `value`.
    ///
    /// The operand leaves its current use list and is inserted at the head of the use
    /// list of `value`'s producer. Rebinding to the current value is allowed and moves
    /// the operand to the head. Setting [`Value::INVALID`] leaves the operand unlinked.
    ///
    /// # Panics
    ///
    /// Panics if `op` is not an operand of this graph or if `value`'s producer is not
    /// part of the graph.
    pub fn set_operand(&mut self, op: OperandRef, value: Value) {
        if let Some(def) = value.def() {
            assert!(
                self.nodes.contains_key(def),
                "cannot use {value}: its producer is not part of the graph"
            );
        }

        self.unlink(op);
        self.operand_mut(op).set_value(value);
        self.link(op);

        trace!(operand = ?op, %value, "rebound operand");
        self.check_after_mutation();
    }

    /// Iterates over every operand that uses any result of node `id`.
    ///
    /// Each call starts from the current head of the use list.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not part of the graph.
    #[must_use]
    pub fn uses(&self, id: NodeId) -> ValueBaseUseIter<'_, N> {
        ValueBaseUseIter::new(self, id)
    }

    /// Iterates over the operands that use exactly `value`.
    ///
    /// # Panics
    ///
    /// Panics if `value` is invalid or its producer is not part of the graph.
    #[must_use]
    pub fn value_uses(&self, value: Value) -> ValueUseIter<'_, N> {
        ValueUseIter::new(self, value)
    }

    /// Returns a detached cursor over every use of node `id`.
    #[must_use]
    pub fn use_cursor(&self, id: NodeId) -> UseCursor {
        UseCursor::all(self, id)
    }

    /// Returns a detached cursor over the uses of `value`.
    #[must_use]
    pub fn value_use_cursor(&self, value: Value) -> UseCursor {
        UseCursor::of_value(self, value)
    }

    /// Returns `true` if no operand uses any result of node `id`. O(1).
    #[must_use]
    pub fn use_empty(&self, id: NodeId) -> bool {
        self.value_base(id).use_empty()
    }

    /// Returns `true` if no operand uses `value`.
    ///
    /// This walks the producer's use list until the first use of `value`.
    #[must_use]
    pub fn value_use_empty(&self, value: Value) -> bool {
        self.value_uses(value).next().is_none()
    }

    /// Returns the number of operands using any result of node `id`.
    #[must_use]
    pub fn use_count(&self, id: NodeId) -> usize {
        self.uses(id).count()
    }

    /// Returns the type of the result `value` names.
    ///
    /// # Panics
    ///
    /// Panics if `value` is invalid, dangling, or names a result its producer does not
    /// have.
    #[must_use]
    pub fn value_type(&self, value: Value) -> &N::Type {
        match self.try_value_type(value) {
            Ok(ty) => ty,
            Err(err) => panic!("{err}"),
        }
    }

    /// Returns the type of the result `value` names.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidValue`] for the invalid handle, [`Error::DanglingValue`]
    /// if the producer is not part of the graph, and [`Error::ResultOutOfRange`] if the
    /// producer does not define the result.
    pub fn try_value_type(&self, value: Value) -> Result<&N::Type> {
        let def = value.def().ok_or(Error::InvalidValue)?;
        let node = self.nodes.get(def).ok_or(Error::DanglingValue(value))?;
        let types = node.value_base().types();

        types
            .get(value.result_index() as usize)
            .ok_or(Error::ResultOutOfRange {
                value,
                results: types.len(),
            })
    }

    /// Makes every operand that uses `from` use `to` instead.
    ///
    /// Returns the number of rebound operands. Nothing happens when `from == to`.
    ///
    /// # Panics
    ///
    /// Panics if `from` is invalid or dangling, or if `to`'s producer is not part of the
    /// graph.
    pub fn replace_all_uses_with(&mut self, from: Value, to: Value) -> usize {
        if from == to {
            return 0;
        }

        let mut cursor = self.value_use_cursor(from);
        let mut replaced = 0;
        while let Some(op) = cursor.next(self) {
            self.set_operand(op, to);
            replaced += 1;
        }

        debug!(%from, %to, replaced, "replaced all uses");
        replaced
    }

    /// Unlinks every operand of node `id` and resets it to [`Value::INVALID`].
    ///
    /// This breaks reference cycles (for example between nodes in dead code) so that
    /// the nodes can be removed in any order.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not part of the graph.
    pub fn drop_all_references(&mut self, id: NodeId) {
        let count = self[id].operands().len();
        for index in 0..count {
            let op = OperandRef::new(id, index);
            self.unlink(op);
            self.operand_mut(op).set_value(Value::INVALID);
        }

        trace!(node = ?id, operands = count, "dropped all references");
        self.check_after_mutation();
    }

    /// Removes node `id` and returns it.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not part of the graph or if operands of other nodes still use
    /// it. See [`Graph::try_remove`].
    pub fn remove(&mut self, id: NodeId) -> N {
        match self.try_remove(id) {
            Ok(node) => node,
            Err(err) => panic!("{err}"),
        }
    }

    /// Removes node `id` and returns it, with all of its operands unlinked.
    ///
    /// Uses of the node by its own operands are dropped together with the node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownNode`] if `id` is not part of the graph and
    /// [`Error::ValueInUse`] if operands of other nodes still use it. The graph is left
    /// unchanged on error.
    pub fn try_remove(&mut self, id: NodeId) -> Result<N> {
        let count = self
            .nodes
            .get(id)
            .ok_or(Error::UnknownNode(id))?
            .operands()
            .len();

        let foreign = self.uses(id).filter(|op| op.user() != id).count();
        if foreign > 0 {
            return Err(Error::ValueInUse {
                node: id,
                uses: foreign,
            });
        }

        for index in 0..count {
            self.unlink(OperandRef::new(id, index));
        }

        let node = self.nodes.remove(id).ok_or(Error::UnknownNode(id))?;
        debug_assert!(node.value_base().use_empty());

        trace!(node = ?id, "removed node");
        self.check_after_mutation();
        Ok(node)
    }

    fn operand_mut(&mut self, op: OperandRef) -> &mut Operand {
        let Some(node) = self.nodes.get_mut(op.user()) else {
            panic!("operand {op:?} is not part of the graph");
        };
        match node.operands_mut().get_mut(op.index()) {
            Some(operand) => operand,
            None => panic!("operand {op:?} is not part of the graph"),
        }
    }

    fn value_base_mut(&mut self, id: NodeId) -> &mut ValueBase<N::Kind, N::Type> {
        let Some(node) = self.nodes.get_mut(id) else {
            panic!("node {id:?} is not part of the graph");
        };
        node.value_base_mut()
    }

    /// Links `op` at the head of its producer's use list. Invalid values stay unlinked.
    fn link(&mut self, op: OperandRef) {
        let Some(def) = self.operand(op).get().def() else {
            return;
        };

        let head = self.value_base(def).first_use();
        let operand = self.operand_mut(op);
        operand.set_back(Some(UseSlot::Head(def)));
        operand.set_next(head);

        if let Some(next) = head {
            self.operand_mut(next).set_back(Some(UseSlot::Next(op)));
        }
        self.value_base_mut(def).set_first_use(Some(op));
    }

    /// Unlinks `op` from whatever use list it is in. No-op for unlinked operands.
    fn unlink(&mut self, op: OperandRef) {
        let operand = self.operand_mut(op);
        let Some(back) = operand.back() else {
            return;
        };
        let next = operand.next();
        operand.set_back(None);
        operand.set_next(None);

        match back {
            UseSlot::Head(def) => self.value_base_mut(def).set_first_use(next),
            UseSlot::Next(prev) => self.operand_mut(prev).set_next(next),
        }
        if let Some(next) = next {
            self.operand_mut(next).set_back(Some(back));
        }
    }

    fn check_after_mutation(&self) {
        if !self.config.verify_after_mutation {
            return;
        }
        if let Err(err) = self.verify() {
            error!(%err, "use-list verification failed");
            panic!("{err}");
        }
    }
}

impl<N: IrNode> Index<NodeId> for Graph<N> {
    type Output = N;

    fn index(&self, id: NodeId) -> &N {
        match self.nodes.get(id) {
            Some(node) => node,
            None => panic!("node {id:?} is not part of the graph"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test::{Kind, Node, Operands, Ty},
        OperandList,
    };

    fn users(graph: &Graph<Node>, id: NodeId) -> Vec<OperandRef> {
        graph.uses(id).collect()
    }

    #[test]
    fn test_insert_links_at_head() {
        let mut graph = Graph::new();
        let a = graph.insert_with(|_| Node::constant(Ty::I32));
        let u1 = graph.insert_with(|id| Node::unary(id, Kind::Neg, a.into()));
        let u2 = graph.insert_with(|id| Node::unary(id, Kind::Neg, a.into()));
        let u3 = graph.insert_with(|id| Node::unary(id, Kind::Neg, a.into()));

        assert_eq!(graph.len(), 4);
        assert_eq!(
            users(&graph, a),
            vec![
                OperandRef::new(u3, 0),
                OperandRef::new(u2, 0),
                OperandRef::new(u1, 0)
            ]
        );
        assert_eq!(graph.use_count(a), 3);
        assert!(!graph.use_empty(a));
        assert!(graph.use_empty(u1));
        assert!(graph.operand(OperandRef::new(u1, 0)).is_linked());
    }

    #[test]
    fn test_rebind_head_middle_tail() {
        for victim in 0..3 {
            let mut graph = Graph::new();
            let a = graph.insert_with(|_| Node::constant(Ty::I32));
            let b = graph.insert_with(|_| Node::constant(Ty::I32));
            for _ in 0..3 {
                graph.insert_with(|id| Node::unary(id, Kind::Neg, a.into()));
            }

            // Use list of `a` is consumers in reverse insertion order.
            let before = users(&graph, a);
            let moved = before[victim];
            graph.set_operand(moved, b.into());

            let expected: Vec<OperandRef> =
                before.iter().copied().filter(|op| *op != moved).collect();
            assert_eq!(users(&graph, a), expected);
            assert_eq!(users(&graph, b), vec![moved]);
            assert_eq!(graph.operand(moved).get(), Value::from(b));
            assert!(graph.verify().is_ok());
        }
    }

    #[test]
    fn test_rebind_to_same_value_moves_to_head() {
        let mut graph = Graph::new();
        let a = graph.insert_with(|_| Node::constant(Ty::I32));
        let u1 = graph.insert_with(|id| Node::unary(id, Kind::Neg, a.into()));
        let u2 = graph.insert_with(|id| Node::unary(id, Kind::Neg, a.into()));

        let tail = OperandRef::new(u1, 0);
        graph.set_operand(tail, a.into());
        assert_eq!(users(&graph, a), vec![tail, OperandRef::new(u2, 0)]);
    }

    #[test]
    fn test_rebind_to_invalid_unlinks() {
        let mut graph = Graph::new();
        let a = graph.insert_with(|_| Node::constant(Ty::I32));
        let u = graph.insert_with(|id| Node::unary(id, Kind::Neg, a.into()));
        let op = OperandRef::new(u, 0);

        graph.set_operand(op, Value::INVALID);
        assert!(graph.use_empty(a));
        assert!(!graph.operand(op).is_linked());

        graph.set_operand(op, a.into());
        assert_eq!(users(&graph, a), vec![op]);
    }

    #[test]
    fn test_two_result_filtering() {
        let mut graph = Graph::new();
        let x = graph.insert_with(|_| Node::constant(Ty::I32));
        let p = graph.insert_with(|id| Node::divmod(id, x.into(), x.into()));
        let c1 = graph.insert_with(|id| Node::unary(id, Kind::Neg, Value::new(p, 0)));
        let c2 = graph.insert_with(|id| Node::unary(id, Kind::Neg, Value::new(p, 1)));
        let (u1, u2) = (OperandRef::new(c1, 0), OperandRef::new(c2, 0));

        assert_eq!(graph.uses(p).count(), 2);
        assert_eq!(graph.value_uses(Value::new(p, 0)).collect::<Vec<_>>(), vec![u1]);
        assert_eq!(graph.value_uses(Value::new(p, 1)).collect::<Vec<_>>(), vec![u2]);

        graph.set_operand(u2, Value::new(p, 0));

        let result0: Vec<OperandRef> = graph.value_uses(Value::new(p, 0)).collect();
        assert_eq!(result0.len(), 2);
        assert!(result0.contains(&u1) && result0.contains(&u2));
        assert!(graph.value_uses(Value::new(p, 1)).next().is_none());
        assert!(graph.value_use_empty(Value::new(p, 1)));
        assert!(!graph.value_use_empty(Value::new(p, 0)));
    }

    #[test]
    fn test_filtering_skips_interleaved_uses() {
        let mut graph = Graph::new();
        let x = graph.insert_with(|_| Node::constant(Ty::I32));
        let p = graph.insert_with(|id| Node::divmod(id, x.into(), x.into()));
        let q = Value::new(p, 0);
        let r = Value::new(p, 1);

        let mut expected_q = Vec::new();
        let mut expected_r = Vec::new();
        for i in 0..6 {
            let value = if i % 2 == 0 { q } else { r };
            let c = graph.insert_with(|id| Node::unary(id, Kind::Neg, value));
            if value == q {
                expected_q.insert(0, OperandRef::new(c, 0));
            } else {
                expected_r.insert(0, OperandRef::new(c, 0));
            }
        }

        assert_eq!(graph.value_uses(q).collect::<Vec<_>>(), expected_q);
        assert_eq!(graph.value_uses(r).collect::<Vec<_>>(), expected_r);
        assert_eq!(graph.use_count(p), 6);
    }

    #[test]
    fn test_replace_all_uses_with() {
        let mut graph = Graph::new();
        let a = graph.insert_with(|_| Node::constant(Ty::I32));
        let b = graph.insert_with(|_| Node::constant(Ty::I32));
        let add = graph.insert_with(|id| Node::binary(id, Kind::Add, a.into(), a.into()));
        let neg = graph.insert_with(|id| Node::unary(id, Kind::Neg, b.into()));

        assert_eq!(graph.replace_all_uses_with(a.into(), a.into()), 0);
        assert_eq!(graph.replace_all_uses_with(a.into(), b.into()), 2);

        assert!(graph.use_empty(a));
        assert_eq!(graph.use_count(b), 3);
        assert_eq!(graph.operand_values(add).to_vec(), vec![Value::from(b); 2]);
        assert_eq!(graph.operand_values(neg)[0], Value::from(b));
    }

    #[test]
    fn test_replace_one_result_only() {
        let mut graph = Graph::new();
        let x = graph.insert_with(|_| Node::constant(Ty::I32));
        let p = graph.insert_with(|id| Node::divmod(id, x.into(), x.into()));
        let c0 = graph.insert_with(|id| Node::unary(id, Kind::Neg, Value::new(p, 0)));
        let c1 = graph.insert_with(|id| Node::unary(id, Kind::Neg, Value::new(p, 1)));

        assert_eq!(graph.replace_all_uses_with(Value::new(p, 1), x.into()), 1);
        assert_eq!(graph.operand_values(c0)[0], Value::new(p, 0));
        assert_eq!(graph.operand_values(c1)[0], Value::from(x));
        assert_eq!(users(&graph, p), vec![OperandRef::new(c0, 0)]);
    }

    #[test]
    fn test_remove_unused_node() {
        let mut graph = Graph::new();
        let a = graph.insert_with(|_| Node::constant(Ty::I32));
        let b = graph.insert_with(|_| Node::constant(Ty::I32));
        let add = graph.insert_with(|id| Node::binary(id, Kind::Add, a.into(), b.into()));

        let node = graph.remove(add);
        assert!(node.operands().iter().all(|op| !op.is_linked()));
        assert!(!graph.contains(add));
        assert!(graph.use_empty(a));
        assert!(graph.use_empty(b));
        assert_eq!(graph.try_remove(add).unwrap_err(), Error::UnknownNode(add));
    }

    #[test]
    fn test_remove_keeps_remaining_order() {
        let mut graph = Graph::new();
        let a = graph.insert_with(|_| Node::constant(Ty::I32));
        let consumers: Vec<NodeId> = (0..4)
            .map(|_| graph.insert_with(|id| Node::unary(id, Kind::Neg, a.into())))
            .collect();
        let before = users(&graph, a);

        graph.remove(consumers[1]);

        let expected: Vec<OperandRef> = before
            .into_iter()
            .filter(|op| op.user() != consumers[1])
            .collect();
        assert_eq!(users(&graph, a), expected);
    }

    #[test]
    fn test_try_remove_used_node_fails() {
        let mut graph = Graph::new();
        let a = graph.insert_with(|_| Node::constant(Ty::I32));
        let _u = graph.insert_with(|id| Node::binary(id, Kind::Add, a.into(), a.into()));

        assert_eq!(
            graph.try_remove(a).unwrap_err(),
            Error::ValueInUse { node: a, uses: 2 }
        );
        assert!(graph.contains(a));
        assert_eq!(graph.use_count(a), 2);
        assert!(graph.verify().is_ok());
    }

    #[test]
    #[should_panic(expected = "still used by 1 operand")]
    fn test_remove_used_node_panics() {
        let mut graph = Graph::new();
        let a = graph.insert_with(|_| Node::constant(Ty::I32));
        let _u = graph.insert_with(|id| Node::unary(id, Kind::Neg, a.into()));
        graph.remove(a);
    }

    #[test]
    fn test_self_use_is_dropped_with_node() {
        let mut graph = Graph::new();
        let init = graph.insert_with(|_| Node::constant(Ty::I64));
        let phi = graph.insert_with(|id| Node::phi(id, Ty::I64, &[Value::from(init), Value::from(id)]));

        assert_eq!(users(&graph, phi), vec![OperandRef::new(phi, 1)]);
        assert!(graph.try_remove(phi).is_ok());
        assert!(graph.use_empty(init));
    }

    #[test]
    fn test_drop_all_references_breaks_cycles() {
        let mut graph = Graph::new();
        let init = graph.insert_with(|_| Node::constant(Ty::I32));
        let phi = graph.insert_with(|id| Node::phi(id, Ty::I32, &[Value::from(init); 2]));
        let inc = graph.insert_with(|id| Node::binary(id, Kind::Add, phi.into(), init.into()));
        graph.set_operand(OperandRef::new(phi, 1), inc.into());

        assert!(graph.try_remove(phi).is_err());
        assert!(graph.try_remove(inc).is_err());

        graph.drop_all_references(phi);
        graph.drop_all_references(inc);
        assert!(graph
            .operand_values(phi)
            .iter()
            .all(|value| !value.is_valid()));

        graph.remove(phi);
        graph.remove(inc);
        assert!(graph.use_empty(init));
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_cursor_allows_rebinding_visited_use() {
        let mut graph = Graph::new();
        let a = graph.insert_with(|_| Node::constant(Ty::I32));
        let b = graph.insert_with(|_| Node::constant(Ty::I32));
        for _ in 0..3 {
            graph.insert_with(|id| Node::unary(id, Kind::Neg, a.into()));
        }

        let mut cursor = graph.use_cursor(a);
        let mut visited = 0;
        while let Some(op) = cursor.next(&graph) {
            graph.set_operand(op, b.into());
            visited += 1;
        }

        assert_eq!(visited, 3);
        assert!(cursor.is_done());
        assert_eq!(cursor.peek(), None);
        assert!(graph.use_empty(a));
        assert_eq!(graph.use_count(b), 3);
    }

    #[test]
    fn test_value_type() {
        let mut graph = Graph::new();
        let flag = graph.insert_with(|_| Node::constant(Ty::Bool));
        let x = graph.insert_with(|_| Node::constant(Ty::I32));
        let args = [Value::from(flag)];
        let call = graph.insert_with(|id| Node::call(id, x.into(), &args, &[Ty::I64, Ty::Bool]));

        assert_eq!(*graph.value_type(flag.into()), Ty::Bool);
        assert_eq!(*graph.value_type(Value::new(call, 1)), Ty::Bool);
        assert_eq!(graph.try_value_type(Value::new(call, 0)), Ok(&Ty::I64));
        assert_eq!(graph.try_value_type(Value::INVALID), Err(Error::InvalidValue));
        assert_eq!(
            graph.try_value_type(Value::new(call, 2)),
            Err(Error::ResultOutOfRange {
                value: Value::new(call, 2),
                results: 2
            })
        );

        graph.remove(call);
        assert_eq!(
            graph.try_value_type(Value::from(call)),
            Err(Error::DanglingValue(Value::from(call)))
        );
    }

    #[test]
    fn test_call_operand_layout() {
        let mut graph = Graph::new();
        let f = graph.insert_with(|_| Node::constant(Ty::I64));
        let args: Vec<Value> = (0..3)
            .map(|_| Value::from(graph.insert_with(|_| Node::constant(Ty::I32))))
            .collect();
        let call = graph.insert_with(|id| Node::call(id, f.into(), &args, &[Ty::I32]));

        let Operands::Call(list) = graph[call].operand_storage() else {
            panic!("expected call operands");
        };
        assert_eq!(list.fixed_as_array()[0].get(), Value::from(f));
        assert_eq!(list.dynamic_values_as_array().to_vec(), args);
        assert_eq!(graph.operand_values(call).len(), 4);
        assert_eq!(graph.operand(OperandRef::new(call, 2)).get(), args[1]);
        assert!(graph.try_operand(OperandRef::new(call, 4)).is_none());
    }

    #[test]
    #[should_panic(expected = "was created for node")]
    fn test_insert_rejects_foreign_operands() {
        let mut graph = Graph::new();
        let a = graph.insert_with(|_| Node::constant(Ty::I32));
        let other = graph.insert_with(|_| Node::constant(Ty::I32));
        graph.insert_with(|_| Node::unary(other, Kind::Neg, a.into()));
    }

    #[test]
    fn test_rejected_insert_leaves_graph_unchanged() {
        let mut graph = Graph::new();
        let a = graph.insert_with(|_| Node::constant(Ty::I32));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            graph.insert_with(|_| Node::unary(a, Kind::Neg, a.into()));
        }));

        assert!(result.is_err());
        assert_eq!(graph.len(), 1);
        assert!(graph.use_empty(a));
    }

    #[test]
    fn test_config_and_accessors() {
        let mut graph: Graph<Node> = Graph::with_config(GraphConfig::fast().with_capacity(8));
        assert!(graph.is_empty());
        assert!(!graph.config().verify_after_mutation);

        let a = graph.insert_with(|_| Node::constant(Ty::I32));
        assert!(graph.contains(a));
        assert_eq!(graph.get(a).map(|n| n.value_base().kind()), Some(Kind::Constant));
        assert!(graph.get_mut(a).is_some());
        assert_eq!(graph.node_ids().collect::<Vec<_>>(), vec![a]);
        assert_eq!(graph.iter().count(), 1);
        assert_eq!(graph.value_base(a).num_results(), 1);
        assert!(Graph::<Node>::default().is_empty());
    }

    #[test]
    fn test_new_follows_debug_assertions() {
        let graph: Graph<Node> = Graph::new();
        assert_eq!(*graph.config(), GraphConfig::default());
        assert_eq!(
            graph.config().verify_after_mutation,
            cfg!(debug_assertions)
        );
    }
}
