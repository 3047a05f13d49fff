//! Shared test node type.
//!
//! A small expression IR covering every operand storage shape: nullary constants,
//! fixed unary and binary nodes, a two-result node, calls with one fixed callee plus
//! dynamic arguments, and variadic phis.

use crate::{
    FixedOperandList, IrNode, NodeId, Operand, OperandList, TailAllocatedOperandList, Value,
    ValueBase, VariadicOperandList,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Constant,
    Add,
    Mul,
    Neg,
    DivMod,
    Call,
    Phi,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ty {
    I32,
    I64,
    Bool,
}

#[derive(Debug)]
pub enum Operands {
    None,
    Unary(FixedOperandList<1>),
    Binary(FixedOperandList<2>),
    Call(TailAllocatedOperandList<1>),
    Phi(VariadicOperandList),
}

#[derive(Debug)]
pub struct Node {
    base: ValueBase<Kind, Ty>,
    operands: Operands,
}

impl Node {
    pub fn constant(ty: Ty) -> Self {
        Self {
            base: ValueBase::new(Kind::Constant, ty),
            operands: Operands::None,
        }
    }

    pub fn unary(id: NodeId, kind: Kind, value: Value) -> Self {
        Self {
            base: ValueBase::new(kind, Ty::I32),
            operands: Operands::Unary(FixedOperandList::new(id, [value])),
        }
    }

    pub fn binary(id: NodeId, kind: Kind, lhs: Value, rhs: Value) -> Self {
        Self {
            base: ValueBase::new(kind, Ty::I32),
            operands: Operands::Binary(FixedOperandList::new(id, [lhs, rhs])),
        }
    }

    /// Two results: quotient and remainder.
    pub fn divmod(id: NodeId, lhs: Value, rhs: Value) -> Self {
        Self {
            base: ValueBase::with_types(Kind::DivMod, vec![Ty::I32, Ty::I32]),
            operands: Operands::Binary(FixedOperandList::new(id, [lhs, rhs])),
        }
    }

    pub fn call(id: NodeId, callee: Value, args: &[Value], results: &[Ty]) -> Self {
        Self {
            base: ValueBase::with_types(Kind::Call, results.to_vec()),
            operands: Operands::Call(TailAllocatedOperandList::new(id, args, [callee])),
        }
    }

    pub fn phi(id: NodeId, ty: Ty, incoming: &[Value]) -> Self {
        Self {
            base: ValueBase::new(Kind::Phi, ty),
            operands: Operands::Phi(VariadicOperandList::from_dynamic(id, incoming)),
        }
    }

    pub fn operand_storage(&self) -> &Operands {
        &self.operands
    }
}

impl IrNode for Node {
    type Kind = Kind;
    type Type = Ty;

    fn value_base(&self) -> &ValueBase<Kind, Ty> {
        &self.base
    }

    fn value_base_mut(&mut self) -> &mut ValueBase<Kind, Ty> {
        &mut self.base
    }

    fn operands(&self) -> &[Operand] {
        match &self.operands {
            Operands::None => &[],
            Operands::Unary(list) => list.as_array(),
            Operands::Binary(list) => list.as_array(),
            Operands::Call(list) => list.as_array(),
            Operands::Phi(list) => list.as_array(),
        }
    }

    fn operands_mut(&mut self) -> &mut [Operand] {
        match &mut self.operands {
            Operands::None => &mut [],
            Operands::Unary(list) => list.as_array_mut(),
            Operands::Binary(list) => list.as_array_mut(),
            Operands::Call(list) => list.as_array_mut(),
            Operands::Phi(list) => list.as_array_mut(),
        }
    }
}
