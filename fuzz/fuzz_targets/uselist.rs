#![no_main]

use libfuzzer_sys::fuzz_target;
use usechain::{
    FixedOperandList, Graph, GraphConfig, IrNode, NodeId, Operand, OperandList, OperandRef,
    Value, ValueBase,
};

struct Inst {
    base: ValueBase<u8, u8>,
    operands: FixedOperandList<2>,
}

impl IrNode for Inst {
    type Kind = u8;
    type Type = u8;

    fn value_base(&self) -> &ValueBase<u8, u8> {
        &self.base
    }

    fn value_base_mut(&mut self) -> &mut ValueBase<u8, u8> {
        &mut self.base
    }

    fn operands(&self) -> &[Operand] {
        self.operands.as_array()
    }

    fn operands_mut(&mut self) -> &mut [Operand] {
        self.operands.as_array_mut()
    }
}

fn pick(ids: &[NodeId], byte: u8) -> Option<NodeId> {
    (!ids.is_empty()).then(|| ids[byte as usize % ids.len()])
}

fn value(ids: &[NodeId], byte: u8) -> Value {
    pick(ids, byte >> 1).map_or(Value::INVALID, |id| Value::new(id, u32::from(byte & 1)))
}

// Interprets the input as a stream of graph edits and checks the use lists after each.
fuzz_target!(|data: &[u8]| {
    let mut graph: Graph<Inst> = Graph::with_config(GraphConfig::fast());
    let mut ids: Vec<NodeId> = Vec::new();

    for chunk in data.chunks_exact(3) {
        let (op, a, b) = (chunk[0], chunk[1], chunk[2]);
        match op % 5 {
            0 => {
                let (lhs, rhs) = (value(&ids, a), value(&ids, b));
                let id = graph.insert_with(|id| Inst {
                    base: ValueBase::with_types(op, vec![0, 1]),
                    operands: FixedOperandList::new(id, [lhs, rhs]),
                });
                ids.push(id);
            }
            1 => {
                if let Some(user) = pick(&ids, a) {
                    let target = value(&ids, b);
                    graph.set_operand(OperandRef::new(user, usize::from(op & 1)), target);
                }
            }
            2 => {
                let (from, to) = (value(&ids, a), value(&ids, b));
                if from.is_valid() {
                    graph.replace_all_uses_with(from, to);
                }
            }
            3 => {
                if let Some(id) = pick(&ids, a) {
                    graph.drop_all_references(id);
                }
            }
            _ => {
                if let Some(id) = pick(&ids, a) {
                    if graph.try_remove(id).is_ok() {
                        ids.retain(|other| *other != id);
                    }
                }
            }
        }

        if let Err(err) = graph.verify() {
            panic!("{err}");
        }
    }
});
