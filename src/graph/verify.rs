//! Structural verification of use lists.
//!
//! [`Graph::verify`] checks the invariants the linking code relies on:
//!
//! - every operand names its owning node as user
//! - an operand is linked exactly when its value is valid
//! - every valid value names a live producer and one of its results
//! - every use list contains exactly the operands using its producer, with each
//!   operand's back link naming the slot that points at it
//! - no use list is cyclic
//!
//! Verification is O(total operands). [`crate::GraphConfig::checked`] runs it after
//! every mutation.

use crate::{operand::UseSlot, Error, Graph, IrNode, OperandRef, Result};

impl<N: IrNode> Graph<N> {
    /// Checks the use lists of the whole graph for consistency.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DanglingValue`] or [`Error::ResultOutOfRange`] for an operand
    /// using a value that does not exist, and [`Error::UseListCorrupted`] for any
    /// broken link.
    pub fn verify(&self) -> Result<()> {
        let linked = self.verify_operands()?;

        let mut walked = 0usize;
        for (def, node) in self.nodes.iter() {
            let mut expected = UseSlot::Head(def);
            let mut cur = node.value_base().first_use();

            while let Some(op) = cur {
                walked += 1;
                if walked > linked {
                    return Err(use_list_corrupted!(
                        "use list of {def:?} holds more entries than there are linked operands"
                    ));
                }

                let Some(operand) = self.try_operand(op) else {
                    return Err(use_list_corrupted!(
                        "use list of {def:?} names missing operand {op:?}"
                    ));
                };
                if operand.get().def() != Some(def) {
                    return Err(use_list_corrupted!(
                        "operand {op:?} is in the use list of {def:?} but uses {}",
                        operand.get()
                    ));
                }
                if operand.back() != Some(expected) {
                    return Err(use_list_corrupted!(
                        "operand {op:?} has back link {:?}, expected {expected:?}",
                        operand.back()
                    ));
                }

                expected = UseSlot::Next(op);
                cur = operand.next();
            }
        }

        if walked != linked {
            return Err(use_list_corrupted!(
                "{linked} operands are linked but the use lists hold {walked}"
            ));
        }
        Ok(())
    }

    /// Checks every operand on its own and returns the number of linked operands.
    fn verify_operands(&self) -> Result<usize> {
        let mut linked = 0usize;

        for (user, node) in self.nodes.iter() {
            for (index, operand) in node.operands().iter().enumerate() {
                let op = OperandRef::new(user, index);
                if operand.user() != user {
                    return Err(use_list_corrupted!(
                        "operand {op:?} claims {:?} as its user",
                        operand.user()
                    ));
                }

                let value = operand.get();
                let Some(def) = value.def() else {
                    if operand.is_linked() {
                        return Err(use_list_corrupted!(
                            "operand {op:?} holds the invalid value but is linked"
                        ));
                    }
                    continue;
                };

                let producer = self.nodes.get(def).ok_or(Error::DanglingValue(value))?;
                let results = producer.value_base().num_results();
                if value.result_index() as usize >= results {
                    return Err(Error::ResultOutOfRange { value, results });
                }
                if !operand.is_linked() {
                    return Err(use_list_corrupted!(
                        "operand {op:?} uses {value} but is not linked"
                    ));
                }
                linked += 1;
            }
        }

        Ok(linked)
    }
}
