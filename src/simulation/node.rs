use super::evaluator::Evaluator;
use super::instance_state::InstanceStates;
use super::values::{InputValues, PinValues};
use crate::graph::{Adjacency, Module, ModuleId, Node, NodeKind::*, Pin};
use log::{trace, warn};
use smallvec::SmallVec;

/// Most modules have few outputs, avoids allocating for them.
const INSTANCE_OUTPUTS_SIZE: usize = 8;

impl<'a> Evaluator<'a> {
    /// Returns the value driving `pin` of `node`, `false` if it is undriven or its driver
    /// hasn't been computed yet.
    #[inline(always)]
    fn resolve(node: &Node, pin: &Pin, adjacency: &Adjacency, values: &PinValues) -> bool {
        adjacency
            .driver(&node.key(pin))
            .and_then(|driver| values.get(&driver.key()))
            .copied()
            .unwrap_or(false)
    }

    /// Resolves every input pin of `node`, writes the results into the input pins' own
    /// slots and returns them in pin order.
    fn resolve_inputs(
        node: &Node,
        adjacency: &Adjacency,
        values: &mut PinValues,
    ) -> SmallVec<[bool; INSTANCE_OUTPUTS_SIZE]> {
        let resolved: SmallVec<[bool; INSTANCE_OUTPUTS_SIZE]> = node
            .input_pins()
            .map(|pin| Self::resolve(node, pin, adjacency, values))
            .collect();
        for (pin, value) in node.input_pins().zip(resolved.iter()) {
            values.insert(node.key(pin), *value);
        }
        resolved
    }

    /// Writes `outputs` into the output pins of `node` positionally, missing positions are `false`.
    fn write_outputs(node: &Node, outputs: &[bool], values: &mut PinValues) {
        for (i, pin) in node.output_pins().enumerate() {
            values.insert(node.key(pin), outputs.get(i).copied().unwrap_or(false));
        }
    }

    /// Applies the evaluation rule of `node`'s kind, reading and writing `values`.
    ///
    /// Source nodes are expected to be seeded already, sinks copy their driver, NAND gates
    /// compute `!(a && b)` over their first two inputs, module instances either look up
    /// the module's truth table or recursively evaluate its circuit with the instance's
    /// own state from `states`.
    pub fn evaluate_node(
        &self,
        node: &Node,
        adjacency: &Adjacency,
        values: &mut PinValues,
        states: &mut InstanceStates,
    ) {
        match &node.kind {
            Input | Constant | Clock | Button => {
                for pin in node.output_pins() {
                    values.entry(node.key(pin)).or_insert(false);
                }
            }
            Output | Probe => {
                Self::resolve_inputs(node, adjacency, values);
            }
            Instance(module) if module.is_nand() => {
                let inputs = Self::resolve_inputs(node, adjacency, values);
                let a = inputs.get(0).copied().unwrap_or(false);
                let b = inputs.get(1).copied().unwrap_or(false);
                let result = !(a && b);
                for pin in node.output_pins() {
                    values.insert(node.key(pin), result);
                }
            }
            Instance(module) => {
                let inputs = Self::resolve_inputs(node, adjacency, values);
                let outputs = match self.resolve_module(node, module) {
                    Some(module) => self.evaluate_instance(node, module, &inputs, states),
                    None => SmallVec::new(),
                };
                Self::write_outputs(node, &outputs, values);
            }
        }
    }

    /// Returns the module `id` if it can be evaluated from this depth.
    fn resolve_module(&self, node: &Node, id: &ModuleId) -> Option<&'a Module> {
        if self.depth >= self.config.max_nesting_depth {
            warn!(
                "instance {} of {} exceeds nesting depth {}, outputs default to false",
                node.id, id, self.config.max_nesting_depth
            );
            return None;
        }
        let module = self.library.get(id);
        if module.is_none() {
            warn!(
                "instance {} references missing module {}, outputs default to false",
                node.id, id
            );
        }
        module
    }

    /// Computes the outputs of the instance `node` of `module`, in the module's declared
    /// output order, given the instance's resolved inputs in pin order.
    fn evaluate_instance(
        &self,
        node: &Node,
        module: &Module,
        inputs: &[bool],
        states: &mut InstanceStates,
    ) -> SmallVec<[bool; INSTANCE_OUTPUTS_SIZE]> {
        // The nth instance input feeds the nth declared module input.
        let sub_inputs: InputValues = module
            .inputs
            .iter()
            .enumerate()
            .map(|(i, pin)| (pin.id.clone(), inputs.get(i).copied().unwrap_or(false)))
            .collect();

        if let Some(table) = &module.truth_table {
            return table.output_bits(&sub_inputs).collect();
        }

        trace!("{}: evaluating {} at depth {}", node.id, module.name, self.depth + 1);
        let state = states.entry(node.id.clone()).or_default();
        let evaluation = self.nested().evaluate(
            &module.circuit,
            &sub_inputs,
            Some(&state.pin_values),
            &mut state.children,
        );
        let outputs = evaluation.outputs(&module.circuit);
        state.pin_values = evaluation.pin_values;

        module
            .outputs
            .iter()
            .map(|pin| outputs.get(&pin.id).copied().unwrap_or(false))
            .collect()
    }
}
