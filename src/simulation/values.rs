use crate::graph::{Circuit, EdgeId, NodeKind, PinId, PinKey};
use indexmap::IndexMap;

/// Value of every pin the engine has computed, keyed by [PinKey].
pub type PinValues = IndexMap<PinKey, bool>;

/// External values for source nodes, keyed by the id of the source's output pin.
pub type InputValues = IndexMap<PinId, bool>;

/// Values of a circuit's output nodes, keyed by the id of the output node's pin.
pub type OutputValues = IndexMap<PinId, bool>;

/// Writes the external value of every source node output pin into `values`.
/// Pins missing from `inputs` are seeded with `false`.
pub(crate) fn seed_sources(circuit: &Circuit, inputs: &InputValues, values: &mut PinValues) {
    for node in circuit.nodes.iter().filter(|n| n.kind.is_source()) {
        for pin in node.output_pins() {
            values.insert(node.key(pin), inputs.get(&pin.id).copied().unwrap_or(false));
        }
    }
}

/// Returns the values of the output nodes of `circuit` read from `values`.
pub fn collect_outputs(circuit: &Circuit, values: &PinValues) -> OutputValues {
    let mut outputs = OutputValues::new();
    for node in circuit.nodes.iter().filter(|n| n.kind == NodeKind::Output) {
        for pin in node.input_pins() {
            let value = values.get(&node.key(pin)).copied().unwrap_or(false);
            outputs.insert(pin.id.clone(), value);
        }
    }
    outputs
}

/// Returns the signal carried by every edge: the value of its source pin.
pub fn edge_signals(circuit: &Circuit, values: &PinValues) -> IndexMap<EdgeId, bool> {
    circuit
        .edges
        .iter()
        .map(|e| (e.id.clone(), values.get(&e.from.key()).copied().unwrap_or(false)))
        .collect()
}
