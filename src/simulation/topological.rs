use super::evaluator::Evaluator;
use super::instance_state::InstanceStates;
use super::values::*;
use crate::error::{Result, SimError};
use crate::graph::{Adjacency, Circuit, Node, NodeId};
use indexmap::IndexMap;
use std::collections::VecDeque;

/// Returns the nodes of `circuit` in topological order, computed with Kahn's algorithm over
/// node-level edges.
///
/// Several pin-level edges between the same pair of nodes count as one. Nodes with no
/// incoming edges come first, in node list order. After that, a node is queued when its
/// last incoming edge is removed, and nodes freed by the same node follow edge order.
///
/// Returns [SimError::CircuitHasCycle] if some node could not be ordered.
pub fn topological_order(circuit: &Circuit) -> Result<Vec<&Node>> {
    let successors = circuit.node_successors();
    let index = circuit.node_index();

    let mut in_degree: IndexMap<&NodeId, usize> = successors.keys().map(|id| (*id, 0)).collect();
    for targets in successors.values() {
        for target in targets {
            if let Some(degree) = in_degree.get_mut(*target) {
                *degree += 1;
            }
        }
    }

    let mut queue: VecDeque<&NodeId> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(id, _)| *id)
        .collect();
    let mut order = Vec::with_capacity(circuit.nodes.len());

    while let Some(id) = queue.pop_front() {
        if let Some(node) = index.get(id) {
            order.push(*node);
        }
        for target in &successors[id] {
            if let Some(degree) = in_degree.get_mut(*target) {
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(*target);
                }
            }
        }
    }

    if order.len() < circuit.nodes.len() {
        return Err(SimError::cycle(order.len(), circuit.nodes.len()));
    }
    Ok(order)
}

impl<'a> Evaluator<'a> {
    /// Evaluates every node of `circuit` exactly once in topological order.
    ///
    /// The order is computed before anything is evaluated, so on
    /// [SimError::CircuitHasCycle] `states` is left untouched.
    pub fn evaluate_topological(
        &self,
        circuit: &Circuit,
        inputs: &InputValues,
        states: &mut InstanceStates,
    ) -> Result<PinValues> {
        let order = topological_order(circuit)?;
        let adjacency = Adjacency::new(circuit);

        let mut values = PinValues::with_capacity(circuit.edges.len() + circuit.nodes.len());
        seed_sources(circuit, inputs, &mut values);
        for node in order {
            self.evaluate_node(node, &adjacency, &mut values, states);
        }
        Ok(values)
    }
}
