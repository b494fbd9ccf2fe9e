use super::config::SimulationConfig;
use super::instance_state::InstanceStates;
use super::values::*;
use crate::graph::{Circuit, ModuleLibrary, NodeId, PinId, PinKey, PinRef};
use indexmap::IndexSet;
use log::debug;

/// Result of evaluating a circuit for one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Evaluation {
    /// Value of every pin of every node.
    pub pin_values: PinValues,
    /// False if the iterative evaluator ran out of passes.
    pub stable: bool,
    /// Pins that still changed on the extra pass after the budget ran out.
    pub unstable: IndexSet<PinKey>,
    /// Relaxation passes used, 1 for a topological evaluation.
    pub iterations: usize,
}

impl Evaluation {
    /// Returns a stable [Evaluation].
    pub(crate) fn settled(pin_values: PinValues, iterations: usize) -> Self {
        Self {
            pin_values,
            stable: true,
            unstable: IndexSet::new(),
            iterations,
        }
    }

    /// Returns the value of `pin`, `false` if it was never computed.
    pub fn value(&self, pin: &PinRef) -> bool {
        self.pin_values.get(&pin.key()).copied().unwrap_or(false)
    }

    /// Returns the value of pin `pin` on node `node`, `false` if it was never computed.
    pub fn get(&self, node: &NodeId, pin: &PinId) -> bool {
        self.pin_values
            .get(&PinKey::new(node, pin))
            .copied()
            .unwrap_or(false)
    }

    /// Returns the values of the output nodes of `circuit`.
    pub fn outputs(&self, circuit: &Circuit) -> OutputValues {
        collect_outputs(circuit, &self.pin_values)
    }

    /// Returns true if `key` oscillated.
    pub fn is_unstable(&self, key: &PinKey) -> bool {
        self.unstable.contains(key)
    }
}

/// Evaluates circuits against a [ModuleLibrary].
///
/// Cycle-free circuits are evaluated in a single topological pass. When the topological
/// evaluator reports a cycle, evaluation falls back to bounded Gauss-Seidel relaxation
/// seeded with the previous tick's pin values, see [Evaluator::evaluate_iterative].
///
/// The evaluator holds no mutable state: everything that survives a tick is in the
/// previous [PinValues] and the [InstanceStates] the caller threads through.
#[derive(Clone, Copy, Debug)]
pub struct Evaluator<'a> {
    pub(super) library: &'a ModuleLibrary,
    pub(super) config: SimulationConfig,
    pub(super) depth: usize,
}

impl<'a> Evaluator<'a> {
    /// Returns an [Evaluator] using the default [SimulationConfig].
    pub fn new(library: &'a ModuleLibrary) -> Self {
        Self::with_config(library, Default::default())
    }

    /// Returns an [Evaluator] using `config`.
    pub fn with_config(library: &'a ModuleLibrary, config: SimulationConfig) -> Self {
        Self {
            library,
            config,
            depth: 0,
        }
    }

    pub fn library(&self) -> &'a ModuleLibrary {
        self.library
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Returns the evaluator used for the internals of a module instance.
    pub(super) fn nested(&self) -> Self {
        Self {
            depth: self.depth + 1,
            ..*self
        }
    }

    /// Evaluates `circuit` for one tick.
    ///
    /// `previous` is the full pin map of the previous tick, only used if the circuit has a cycle.
    /// `states` is updated in place with the new state of every module instance evaluated.
    pub fn evaluate(
        &self,
        circuit: &Circuit,
        inputs: &InputValues,
        previous: Option<&PinValues>,
        states: &mut InstanceStates,
    ) -> Evaluation {
        match self.evaluate_topological(circuit, inputs, states) {
            Ok(pin_values) => Evaluation::settled(pin_values, 1),
            Err(e) => {
                debug!("{}: {}, falling back to relaxation", circuit.name, e);
                self.evaluate_iterative(circuit, inputs, previous, states)
            }
        }
    }
}

/// Evaluates `circuit` from a blank state and returns the values of its output nodes.
pub fn evaluate_circuit(
    circuit: &Circuit,
    inputs: &InputValues,
    library: &ModuleLibrary,
) -> OutputValues {
    evaluate_circuit_full(circuit, inputs, library)
        .outputs(circuit)
}

/// Evaluates `circuit` from a blank state and returns the full [Evaluation].
pub fn evaluate_circuit_full(
    circuit: &Circuit,
    inputs: &InputValues,
    library: &ModuleLibrary,
) -> Evaluation {
    Evaluator::new(library).evaluate(circuit, inputs, None, &mut InstanceStates::new())
}

/// Evaluates `circuit` with state carried over from the previous tick.
///
/// See [Evaluator::evaluate].
pub fn evaluate_circuit_with_state(
    circuit: &Circuit,
    inputs: &InputValues,
    library: &ModuleLibrary,
    previous: Option<&PinValues>,
    states: &mut InstanceStates,
) -> Evaluation {
    Evaluator::new(library).evaluate(circuit, inputs, previous, states)
}
