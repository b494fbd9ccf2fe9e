use super::composition::references_module;
use crate::graph::{Circuit, ModuleId, ModuleLibrary, NodeId, NodeKind};
use crate::simulation::SimulationConfig;
use crate::truth_table::generate_truth_table_with_config;
use log::{info, warn};
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

/// Reason a module can't be saved.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum SaveError {
    #[error("module '{0}' not found in library")]
    UnknownModule(ModuleId),
    #[error("module name cannot be \"NAND\", it is the built-in gate")]
    ReservedName,
    #[error("module must have at least one input node")]
    NoInputNode,
    #[error("module must have at least one output node")]
    NoOutputNode,
    #[error("module '{0}' contains itself")]
    SelfReference(ModuleId),
}

/// Non fatal problem found while saving a module.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum SaveWarning {
    UnconnectedInput(NodeId),
    UnconnectedOutput(NodeId),
    /// The pin order override is not a permutation of the new interface, it is ignored for display.
    InconsistentPinOrder,
}

impl Display for SaveWarning {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SaveWarning::UnconnectedInput(id) => write!(f, "input '{}' is not connected", id),
            SaveWarning::UnconnectedOutput(id) => write!(f, "output '{}' is not connected", id),
            SaveWarning::InconsistentPinOrder => {
                write!(f, "pin order doesn't match the module interface")
            }
        }
    }
}

/// Outcome of [ModuleLibrary::save]. The module was updated if `errors` is empty.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct SaveReport {
    pub warnings: Vec<SaveWarning>,
    pub errors: Vec<SaveError>,
}

impl SaveReport {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }

    fn fail(mut self, error: SaveError) -> Self {
        self.errors.push(error);
        self
    }
}

impl ModuleLibrary {
    /// Replaces the internals of module `id` with `circuit`.
    ///
    /// Rejects unknown modules, modules named `NAND`, circuits without an input or an output
    /// node and circuits that would make the module contain itself. Unconnected input or
    /// output nodes and a stale pin order are only warned about. On success the interface
    /// is extracted from `circuit` again and a truth table is cached if one can be generated.
    pub fn save(&mut self, id: &ModuleId, circuit: Circuit) -> SaveReport {
        self.save_with_config(id, circuit, Default::default())
    }

    /// [ModuleLibrary::save] with a custom [SimulationConfig] for truth table generation.
    pub fn save_with_config(
        &mut self,
        id: &ModuleId,
        circuit: Circuit,
        config: SimulationConfig,
    ) -> SaveReport {
        let mut report = SaveReport::default();
        let name = match self.get(id) {
            Some(module) => module.name.clone(),
            None => return report.fail(SaveError::UnknownModule(id.clone())),
        };
        if name.eq_ignore_ascii_case("NAND") {
            return report.fail(SaveError::ReservedName);
        }

        let inputs: Vec<_> = circuit.nodes.iter().filter(|n| n.kind == NodeKind::Input).collect();
        let outputs: Vec<_> = circuit.nodes.iter().filter(|n| n.kind == NodeKind::Output).collect();
        if inputs.is_empty() {
            report.errors.push(SaveError::NoInputNode);
        }
        if outputs.is_empty() {
            report.errors.push(SaveError::NoOutputNode);
        }
        if !report.is_success() {
            return report;
        }

        for node in inputs {
            if circuit.edges.iter().all(|e| e.from.node != node.id) {
                report.warnings.push(SaveWarning::UnconnectedInput(node.id.clone()));
            }
        }
        for node in outputs {
            if circuit.edges.iter().all(|e| e.to.node != node.id) {
                report.warnings.push(SaveWarning::UnconnectedOutput(node.id.clone()));
            }
        }

        if references_module(&circuit, id, self) {
            return report.fail(SaveError::SelfReference(id.clone()));
        }

        let table = generate_truth_table_with_config(&circuit, self, config);
        let (inputs, outputs) = circuit.extract_interface();
        let module = match self.get_mut(id) {
            Some(module) => module,
            None => return report.fail(SaveError::UnknownModule(id.clone())),
        };
        module.inputs = inputs;
        module.outputs = outputs;
        module.circuit = circuit;
        module.truth_table = table;
        if !module.pin_order_consistent() {
            report.warnings.push(SaveWarning::InconsistentPinOrder);
        }

        for warning in &report.warnings {
            warn!("saving {}: {}", name, warning);
        }
        info!(
            "saved {} ({} inputs, {} outputs, truth table {})",
            name,
            module.inputs.len(),
            module.outputs.len(),
            if module.truth_table.is_some() { "cached" } else { "unavailable" }
        );
        report
    }
}
