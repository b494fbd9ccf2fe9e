use super::table::TruthTable;
use crate::data_structures::Combinations;
use crate::graph::{Circuit, ModuleLibrary};
use crate::simulation::{Evaluator, InputValues, InstanceStates, SimulationConfig};
use crate::validate::find_nested_cycle;
use bitvec::prelude::*;
use log::debug;
use thiserror::Error;

/// Reason a [TruthTable] can't be generated for a circuit.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum TableUnavailable {
    /// The circuit has more inputs than the configured limit.
    #[error("{inputs} inputs exceed the limit of {max}")]
    TooManyInputs { inputs: usize, max: usize },

    /// The circuit, or a module it contains, has feedback. Its behavior depends on state
    /// and a single snapshot per combination would misrepresent it.
    #[error("'{0}' contains a cycle")]
    NestedCycle(String),
}

/// Returns the [TruthTable] of `circuit`, or [None] if it has too many inputs or contains
/// a cycle at any nesting level. The reason is logged at debug level.
pub fn generate_truth_table(circuit: &Circuit, library: &ModuleLibrary) -> Option<TruthTable> {
    generate_truth_table_with_config(circuit, library, Default::default())
}

/// [generate_truth_table] with a custom [SimulationConfig].
pub fn generate_truth_table_with_config(
    circuit: &Circuit,
    library: &ModuleLibrary,
    config: SimulationConfig,
) -> Option<TruthTable> {
    match try_generate_truth_table_with_config(circuit, library, config) {
        Ok(table) => Some(table),
        Err(reason) => {
            debug!("no truth table for {}: {}", circuit.name, reason);
            None
        }
    }
}

/// Returns the [TruthTable] of `circuit` or the reason it can't be generated.
pub fn try_generate_truth_table(
    circuit: &Circuit,
    library: &ModuleLibrary,
) -> Result<TruthTable, TableUnavailable> {
    try_generate_truth_table_with_config(circuit, library, Default::default())
}

/// [try_generate_truth_table] with a custom [SimulationConfig].
///
/// Every combination is evaluated from a blank state, with the inputs of the circuit
/// counting up in binary, first input most significant.
pub fn try_generate_truth_table_with_config(
    circuit: &Circuit,
    library: &ModuleLibrary,
    config: SimulationConfig,
) -> Result<TruthTable, TableUnavailable> {
    let (inputs, outputs) = circuit.extract_interface();
    // Row indices are usize, the combination count has to fit.
    let max = config
        .max_truth_table_inputs
        .min(usize::BITS as usize - 1);
    if inputs.len() > max {
        return Err(TableUnavailable::TooManyInputs {
            inputs: inputs.len(),
            max,
        });
    }
    if let Some(name) = find_nested_cycle(circuit, library) {
        return Err(TableUnavailable::NestedCycle(name.to_string()));
    }

    let input_names: Vec<_> = inputs.into_iter().map(|p| p.id).collect();
    let output_names: Vec<_> = outputs.into_iter().map(|p| p.id).collect();
    let evaluator = Evaluator::with_config(library, config);

    let rows = Combinations::new(input_names.len())
        .map(|bits| {
            let values: InputValues = input_names
                .iter()
                .cloned()
                .zip(bits.iter().by_vals())
                .collect();
            let outputs = evaluator
                .evaluate(circuit, &values, None, &mut InstanceStates::new())
                .outputs(circuit);
            output_names
                .iter()
                .map(|name| outputs.get(name).copied().unwrap_or(false))
                .collect::<BitVec>()
        })
        .collect();

    Ok(TruthTable::new(input_names, output_names, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::{sr_latch, standard_library};
    use crate::graph::Module;

    #[test]
    fn test_not_table() {
        let mut c = Circuit::new("not");
        let a = c.input("a");
        let n = c.nand2(&a, &a, "nand");
        c.output(&n, "out");

        let table = generate_truth_table(&c, &ModuleLibrary::new()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.row("0").as_deref(), Some("1"));
        assert_eq!(table.row("1").as_deref(), Some("0"));
    }

    #[test]
    fn test_xor_table() {
        let mut c = Circuit::new("xor");
        let a = c.input("a");
        let b = c.input("b");
        let n1 = c.nand2(&a, &b, "n1");
        let n2 = c.nand2(&a, &n1, "n2");
        let n3 = c.nand2(&n1, &b, "n3");
        let n4 = c.nand2(&n2, &n3, "n4");
        c.output(&n4, "out");

        let table = generate_truth_table(&c, &ModuleLibrary::new()).unwrap();
        let rows: Vec<_> = table.rows().map(|(_, out)| out).collect();
        assert_eq!(rows, vec!["0", "1", "1", "0"]);
    }

    #[test]
    fn test_empty_circuit() {
        let table = generate_truth_table(&Circuit::new("empty"), &ModuleLibrary::new()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.row("").as_deref(), Some(""));
    }

    fn wide(n: usize) -> Circuit {
        let mut c = Circuit::new("wide");
        let pins: Vec<_> = (0..n).map(|i| c.input(format!("i{}", i))).collect();
        let mut acc = pins[0].clone();
        for (i, pin) in pins.iter().enumerate().skip(1) {
            acc = c.nand2(&acc, pin, format!("n{}", i));
        }
        c.output(&acc, "out");
        c
    }

    #[test]
    fn test_input_limit() {
        let library = ModuleLibrary::new();
        assert_eq!(
            try_generate_truth_table(&wide(17), &library).unwrap_err(),
            TableUnavailable::TooManyInputs { inputs: 17, max: 16 }
        );
        assert!(generate_truth_table(&wide(17), &library).is_none());

        let config = SimulationConfig::default().max_truth_table_inputs(3);
        assert!(generate_truth_table_with_config(&wide(4), &library, config).is_none());
        assert_eq!(
            generate_truth_table_with_config(&wide(3), &library, config)
                .unwrap()
                .len(),
            8
        );
    }

    #[test]
    fn test_input_limit_capped_by_word_size() {
        let bits = usize::BITS as usize;
        let config = SimulationConfig::default().max_truth_table_inputs(bits);
        assert_eq!(
            try_generate_truth_table_with_config(&wide(bits), &ModuleLibrary::new(), config)
                .unwrap_err(),
            TableUnavailable::TooManyInputs {
                inputs: bits,
                max: bits - 1
            }
        );
    }

    #[test]
    fn test_sixteen_inputs() {
        let table = generate_truth_table(&wide(16), &ModuleLibrary::new()).unwrap();
        assert_eq!(table.len(), 65536);
    }

    #[test]
    fn test_nested_cycle_refused() {
        let library = standard_library();
        let latch = sr_latch();
        let mut c = Circuit::new("wrapper");
        let s = c.input("s");
        let r = c.input("r");
        let q = c.instancex(&latch, &[s, r], "latch");
        c.output(&q[0], "q");

        assert_eq!(
            try_generate_truth_table(&c, &library).unwrap_err(),
            TableUnavailable::NestedCycle(latch.circuit.name.clone())
        );

        let direct = try_generate_truth_table(&latch.circuit, &library).unwrap_err();
        assert!(matches!(direct, TableUnavailable::NestedCycle(_)));
    }

    #[test]
    fn test_table_instance_shortcut() {
        // A module with a deliberately wrong cached table is evaluated through the table.
        let mut inner = Circuit::new("buf");
        let a = inner.input("a");
        let n1 = inner.nand2(&a, &a, "n1");
        let n2 = inner.nand2(&n1, &n1, "n2");
        inner.output(&n2, "y");
        let mut not = inner.clone();
        not.remove_node(&"n2".into());
        not.connect(&n1, &crate::graph::PinRef::new("y", "y"));
        let table = generate_truth_table(&not, &ModuleLibrary::new());
        let module = Module::from_circuit("mod-buf", "BUF", inner).with_truth_table(table);

        let mut c = Circuit::new("outer");
        let x = c.input("x");
        let y = c.instancex(&module, &[x], "buf");
        c.output(&y[0], "out");
        let library: ModuleLibrary = std::iter::once(module).collect();

        let inputs: InputValues = std::iter::once(("x".into(), true)).collect();
        let outputs = crate::evaluate_circuit(&c, &inputs, &library);
        assert_eq!(outputs["out"], false);
    }
}
