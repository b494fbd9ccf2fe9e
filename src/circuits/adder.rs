use super::gates::{and, xor};
use crate::graph::*;

/// Returns a half adder module with inputs `a`, `b` and outputs `s` (sum) then `c` (carry),
/// built from an [xor] and an [and] instance.
///
/// # Example
/// ```
/// # use nandsim::{half_adder, standard_library, Simulation};
/// let adder = half_adder();
/// let mut sim = Simulation::new(adder.circuit, standard_library());
/// sim.set_input("a", true);
/// sim.set_input("b", true);
/// sim.step();
/// assert_eq!(sim.output("s"), false);
/// assert_eq!(sim.output("c"), true);
/// ```
pub fn half_adder() -> Module {
    let mut c = Circuit::new("half_adder");
    let a = c.input("a");
    let b = c.input("b");
    let sum = c.instancex(&xor(), &[a.clone(), b.clone()], "xor");
    let carry = c.instancex(&and(), &[a, b], "and");
    c.output(&sum[0], "s");
    c.output(&carry[0], "c");
    Module::from_circuit("mod-half-adder", "HALF ADDER", c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::standard_library;
    use crate::generate_truth_table;

    #[test]
    fn test_half_adder_table() {
        let library = standard_library();
        let table = generate_truth_table(&half_adder().circuit, &library).unwrap();
        let rows: Vec<_> = table.rows().collect();
        let expected = [("00", "00"), ("01", "10"), ("10", "10"), ("11", "01")];
        for (row, (inputs, outputs)) in rows.iter().zip(expected.iter()) {
            assert_eq!(row.0, *inputs);
            assert_eq!(row.1, *outputs, "half adder {}", inputs);
        }
    }

    #[test]
    fn test_cached_in_library() {
        let library = standard_library();
        let module = library.get(&"mod-half-adder".into()).unwrap();
        assert!(module.truth_table.is_some());
        assert_eq!(module.outputs.len(), 2);
    }
}
