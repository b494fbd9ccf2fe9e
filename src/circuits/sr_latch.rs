use crate::graph::*;

/// Returns an [SR latch](https://en.wikipedia.org/wiki/Flip-flop_(electronics)#SR_NAND_latch)
/// module made of 2 cross-coupled NANDs.
///
/// Inputs `s` and `r` are active low, outputs are `q` then `nq`.
///
/// # Example
///
/// ```
/// # use nandsim::{Circuit, sr_latch, standard_library, Simulation};
/// let latch = sr_latch();
/// let mut c = Circuit::new("top");
/// let s = c.input("s");
/// let r = c.input("r");
/// let q = c.instancex(&latch, &[s, r], "latch");
/// c.output(&q[0], "q");
///
/// let mut sim = Simulation::new(c, standard_library());
/// // With latches, the initial state should be treated as undefined,
/// // so remember to always reset your latches at the beginning of the simulation.
/// sim.set_input("s", true);
/// sim.set_input("r", false);
/// sim.step();
/// assert_eq!(sim.output("q"), false);
///
/// sim.set_input("s", false);
/// sim.set_input("r", true);
/// sim.step();
/// assert_eq!(sim.output("q"), true);
///
/// sim.set_input("s", true);
/// sim.step();
/// assert_eq!(sim.output("q"), true);
/// ```
pub fn sr_latch() -> Module {
    let mut c = Circuit::new("sr_latch");
    let s = c.input("s");
    let r = c.input("r");

    let q = c.nand("nand1");
    let nq = c.nand2(&q, &r, "nand2");
    c.d0(&q.node, &s);
    c.d1(&q.node, &nq);

    c.output(&q, "q");
    c.output(&nq, "nq");
    Module::from_circuit("mod-sr-latch", "SR LATCH", c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::standard_library;
    use crate::Simulation;

    #[test]
    fn test_sr_latch() {
        let mut sim = Simulation::new(sr_latch().circuit, standard_library());
        sim.set_input("s", true);
        sim.set_input("r", true);

        for i in 0..10 {
            if i % 2 == 0 {
                sim.set_input("s", false);
                assert_stable!(sim.step());
                assert_eq!(sim.output("q"), true);
                assert_eq!(sim.output("nq"), false);
                sim.set_input("s", true);
            } else {
                sim.set_input("r", false);
                assert_stable!(sim.step());
                assert_eq!(sim.output("q"), false);
                assert_eq!(sim.output("nq"), true);
                sim.set_input("r", true);
            }
            // Hold.
            assert_stable!(sim.step());
            assert_eq!(sim.output("q"), i % 2 == 0);
        }
    }

    #[test]
    fn test_no_table() {
        let library = standard_library();
        assert!(library.get(&"mod-sr-latch".into()).unwrap().truth_table.is_none());
    }
}
