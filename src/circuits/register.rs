use super::d_latch::d_latch;
use crate::graph::*;

/// Returns a `width` bits register module made of [d_latch] instances sharing an enable.
///
/// Inputs are `d0`..`d{width-1}` then `en`, outputs are `q0`..`q{width-1}`.
///
/// # Example
/// ```
/// # use nandsim::{register, standard_library, Simulation};
/// let reg = register(2);
/// let mut sim = Simulation::new(reg.circuit, standard_library());
/// sim.set_inputs(vec!["d0", "d1", "en"], vec![true, false, true]);
/// sim.step();
/// sim.set_inputs(vec!["d0", "d1", "en"], vec![false, true, false]);
/// sim.step();
/// assert_eq!((sim.output("q0"), sim.output("q1")), (true, false));
/// ```
pub fn register(width: usize) -> Module {
    let latch = d_latch();
    let mut c = Circuit::new(format!("register_{}", width));
    let data: Vec<_> = (0..width).map(|i| c.input(format!("d{}", i))).collect();
    let en = c.input("en");

    for (i, d) in data.iter().enumerate() {
        let q = c.instancex(&latch, &[d.clone(), en.clone()], format!("latch{}", i));
        c.output(&q[0], format!("q{}", i));
    }
    Module::from_circuit(
        format!("mod-register-{}", width),
        format!("REGISTER {}", width),
        c,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::standard_library;
    use crate::Simulation;

    fn write(sim: &mut Simulation, bits: [bool; 4], en: bool) {
        for (i, bit) in bits.iter().enumerate() {
            sim.set_input(format!("d{}", i), *bit);
        }
        sim.set_input("en", en);
        assert_stable!(sim.step());
    }

    fn read(sim: &Simulation) -> Vec<bool> {
        (0..4).map(|i| sim.output(&format!("q{}", i))).collect()
    }

    #[test]
    fn test_register_holds() {
        let mut sim = Simulation::new(register(4).circuit, standard_library());

        write(&mut sim, [true, false, true, false], true);
        assert_eq!(read(&sim), vec![true, false, true, false]);

        write(&mut sim, [false, true, false, true], false);
        assert_eq!(read(&sim), vec![true, false, true, false]);

        write(&mut sim, [false, true, false, true], true);
        assert_eq!(read(&sim), vec![false, true, false, true]);
    }

    #[test]
    fn test_register_saves() {
        let mut library = standard_library();
        let reg = register(4);
        library.create(reg.id.clone(), reg.name.clone());
        let report = library.save(&reg.id, reg.circuit);
        assert!(report.is_success());

        let saved = library.get(&"mod-register-4".into()).unwrap();
        assert_eq!(saved.inputs.len(), 5);
        assert!(saved.truth_table.is_none());
    }
}
