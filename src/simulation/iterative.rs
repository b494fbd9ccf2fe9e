use super::evaluator::{Evaluation, Evaluator};
use super::instance_state::InstanceStates;
use super::values::*;
use crate::graph::{Adjacency, Circuit, PinKey};
use indexmap::IndexSet;
use log::warn;

impl<'a> Evaluator<'a> {
    /// Applies the node rule to every node of `circuit` once, in node list order.
    /// Updates are visible to the nodes that come after them in the same pass.
    fn relax(
        &self,
        circuit: &Circuit,
        adjacency: &Adjacency,
        values: &mut PinValues,
        states: &mut InstanceStates,
    ) {
        for node in &circuit.nodes {
            self.evaluate_node(node, adjacency, values, states);
        }
    }

    /// Evaluates `circuit` by Gauss-Seidel relaxation, for circuits with feedback.
    ///
    /// The working map starts from `previous`, the full pin map of the previous tick, so
    /// latches hold their state when their inputs don't force a change. Passes are run until
    /// a pass changes nothing or [SimulationConfig::max_iterations](super::SimulationConfig)
    /// is reached. In the second case one more pass is run and every pin it changed is
    /// reported in [Evaluation::unstable].
    pub fn evaluate_iterative(
        &self,
        circuit: &Circuit,
        inputs: &InputValues,
        previous: Option<&PinValues>,
        states: &mut InstanceStates,
    ) -> Evaluation {
        let adjacency = Adjacency::new(circuit);

        let mut values = previous.cloned().unwrap_or_default();
        // Pins of nodes that are gone since the previous tick.
        let live: IndexSet<PinKey> = circuit
            .nodes
            .iter()
            .flat_map(|n| n.pins.iter().map(move |p| n.key(p)))
            .collect();
        values.retain(|key, _| live.contains(key));
        seed_sources(circuit, inputs, &mut values);

        let budget = self.config.max_iterations;
        for iteration in 1..=budget {
            let snapshot = values.clone();
            self.relax(circuit, &adjacency, &mut values, states);
            if converged(&snapshot, &values) {
                return Evaluation::settled(values, iteration);
            }
        }

        let snapshot = values.clone();
        self.relax(circuit, &adjacency, &mut values, states);
        let unstable: IndexSet<PinKey> = values
            .iter()
            .filter(|(key, value)| snapshot.get(*key) != Some(*value))
            .map(|(key, _)| key.clone())
            .collect();
        warn!(
            "{} didn't stabilize after {} passes, {} pins oscillating",
            circuit.name,
            budget,
            unstable.len()
        );

        Evaluation {
            pin_values: values,
            stable: false,
            unstable,
            iterations: budget,
        }
    }
}

/// Returns true if `after` has the same keys and values as `before`.
#[inline(always)]
fn converged(before: &PinValues, after: &PinValues) -> bool {
    before.len() == after.len() && after.iter().all(|(key, value)| before.get(key) == Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{ModuleLibrary, PinRef};
    use crate::simulation::SimulationConfig;

    fn sr_latch() -> (Circuit, PinRef, PinRef) {
        let mut c = Circuit::new("sr");
        let s = c.input("s");
        let r = c.input("r");
        let q = c.nand("nand1");
        let nq = c.nand2(&q, &r, "nand2");
        c.d0(&q.node, &s);
        c.d1(&q.node, &nq);
        let q_out = c.output(&q, "q");
        let nq_out = c.output(&nq, "nq");
        (c, q_out, nq_out)
    }

    fn inputs(s: bool, r: bool) -> InputValues {
        vec![("s".into(), s), ("r".into(), r)].into_iter().collect()
    }

    #[test]
    fn test_ring_oscillator() {
        let library = ModuleLibrary::new();
        let mut c = Circuit::new("ring");
        let out = c.nand("nand");
        c.d0(&out.node, &out);
        c.d1(&out.node, &out);

        let evaluation = Evaluator::new(&library).evaluate_iterative(
            &c,
            &InputValues::new(),
            None,
            &mut InstanceStates::new(),
        );
        assert_oscillates!(evaluation, out.key());
        assert_eq!(evaluation.iterations, 100);
    }

    #[test]
    fn test_custom_budget() {
        let library = ModuleLibrary::new();
        let mut c = Circuit::new("ring");
        let out = c.nand("nand");
        c.d0(&out.node, &out);
        c.d1(&out.node, &out);

        let config = SimulationConfig::default().max_iterations(7);
        let evaluation = Evaluator::with_config(&library, config).evaluate_iterative(
            &c,
            &InputValues::new(),
            None,
            &mut InstanceStates::new(),
        );
        assert!(!evaluation.stable);
        assert_eq!(evaluation.iterations, 7);
    }

    #[test]
    fn test_sr_latch_hold() {
        let library = ModuleLibrary::new();
        let evaluator = Evaluator::new(&library);
        let (c, q, nq) = sr_latch();
        let mut states = InstanceStates::new();

        let set = evaluator.evaluate_iterative(&c, &inputs(false, true), None, &mut states);
        assert_stable!(set);
        assert!(set.value(&q));
        assert!(!set.value(&nq));

        let hold = evaluator.evaluate_iterative(
            &c,
            &inputs(true, true),
            Some(&set.pin_values),
            &mut states,
        );
        assert_stable!(hold);
        assert!(hold.value(&q));

        let reset = evaluator.evaluate_iterative(
            &c,
            &inputs(true, false),
            Some(&hold.pin_values),
            &mut states,
        );
        assert_stable!(reset);
        assert!(!reset.value(&q));
        assert!(reset.value(&nq));

        let hold = evaluator.evaluate_iterative(
            &c,
            &inputs(true, true),
            Some(&reset.pin_values),
            &mut states,
        );
        assert_stable!(hold);
        assert!(!hold.value(&q));
        assert!(hold.value(&nq));
    }

    #[test]
    fn test_stale_pins_dropped() {
        let library = ModuleLibrary::new();
        let (c, _, _) = sr_latch();
        let mut previous = PinValues::new();
        previous.insert(PinRef::new("removed", "out").key(), true);

        let evaluation = Evaluator::new(&library).evaluate_iterative(
            &c,
            &inputs(false, true),
            Some(&previous),
            &mut InstanceStates::new(),
        );
        assert!(!evaluation.pin_values.contains_key("removed:out"));
    }
}
