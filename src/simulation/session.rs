use super::config::SimulationConfig;
use super::evaluator::{Evaluation, Evaluator};
use super::instance_state::{retain_instances, InstanceState, InstanceStates};
use super::values::*;
use crate::graph::{Circuit, ModuleLibrary, NodeId, NodeKind, PinId, PinKey, PinRef};
use indexmap::IndexMap;
#[cfg(feature = "debug_probes")]
use log::info;

/// A circuit being simulated tick by tick.
///
/// Owns everything that has to survive between ticks: the external input values, the full
/// pin map of the last tick and the state tree of every module instance.
///
/// # Example
/// ```
/// # use nandsim::{Circuit, Simulation, ModuleLibrary};
/// let mut c = Circuit::new("buffer");
/// let a = c.input("a");
/// let n1 = c.nand2(&a, &a, "n1");
/// let n2 = c.nand2(&n1, &n1, "n2");
/// c.output(&n2, "y");
///
/// let mut sim = Simulation::new(c, ModuleLibrary::new());
/// sim.set_input("a", true);
/// sim.step();
/// assert!(sim.output("y"));
/// sim.flip_input("a");
/// sim.step();
/// assert!(!sim.output("y"));
/// ```
#[derive(Clone, Debug)]
pub struct Simulation {
    circuit: Circuit,
    library: ModuleLibrary,
    config: SimulationConfig,
    inputs: InputValues,
    instance_states: InstanceStates,
    last: Evaluation,
    ticks: usize,
}

impl Simulation {
    /// Returns a new [Simulation] of `circuit` using the default [SimulationConfig].
    pub fn new(circuit: Circuit, library: ModuleLibrary) -> Self {
        Self::with_config(circuit, library, Default::default())
    }

    /// Returns a new [Simulation] of `circuit` using `config`.
    pub fn with_config(circuit: Circuit, library: ModuleLibrary, config: SimulationConfig) -> Self {
        Self {
            circuit,
            library,
            config,
            inputs: InputValues::new(),
            instance_states: InstanceStates::new(),
            last: Default::default(),
            ticks: 0,
        }
    }

    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    pub fn library(&self) -> &ModuleLibrary {
        &self.library
    }

    /// Returns the [Evaluation] of the last tick.
    pub fn last(&self) -> &Evaluation {
        &self.last
    }

    /// Returns the number of ticks run since creation or the last [Simulation::reset].
    pub fn ticks(&self) -> usize {
        self.ticks
    }

    /// Returns the state of every top level module instance.
    pub fn instance_states(&self) -> &InstanceStates {
        &self.instance_states
    }

    /// Returns the state of the module instance `id`.
    pub fn instance_state(&self, id: &NodeId) -> Option<&InstanceState> {
        self.instance_states.get(id)
    }

    /// Sets the external value of source pin `pin`, applied on the next tick.
    pub fn set_input<P: Into<PinId>>(&mut self, pin: P, value: bool) {
        self.inputs.insert(pin.into(), value);
    }

    /// Sets the external values of `pins` to the corresponding `values`.
    pub fn set_inputs<'p, P, I>(&mut self, pins: P, values: I)
    where
        P: IntoIterator<Item = &'p str>,
        I: IntoIterator<Item = bool>,
    {
        for (pin, value) in pins.into_iter().zip(values) {
            self.set_input(pin, value);
        }
    }

    /// Returns the external value of source pin `pin`, `false` if it was never set.
    pub fn input(&self, pin: &str) -> bool {
        self.inputs.get(pin).copied().unwrap_or(false)
    }

    /// Returns every external value set so far.
    pub fn inputs(&self) -> &InputValues {
        &self.inputs
    }

    /// Sets the external value of `pin` to the opposite of its current value, returns the new value.
    pub fn flip_input<P: Into<PinId>>(&mut self, pin: P) -> bool {
        let pin = pin.into();
        let value = !self.inputs.get(&pin).copied().unwrap_or(false);
        self.inputs.insert(pin, value);
        value
    }

    /// Sets `pin` to true and runs a tick, then sets it to false and runs another tick.
    pub fn pulse_input<P: Into<PinId>>(&mut self, pin: P) -> &Evaluation {
        let pin = pin.into();
        self.set_input(pin.clone(), true);
        self.step();
        self.set_input(pin, false);
        self.step()
    }

    /// Flips the external value of every clock node, returns the number of clocks flipped.
    pub fn toggle_clocks(&mut self) -> usize {
        let clocks: Vec<PinId> = self
            .circuit
            .nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Clock)
            .flat_map(|n| n.output_pins().map(|p| p.id.clone()))
            .collect();
        for pin in &clocks {
            self.flip_input(pin.clone());
        }
        clocks.len()
    }

    /// Evaluates the circuit with the current external values and returns the result.
    ///
    /// The previous tick's pin values and the instance states are carried over.
    pub fn step(&mut self) -> &Evaluation {
        let evaluator = Evaluator::with_config(&self.library, self.config);
        let previous = if self.ticks == 0 {
            None
        } else {
            Some(&self.last.pin_values)
        };
        let evaluation = evaluator.evaluate(
            &self.circuit,
            &self.inputs,
            previous,
            &mut self.instance_states,
        );
        #[cfg(feature = "debug_probes")]
        self.log_probes(&evaluation);
        self.last = evaluation;
        self.ticks += 1;
        &self.last
    }

    /// Logs every probe whose value differs from the previous tick.
    #[cfg(feature = "debug_probes")]
    fn log_probes(&self, evaluation: &Evaluation) {
        for node in self.circuit.nodes.iter().filter(|n| n.kind == NodeKind::Probe) {
            for pin in node.input_pins() {
                let key = node.key(pin);
                let value = evaluation.pin_values.get(&key).copied().unwrap_or(false);
                let before = self.last.pin_values.get(&key).copied();
                if before != Some(value) {
                    info!("tick {}: probe {} = {}", self.ticks, node.id, value);
                }
            }
        }
    }

    /// Runs [Simulation::step] until the outputs stop changing between ticks, a maximum of
    /// `max` times. Returns Ok(number_of_ticks) or Err(number_of_ticks) if they kept changing.
    pub fn run_until_settled(&mut self, max: usize) -> std::result::Result<usize, usize> {
        let mut outputs = self.outputs();
        for i in 1..=max {
            self.step();
            let next = self.outputs();
            if next == outputs && self.last.stable {
                return Ok(i);
            }
            outputs = next;
        }
        Err(max)
    }

    /// Returns the value of `pin` on the last tick, `false` if it was never computed.
    pub fn value(&self, pin: &PinRef) -> bool {
        self.last.value(pin)
    }

    /// Returns the value of the pin with key `key` on the last tick.
    pub fn value_of(&self, key: &PinKey) -> Option<bool> {
        self.last.pin_values.get(key).copied()
    }

    /// Returns the value of output pin `pin` on the last tick, `false` if there is no such output.
    pub fn output(&self, pin: &str) -> bool {
        self.outputs().get(pin).copied().unwrap_or(false)
    }

    /// Returns the values of every output node on the last tick.
    pub fn outputs(&self) -> OutputValues {
        self.last.outputs(&self.circuit)
    }

    /// Returns the signal carried by every edge on the last tick.
    pub fn edge_signals(&self) -> IndexMap<crate::graph::EdgeId, bool> {
        edge_signals(&self.circuit, &self.last.pin_values)
    }

    /// Removes node `id` and its edges from the circuit, discarding its instance state.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<crate::graph::Node> {
        let node = self.circuit.remove_node(id)?;
        self.instance_states.shift_remove(id);
        Some(node)
    }

    /// Applies `f` to the circuit, then discards the states of instances that no longer exist.
    pub fn edit<F: FnOnce(&mut Circuit)>(&mut self, f: F) {
        f(&mut self.circuit);
        retain_instances(&mut self.instance_states, &self.circuit);
    }

    /// Replaces the simulated circuit, returns the old one. Every piece of state is discarded.
    pub fn replace_circuit(&mut self, circuit: Circuit) -> Circuit {
        let old = std::mem::replace(&mut self.circuit, circuit);
        self.reset();
        old
    }

    /// Gives mutable access to the library, for saving modules mid-simulation.
    pub fn library_mut(&mut self) -> &mut ModuleLibrary {
        &mut self.library
    }

    /// Discards the pin values of the last tick and every instance state.
    /// External input values are kept.
    pub fn reset(&mut self) {
        self.instance_states.clear();
        self.last = Default::default();
        self.ticks = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::{sr_latch, standard_library};

    fn latch_pair() -> (Circuit, ModuleLibrary) {
        let library = standard_library();
        let latch = sr_latch();
        let mut c = Circuit::new("pair");
        let s1 = c.input("s1");
        let r1 = c.input("r1");
        let s2 = c.input("s2");
        let r2 = c.input("r2");
        let q1 = c.instancex(&latch, &[s1, r1], "latch1");
        let q2 = c.instancex(&latch, &[s2, r2], "latch2");
        c.output(&q1[0], "q1");
        c.output(&q2[0], "q2");
        (c, library)
    }

    #[test]
    fn test_instances_keep_independent_state() {
        let (c, library) = latch_pair();
        let mut sim = Simulation::new(c, library);

        // Set latch1, reset latch2.
        sim.set_inputs(vec!["s1", "r1", "s2", "r2"], vec![false, true, true, false]);
        assert_stable!(sim.step());
        assert!(sim.output("q1"));
        assert!(!sim.output("q2"));

        // Hold both.
        sim.set_inputs(vec!["s1", "r1", "s2", "r2"], vec![true, true, true, true]);
        assert_stable!(sim.step());
        assert!(sim.output("q1"));
        assert!(!sim.output("q2"));
        assert_ne!(
            sim.instance_state(&"latch1".into()),
            sim.instance_state(&"latch2".into())
        );
    }

    #[test]
    fn test_remove_node_drops_state() {
        let (c, library) = latch_pair();
        let mut sim = Simulation::new(c, library);
        sim.set_inputs(vec!["s1", "r1", "s2", "r2"], vec![false, true, false, true]);
        sim.step();
        assert_eq!(sim.instance_states().len(), 2);

        assert!(sim.remove_node(&"latch1".into()).is_some());
        assert!(sim.instance_state(&"latch1".into()).is_none());
        sim.step();
        assert!(!sim.output("q1"));
        assert!(sim.output("q2"));
    }

    #[test]
    fn test_reset_forgets_latch() {
        let (c, library) = latch_pair();
        let mut sim = Simulation::new(c, library);
        sim.set_inputs(vec!["s1", "r1"], vec![false, true]);
        sim.step();
        assert!(sim.output("q1"));

        sim.reset();
        assert_eq!(sim.ticks(), 0);
        assert!(sim.instance_states().is_empty());
        assert!(!sim.output("q1"));
    }

    #[test]
    fn test_clocks_and_pulses() {
        let mut c = Circuit::new("clocked");
        let clk = c.clock("clk");
        let btn = c.button("btn");
        let n = c.nand2(&clk, &btn, "nand");
        c.probe(&n, "watch");
        c.output(&n, "y");

        let mut sim = Simulation::new(c, ModuleLibrary::new());
        assert_eq!(sim.toggle_clocks(), 1);
        assert!(sim.input("clk"));

        let last = sim.pulse_input("btn");
        assert!(last.value(&PinRef::new("y", "y")));
        assert!(!sim.input("btn"));
        assert_eq!(sim.ticks(), 2);

        sim.set_input("btn", true);
        sim.step();
        assert!(!sim.output("y"));
        assert!(!sim.value(&PinRef::new("watch", "watch")));
        assert_eq!(sim.edge_signals().len(), 4);
    }

    #[test]
    fn test_run_until_settled() {
        let (c, library) = latch_pair();
        let mut sim = Simulation::new(c, library);
        sim.set_inputs(vec!["s1", "r1", "s2", "r2"], vec![true, false, false, true]);
        assert_eq!(sim.run_until_settled(10), Ok(2));
    }

    #[test]
    fn test_edit_prunes_states() {
        let (c, library) = latch_pair();
        let mut sim = Simulation::new(c, library);
        sim.step();
        sim.edit(|c| {
            c.remove_node(&"latch2".into());
        });
        assert_eq!(sim.instance_states().len(), 1);

        let old = sim.replace_circuit(Circuit::new("empty"));
        assert_eq!(old.name, "pair");
        assert!(sim.instance_states().is_empty());
        assert!(sim.step().pin_values.is_empty());
    }
}
