use super::module::Module;
use super::types::*;
use crate::error::{Result, SimError};
use casey::pascal;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt::{self, Display, Formatter};
use strum_macros::{AsRefStr, Display as StrumDisplay, EnumString};

/// Direction of a [Pin] as seen from its owning node.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, StrumDisplay, EnumString, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum Direction {
    Input,
    Output,
}

/// A single named boolean wire endpoint. Every pin is exactly 1 bit wide.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Pin {
    pub id: PinId,
    pub name: String,
    pub direction: Direction,
}
impl Pin {
    /// Returns a new [Pin].
    pub fn new<I: Into<PinId>, S: Into<String>>(id: I, name: S, direction: Direction) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            direction,
        }
    }

    /// Returns a new input [Pin].
    pub fn input<I: Into<PinId>, S: Into<String>>(id: I, name: S) -> Self {
        Self::new(id, name, Direction::Input)
    }

    /// Returns a new output [Pin].
    pub fn output<I: Into<PinId>, S: Into<String>>(id: I, name: S) -> Self {
        Self::new(id, name, Direction::Output)
    }

    pub fn is_input(&self) -> bool {
        self.direction == Direction::Input
    }

    pub fn is_output(&self) -> bool {
        self.direction == Direction::Output
    }
}

/// Type tag of a [Node].
///
/// Source nodes (input, constant, clock, button) get their values from the caller,
/// sinks (output, probe) copy their driver, instances are either the primitive NAND
/// or a user defined [Module].
#[derive(Clone, Debug, Eq, PartialEq, Hash, StrumDisplay, AsRefStr)]
#[strum(serialize_all = "snake_case")]
pub enum NodeKind {
    Input,
    Output,
    Constant,
    Probe,
    Clock,
    Button,
    #[strum(serialize = "module")]
    Instance(ModuleId),
}
use NodeKind::*;

impl NodeKind {
    /// Returns true for nodes whose output values are seeded by the caller.
    #[inline(always)]
    pub fn is_source(&self) -> bool {
        matches!(self, Input | Constant | Clock | Button)
    }

    /// Returns true for nodes that copy the value of their single driver.
    #[inline(always)]
    pub fn is_sink(&self) -> bool {
        matches!(self, Output | Probe)
    }

    /// Returns the referenced module if `self` is an instance.
    pub fn module_id(&self) -> Option<&ModuleId> {
        match self {
            Instance(id) => Some(id),
            _ => None,
        }
    }

    /// Returns true if `self` is an instance of the primitive NAND gate.
    pub fn is_nand(&self) -> bool {
        matches!(self, Instance(id) if id.is_nand())
    }
}

pub(crate) const NODE_PINS_SIZE: usize = 3;

/// An element of a [Circuit]: a source, a sink, the NAND primitive or a module instance.
///
/// Only `id`, `kind` and the ordered `pins` matter for evaluation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub pins: SmallVec<[Pin; NODE_PINS_SIZE]>,
}
impl Node {
    /// Returns a new [Node].
    pub fn new<I: Into<NodeId>, P: IntoIterator<Item = Pin>>(id: I, kind: NodeKind, pins: P) -> Self {
        Self {
            id: id.into(),
            kind,
            pins: pins.into_iter().collect(),
        }
    }

    /// Returns the input pins of `self` in declaration order.
    pub fn input_pins(&self) -> impl Iterator<Item = &Pin> + Clone {
        self.pins.iter().filter(|p| p.is_input())
    }

    /// Returns the output pins of `self` in declaration order.
    pub fn output_pins(&self) -> impl Iterator<Item = &Pin> + Clone {
        self.pins.iter().filter(|p| p.is_output())
    }

    /// Returns the [PinKey] of `pin` on `self`.
    pub fn key(&self, pin: &Pin) -> PinKey {
        PinKey::new(&self.id, &pin.id)
    }
}

/// Directed connection from an output pin of one node to an input pin of another.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Edge {
    pub id: EdgeId,
    pub from: PinRef,
    pub to: PinRef,
}
impl Edge {
    pub fn new<I: Into<EdgeId>>(id: I, from: PinRef, to: PinRef) -> Self {
        Self {
            id: id.into(),
            from,
            to,
        }
    }
}

/// Creates builder methods for source nodes, each one adds a node with a single output
/// pin whose node id, pin id and pin name are all `name`.
macro_rules! source_constructors {
    ($name:ident,$($rest:ident),*) => {
        source_constructors!($name);
        source_constructors!($($rest),*);
    };
    ($name:ident) => {
        #[doc=concat!(
            "Adds a new `", stringify!($name), "` source node and returns its output pin.\n\n",
            "The value of the pin is read from the external inputs under the pin id `name`."
        )]
        pub fn $name<S: Into<String>>(&mut self, name: S) -> PinRef {
            self.source(pascal!($name), name.into())
        }
    };
}

/// A directed, possibly cyclic graph of [Nodes](Node) and [Edges](Edge).
///
/// Circuits are either the live working design or the saved internals of a [Module].
/// Besides being plain data, [Circuit] doubles as the builder used to wire designs up.
///
/// # Example
/// A NOT gate made of a single NAND with both inputs tied together.
/// ```
/// # use nandsim::{Circuit, evaluate_circuit, ModuleLibrary, InputValues};
/// let mut c = Circuit::new("not");
/// let a = c.input("a");
/// let nand = c.nand2(&a, &a, "nand");
/// c.output(&nand, "out");
///
/// let library = ModuleLibrary::new();
/// let mut inputs = InputValues::new();
/// inputs.insert("a".into(), true);
///
/// let outputs = evaluate_circuit(&c, &inputs, &library);
/// assert_eq!(outputs["out"], false);
/// ```
///
/// [SR Latch](https://en.wikipedia.org/wiki/Flip-flop_(electronics)#SR_NAND_latch), feedback is
/// wired after both gates exist with [Circuit::d1].
/// ```
/// # use nandsim::{Circuit, Simulation, ModuleLibrary};
/// let mut c = Circuit::new("latch");
/// let s = c.input("s");
/// let r = c.input("r");
/// let q = c.nand("nand1");
/// let nq = c.nand2(&q, &r, "nand2");
/// c.d0(&q.node, &s);
/// c.d1(&q.node, &nq);
/// c.output(&q, "q");
///
/// let mut sim = Simulation::new(c, ModuleLibrary::new());
/// sim.set_input("s", false);
/// sim.set_input("r", true);
/// sim.step();
/// assert_eq!(sim.output("q"), true);
///
/// // Hold.
/// sim.set_input("s", true);
/// sim.step();
/// assert_eq!(sim.output("q"), true);
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Circuit {
    pub id: String,
    pub name: String,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Circuit {
    /// Returns an empty [Circuit] named `name`, with id `circuit-{name}`.
    pub fn new<S: Into<String>>(name: S) -> Self {
        let name = name.into();
        Self {
            id: format!("circuit-{}", name),
            name,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// Returns the node with id `id`.
    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| &n.id == id)
    }

    /// Returns a map from node id to node, for repeated lookups.
    pub fn node_index(&self) -> HashMap<&NodeId, &Node> {
        self.nodes.iter().map(|n| (&n.id, n)).collect()
    }

    /// Appends `node` as is.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id.clone();
        self.nodes.push(node);
        id
    }

    /// Appends `edge` as is, without checking that the destination is undriven.
    pub fn add_edge(&mut self, edge: Edge) {
        self.edges.push(edge);
    }

    fn next_edge_id(&self) -> EdgeId {
        let mut n = self.edges.len();
        loop {
            let id = format!("e{}", n);
            if self.edges.iter().all(|e| e.id.as_str() != id) {
                return id.into();
            }
            n += 1;
        }
    }

    /// Wires `from` to `to`, replacing the edge currently driving `to` if there is one.
    pub fn connect(&mut self, from: &PinRef, to: &PinRef) -> EdgeId {
        self.edges.retain(|e| &e.to != to);
        let id = self.next_edge_id();
        self.edges.push(Edge::new(id.clone(), from.clone(), to.clone()));
        id
    }

    /// Returns the `x`th input pin of `node`.
    pub fn input_pin(&self, node: &NodeId, x: usize) -> Option<PinRef> {
        let node = self.node(node)?;
        let pin = node.input_pins().nth(x)?;
        Some(PinRef::new(node.id.clone(), pin.id.clone()))
    }

    /// Returns the `x`th output pin of `node`.
    pub fn output_pin(&self, node: &NodeId, x: usize) -> Option<PinRef> {
        let node = self.node(node)?;
        let pin = node.output_pins().nth(x)?;
        Some(PinRef::new(node.id.clone(), pin.id.clone()))
    }

    /// Drives the input pin at index `x` of `target` with `new_dep`, replacing the previous driver.
    ///
    /// Returns [SimError::UnknownNode] if `target` doesn't exist or has less than `x` + 1 inputs.
    pub fn dx(&mut self, target: &NodeId, new_dep: &PinRef, x: usize) -> Result<EdgeId> {
        let to = self
            .input_pin(target, x)
            .ok_or_else(|| SimError::UnknownNode(target.clone()))?;
        Ok(self.connect(new_dep, &to))
    }

    /// Drives input 0 of `target` with `new_dep`.
    ///
    /// # Panics
    ///
    /// Will panic if `target` doesn't exist or has no inputs, see [Circuit::dx] for the fallible version.
    pub fn d0(&mut self, target: &NodeId, new_dep: &PinRef) {
        if let Err(e) = self.dx(target, new_dep, 0) {
            panic!("d0: {}", e)
        }
    }

    /// Drives input 1 of `target` with `new_dep`.
    ///
    /// # Panics
    ///
    /// Will panic if `target` doesn't exist or has less than 2 inputs.
    pub fn d1(&mut self, target: &NodeId, new_dep: &PinRef) {
        if let Err(e) = self.dx(target, new_dep, 1) {
            panic!("d1: {}", e)
        }
    }

    fn source(&mut self, kind: NodeKind, name: String) -> PinRef {
        let pin = Pin::output(name.as_str(), name.as_str());
        self.nodes.push(Node::new(name.as_str(), kind, std::iter::once(pin)));
        PinRef::new(name.clone(), name)
    }

    fn sink(&mut self, kind: NodeKind, src: &PinRef, name: String) -> PinRef {
        let pin = Pin::input(name.as_str(), name.as_str());
        self.nodes.push(Node::new(name.as_str(), kind, std::iter::once(pin)));
        let to = PinRef::new(name.clone(), name);
        self.connect(src, &to);
        to
    }

    source_constructors!(input, constant, clock, button);

    /// Adds a new output node driven by `src` and returns its input pin.
    ///
    /// The node id and pin id are both `name`.
    pub fn output<S: Into<String>>(&mut self, src: &PinRef, name: S) -> PinRef {
        self.sink(Output, src, name.into())
    }

    /// Adds a new probe node driven by `src` and returns its input pin.
    pub fn probe<S: Into<String>>(&mut self, src: &PinRef, name: S) -> PinRef {
        self.sink(Probe, src, name.into())
    }

    /// Adds an undriven NAND gate with pins `a`, `b` and `out`, returns its output pin.
    ///
    /// Inputs can be wired later with [Circuit::d0] and [Circuit::d1].
    pub fn nand<S: Into<String>>(&mut self, name: S) -> PinRef {
        let name = name.into();
        let pins = vec![
            Pin::input("a", "A"),
            Pin::input("b", "B"),
            Pin::output("out", "Out"),
        ];
        self.nodes
            .push(Node::new(name.as_str(), Instance(ModuleId::nand()), pins));
        PinRef::new(name, "out")
    }

    /// Adds a NAND gate driven by `a` and `b`, returns its output pin.
    pub fn nand2<S: Into<String>>(&mut self, a: &PinRef, b: &PinRef, name: S) -> PinRef {
        let out = self.nand(name);
        self.d0(&out.node, a);
        self.d1(&out.node, b);
        out
    }

    /// Adds an undriven instance of `module`, with pins copied from the module's
    /// interface in declared order.
    pub fn instance<S: Into<String>>(&mut self, module: &Module, name: S) -> NodeId {
        let name = NodeId::new(name);
        self.nodes.push(Node::new(
            name.clone(),
            Instance(module.id.clone()),
            module.instance_pins(),
        ));
        name
    }

    /// Adds an instance of `module` with its inputs driven by `deps` in order,
    /// returns the instance's output pins in order.
    pub fn instancex<'a, S, I>(&mut self, module: &Module, deps: I, name: S) -> Vec<PinRef>
    where
        S: Into<String>,
        I: IntoIterator<Item = &'a PinRef>,
    {
        let node = self.instance(module, name);
        for (x, dep) in deps.into_iter().enumerate() {
            // The instance was just created from `module`, so only surplus deps can fail.
            if self.dx(&node, dep, x).is_err() {
                log::warn!("{} has no input {}, dependency {} ignored", node, x, dep);
            }
        }
        (0..module.outputs.len())
            .filter_map(|x| self.output_pin(&node, x))
            .collect()
    }

    /// Removes the node `id` and every edge attached to it.
    pub fn remove_node(&mut self, id: &NodeId) -> Option<Node> {
        let position = self.nodes.iter().position(|n| &n.id == id)?;
        self.edges.retain(|e| &e.from.node != id && &e.to.node != id);
        Some(self.nodes.remove(position))
    }

    /// Removes the edge `id`.
    pub fn remove_edge(&mut self, id: &EdgeId) -> Option<Edge> {
        let position = self.edges.iter().position(|e| &e.id == id)?;
        Some(self.edges.remove(position))
    }

    /// Returns the interface this circuit would have as a module: one input pin per output
    /// pin of an input node, one output pin per input pin of an output node, in node order.
    pub fn extract_interface(&self) -> (Vec<Pin>, Vec<Pin>) {
        let mut inputs = Vec::new();
        let mut outputs = Vec::new();
        for node in &self.nodes {
            match node.kind {
                Input => inputs.extend(
                    node.output_pins()
                        .map(|p| Pin::input(p.id.clone(), p.name.as_str())),
                ),
                Output => outputs.extend(
                    node.input_pins()
                        .map(|p| Pin::output(p.id.clone(), p.name.as_str())),
                ),
                _ => {}
            }
        }
        (inputs, outputs)
    }

    /// Returns the node-level successor sets, in node order, with duplicate pin-level
    /// edges between the same ordered pair collapsed.
    ///
    /// Edges touching unknown nodes are ignored.
    pub fn node_successors(&self) -> indexmap::IndexMap<&NodeId, indexmap::IndexSet<&NodeId>> {
        let mut adjacency: indexmap::IndexMap<&NodeId, indexmap::IndexSet<&NodeId>> = self
            .nodes
            .iter()
            .map(|n| (&n.id, Default::default()))
            .collect();
        for edge in &self.edges {
            if !adjacency.contains_key(&edge.to.node) {
                continue;
            }
            if let Some(targets) = adjacency.get_mut(&edge.from.node) {
                targets.insert(&edge.to.node);
            }
        }
        adjacency
    }

    /// Returns the "full name" of `node` in format "KIND:ID".
    pub(crate) fn full_name(node: &Node) -> String {
        match &node.kind {
            Instance(module) if !module.is_nand() => format!("{}:{}:{}", node.kind, module, node.id),
            Instance(_) => format!("nand:{}", node.id),
            kind => format!("{}:{}", kind, node.id),
        }
    }

    /// Dumps the node-level graph in [dot](https://en.wikipedia.org/wiki/DOT_(graph_description_language))
    /// format to path `filename`.
    pub fn dump_dot<P: AsRef<std::path::Path>>(&self, filename: P) -> Result<()> {
        use petgraph::dot::{Config, Dot};
        use std::io::Write;
        let path = filename.as_ref();
        let io_err = |source: std::io::Error| SimError::Io {
            path: path.display().to_string(),
            source,
        };

        let mut graph = petgraph::Graph::<_, ()>::new();
        let mut index = HashMap::new();
        for node in &self.nodes {
            index.insert(&node.id, graph.add_node(Self::full_name(node)));
        }
        for edge in &self.edges {
            if let (Some(from), Some(to)) = (index.get(&edge.from.node), index.get(&edge.to.node)) {
                graph.add_edge(*from, *to, ());
            }
        }
        let mut f = std::fs::File::create(path).map_err(io_err)?;
        write!(f, "{:?}", Dot::with_config(&graph, &[Config::EdgeNoLabel])).map_err(io_err)
    }
}

impl Display for Circuit {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} nodes, {} edges)",
            self.name,
            self.nodes.len(),
            self.edges.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_constructors() {
        let mut c = Circuit::new("sources");
        let a = c.input("a");
        let k = c.constant("k");
        let clk = c.clock("clk");
        let btn = c.button("btn");

        assert_eq!(a, PinRef::new("a", "a"));
        assert_eq!(c.node(&k.node).unwrap().kind, Constant);
        assert_eq!(c.node(&clk.node).unwrap().kind, Clock);
        assert_eq!(c.node(&btn.node).unwrap().kind, Button);
        assert!(c.nodes.iter().all(|n| n.kind.is_source()));
    }

    #[test]
    fn test_connect_replaces_driver() {
        let mut c = Circuit::new("rewire");
        let a = c.input("a");
        let b = c.input("b");
        let out = c.nand2(&a, &a, "nand");
        assert_eq!(c.edges.len(), 2);

        c.d1(&out.node, &b);
        assert_eq!(c.edges.len(), 2);
        let drivers: Vec<_> = c.edges.iter().map(|e| e.from.node.as_str()).collect();
        assert_eq!(drivers, vec!["a", "b"]);
    }

    #[test]
    fn test_remove_node_removes_edges() {
        let mut c = Circuit::new("remove");
        let a = c.input("a");
        let n = c.nand2(&a, &a, "nand");
        c.output(&n, "out");

        let removed = c.remove_node(&"nand".into()).unwrap();
        assert!(removed.kind.is_nand());
        assert!(c.edges.is_empty());
        assert_eq!(c.nodes.len(), 2);
    }

    #[test]
    fn test_extract_interface() {
        let mut c = Circuit::new("iface");
        let a = c.input("a");
        let b = c.input("b");
        let n = c.nand2(&a, &b, "nand");
        c.output(&n, "y");

        let (inputs, outputs) = c.extract_interface();
        let ids: Vec<_> = inputs.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(inputs.iter().all(Pin::is_input));
        assert_eq!(outputs, vec![Pin::output("y", "y")]);
    }

    #[test]
    fn test_node_successors_collapse_duplicates() {
        let mut c = Circuit::new("dups");
        let a = c.input("a");
        c.nand2(&a, &a, "nand");
        let succ = c.node_successors();
        assert_eq!(succ[&NodeId::from("a")].len(), 1);
        assert!(succ[&NodeId::from("nand")].is_empty());
    }

    #[test]
    fn test_direction_strings() {
        assert_eq!(Direction::Input.to_string(), "input");
        assert_eq!("output".parse::<Direction>().unwrap(), Direction::Output);
        assert_eq!(Instance(ModuleId::nand()).to_string(), "module");
        assert_eq!(Probe.as_ref(), "probe");
    }
}
