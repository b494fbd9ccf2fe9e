use super::circuit::{Circuit, Pin};
use super::types::*;
use crate::truth_table::TruthTable;
use indexmap::{IndexMap, IndexSet};

/// Explicit display order for a module's pins, independent of the declared interface.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct PinOrder {
    pub input_ids: Vec<PinId>,
    pub output_ids: Vec<PinId>,
}

/// A named, reusable circuit with a declared input/output interface.
///
/// Instances of a module are wired to its internal circuit **positionally**: the nth input
/// pin of an instance feeds the nth declared input of the module, and the nth declared
/// output feeds the nth output pin of the instance.
#[derive(Clone, Debug, PartialEq)]
pub struct Module {
    pub id: ModuleId,
    pub name: String,
    pub inputs: Vec<Pin>,
    pub outputs: Vec<Pin>,
    pub circuit: Circuit,
    pub truth_table: Option<TruthTable>,
    pub pin_order: Option<PinOrder>,
}

impl Module {
    /// Returns a new [Module] whose interface is [extracted](Circuit::extract_interface) from `circuit`.
    ///
    /// No truth table is attached, see [ModuleLibrary::save] and [crate::generate_truth_table].
    pub fn from_circuit<I: Into<ModuleId>, S: Into<String>>(id: I, name: S, circuit: Circuit) -> Self {
        let (inputs, outputs) = circuit.extract_interface();
        Self {
            id: id.into(),
            name: name.into(),
            inputs,
            outputs,
            circuit,
            truth_table: None,
            pin_order: None,
        }
    }

    /// Returns `self` with `table` cached.
    pub fn with_truth_table(mut self, table: Option<TruthTable>) -> Self {
        self.truth_table = table;
        self
    }

    /// Returns the pins an instance of `self` carries: inputs then outputs, in declared order.
    pub fn instance_pins(&self) -> impl Iterator<Item = Pin> + '_ {
        self.inputs.iter().chain(self.outputs.iter()).cloned()
    }

    /// Returns the input pins in display order, falling back to declared order.
    pub fn display_inputs(&self) -> Vec<&Pin> {
        Self::ordered(&self.inputs, self.pin_order.as_ref().map(|o| &o.input_ids))
    }

    /// Returns the output pins in display order, falling back to declared order.
    pub fn display_outputs(&self) -> Vec<&Pin> {
        Self::ordered(&self.outputs, self.pin_order.as_ref().map(|o| &o.output_ids))
    }

    fn ordered<'a>(pins: &'a [Pin], order: Option<&Vec<PinId>>) -> Vec<&'a Pin> {
        match order {
            Some(ids) if Self::is_permutation(pins, ids) => ids
                .iter()
                .filter_map(|id| pins.iter().find(|p| &p.id == id))
                .collect(),
            _ => pins.iter().collect(),
        }
    }

    fn is_permutation(pins: &[Pin], ids: &[PinId]) -> bool {
        let ids: IndexSet<&PinId> = ids.iter().collect();
        ids.len() == pins.len() && pins.iter().all(|p| ids.contains(&p.id))
    }

    /// Returns true if the pin order override, when present, is a permutation of the
    /// declared interface.
    pub fn pin_order_consistent(&self) -> bool {
        match &self.pin_order {
            None => true,
            Some(order) => {
                Self::is_permutation(&self.inputs, &order.input_ids)
                    && Self::is_permutation(&self.outputs, &order.output_ids)
            }
        }
    }

    /// Returns the ids of the modules directly instantiated by the internal circuit,
    /// excluding the NAND primitive.
    pub fn dependencies(&self) -> IndexSet<&ModuleId> {
        self.circuit
            .nodes
            .iter()
            .filter_map(|n| n.kind.module_id())
            .filter(|id| !id.is_nand())
            .collect()
    }
}

/// Ordered store of [Modules](Module), keyed by id.
#[derive(Clone, Debug, Default)]
pub struct ModuleLibrary {
    modules: IndexMap<ModuleId, Module>,
}

impl ModuleLibrary {
    /// Returns an empty [ModuleLibrary].
    pub fn new() -> Self {
        Default::default()
    }

    /// Inserts `module`, replacing and returning any module with the same id.
    pub fn insert(&mut self, module: Module) -> Option<Module> {
        self.modules.insert(module.id.clone(), module)
    }

    pub fn get(&self, id: &ModuleId) -> Option<&Module> {
        self.modules.get(id)
    }

    pub fn get_mut(&mut self, id: &ModuleId) -> Option<&mut Module> {
        self.modules.get_mut(id)
    }

    /// Adds a new module with an empty circuit, returns a mutable reference to it.
    /// An existing module with the same id is replaced in place.
    pub fn create<I: Into<ModuleId>, S: Into<String>>(&mut self, id: I, name: S) -> &mut Module {
        let name = name.into();
        let circuit = Circuit::new(name.to_lowercase());
        let module = Module::from_circuit(id, name, circuit);
        let (index, _) = self.modules.insert_full(module.id.clone(), module);
        &mut self.modules[index]
    }

    /// Removes the module `id`, preserving the order of the rest.
    pub fn remove(&mut self, id: &ModuleId) -> Option<Module> {
        self.modules.shift_remove(id)
    }

    pub fn contains(&self, id: &ModuleId) -> bool {
        self.modules.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Module> {
        self.modules.values()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Returns the ids of the modules whose internal circuit directly instantiates `id`.
    pub fn users_of<'a>(&'a self, id: &'a ModuleId) -> impl Iterator<Item = &'a ModuleId> + 'a {
        self.modules
            .values()
            .filter(move |m| m.dependencies().contains(id))
            .map(|m| &m.id)
    }
}

impl std::iter::FromIterator<Module> for ModuleLibrary {
    fn from_iter<I: IntoIterator<Item = Module>>(iter: I) -> Self {
        let mut library = Self::new();
        for module in iter {
            library.insert(module);
        }
        library
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_module() -> Module {
        let mut c = Circuit::new("not");
        let a = c.input("a");
        let n = c.nand2(&a, &a, "nand");
        c.output(&n, "out");
        Module::from_circuit("mod-not", "NOT", c)
    }

    #[test]
    fn test_from_circuit_interface() {
        let m = not_module();
        assert_eq!(m.inputs, vec![Pin::input("a", "a")]);
        assert_eq!(m.outputs, vec![Pin::output("out", "out")]);
        let pins: Vec<_> = m.instance_pins().map(|p| p.direction).collect();
        assert_eq!(pins, vec![crate::Direction::Input, crate::Direction::Output]);
    }

    #[test]
    fn test_display_order() {
        let mut c = Circuit::new("two");
        c.input("a");
        c.input("b");
        let mut m = Module::from_circuit("m", "M", c);
        m.pin_order = Some(PinOrder {
            input_ids: vec!["b".into(), "a".into()],
            output_ids: vec![],
        });
        let ids: Vec<_> = m.display_inputs().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert!(m.pin_order_consistent());

        m.pin_order = Some(PinOrder {
            input_ids: vec!["b".into()],
            output_ids: vec![],
        });
        let ids: Vec<_> = m.display_inputs().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert!(!m.pin_order_consistent());
    }

    #[test]
    fn test_users_of() {
        let not = not_module();
        let mut c = Circuit::new("buffer");
        let a = c.input("a");
        let x = c.instancex(&not, &[a], "n1");
        let y = c.instancex(&not, &x, "n2");
        c.output(&y[0], "y");
        let buffer = Module::from_circuit("mod-buffer", "BUF", c);

        let library: ModuleLibrary = vec![not.clone(), buffer].into_iter().collect();
        let users: Vec<_> = library.users_of(&not.id).collect();
        assert_eq!(users, vec![&ModuleId::from("mod-buffer")]);
        assert_eq!(library.users_of(&"mod-buffer".into()).count(), 0);
    }
}
