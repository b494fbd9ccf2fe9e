use crate::graph::{Circuit, ModuleId, ModuleLibrary};
use indexmap::IndexSet;
use std::collections::VecDeque;

/// Returns the modules an instance of `id` must not be placed into: `id` itself and every
/// module that uses it, directly or transitively.
///
/// # Example
/// ```
/// # use nandsim::{standard_library, validate::forbidden_placements, ModuleId};
/// let library = standard_library();
/// let forbidden = forbidden_placements(&"mod-not".into(), &library);
/// assert!(forbidden.contains(&ModuleId::from("mod-not")));
/// assert!(forbidden.contains(&ModuleId::from("mod-and")));
/// // Through AND.
/// assert!(forbidden.contains(&ModuleId::from("mod-half-adder")));
/// assert!(!forbidden.contains(&ModuleId::from("mod-xor")));
/// ```
pub fn forbidden_placements(id: &ModuleId, library: &ModuleLibrary) -> IndexSet<ModuleId> {
    let mut forbidden = IndexSet::new();
    forbidden.insert(id.clone());
    let mut queue = VecDeque::new();
    queue.push_back(id.clone());

    while let Some(current) = queue.pop_front() {
        let users: Vec<ModuleId> = library.users_of(&current).cloned().collect();
        for user in users {
            if forbidden.insert(user.clone()) {
                queue.push_back(user);
            }
        }
    }
    forbidden
}

/// Returns true if `circuit` instantiates `root`, directly or through the modules it
/// contains as they are stored in `library`.
pub fn references_module(circuit: &Circuit, root: &ModuleId, library: &ModuleLibrary) -> bool {
    let mut visited: IndexSet<&ModuleId> = IndexSet::new();
    let mut queue: VecDeque<&ModuleId> = VecDeque::new();
    for id in circuit.nodes.iter().filter_map(|n| n.kind.module_id()) {
        if visited.insert(id) {
            queue.push_back(id);
        }
    }

    while let Some(current) = queue.pop_front() {
        if current == root {
            return true;
        }
        if let Some(module) = library.get(current) {
            for id in module.dependencies() {
                if visited.insert(id) {
                    queue.push_back(id);
                }
            }
        }
    }
    false
}

/// Returns true if the stored module `id` contains itself, directly or transitively.
/// Unknown modules are never self-referencing.
pub fn has_transitive_self_reference(id: &ModuleId, library: &ModuleLibrary) -> bool {
    library
        .get(id)
        .map(|module| references_module(&module.circuit, id, library))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::{not, standard_library};
    use crate::graph::Module;

    #[test]
    fn test_forbidden_is_transitive() {
        let library = standard_library();
        let forbidden = forbidden_placements(&"mod-d-latch".into(), &library);
        assert_eq!(forbidden.len(), 1);

        let forbidden = forbidden_placements(&"mod-xor".into(), &library);
        // The half adder uses XOR.
        assert!(forbidden.contains(&ModuleId::from("mod-half-adder")));
        assert!(!forbidden.contains(&ModuleId::from("mod-not")));
    }

    #[test]
    fn test_forbidden_two_levels_up() {
        let library = standard_library();
        let forbidden = forbidden_placements(&"mod-not".into(), &library);
        // NOT -> AND -> half adder.
        assert!(forbidden.contains(&ModuleId::from("mod-and")));
        assert!(forbidden.contains(&ModuleId::from("mod-half-adder")));
        // NOT -> OR -> NOR.
        assert!(forbidden.contains(&ModuleId::from("mod-or")));
        assert!(forbidden.contains(&ModuleId::from("mod-nor")));
        // NOT -> D latch.
        assert!(forbidden.contains(&ModuleId::from("mod-d-latch")));
        assert!(!forbidden.contains(&ModuleId::from("mod-xor")));
        assert!(!forbidden.contains(&ModuleId::from("mod-sr-latch")));
    }

    #[test]
    fn test_self_reference() {
        let mut library = standard_library();
        assert!(!has_transitive_self_reference(&"mod-and".into(), &library));
        assert!(!has_transitive_self_reference(&"mod-missing".into(), &library));

        // NOT -> loop -> NOT.
        let mut c = Circuit::new("loop");
        let a = c.input("a");
        let y = c.instancex(&not(), &[a], "n");
        c.output(&y[0], "y");
        let looped = Module::from_circuit("mod-loop", "LOOP", c);

        let mut not_circuit = library.get(&"mod-not".into()).unwrap().circuit.clone();
        let a = not_circuit.input("extra");
        not_circuit.instancex(&looped, &[a], "back");
        library.insert(looped);
        library.get_mut(&"mod-not".into()).unwrap().circuit = not_circuit;

        assert!(has_transitive_self_reference(&"mod-not".into(), &library));
        assert!(has_transitive_self_reference(&"mod-loop".into(), &library));
    }
}
