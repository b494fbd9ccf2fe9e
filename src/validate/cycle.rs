use crate::graph::{Circuit, ModuleId, ModuleLibrary, NodeId};
use indexmap::{IndexMap, IndexSet};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Color {
    /// Not visited yet.
    White,
    /// On the current path.
    Gray,
    /// Fully explored.
    Black,
}
use Color::*;

/// Returns true if `circuit` has feedback, a self-loop included.
///
/// Three-color depth first search over node-level edges, reaching a gray node is a back edge.
pub fn has_cycle(circuit: &Circuit) -> bool {
    let successors = circuit.node_successors();
    let mut colors: IndexMap<&NodeId, Color> = successors.keys().map(|id| (*id, White)).collect();

    for root in successors.keys() {
        if colors[*root] != White {
            continue;
        }
        colors[*root] = Gray;
        let mut stack: Vec<(&NodeId, usize)> = vec![(*root, 0)];

        while let Some(&(node, next)) = stack.last() {
            match successors[node].get_index(next) {
                Some(target) => {
                    let top = stack.len() - 1;
                    stack[top].1 += 1;
                    match colors[*target] {
                        Gray => return true,
                        White => {
                            colors[*target] = Gray;
                            stack.push((*target, 0));
                        }
                        Black => {}
                    }
                }
                None => {
                    colors[node] = Black;
                    stack.pop();
                }
            }
        }
    }
    false
}

/// Returns the name of the first circuit with feedback found in `circuit` or in the
/// internals of any module it contains, at any depth.
///
/// Missing modules are skipped, they evaluate to defaults and hold no state.
pub fn find_nested_cycle<'a>(circuit: &'a Circuit, library: &'a ModuleLibrary) -> Option<&'a str> {
    let mut visited = IndexSet::new();
    find_nested_cycle_inner(circuit, library, &mut visited)
}

fn find_nested_cycle_inner<'a>(
    circuit: &'a Circuit,
    library: &'a ModuleLibrary,
    visited: &mut IndexSet<&'a ModuleId>,
) -> Option<&'a str> {
    if has_cycle(circuit) {
        return Some(&circuit.name);
    }
    for id in circuit.nodes.iter().filter_map(|n| n.kind.module_id()) {
        if id.is_nand() || !visited.insert(id) {
            continue;
        }
        if let Some(module) = library.get(id) {
            if let Some(name) = find_nested_cycle_inner(&module.circuit, library, visited) {
                return Some(name);
            }
        }
    }
    None
}

/// Returns true if `circuit` or any module it contains has feedback.
pub fn has_nested_cycle(circuit: &Circuit, library: &ModuleLibrary) -> bool {
    find_nested_cycle(circuit, library).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circuits::{half_adder, sr_latch, standard_library};

    #[test]
    fn test_acyclic() {
        let mut c = Circuit::new("chain");
        let a = c.input("a");
        let n1 = c.nand2(&a, &a, "n1");
        let n2 = c.nand2(&n1, &a, "n2");
        c.output(&n2, "out");
        assert!(!has_cycle(&c));
        assert!(!has_cycle(&Circuit::new("empty")));
    }

    #[test]
    fn test_self_loop() {
        let mut c = Circuit::new("loop");
        let out = c.nand("nand");
        c.d0(&out.node, &out);
        assert!(has_cycle(&c));
    }

    #[test]
    fn test_long_cycle() {
        let mut c = Circuit::new("ring");
        let first = c.nand("n0");
        let mut last = first.clone();
        for i in 1..5 {
            last = c.nand2(&last, &last, format!("n{}", i));
        }
        assert!(!has_cycle(&c));
        c.d0(&first.node, &last);
        assert!(has_cycle(&c));
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        let mut c = Circuit::new("diamond");
        let a = c.input("a");
        let l = c.nand2(&a, &a, "l");
        let r = c.nand2(&a, &a, "r");
        c.nand2(&l, &r, "join");
        assert!(!has_cycle(&c));
    }

    #[test]
    fn test_nested() {
        let library = standard_library();

        let mut c = Circuit::new("adder");
        let a = c.input("a");
        let b = c.input("b");
        c.instancex(&half_adder(), &[a.clone(), b.clone()], "ha");
        assert_eq!(find_nested_cycle(&c, &library), None);

        c.instancex(&sr_latch(), &[a, b], "latch");
        assert_eq!(find_nested_cycle(&c, &library), Some("sr_latch"));
        assert!(has_nested_cycle(&c, &library));
    }
}
