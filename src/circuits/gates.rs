use crate::graph::*;

/// Returns a NOT gate module: a single NAND with both inputs tied to input `a`.
///
/// # Example
/// ```
/// # use nandsim::{Circuit, ModuleLibrary, not, evaluate_circuit, InputValues};
/// let not = not();
/// let mut inputs = InputValues::new();
/// inputs.insert("a".into(), false);
///
/// let outputs = evaluate_circuit(&not.circuit, &inputs, &ModuleLibrary::new());
/// assert_eq!(outputs["out"], true);
/// ```
pub fn not() -> Module {
    let mut c = Circuit::new("not");
    let a = c.input("a");
    let out = c.nand2(&a, &a, "nand");
    c.output(&out, "out");
    Module::from_circuit("mod-not", "NOT", c)
}

/// Returns an AND gate module: a NAND followed by a [not] instance.
pub fn and() -> Module {
    let mut c = Circuit::new("and");
    let a = c.input("a");
    let b = c.input("b");
    let nand = c.nand2(&a, &b, "nand");
    let out = c.instancex(&not(), &[nand], "not");
    c.output(&out[0], "out");
    Module::from_circuit("mod-and", "AND", c)
}

/// Returns an OR gate module: both inputs inverted by [not] instances feeding a NAND.
pub fn or() -> Module {
    let not = not();
    let mut c = Circuit::new("or");
    let a = c.input("a");
    let b = c.input("b");
    let na = c.instancex(&not, &[a], "not_a");
    let nb = c.instancex(&not, &[b], "not_b");
    let out = c.nand2(&na[0], &nb[0], "nand");
    c.output(&out, "out");
    Module::from_circuit("mod-or", "OR", c)
}

/// Returns a NOR gate module: an [or] instance followed by a [not] instance.
pub fn nor() -> Module {
    let mut c = Circuit::new("nor");
    let a = c.input("a");
    let b = c.input("b");
    let or = c.instancex(&or(), &[a, b], "or");
    let out = c.instancex(&not(), &or, "not");
    c.output(&out[0], "out");
    Module::from_circuit("mod-nor", "NOR", c)
}

/// Returns an XOR gate module made of 4 NANDs.
///
/// # Example
/// ```
/// # use nandsim::{ModuleLibrary, xor, generate_truth_table};
/// let xor = xor();
/// let table = generate_truth_table(&xor.circuit, &ModuleLibrary::new()).unwrap();
/// let outputs: Vec<_> = table.rows().map(|(_, out)| out).collect();
/// assert_eq!(outputs, vec!["0", "1", "1", "0"]);
/// ```
pub fn xor() -> Module {
    let mut c = Circuit::new("xor");
    let a = c.input("a");
    let b = c.input("b");
    let n1 = c.nand2(&a, &b, "nand1");
    let n2 = c.nand2(&a, &n1, "nand2");
    let n3 = c.nand2(&b, &n1, "nand3");
    let out = c.nand2(&n2, &n3, "nand4");
    c.output(&out, "out");
    Module::from_circuit("mod-xor", "XOR", c)
}
