use nandsim::{
    standard_library, Circuit, InputValues, Module, ModuleLibrary, Simulation, SimError,
};

fn print_table(module: &Module) {
    match &module.truth_table {
        Some(table) => {
            colour::cyan_ln!("{}", module.name);
            print!("{}", table);
        }
        None => {
            colour::dark_yellow_ln!("{}: sequential, no truth table", module.name);
        }
    }
}

fn latch_trace(library: &ModuleLibrary) -> Result<(), SimError> {
    let latch = library
        .get(&"mod-sr-latch".into())
        .ok_or_else(|| SimError::UnknownModule("mod-sr-latch".into()))?
        .clone();

    let mut c = Circuit::new("trace");
    let s = c.input("s");
    let r = c.input("r");
    let q = c.instancex(&latch, &[s, r], "latch");
    c.output(&q[0], "q");
    c.output(&q[1], "nq");

    colour::cyan_ln!("SR LATCH trace");
    let mut sim = Simulation::new(c, library.clone());
    for &(label, s, r) in &[
        ("set", false, true),
        ("hold", true, true),
        ("reset", true, false),
        ("hold", true, true),
    ] {
        sim.set_input("s", s);
        sim.set_input("r", r);
        let evaluation = sim.step();
        let stable = evaluation.stable;
        let line = format!(
            "{:>5}: s={} r={} -> q={} nq={}",
            label,
            s as u8,
            r as u8,
            sim.output("q") as u8,
            sim.output("nq") as u8
        );
        if stable {
            colour::green_ln!("{}", line);
        } else {
            colour::red_ln!("{} (unstable)", line);
        }
    }
    Ok(())
}

fn ring_oscillator(library: &ModuleLibrary) {
    let mut c = Circuit::new("ring");
    let out = c.nand("nand");
    c.d0(&out.node, &out);
    c.d1(&out.node, &out);

    let evaluation = nandsim::evaluate_circuit_full(&c, &InputValues::new(), library);
    colour::cyan_ln!("Ring oscillator");
    colour::red_ln!(
        "stable={} after {} passes, oscillating: {:?}",
        evaluation.stable,
        evaluation.iterations,
        evaluation.unstable
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let library = standard_library();
    for module in library.iter() {
        print_table(module);
    }
    latch_trace(&library)?;
    ring_oscillator(&library);

    if let Some(path) = std::env::args().nth(1) {
        if let Some(module) = library.get(&"mod-d-latch".into()) {
            module.circuit.dump_dot(&path)?;
            colour::grey_ln!("wrote {}", path);
        }
    }
    Ok(())
}
