//! Reusable modules built from NAND gates, from single gates up to a register.
mod adder;
mod d_latch;
mod gates;
mod register;
mod sr_latch;
pub use adder::*;
pub use d_latch::*;
pub use gates::*;
pub use register::*;
pub use sr_latch::*;

use crate::graph::{Module, ModuleLibrary};
use log::warn;

/// Returns every prebuilt module, in dependency order.
pub fn standard_modules() -> Vec<Module> {
    vec![
        not(),
        and(),
        or(),
        nor(),
        xor(),
        half_adder(),
        sr_latch(),
        d_latch(),
    ]
}

/// Returns a [ModuleLibrary] with every prebuilt module saved into it, truth tables
/// cached for the combinational ones.
///
/// # Example
/// ```
/// # use nandsim::standard_library;
/// let library = standard_library();
/// assert!(library.get(&"mod-xor".into()).unwrap().truth_table.is_some());
/// assert!(library.get(&"mod-d-latch".into()).unwrap().truth_table.is_none());
/// ```
pub fn standard_library() -> ModuleLibrary {
    let mut library = ModuleLibrary::new();
    for module in standard_modules() {
        let Module { id, name, circuit, .. } = module;
        library.create(id.clone(), name);
        let report = library.save(&id, circuit);
        for error in &report.errors {
            warn!("{} not saved: {}", id, error);
        }
    }
    library
}
