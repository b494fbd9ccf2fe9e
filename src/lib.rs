//! Hierarchical NAND-only digital logic evaluation.
//!
//! Circuits are graphs of sources, sinks, NAND gates and instances of user defined
//! [Modules](Module). Acyclic circuits are evaluated in a single topological pass, circuits
//! with feedback fall back to bounded relaxation seeded with the previous tick so latches
//! hold their state. Every module instance carries its own state across ticks.
//!
//! # Example
//! ```
//! # use nandsim::{Circuit, Simulation, standard_library};
//! let library = standard_library();
//! let latch = library.get(&"mod-sr-latch".into()).unwrap().clone();
//!
//! let mut c = Circuit::new("top");
//! let s = c.input("s");
//! let r = c.input("r");
//! let q = c.instancex(&latch, &[s, r], "latch");
//! c.output(&q[0], "q");
//!
//! let mut sim = Simulation::new(c, library);
//! sim.set_input("s", false);
//! sim.set_input("r", true);
//! assert!(sim.step().stable);
//! assert!(sim.output("q"));
//! ```
#[macro_use]
mod macros;
pub mod circuits;
pub mod data_structures;
mod error;
pub mod graph;
pub mod simulation;
pub mod truth_table;
pub mod validate;
pub use circuits::*;
pub use error::{Result, SimError};
pub use graph::*;
pub use simulation::*;
pub use truth_table::*;
