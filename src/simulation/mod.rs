//! Evaluation of circuits: the per-node rule, the topological and iterative evaluators,
//! per-instance state and the tick-by-tick [Simulation] session.
mod config;
mod evaluator;
mod instance_state;
mod iterative;
mod node;
mod session;
mod topological;
mod values;
pub use config::*;
pub use evaluator::*;
pub use instance_state::*;
pub use session::*;
pub use topological::topological_order;
pub use values::*;
