//! Structural checks: feedback in a circuit, illegal module composition and the module
//! save workflow.
mod composition;
mod cycle;
mod save;
pub use composition::*;
pub use cycle::*;
pub use save::*;
