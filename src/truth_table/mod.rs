//! Exhaustive truth tables of combinational circuits, generated inline or on a
//! background [TruthTableWorker].
mod generate;
mod table;
mod worker;
pub use generate::*;
pub use table::*;
pub use worker::*;
