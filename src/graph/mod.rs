mod adjacency;
mod circuit;
mod module;
mod types;
pub use adjacency::*;
pub use circuit::*;
pub use module::*;
pub use types::*;
