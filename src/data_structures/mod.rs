mod combinations;
pub use combinations::*;
