//! Error types for the evaluation engine.
//!
//! Most conditions inside the engine degrade to default values instead of failing,
//! so [`SimError`] is small: it covers the cycle signal of the topological evaluator,
//! strict lookups, dot export and the truth table worker.

use crate::graph::{ModuleId, NodeId};
use thiserror::Error;

/// Result type alias using [`SimError`].
pub type Result<T> = std::result::Result<T, SimError>;

/// Unified error type for fallible engine operations.
#[derive(Error, Debug)]
pub enum SimError {
    /// Kahn's algorithm could not order every node.
    ///
    /// This is the signal to retry with the iterative evaluator, it never reaches
    /// callers of [`Evaluator::evaluate`](crate::Evaluator::evaluate).
    #[error("circuit contains a cycle, ordered {ordered} of {total} nodes")]
    CircuitHasCycle { ordered: usize, total: usize },

    /// A module id that is not present in the library.
    #[error("module '{0}' not found in library")]
    UnknownModule(ModuleId),

    /// A node id that is not present in the circuit.
    #[error("node '{0}' not found in circuit")]
    UnknownNode(NodeId),

    /// Error writing a dot file.
    #[error("failed to write '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The background truth table worker hung up.
    #[error("truth table worker disconnected")]
    WorkerDisconnected,
}

impl SimError {
    /// Create a cycle error.
    pub fn cycle(ordered: usize, total: usize) -> Self {
        Self::CircuitHasCycle { ordered, total }
    }

    /// Returns true if `self` is [`SimError::CircuitHasCycle`].
    pub fn is_cycle(&self) -> bool {
        matches!(self, Self::CircuitHasCycle { .. })
    }
}
