/// Number of relaxation passes the iterative evaluator runs before declaring a circuit unstable.
pub const MAX_ITERATIONS: usize = 100;

/// Largest module interface a truth table is generated for, 2^16 = 65536 rows.
pub const MAX_TRUTH_TABLE_INPUTS: usize = 16;

/// Deepest module nesting evaluated before an instance is treated as unresolvable.
///
/// Self-referencing modules are rejected when they are saved, this only keeps a
/// malformed library from recursing forever.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Limits used by the evaluators and the truth table generator.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct SimulationConfig {
    pub max_iterations: usize,
    pub max_truth_table_inputs: usize,
    pub max_nesting_depth: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_iterations: MAX_ITERATIONS,
            max_truth_table_inputs: MAX_TRUTH_TABLE_INPUTS,
            max_nesting_depth: MAX_NESTING_DEPTH,
        }
    }
}

impl SimulationConfig {
    /// Returns `self` with a different iteration budget.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Returns `self` with a different truth table input limit.
    pub fn max_truth_table_inputs(mut self, max_truth_table_inputs: usize) -> Self {
        self.max_truth_table_inputs = max_truth_table_inputs;
        self
    }

    /// Returns `self` with a different nesting limit.
    pub fn max_nesting_depth(mut self, max_nesting_depth: usize) -> Self {
        self.max_nesting_depth = max_nesting_depth;
        self
    }
}
