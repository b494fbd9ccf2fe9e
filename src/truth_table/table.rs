use crate::data_structures::{combination_bit, combination_index};
use crate::graph::PinId;
use crate::simulation::{InputValues, OutputValues};
use bitvec::prelude::*;
use std::fmt::{self, Display, Formatter};

/// Exhaustive input combination to output combination mapping of a combinational circuit.
///
/// Rows are stored by combination index: for `n` inputs, row `i` holds the outputs for
/// input `j` set to bit `n - 1 - j` of `i`, so the first input is the most significant bit.
/// Row keys and values have a string form of `0`s and `1`s in
/// [input_names](TruthTable::input_names) and [output_names](TruthTable::output_names) order.
///
/// # Example
/// ```
/// # use nandsim::{Circuit, ModuleLibrary, generate_truth_table};
/// let mut c = Circuit::new("nand");
/// let a = c.input("a");
/// let b = c.input("b");
/// let out = c.nand2(&a, &b, "nand");
/// c.output(&out, "out");
///
/// let table = generate_truth_table(&c, &ModuleLibrary::new()).unwrap();
/// assert_eq!(table.row("00").as_deref(), Some("1"));
/// assert_eq!(table.row("01").as_deref(), Some("1"));
/// assert_eq!(table.row("10").as_deref(), Some("1"));
/// assert_eq!(table.row("11").as_deref(), Some("0"));
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct TruthTable {
    input_names: Vec<PinId>,
    output_names: Vec<PinId>,
    rows: Vec<BitVec>,
}

impl TruthTable {
    /// Returns a new [TruthTable], `rows` must hold 2^`input_names.len()` rows.
    pub(crate) fn new(input_names: Vec<PinId>, output_names: Vec<PinId>, rows: Vec<BitVec>) -> Self {
        debug_assert_eq!(rows.len(), 1 << input_names.len());
        Self {
            input_names,
            output_names,
            rows,
        }
    }

    /// Returns the input pin ids in key order.
    pub fn input_names(&self) -> &[PinId] {
        &self.input_names
    }

    /// Returns the output pin ids in value order.
    pub fn output_names(&self) -> &[PinId] {
        &self.output_names
    }

    /// Returns the number of rows, 2^inputs.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the row index of `inputs`, pins missing from `inputs` are `false`.
    fn index_of(&self, inputs: &InputValues) -> usize {
        combination_index(
            self.input_names
                .iter()
                .map(|name| inputs.get(name).copied().unwrap_or(false)),
        )
    }

    /// Returns the output bits for `inputs` in [output_names](TruthTable::output_names) order.
    pub fn output_bits<'a>(&'a self, inputs: &InputValues) -> impl Iterator<Item = bool> + 'a {
        self.rows
            .get(self.index_of(inputs))
            .into_iter()
            .flat_map(|row| row.iter().by_vals())
    }

    /// Returns the outputs for `inputs`, keyed by output pin id.
    pub fn lookup(&self, inputs: &InputValues) -> OutputValues {
        self.output_names
            .iter()
            .cloned()
            .zip(self.output_bits(inputs))
            .collect()
    }

    /// Returns the output string for the input string `key`, [None] if `key` is not a
    /// string of `0`s and `1`s of the right length.
    pub fn row(&self, key: &str) -> Option<String> {
        if key.len() != self.input_names.len() {
            return None;
        }
        let mut bits = Vec::with_capacity(key.len());
        for c in key.chars() {
            match c {
                '0' => bits.push(false),
                '1' => bits.push(true),
                _ => return None,
            }
        }
        self.rows.get(combination_index(bits)).map(|row| bits_to_string(row))
    }

    /// Returns every row as `(inputs, outputs)` strings, in counting order.
    pub fn rows(&self) -> impl Iterator<Item = (String, String)> + '_ {
        let width = self.input_names.len();
        self.rows.iter().enumerate().map(move |(index, row)| {
            let key = (0..width)
                .map(|i| if combination_bit(index, width, i) { '1' } else { '0' })
                .collect();
            (key, bits_to_string(row))
        })
    }
}

fn bits_to_string(bits: &BitSlice) -> String {
    bits.iter()
        .by_vals()
        .map(|bit| if bit { '1' } else { '0' })
        .collect()
}

impl Display for TruthTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let join = |names: &[PinId]| {
            names
                .iter()
                .map(PinId::as_str)
                .collect::<Vec<_>>()
                .join(" ")
        };
        writeln!(f, "{} | {}", join(&self.input_names), join(&self.output_names))?;
        for (inputs, outputs) in self.rows() {
            writeln!(f, "{} | {}", inputs, outputs)?;
        }
        Ok(())
    }
}
