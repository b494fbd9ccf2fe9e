use super::circuit::Circuit;
use super::types::{PinKey, PinRef};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Pin-level adjacency of a [Circuit].
///
/// `forward` maps a driver pin to every pin it drives, `reverse` maps a driven pin back to
/// its single driver. If a pin is driven by more than one edge, the last edge wins.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    pub forward: HashMap<PinKey, SmallVec<[PinRef; 2]>>,
    pub reverse: HashMap<PinKey, PinRef>,
}

impl Adjacency {
    /// Returns the [Adjacency] of `circuit`. Rebuilt for every evaluation call.
    pub fn new(circuit: &Circuit) -> Self {
        let mut forward: HashMap<PinKey, SmallVec<[PinRef; 2]>> = HashMap::new();
        let mut reverse = HashMap::with_capacity(circuit.edges.len());
        for edge in &circuit.edges {
            forward
                .entry(edge.from.key())
                .or_default()
                .push(edge.to.clone());
            reverse.insert(edge.to.key(), edge.from.clone());
        }
        Adjacency { forward, reverse }
    }

    /// Returns the pin driving `key`, if any.
    #[inline(always)]
    pub fn driver(&self, key: &PinKey) -> Option<&PinRef> {
        self.reverse.get(key)
    }

    /// Returns the pins driven by `key`.
    pub fn destinations(&self, key: &PinKey) -> &[PinRef] {
        self.forward.get(key).map(|d| d.as_slice()).unwrap_or(&[])
    }
}
