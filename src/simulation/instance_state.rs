use super::values::PinValues;
use crate::graph::{Circuit, NodeId, PinRef};
use indexmap::IndexMap;

/// Per-instance states of the module instances of one circuit, keyed by instance node id.
pub type InstanceStates = IndexMap<NodeId, InstanceState>;

/// Memory of a single module instance between ticks.
///
/// `pin_values` is the full pin map of the instance's internal circuit from the last
/// evaluation, `children` holds the states of the instances nested inside it.
/// States are keyed by instance id, never by module id, so two placements of the same
/// module never share memory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct InstanceState {
    pub pin_values: PinValues,
    pub children: InstanceStates,
}

impl InstanceState {
    /// Returns an empty [InstanceState].
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns the state of the nested instance `id`.
    pub fn child(&self, id: &NodeId) -> Option<&InstanceState> {
        self.children.get(id)
    }

    /// Returns the state found by following `path` through nested instances.
    pub fn descendant<'a, I: IntoIterator<Item = &'a NodeId>>(&self, path: I) -> Option<&InstanceState> {
        path.into_iter()
            .try_fold(self, |state, id| state.children.get(id))
    }

    /// Returns the last known value of `pin` inside the instance.
    pub fn value(&self, pin: &PinRef) -> Option<bool> {
        self.pin_values.get(&pin.key()).copied()
    }

    /// Returns the number of states in the subtree rooted at `self`, `self` included.
    pub fn len(&self) -> usize {
        1 + self.children.values().map(InstanceState::len).sum::<usize>()
    }
}

/// Drops the states of instances that are no longer module instances of `circuit`.
///
/// Returns the number of top level states dropped.
pub fn retain_instances(states: &mut InstanceStates, circuit: &Circuit) -> usize {
    let before = states.len();
    states.retain(|id, _| {
        circuit
            .node(id)
            .map(|n| n.kind.module_id().is_some())
            .unwrap_or(false)
    });
    before - states.len()
}
