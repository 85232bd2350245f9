//! Open/closed state of parents

use crate::types::{NodeId, ParentId};
use std::collections::HashSet;

/// Set of open parents. The root is always open and never stored.
///
/// Pure state with no I/O; fetching on open belongs to the toggle handler
/// ([`crate::state::TreeState::toggle`]).
#[derive(Debug, Clone, Default)]
pub struct ExpansionSet {
    open: HashSet<NodeId>,
    revision: u64,
}

impl ExpansionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `id` open. Returns true if it was closed before.
    pub fn open(&mut self, id: NodeId) -> bool {
        let changed = self.open.insert(id);
        if changed {
            self.revision += 1;
        }
        changed
    }

    /// Mark `id` closed. Returns true if it was open before.
    pub fn close(&mut self, id: NodeId) -> bool {
        let changed = self.open.remove(&id);
        if changed {
            self.revision += 1;
        }
        changed
    }

    pub fn has(&self, parent: ParentId) -> bool {
        match parent {
            ParentId::Root => true,
            ParentId::Node(id) => self.open.contains(&id),
        }
    }

    pub fn is_open(&self, id: NodeId) -> bool {
        self.open.contains(&id)
    }

    /// Explicitly opened nodes (the implicit root is not counted)
    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.open.iter().copied()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}
