//! Fully loaded tree snapshot with a mutable open set

use proptest::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use unitree::store::LoadStatus;
use unitree::tree::TreeSource;
use unitree::types::{Node, NodeId, NodeIn, ParentId};

pub struct Snapshot {
    pub lists: HashMap<ParentId, Vec<NodeId>>,
    pub nodes: HashMap<NodeId, Arc<Node>>,
    pub open: HashSet<NodeId>,
    revision: u64,
}

impl Snapshot {
    /// Load every list of `forest`, ids assigned in pre-order from 1
    pub fn from_forest(forest: &[NodeIn]) -> Self {
        let mut snapshot = Snapshot {
            lists: HashMap::new(),
            nodes: HashMap::new(),
            open: HashSet::new(),
            revision: 0,
        };
        let mut next_id = 1;
        snapshot.add_level(ParentId::Root, forest, 0, &mut next_id);
        snapshot
    }

    fn add_level(&mut self, parent: ParentId, level: &[NodeIn], depth: usize, next_id: &mut i64) {
        let mut ids = Vec::with_capacity(level.len());
        for tree in level {
            let id = NodeId(*next_id);
            *next_id += 1;
            ids.push(id);
            let has_children = !tree.children.is_empty();
            self.nodes.insert(
                id,
                Arc::new(Node::new(id.0, tree.title.clone(), depth, has_children)),
            );
            if has_children {
                self.add_level(ParentId::Node(id), &tree.children, depth + 1, next_id);
            }
        }
        self.lists.insert(parent, ids);
    }

    /// Parents (nodes with children), sorted by id
    pub fn parents(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|n| n.has_children)
            .map(|n| n.id)
            .collect();
        ids.sort();
        ids
    }

    pub fn set_open(&mut self, id: NodeId, open: bool) {
        if open {
            self.open.insert(id);
        } else {
            self.open.remove(&id);
        }
        self.revision += 1;
    }

    /// Recursive pre-order of the visible rows as (id, depth)
    pub fn expected_rows(&self) -> Vec<(NodeId, usize)> {
        let mut out = Vec::new();
        self.expected_under(ParentId::Root, 0, &mut out);
        out
    }

    fn expected_under(&self, parent: ParentId, depth: usize, out: &mut Vec<(NodeId, usize)>) {
        let Some(ids) = self.lists.get(&parent) else {
            return;
        };
        for id in ids {
            out.push((*id, depth));
            if self.nodes[id].has_children && self.open.contains(id) {
                self.expected_under(ParentId::Node(*id), depth + 1, out);
            }
        }
    }
}

impl TreeSource for Snapshot {
    fn child_ids(&self, parent: ParentId) -> Option<&[NodeId]> {
        self.lists.get(&parent).map(Vec::as_slice)
    }

    fn node(&self, id: NodeId) -> Option<&Arc<Node>> {
        self.nodes.get(&id)
    }

    fn status(&self, parent: ParentId) -> Option<LoadStatus> {
        self.lists.get(&parent).map(|_| LoadStatus::Loaded)
    }

    fn is_open(&self, id: NodeId) -> bool {
        self.open.contains(&id)
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

/// Random forests up to four levels deep
pub fn forest() -> impl Strategy<Value = Vec<NodeIn>> {
    let leaf = "[a-z]{1,4}".prop_map(NodeIn::leaf);
    let node = leaf.prop_recursive(4, 64, 4, |inner| {
        ("[a-z]{1,4}", prop::collection::vec(inner, 0..4))
            .prop_map(|(title, children)| NodeIn { title, children })
    });
    prop::collection::vec(node, 0..5)
}
