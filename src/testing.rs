//! In-memory child fetcher for tests, benchmarks and offline demos.
//!
//! Serves fixed child lists, counts calls per parent, and can hold a parent's
//! response until released or fail its next fetch.

use crate::error::TransportError;
use crate::transport::ChildFetcher;
use crate::types::{Node, NodeId, NodeIn, ParentId};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Default)]
pub struct InMemoryBackend {
    children: Mutex<HashMap<ParentId, Vec<Node>>>,
    calls: Mutex<HashMap<ParentId, usize>>,
    failures: Mutex<HashMap<ParentId, TransportError>>,
    gates: Mutex<HashMap<ParentId, Arc<Notify>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_children(self, parent: ParentId, children: Vec<Node>) -> Self {
        self.set_children(parent, children);
        self
    }

    /// Build from a forest of subtrees, assigning ids in pre-order from 1
    pub fn from_forest(forest: &[NodeIn]) -> Self {
        let backend = Self::new();
        let mut next_id = 1;
        backend.add_level(ParentId::Root, forest, 0, &mut next_id);
        backend
    }

    fn add_level(&self, parent: ParentId, level: &[NodeIn], depth: usize, next_id: &mut i64) {
        let mut nodes = Vec::with_capacity(level.len());
        for tree in level {
            let id = *next_id;
            *next_id += 1;
            nodes.push(Node::new(id, tree.title.clone(), depth, !tree.children.is_empty()));
            if !tree.children.is_empty() {
                self.add_level(ParentId::Node(NodeId(id)), &tree.children, depth + 1, next_id);
            }
        }
        self.set_children(parent, nodes);
    }

    /// Complete tree with `fanout` children per node, `depth` levels deep
    pub fn balanced(fanout: usize, depth: usize) -> Self {
        fn build(fanout: usize, remaining: usize, label: &str) -> Vec<NodeIn> {
            if remaining == 0 {
                return Vec::new();
            }
            (0..fanout)
                .map(|i| {
                    let title = format!("{}.{}", label, i);
                    NodeIn {
                        children: build(fanout, remaining - 1, &title),
                        title,
                    }
                })
                .collect()
        }
        Self::from_forest(&build(fanout, depth, "n"))
    }

    pub fn set_children(&self, parent: ParentId, children: Vec<Node>) {
        self.children.lock().insert(parent, children);
    }

    /// Number of fetches served (or failed) for `parent`
    pub fn calls(&self, parent: ParentId) -> usize {
        self.calls.lock().get(&parent).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }

    /// Make the next fetch of `parent` fail with `error`
    pub fn fail_next(&self, parent: ParentId, error: TransportError) {
        self.failures.lock().insert(parent, error);
    }

    /// Hold fetches of `parent` until [`release`](Self::release) is called
    pub fn hold(&self, parent: ParentId) {
        self.gates
            .lock()
            .insert(parent, Arc::new(Notify::new()));
    }

    pub fn release(&self, parent: ParentId) {
        if let Some(gate) = self.gates.lock().remove(&parent) {
            gate.notify_one();
        }
    }

    /// Every parent id with a child list, root first
    pub fn parents(&self) -> Vec<ParentId> {
        let mut parents: Vec<ParentId> = self.children.lock().keys().copied().collect();
        parents.sort();
        parents
    }
}

#[async_trait]
impl ChildFetcher for InMemoryBackend {
    async fn fetch_children(&self, parent: ParentId) -> Result<Vec<Node>, TransportError> {
        let gate = self.gates.lock().get(&parent).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        *self.calls.lock().entry(parent).or_insert(0) += 1;
        if let Some(error) = self.failures.lock().remove(&parent) {
            return Err(error);
        }

        self.children
            .lock()
            .get(&parent)
            .cloned()
            .ok_or_else(|| TransportError::Status {
                status: 404,
                message: format!("No children recorded for {}", parent),
            })
    }
}
