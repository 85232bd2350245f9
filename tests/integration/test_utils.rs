//! Shared test utilities for integration tests

use std::sync::Arc;
use unitree::state::TreeState;
use unitree::testing::InMemoryBackend;
use unitree::tree::TreeSource;
use unitree::types::{NodeId, NodeIn};

/// Subtree helper: `tree("A", vec![leaf("C")])`
pub fn tree(title: &str, children: Vec<NodeIn>) -> NodeIn {
    NodeIn {
        title: title.to_string(),
        children,
    }
}

pub fn leaf(title: &str) -> NodeIn {
    NodeIn::leaf(title)
}

/// State with the root list already loaded
pub async fn loaded_state(backend: Arc<InMemoryBackend>) -> TreeState {
    let mut state = TreeState::new(backend);
    state.load_root();
    state.wait_idle().await;
    state
}

/// Open `id` and wait for its children
pub async fn open_and_wait(state: &mut TreeState, id: i64) {
    state.open(NodeId(id)).unwrap();
    state.wait_idle().await;
}

/// Row titles indented two spaces per depth
pub fn outline<S: TreeSource + ?Sized>(source: &S) -> Vec<String> {
    unitree::tree::TreeWalker::rows(source)
        .map(|row| format!("{}{}", "  ".repeat(row.depth), row.node.display_title()))
        .collect()
}
