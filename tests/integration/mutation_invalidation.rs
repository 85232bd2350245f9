//! Mutations reach the view through invalidation of affected parents

use super::test_utils::{leaf, loaded_state, open_and_wait, outline, tree};
use std::sync::Arc;
use unitree::testing::InMemoryBackend;
use unitree::types::{Node, NodeId, ParentId};

#[tokio::test]
async fn test_invalidating_open_parent_shows_new_children() {
    let backend = Arc::new(InMemoryBackend::from_forest(&[
        tree("inbox", vec![leaf("first")]),
        leaf("archive"),
    ]));
    let mut state = loaded_state(backend.clone()).await;
    open_and_wait(&mut state, 1).await;
    assert_eq!(outline(&state), vec!["inbox", "  first", "archive"]);

    // Server-side insert before "first"
    backend.set_children(
        ParentId::Node(NodeId(1)),
        vec![Node::new(10, "zeroth", 1, false), Node::new(2, "first", 1, false)],
    );
    assert!(state.invalidate(ParentId::Node(NodeId(1))).is_some());
    state.wait_idle().await;

    assert_eq!(outline(&state), vec!["inbox", "  zeroth", "  first", "archive"]);
}

#[tokio::test]
async fn test_invalidating_closed_parent_defers_fetch() {
    let backend = Arc::new(InMemoryBackend::from_forest(&[tree(
        "inbox",
        vec![leaf("first")],
    )]));
    let mut state = loaded_state(backend.clone()).await;
    open_and_wait(&mut state, 1).await;
    state.close(NodeId(1)).unwrap();

    assert!(state.invalidate(ParentId::Node(NodeId(1))).is_none());
    assert_eq!(backend.calls(ParentId::Node(NodeId(1))), 1);

    open_and_wait(&mut state, 1).await;
    assert_eq!(backend.calls(ParentId::Node(NodeId(1))), 2);
    assert_eq!(outline(&state), vec!["inbox", "  first"]);
}

#[tokio::test]
async fn test_invalidating_root_after_delete() {
    let backend = Arc::new(InMemoryBackend::from_forest(&[leaf("keep"), leaf("drop")]));
    let mut state = loaded_state(backend.clone()).await;

    backend.set_children(ParentId::Root, vec![Node::new(1, "keep", 0, false)]);
    state.invalidate(ParentId::Root);
    state.wait_idle().await;

    assert_eq!(outline(&state), vec!["keep"]);
    assert!(state.store().node(NodeId(2)).is_none());
}
