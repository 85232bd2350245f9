//! End-to-end traversal scenarios against the in-memory backend

use super::test_utils::{leaf, loaded_state, open_and_wait, outline, tree};
use std::sync::Arc;
use unitree::store::RequestDisposition;
use unitree::state::ToggleOutcome;
use unitree::testing::InMemoryBackend;
use unitree::tree::{RowAffordance, TreeWalker};
use unitree::types::{Node, NodeId, ParentId};

fn a_b_backend() -> Arc<InMemoryBackend> {
    Arc::new(
        InMemoryBackend::new()
            .with_children(
                ParentId::Root,
                vec![Node::new(1, "A", 0, true), Node::new(2, "B", 0, false)],
            )
            .with_children(ParentId::Node(NodeId(1)), vec![Node::new(3, "C", 1, false)]),
    )
}

#[tokio::test]
async fn test_open_a_then_resolve() {
    let backend = a_b_backend();
    let mut state = loaded_state(backend.clone()).await;

    assert!(matches!(
        state.toggle(NodeId(1)).unwrap(),
        ToggleOutcome::Opened(RequestDisposition::Issued(_))
    ));
    state.wait_idle().await;

    let rows: Vec<_> = state.rows().collect();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].node.id, NodeId(1));
    assert!(rows[0].is_open);
    assert_eq!(rows[1].node.id, NodeId(3));
    assert_eq!(rows[1].depth, 1);
    assert_eq!(rows[2].node.id, NodeId(2));
    assert!(!rows[2].is_open);
}

#[tokio::test]
async fn test_open_before_resolution_inserts_no_rows() {
    let backend = a_b_backend();
    backend.hold(ParentId::Node(NodeId(1)));
    let mut state = loaded_state(backend.clone()).await;

    state.toggle(NodeId(1)).unwrap();
    let rows: Vec<_> = state.rows().collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].is_open);
    assert!(!rows[0].children_loaded);
    assert_eq!(rows[0].affordance(), RowAffordance::Loading);

    backend.release(ParentId::Node(NodeId(1)));
    state.wait_idle().await;
    assert_eq!(outline(&state), vec!["A", "  C", "B"]);
}

#[tokio::test]
async fn test_empty_root() {
    let backend = Arc::new(InMemoryBackend::new().with_children(ParentId::Root, vec![]));
    let state = loaded_state(backend).await;
    assert_eq!(state.rows().count(), 0);
}

#[tokio::test]
async fn test_leaf_never_fetches() {
    let backend = a_b_backend();
    let mut state = loaded_state(backend.clone()).await;

    for _ in 0..3 {
        assert_eq!(
            state.toggle(NodeId(2)).unwrap(),
            ToggleOutcome::NotExpandable
        );
    }
    assert_eq!(backend.calls(ParentId::Node(NodeId(2))), 0);
    assert_eq!(outline(&state), vec!["A", "B"]);
}

#[tokio::test]
async fn test_close_removes_subtree_and_reopen_restores_it() {
    let backend = Arc::new(InMemoryBackend::from_forest(&[
        tree("a", vec![tree("b", vec![leaf("c"), leaf("d")]), leaf("e")]),
        leaf("f"),
    ]));
    let mut state = loaded_state(backend.clone()).await;
    open_and_wait(&mut state, 1).await;
    open_and_wait(&mut state, 2).await;

    let expanded = outline(&state);
    assert_eq!(expanded, vec!["a", "  b", "    c", "    d", "  e", "f"]);

    state.toggle(NodeId(1)).unwrap();
    assert_eq!(outline(&state), vec!["a", "f"]);

    state.toggle(NodeId(1)).unwrap();
    assert_eq!(outline(&state), expanded);
    assert_eq!(backend.total_calls(), 3);
}

#[tokio::test]
async fn test_nested_open_state_survives_ancestor_close() {
    let backend = Arc::new(InMemoryBackend::from_forest(&[tree(
        "a",
        vec![tree("b", vec![leaf("c")])],
    )]));
    let mut state = loaded_state(backend).await;
    open_and_wait(&mut state, 1).await;
    open_and_wait(&mut state, 2).await;

    state.close(NodeId(1)).unwrap();
    assert!(state.expansion().is_open(NodeId(2)));
    assert_eq!(outline(&state), vec!["a"]);
}

#[tokio::test]
async fn test_collapse_during_fetch_then_reopen_reuses_entry() {
    let backend = a_b_backend();
    backend.hold(ParentId::Node(NodeId(1)));
    let mut state = loaded_state(backend.clone()).await;

    state.toggle(NodeId(1)).unwrap();
    assert_eq!(state.toggle(NodeId(1)).unwrap(), ToggleOutcome::Closed);

    backend.release(ParentId::Node(NodeId(1)));
    state.wait_idle().await;
    assert_eq!(outline(&state), vec!["A", "B"]);

    assert_eq!(
        state.toggle(NodeId(1)).unwrap(),
        ToggleOutcome::Opened(RequestDisposition::AlreadyLoaded)
    );
    assert_eq!(outline(&state), vec!["A", "  C", "B"]);
    assert_eq!(backend.calls(ParentId::Node(NodeId(1))), 1);
}

#[tokio::test]
async fn test_manual_advance_matches_iterator() {
    let backend = Arc::new(InMemoryBackend::balanced(3, 3));
    let mut state = loaded_state(backend).await;
    open_and_wait(&mut state, 1).await;
    open_and_wait(&mut state, 2).await;

    let mut walker = TreeWalker::new();
    let mut manual = Vec::new();
    let mut previous = walker.advance(&state, None);
    while let Some(row) = previous {
        manual.push(row.node.id);
        previous = walker.advance(&state, Some(&row));
    }

    let iterated: Vec<NodeId> = state.rows().map(|row| row.node.id).collect();
    assert_eq!(manual, iterated);
    assert!(!walker.is_stale(&state));
}
