//! Request coalescing, error capture and retry through the public store API

use std::sync::Arc;
use unitree::error::TransportError;
use unitree::store::{LoadStatus, NodeChildStore, RequestDisposition};
use unitree::testing::InMemoryBackend;
use unitree::types::{Node, NodeId, ParentId};

fn backend() -> Arc<InMemoryBackend> {
    Arc::new(
        InMemoryBackend::new()
            .with_children(
                ParentId::Root,
                vec![Node::new(1, "one", 0, true), Node::new(2, "two", 0, true)],
            )
            .with_children(ParentId::Node(NodeId(1)), vec![Node::new(3, "three", 1, false)])
            .with_children(ParentId::Node(NodeId(2)), vec![Node::new(4, "four", 1, false)]),
    )
}

#[tokio::test]
async fn test_many_requests_one_fetch() {
    let backend = backend();
    backend.hold(ParentId::Root);
    let mut store = NodeChildStore::new(backend.clone());

    let dispositions: Vec<_> = (0..10).map(|_| store.request(ParentId::Root)).collect();
    assert!(dispositions[0].started_fetch());
    assert!(dispositions[1..]
        .iter()
        .all(|d| *d == RequestDisposition::Coalesced));

    backend.release(ParentId::Root);
    store.wait_idle().await;
    assert_eq!(backend.calls(ParentId::Root), 1);
    assert_eq!(store.stats().issued, 1);
    assert_eq!(store.stats().coalesced, 9);
}

#[tokio::test]
async fn test_unrelated_parents_load_independently() {
    let backend = backend();
    let mut store = NodeChildStore::new(backend.clone());
    store.request(ParentId::Root);
    store.wait_idle().await;

    backend.hold(ParentId::Node(NodeId(1)));
    store.request(ParentId::Node(NodeId(1)));
    store.request(ParentId::Node(NodeId(2)));

    // Parent 2 lands while parent 1 is still held
    let landed = store.next_completion().await;
    assert_eq!(landed, Some(ParentId::Node(NodeId(2))));
    assert!(store.is_loaded(ParentId::Node(NodeId(2))));
    assert_eq!(store.status(ParentId::Node(NodeId(1))), Some(LoadStatus::Loading));

    backend.release(ParentId::Node(NodeId(1)));
    store.wait_idle().await;
    assert!(store.is_loaded(ParentId::Node(NodeId(1))));
}

#[tokio::test]
async fn test_validation_failure_is_captured_on_entry() {
    let backend = backend();
    backend.fail_next(
        ParentId::Root,
        TransportError::Validation(unitree::error::ValidationError::single(
            "node_id",
            "value is not a valid integer",
        )),
    );
    let mut store = NodeChildStore::new(backend);
    store.request(ParentId::Root);
    store.wait_idle().await;

    let entry = store.get(ParentId::Root).unwrap();
    assert_eq!(entry.status(), LoadStatus::Error);
    match entry.error() {
        Some(TransportError::Validation(v)) => {
            assert_eq!(v.messages[0].location(), "node_id");
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unknown_parent_lands_as_status_error() {
    let mut store = NodeChildStore::new(backend());
    store.request(ParentId::Node(NodeId(77)));
    store.wait_idle().await;
    assert!(matches!(
        store.get(ParentId::Node(NodeId(77))).unwrap().error(),
        Some(TransportError::Status { status: 404, .. })
    ));
}

#[tokio::test]
async fn test_poll_style_completion() {
    let backend = backend();
    let mut store = NodeChildStore::new(backend);
    store.request(ParentId::Root);

    while !store.is_loaded(ParentId::Root) {
        tokio::task::yield_now().await;
        store.apply_completions();
    }
    assert_eq!(store.pending_count(), 0);
    assert_eq!(store.node_count(), 2);
}
