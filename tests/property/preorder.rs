//! Walker output against a recursive reference traversal

use super::snapshot::{forest, Snapshot};
use proptest::prelude::*;
use unitree::tree::{Row, TreeWalker};
use unitree::types::NodeId;

fn walk(snapshot: &Snapshot) -> Vec<Row> {
    TreeWalker::rows(snapshot).collect()
}

fn with_open_flags(snapshot: &mut Snapshot, flags: &[bool]) {
    for (i, id) in snapshot.parents().into_iter().enumerate() {
        if flags.get(i).copied().unwrap_or(false) {
            snapshot.set_open(id, true);
        }
    }
}

proptest! {
    #[test]
    fn test_rows_are_valid_preorder(
        forest in forest(),
        flags in prop::collection::vec(any::<bool>(), 0..64),
    ) {
        let mut snapshot = Snapshot::from_forest(&forest);
        with_open_flags(&mut snapshot, &flags);

        let rows = walk(&snapshot);
        let actual: Vec<(NodeId, usize)> = rows.iter().map(|r| (r.node.id, r.depth)).collect();
        prop_assert_eq!(&actual, &snapshot.expected_rows());

        let mut previous: Option<&Row> = None;
        for row in &rows {
            prop_assert_eq!(row.depth, row.node.depth);
            match previous {
                None => prop_assert_eq!(row.depth, 0),
                Some(prev) if row.depth == prev.depth + 1 => prop_assert!(prev.is_open),
                Some(prev) => prop_assert!(row.depth <= prev.depth),
            }
            if !row.node.has_children {
                prop_assert!(!row.is_open);
            }
            previous = Some(row);
        }
    }

    #[test]
    fn test_close_then_reopen_restores_rows(
        forest in forest(),
        flags in prop::collection::vec(any::<bool>(), 0..64),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut snapshot = Snapshot::from_forest(&forest);
        let parents = snapshot.parents();
        prop_assume!(!parents.is_empty());
        with_open_flags(&mut snapshot, &flags);

        let target = parents[pick.index(parents.len())];
        snapshot.set_open(target, true);
        let opened: Vec<(NodeId, usize)> =
            walk(&snapshot).iter().map(|r| (r.node.id, r.depth)).collect();

        snapshot.set_open(target, false);
        let closed: Vec<(NodeId, usize)> =
            walk(&snapshot).iter().map(|r| (r.node.id, r.depth)).collect();

        // Closing removes exactly the contiguous block of deeper rows after the target
        let mut expected_closed = opened.clone();
        if let Some(pos) = opened.iter().position(|(id, _)| *id == target) {
            let depth = opened[pos].1;
            let end = opened[pos + 1..]
                .iter()
                .position(|(_, d)| *d <= depth)
                .map(|offset| pos + 1 + offset)
                .unwrap_or(opened.len());
            expected_closed.drain(pos + 1..end);
        }
        prop_assert_eq!(&closed, &expected_closed);

        snapshot.set_open(target, true);
        let reopened: Vec<(NodeId, usize)> =
            walk(&snapshot).iter().map(|r| (r.node.id, r.depth)).collect();
        prop_assert_eq!(reopened, opened);
    }
}
