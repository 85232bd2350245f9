//! Resumable pre-order walker over the visible tree
//!
//! Produces one [`Row`] per visible node, depth first, in server sibling
//! order. The walker keeps only a stack of (parent, next sibling index)
//! frames, so a pass costs time proportional to the rows emitted and never
//! touches closed subtrees.

use crate::store::LoadStatus;
use crate::types::{Node, NodeId, ParentId};
use std::sync::Arc;
use tracing::warn;

/// Read-only view the walker traverses.
///
/// Implemented by [`crate::state::TreeState`]; tests implement it over
/// fixed snapshots.
pub trait TreeSource {
    /// Ordered child ids of `parent`, present only once its list is loaded
    fn child_ids(&self, parent: ParentId) -> Option<&[NodeId]>;

    fn node(&self, id: NodeId) -> Option<&Arc<Node>>;

    /// Load status of `parent`'s child list, `None` if never requested
    fn status(&self, parent: ParentId) -> Option<LoadStatus>;

    /// Whether `id` is in the expansion set
    fn is_open(&self, id: NodeId) -> bool;

    /// Changes whenever anything the walker reads changes
    fn revision(&self) -> u64;
}

/// How a row presents its expand control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowAffordance {
    /// No children; nothing to toggle
    Leaf,
    Collapsed,
    Expanded,
    /// Open, children still being fetched
    Loading,
    /// Child list failed; toggling open retries
    Failed,
}

/// One visible node, as yielded by the walker
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub node: Arc<Node>,
    /// Whether this node's child list is cached
    pub children_loaded: bool,
    /// Effective openness: expanded, has children, and not in error
    pub is_open: bool,
    /// Traversal depth, 0 for children of the root
    pub depth: usize,
    /// Load status of this node's own child list
    pub load_status: Option<LoadStatus>,
}

impl Row {
    pub fn id(&self) -> NodeId {
        self.node.id
    }

    pub fn affordance(&self) -> RowAffordance {
        if !self.node.has_children {
            RowAffordance::Leaf
        } else if self.load_status == Some(LoadStatus::Error) {
            RowAffordance::Failed
        } else if !self.is_open {
            RowAffordance::Collapsed
        } else if self.children_loaded {
            RowAffordance::Expanded
        } else {
            RowAffordance::Loading
        }
    }

    /// The walker descends below this row on the next advance
    fn descends(&self) -> bool {
        self.is_open && self.children_loaded
    }
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    parent: ParentId,
    next: usize,
    depth: usize,
}

#[derive(Debug, Clone)]
enum WalkState {
    AwaitingRoot,
    EmittingSiblings(Vec<Frame>),
    Finished,
}

/// Resumable pre-order walker.
///
/// Each [`advance`](Self::advance) yields the next row given the row it
/// yielded last; passing `None` restarts the pass. Source changes between
/// calls are not tracked; callers restart once [`is_stale`](Self::is_stale)
/// reports a newer revision.
#[derive(Debug, Clone)]
pub struct TreeWalker {
    state: WalkState,
    revision: Option<u64>,
}

impl Default for TreeWalker {
    fn default() -> Self {
        Self::new()
    }
}

impl TreeWalker {
    pub fn new() -> Self {
        Self {
            state: WalkState::AwaitingRoot,
            revision: None,
        }
    }

    /// Yield the row after `previous`, or the first row when `previous` is
    /// `None`. Returns `None` once the pass is exhausted.
    pub fn advance<S>(&mut self, source: &S, previous: Option<&Row>) -> Option<Row>
    where
        S: TreeSource + ?Sized,
    {
        let prev = match previous {
            Some(prev) if !matches!(self.state, WalkState::AwaitingRoot) => prev,
            _ => {
                self.restart(source);
                return self.emit_next(source);
            }
        };

        if let WalkState::EmittingSiblings(stack) = &mut self.state {
            if prev.descends() {
                stack.push(Frame {
                    parent: ParentId::Node(prev.node.id),
                    next: 0,
                    depth: prev.depth + 1,
                });
            }
        }
        self.emit_next(source)
    }

    fn restart<S>(&mut self, source: &S)
    where
        S: TreeSource + ?Sized,
    {
        self.revision = Some(source.revision());
        self.state = if source.child_ids(ParentId::Root).is_some() {
            WalkState::EmittingSiblings(vec![Frame {
                parent: ParentId::Root,
                next: 0,
                depth: 0,
            }])
        } else {
            WalkState::Finished
        };
    }

    fn emit_next<S>(&mut self, source: &S) -> Option<Row>
    where
        S: TreeSource + ?Sized,
    {
        let WalkState::EmittingSiblings(stack) = &mut self.state else {
            return None;
        };

        while let Some(frame) = stack.last_mut() {
            let Some(ids) = source.child_ids(frame.parent) else {
                // Invalidated mid-pass; its rows are gone.
                stack.pop();
                continue;
            };
            let Some(&id) = ids.get(frame.next) else {
                stack.pop();
                continue;
            };
            frame.next += 1;
            let depth = frame.depth;

            let Some(node) = source.node(id) else {
                warn!(node = %id, "Child id without a node body; skipping");
                continue;
            };
            return Some(build_row(source, Arc::clone(node), depth));
        }

        self.state = WalkState::Finished;
        None
    }

    /// True when the source changed since the current pass started
    pub fn is_stale<S>(&self, source: &S) -> bool
    where
        S: TreeSource + ?Sized,
    {
        self.revision != Some(source.revision())
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, WalkState::Finished)
    }

    /// Iterate a fresh pass over `source`
    pub fn rows<S>(source: &S) -> Rows<'_, S>
    where
        S: TreeSource + ?Sized,
    {
        Rows {
            walker: TreeWalker::new(),
            source,
            previous: None,
            started: false,
        }
    }
}

fn build_row<S>(source: &S, node: Arc<Node>, depth: usize) -> Row
where
    S: TreeSource + ?Sized,
{
    if node.depth != depth {
        warn!(
            node = %node.id,
            reported = node.depth,
            traversed = depth,
            "Node depth disagrees with its position in the tree"
        );
    }

    let load_status = source.status(ParentId::Node(node.id));
    let expanded = source.is_open(node.id);
    let is_open =
        expanded && node.has_children && load_status != Some(LoadStatus::Error);

    Row {
        children_loaded: load_status == Some(LoadStatus::Loaded),
        is_open,
        depth,
        load_status,
        node,
    }
}

/// Iterator over one full pass of a [`TreeWalker`]
pub struct Rows<'a, S: ?Sized> {
    walker: TreeWalker,
    source: &'a S,
    previous: Option<Row>,
    started: bool,
}

impl<'a, S> Iterator for Rows<'a, S>
where
    S: TreeSource + ?Sized,
{
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        let row = if !self.started {
            self.started = true;
            self.walker.advance(self.source, None)
        } else {
            let previous = self.previous.take()?;
            self.walker.advance(self.source, Some(&previous))
        };
        self.previous = row.clone();
        row
    }
}
