//! Tree State
//!
//! One owner for the expansion set and the child store, with the toggle
//! transaction that ties them together. Hosts hold a `TreeState`, call
//! [`TreeState::apply_completions`] on their turn, and walk it for rows.

use crate::error::CacheCoherenceError;
use crate::store::{LoadStatus, NodeChildStore, RequestDisposition};
use crate::transport::ChildFetcher;
use crate::tree::{ExpansionSet, Rows, TreeSource, TreeWalker};
use crate::types::{Node, NodeId, ParentId};
use std::sync::Arc;
use tracing::debug;

/// Result of a toggle, open or close
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Now open; carries what the store did about its children
    Opened(RequestDisposition),
    Closed,
    /// Leaf node; nothing changed
    NotExpandable,
}

pub struct TreeState {
    store: NodeChildStore,
    expansion: ExpansionSet,
}

impl TreeState {
    pub fn new(fetcher: Arc<dyn ChildFetcher>) -> Self {
        Self {
            store: NodeChildStore::new(fetcher),
            expansion: ExpansionSet::new(),
        }
    }

    /// Request the root child list
    pub fn load_root(&mut self) -> RequestDisposition {
        self.store.request(ParentId::Root)
    }

    /// Flip the expansion state of `id`, fetching its children on open.
    ///
    /// A row whose child list failed renders closed, so toggling it opens
    /// again and retries the fetch.
    pub fn toggle(&mut self, id: NodeId) -> Result<ToggleOutcome, CacheCoherenceError> {
        let node = self.known_node(id)?;
        if !node.has_children {
            return Ok(ToggleOutcome::NotExpandable);
        }
        let failed = self.store.status(ParentId::Node(id)) == Some(LoadStatus::Error);
        if self.expansion.is_open(id) && !failed {
            self.expansion.close(id);
            debug!(node = %id, "Collapsed");
            Ok(ToggleOutcome::Closed)
        } else {
            Ok(self.expand(id))
        }
    }

    /// Open `id`. Reopening an open node whose list failed retries the fetch.
    pub fn open(&mut self, id: NodeId) -> Result<ToggleOutcome, CacheCoherenceError> {
        let node = self.known_node(id)?;
        if !node.has_children {
            return Ok(ToggleOutcome::NotExpandable);
        }
        Ok(self.expand(id))
    }

    pub fn close(&mut self, id: NodeId) -> Result<ToggleOutcome, CacheCoherenceError> {
        let node = self.known_node(id)?;
        if !node.has_children {
            return Ok(ToggleOutcome::NotExpandable);
        }
        self.expansion.close(id);
        Ok(ToggleOutcome::Closed)
    }

    fn expand(&mut self, id: NodeId) -> ToggleOutcome {
        self.expansion.open(id);
        let disposition = self.store.request(ParentId::Node(id));
        debug!(node = %id, ?disposition, "Expanded");
        ToggleOutcome::Opened(disposition)
    }

    fn known_node(&self, id: NodeId) -> Result<Arc<Node>, CacheCoherenceError> {
        self.store
            .node(id)
            .cloned()
            .ok_or(CacheCoherenceError::UnknownNode(id))
    }

    /// Drop `parent`'s cached children so they refetch when next needed.
    /// An open parent is requested again right away.
    pub fn invalidate(&mut self, parent: ParentId) -> Option<RequestDisposition> {
        if !self.store.invalidate(parent) {
            return None;
        }
        if self.expansion.has(parent) {
            Some(self.store.request(parent))
        } else {
            None
        }
    }

    pub fn apply_completions(&mut self) -> usize {
        self.store.apply_completions()
    }

    pub async fn next_completion(&mut self) -> Option<ParentId> {
        self.store.next_completion().await
    }

    pub async fn wait_idle(&mut self) {
        self.store.wait_idle().await
    }

    pub fn store(&self) -> &NodeChildStore {
        &self.store
    }

    pub fn expansion(&self) -> &ExpansionSet {
        &self.expansion
    }

    /// One full walker pass
    pub fn rows(&self) -> Rows<'_, Self> {
        TreeWalker::rows(self)
    }
}

impl TreeSource for TreeState {
    fn child_ids(&self, parent: ParentId) -> Option<&[NodeId]> {
        self.store.child_ids(parent)
    }

    fn node(&self, id: NodeId) -> Option<&Arc<Node>> {
        self.store.node(id)
    }

    fn status(&self, parent: ParentId) -> Option<LoadStatus> {
        self.store.status(parent)
    }

    fn is_open(&self, id: NodeId) -> bool {
        self.expansion.is_open(id)
    }

    fn revision(&self) -> u64 {
        self.store.revision().wrapping_add(self.expansion.revision())
    }
}
