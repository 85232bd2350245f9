//! Node Child Store
//!
//! Per-parent cache of child lists and their load status. Guarantees at most
//! one in-flight fetch per parent and exposes the current status synchronously
//! to the traversal.
//!
//! Fetches run as spawned Tokio tasks, but their results are never written from
//! the task. Each completion is sent back over a channel and applied by the
//! owner on its own turn ([`NodeChildStore::apply_completions`] or
//! [`NodeChildStore::next_completion`]), so every mutation happens in one place.

mod entry;

pub use entry::{ChildListEntry, FetchTicket, LoadStatus, RequestDisposition};

use crate::error::{CacheCoherenceError, TransportError};
use crate::transport::ChildFetcher;
use crate::types::{Node, NodeId, ParentId};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};

/// Result of one fetch, delivered back to the owning store
#[derive(Debug)]
pub struct FetchOutcome {
    pub parent: ParentId,
    pub ticket: FetchTicket,
    pub result: Result<Vec<Node>, TransportError>,
}

/// Counters for observability and tests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Fetches started (including retries)
    pub issued: u64,
    /// Requests absorbed by an in-flight fetch
    pub coalesced: u64,
    /// Fetches that landed as `Loaded`
    pub loaded: u64,
    /// Fetches that landed as `Error`
    pub failed: u64,
    /// Completions dropped because their entry moved on
    pub discarded: u64,
}

#[derive(Debug, Clone)]
struct NodeSlot {
    node: Arc<Node>,
    parent: ParentId,
}

/// Per-parent child list cache with request coalescing.
///
/// Adjacency is index-based: entries hold ordered child ids and node bodies
/// live once in a flat id map.
pub struct NodeChildStore {
    fetcher: Arc<dyn ChildFetcher>,
    entries: HashMap<ParentId, ChildListEntry>,
    nodes: HashMap<NodeId, NodeSlot>,
    next_ticket: u64,
    revision: u64,
    stats: StoreStats,
    completions_tx: UnboundedSender<FetchOutcome>,
    completions_rx: UnboundedReceiver<FetchOutcome>,
}

impl NodeChildStore {
    pub fn new(fetcher: Arc<dyn ChildFetcher>) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        Self {
            fetcher,
            entries: HashMap::new(),
            nodes: HashMap::new(),
            next_ticket: 1,
            revision: 0,
            stats: StoreStats::default(),
            completions_tx,
            completions_rx,
        }
    }

    /// Ensure a child list for `parent` is loaded or loading.
    ///
    /// Idempotent while the entry is loading or loaded. An entry in error is
    /// replaced and refetched.
    pub fn request(&mut self, parent: ParentId) -> RequestDisposition {
        match self.entries.get(&parent).map(ChildListEntry::status) {
            Some(LoadStatus::Loading) => {
                self.stats.coalesced += 1;
                debug!(parent = %parent, "Child request coalesced with in-flight fetch");
                RequestDisposition::Coalesced
            }
            Some(LoadStatus::Loaded) => RequestDisposition::AlreadyLoaded,
            Some(LoadStatus::Error) => {
                info!(parent = %parent, "Retrying failed child list");
                RequestDisposition::Retried(self.issue(parent))
            }
            None => RequestDisposition::Issued(self.issue(parent)),
        }
    }

    fn issue(&mut self, parent: ParentId) -> FetchTicket {
        let ticket = FetchTicket(self.next_ticket);
        self.next_ticket += 1;
        self.entries
            .insert(parent, ChildListEntry::loading(parent, ticket));
        self.stats.issued += 1;
        self.revision += 1;

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let fetcher = Arc::clone(&self.fetcher);
                let tx = self.completions_tx.clone();
                handle.spawn(async move {
                    let result = fetcher.fetch_children(parent).await;
                    // Receiver gone means the store was dropped; nothing to update.
                    let _ = tx.send(FetchOutcome {
                        parent,
                        ticket,
                        result,
                    });
                });
                debug!(parent = %parent, ticket = ticket.as_u64(), "Issued child fetch");
            }
            Err(e) => {
                self.apply(FetchOutcome {
                    parent,
                    ticket,
                    result: Err(TransportError::Runtime(e.to_string())),
                });
            }
        }
        ticket
    }

    /// Apply one fetch outcome. Returns false if it was stale and discarded.
    pub fn apply(&mut self, outcome: FetchOutcome) -> bool {
        let FetchOutcome {
            parent,
            ticket,
            result,
        } = outcome;

        match self.entries.get(&parent) {
            Some(entry) if entry.is_loading() && entry.ticket == ticket => {}
            _ => {
                self.stats.discarded += 1;
                debug!(
                    parent = %parent,
                    ticket = ticket.as_u64(),
                    "Discarding stale child fetch completion"
                );
                return false;
            }
        }

        let mut entry = ChildListEntry::loading(parent, ticket);
        match result {
            Ok(nodes) => {
                let mut ids = Vec::with_capacity(nodes.len());
                for node in nodes {
                    ids.push(node.id);
                    self.nodes.insert(
                        node.id,
                        NodeSlot {
                            node: Arc::new(node),
                            parent,
                        },
                    );
                }
                debug!(parent = %parent, children = ids.len(), "Child list loaded");
                entry.status = LoadStatus::Loaded;
                entry.children = Some(ids);
                self.stats.loaded += 1;
            }
            Err(err) => {
                warn!(parent = %parent, error = %err, "Child list failed to load");
                entry.status = LoadStatus::Error;
                entry.error = Some(err);
                self.stats.failed += 1;
            }
        }
        self.entries.insert(parent, entry);
        self.revision += 1;
        true
    }

    /// Apply every completion that has already arrived, without waiting.
    /// Returns the number of completions received.
    pub fn apply_completions(&mut self) -> usize {
        let mut received = 0;
        while let Ok(outcome) = self.completions_rx.try_recv() {
            self.apply(outcome);
            received += 1;
        }
        received
    }

    /// Wait for the next completion and apply it. Returns `None` right away
    /// when nothing is loading.
    pub async fn next_completion(&mut self) -> Option<ParentId> {
        if self.pending_count() == 0 {
            return None;
        }
        let outcome = self.completions_rx.recv().await?;
        let parent = outcome.parent;
        self.apply(outcome);
        Some(parent)
    }

    /// Wait until no child list is loading
    pub async fn wait_idle(&mut self) {
        while self.next_completion().await.is_some() {}
    }

    /// Drop the entry for `parent` so the next `request` refetches it.
    /// An in-flight fetch for it still completes but is discarded.
    pub fn invalidate(&mut self, parent: ParentId) -> bool {
        let Some(entry) = self.entries.remove(&parent) else {
            return false;
        };
        if let Some(ids) = entry.children {
            for id in ids {
                if self.nodes.get(&id).map(|slot| slot.parent) == Some(parent) {
                    self.nodes.remove(&id);
                }
            }
        }
        self.revision += 1;
        debug!(parent = %parent, "Invalidated child list");
        true
    }

    /// Current entry, or `None` if never requested. No side effects.
    pub fn get(&self, parent: ParentId) -> Option<&ChildListEntry> {
        self.entries.get(&parent)
    }

    /// Entry that the caller knows was requested
    pub fn expect_entry(&self, parent: ParentId) -> Result<&ChildListEntry, CacheCoherenceError> {
        self.entries
            .get(&parent)
            .ok_or(CacheCoherenceError::NeverRequested(parent))
    }

    pub fn is_loaded(&self, parent: ParentId) -> bool {
        self.entries
            .get(&parent)
            .map(ChildListEntry::is_loaded)
            .unwrap_or(false)
    }

    pub fn status(&self, parent: ParentId) -> Option<LoadStatus> {
        self.entries.get(&parent).map(ChildListEntry::status)
    }

    /// Loaded children of `parent`, in server order
    pub fn children(&self, parent: ParentId) -> Option<Vec<&Arc<Node>>> {
        let ids = self.entries.get(&parent)?.child_ids()?;
        Some(ids.iter().filter_map(|id| self.node(*id)).collect())
    }

    pub fn child_ids(&self, parent: ParentId) -> Option<&[NodeId]> {
        self.entries.get(&parent)?.child_ids()
    }

    pub fn node(&self, id: NodeId) -> Option<&Arc<Node>> {
        self.nodes.get(&id).map(|slot| &slot.node)
    }

    /// Parent under which `id` was loaded
    pub fn parent_of(&self, id: NodeId) -> Option<ParentId> {
        self.nodes.get(&id).map(|slot| slot.parent)
    }

    /// Number of entries currently loading
    pub fn pending_count(&self) -> usize {
        self.entries.values().filter(|e| e.is_loading()).count()
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Bumped on every observable change
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn stats(&self) -> StoreStats {
        self.stats
    }
}
