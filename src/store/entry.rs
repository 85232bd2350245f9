//! Child list cache entries

use crate::error::TransportError;
use crate::types::{NodeId, ParentId};
use serde::Serialize;

/// Load status of a parent's child list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadStatus {
    Loading,
    Loaded,
    Error,
}

/// Identifies one issued fetch. A completion only lands on an entry that is
/// still loading under the same ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FetchTicket(pub(crate) u64);

impl FetchTicket {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// What `request` did for a parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestDisposition {
    /// No entry existed; a fetch was started
    Issued(FetchTicket),
    /// A fetch is already in flight for this parent
    Coalesced,
    /// Children are already cached
    AlreadyLoaded,
    /// The previous fetch failed; a new one was started
    Retried(FetchTicket),
}

impl RequestDisposition {
    /// True when an underlying fetch was started
    pub fn started_fetch(self) -> bool {
        matches!(
            self,
            RequestDisposition::Issued(_) | RequestDisposition::Retried(_)
        )
    }
}

/// Cached state of one parent's child list
#[derive(Debug, Clone)]
pub struct ChildListEntry {
    pub(crate) parent: ParentId,
    pub(crate) status: LoadStatus,
    pub(crate) children: Option<Vec<NodeId>>,
    pub(crate) error: Option<TransportError>,
    pub(crate) ticket: FetchTicket,
}

impl ChildListEntry {
    pub(crate) fn loading(parent: ParentId, ticket: FetchTicket) -> Self {
        Self {
            parent,
            status: LoadStatus::Loading,
            children: None,
            error: None,
            ticket,
        }
    }

    pub fn parent(&self) -> ParentId {
        self.parent
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn is_loaded(&self) -> bool {
        self.status == LoadStatus::Loaded
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }

    /// Ordered child ids, present only once loaded
    pub fn child_ids(&self) -> Option<&[NodeId]> {
        self.children.as_deref()
    }

    /// Captured failure cause, present only in `Error` status
    pub fn error(&self) -> Option<&TransportError> {
        self.error.as_ref()
    }

    pub fn ticket(&self) -> FetchTicket {
        self.ticket
    }
}
