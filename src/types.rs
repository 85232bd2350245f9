//! Core identifiers and wire types shared by the store, walker and transport.

use crate::error::{FieldMessage, ValidationError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Server-assigned node identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub i64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for NodeId {
    fn from(value: i64) -> Self {
        NodeId(value)
    }
}

/// Key under which child lists are requested and cached.
///
/// `Root` is the synthetic top-level parent. On the wire it is the string
/// `"root"`; every other parent is its bare integer id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ParentId {
    Root,
    Node(NodeId),
}

impl ParentId {
    pub const ROOT_KEY: &'static str = "root";

    pub fn node_id(self) -> Option<NodeId> {
        match self {
            ParentId::Root => None,
            ParentId::Node(id) => Some(id),
        }
    }

    pub fn is_root(self) -> bool {
        matches!(self, ParentId::Root)
    }
}

impl From<NodeId> for ParentId {
    fn from(id: NodeId) -> Self {
        ParentId::Node(id)
    }
}

impl fmt::Display for ParentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParentId::Root => f.write_str(Self::ROOT_KEY),
            ParentId::Node(id) => write!(f, "{}", id),
        }
    }
}

impl FromStr for ParentId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == Self::ROOT_KEY {
            return Ok(ParentId::Root);
        }
        s.parse::<i64>()
            .map(|id| ParentId::Node(NodeId(id)))
            .map_err(|_| format!("Invalid parent id '{}': expected an integer or \"root\"", s))
    }
}

impl Serialize for ParentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParentId::Root => serializer.serialize_str(Self::ROOT_KEY),
            ParentId::Node(id) => serializer.serialize_i64(id.0),
        }
    }
}

impl<'de> Deserialize<'de> for ParentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Wire {
            Id(i64),
            Key(String),
        }

        match Wire::deserialize(deserializer)? {
            Wire::Id(id) => Ok(ParentId::Node(NodeId(id))),
            Wire::Key(key) => key.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// A tree node as returned by the backend. Never mutated in place; a refetch
/// of the parent replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// Lexicographic sort key assigned by the server
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    pub depth: usize,
    pub title: Option<String>,
    pub has_children: bool,
}

impl Node {
    pub fn new(id: i64, title: impl Into<String>, depth: usize, has_children: bool) -> Self {
        Self {
            id: NodeId(id),
            rank: None,
            depth,
            title: Some(title.into()),
            has_children,
        }
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("(untitled)")
    }
}

/// Subtree payload for the insert endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeIn {
    pub title: String,
    #[serde(default)]
    pub children: Vec<NodeIn>,
}

impl NodeIn {
    pub fn leaf(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            children: Vec::new(),
        }
    }

    /// Number of nodes in this subtree, including itself
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(NodeIn::node_count).sum::<usize>()
    }
}

/// Where an inserted subtree lands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertPosition {
    /// Append after the last node
    End,
    /// Immediately before the given sibling
    Before(NodeId),
    /// Before a node chosen by the server
    Random,
}

impl InsertPosition {
    pub fn query_value(self) -> Option<String> {
        match self {
            InsertPosition::End => None,
            InsertPosition::Before(id) => Some(id.to_string()),
            InsertPosition::Random => Some("random".to_string()),
        }
    }
}

/// Opaque keyset cursor. Before and after cursors are mutually exclusive by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cursor {
    Before(String),
    After(String),
}

impl Cursor {
    pub fn token(&self) -> &str {
        match self {
            Cursor::Before(token) | Cursor::After(token) => token,
        }
    }
}

/// Page request for the flat pre-order listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: usize,
    pub cursor: Option<Cursor>,
    pub min_depth: Option<usize>,
    pub max_depth: Option<usize>,
}

impl PageRequest {
    pub fn first(limit: usize) -> Self {
        Self {
            limit,
            cursor: None,
            min_depth: None,
            max_depth: None,
        }
    }

    pub fn with_cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = Some(cursor);
        self
    }

    pub fn with_depth_range(mut self, min_depth: Option<usize>, max_depth: Option<usize>) -> Self {
        self.min_depth = min_depth;
        self.max_depth = max_depth;
        self
    }

    /// Reject parameters the backend would answer with a 422
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut messages = Vec::new();
        if self.limit == 0 {
            messages.push(FieldMessage::new("limit", "limit must be greater than 0"));
        }
        if let Some(Cursor::Before(token) | Cursor::After(token)) = &self.cursor {
            if token.is_empty() {
                messages.push(FieldMessage::new("cursor", "cursor token must not be empty"));
            }
        }
        if let (Some(min), Some(max)) = (self.min_depth, self.max_depth) {
            if min > max {
                messages.push(FieldMessage::new(
                    "minDepth",
                    format!("minDepth ({}) must not exceed maxDepth ({})", min, max),
                ));
            }
        }
        if messages.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(messages))
        }
    }

    /// Query pairs in the backend's parameter naming
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("limit", self.limit.to_string())];
        match &self.cursor {
            Some(Cursor::Before(token)) => pairs.push(("beforeCursor", token.clone())),
            Some(Cursor::After(token)) => pairs.push(("afterCursor", token.clone())),
            None => {}
        }
        if let Some(min) = self.min_depth {
            pairs.push(("minDepth", min.to_string()));
        }
        if let Some(max) = self.max_depth {
            pairs.push(("maxDepth", max.to_string()));
        }
        pairs
    }
}

/// One page of the flat listing plus the cursors of its neighbours.
/// A missing cursor means there is no page in that direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub data: Vec<Node>,
    #[serde(default)]
    pub before_cursor: Option<String>,
    #[serde(default)]
    pub after_cursor: Option<String>,
}

impl Page {
    pub fn previous(&self) -> Option<Cursor> {
        self.before_cursor.clone().map(Cursor::Before)
    }

    pub fn next(&self) -> Option<Cursor> {
        self.after_cursor.clone().map(Cursor::After)
    }
}
