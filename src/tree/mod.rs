//! Visible Tree
//!
//! Expansion state, the resumable pre-order walker that turns expansion state
//! plus cached child lists into the flattened row sequence a viewport needs,
//! and the indent guide layout derived from that sequence.

pub mod expansion;
pub mod guides;
pub mod walker;

pub use expansion::ExpansionSet;
pub use guides::{GuideSegment, GuideSegments, IndentGuideBuilder};
pub use walker::{Row, RowAffordance, Rows, TreeSource, TreeWalker};
