//! unitree: Lazy Tree Rendering Core
//!
//! Renders very large, sparse hierarchies by fetching each parent's children
//! only when it is first expanded, flattening the visible part into rows for
//! a fixed-height viewport, and deriving indent guides from row depths.

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod populate;
pub mod state;
pub mod store;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod transport;
pub mod tree;
pub mod types;
pub mod viewport;
