//! Configuration sources, in increasing precedence.

pub mod global_file;
pub mod workspace_file;
