//! CLI presentation: text and json formatters per command family.

mod page;
mod tree;

pub use page::{format_page_json, format_page_text};
pub use tree::format_tree_frame;
