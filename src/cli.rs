//! CLI domain: parse, route, help, output, and presentation only.
//! Route handlers drive the tree core and the backend; formatting lives in presentation.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{format_page_json, format_page_text, format_tree_frame};
pub use route::RunContext;
