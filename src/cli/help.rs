//! CLI command-name contract for logging and routing.

use crate::cli::parse::Commands;

/// Command name recorded on the command span (e.g. "tree", "page").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Tree { .. } => "tree",
        Commands::Page { .. } => "page",
        Commands::Count => "count",
        Commands::Insert { .. } => "insert",
        Commands::Populate { .. } => "populate",
        Commands::Delete { .. } => "delete",
        Commands::Move { .. } => "move",
        Commands::Config => "config",
    }
}
