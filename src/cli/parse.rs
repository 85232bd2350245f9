//! CLI parse: clap types for unitree. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// unitree - browse a very large tree without loading it
#[derive(Parser, Debug)]
#[command(name = "unitree")]
#[command(about = "Lazily load and render a large tree served over HTTP")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Workspace root directory (for config/ files)
    #[arg(long, default_value = ".")]
    pub workspace: PathBuf,

    /// Additional configuration file, applied over workspace config
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides configuration)
    #[arg(long)]
    pub base_url: Option<String>,

    /// Enable verbose logging
    #[arg(long, default_value = "false")]
    pub verbose: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the visible tree through the viewport
    Tree {
        /// Open these nodes, in order, waiting for each to load
        #[arg(long = "open", value_name = "ID")]
        open: Vec<i64>,

        /// Scroll offset in pixels
        #[arg(long, default_value = "0")]
        scroll: u32,

        /// Viewport height in pixels (overrides configuration)
        #[arg(long)]
        height: Option<u32>,

        /// Render every visible row instead of the mounted window
        #[arg(long)]
        all: bool,

        /// Disable colored output
        #[arg(long)]
        plain: bool,
    },
    /// List one keyset page of the flattened tree
    Page {
        /// Page size (defaults to transport.page_size)
        #[arg(long)]
        limit: Option<usize>,

        /// Cursor of the page to continue backwards from
        #[arg(long, conflicts_with = "after")]
        before: Option<String>,

        /// Cursor of the page to continue forwards from
        #[arg(long)]
        after: Option<String>,

        /// Only nodes at or below this depth
        #[arg(long)]
        min_depth: Option<usize>,

        /// Only nodes at or above this depth
        #[arg(long)]
        max_depth: Option<usize>,

        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
    /// Show the total node count
    Count,
    /// Insert a node, optionally with leaf children
    Insert {
        /// Title of the new node
        title: String,

        /// Title of a child to create under the new node (repeatable)
        #[arg(long = "child", value_name = "TITLE")]
        children: Vec<String>,

        /// Insert before this node
        #[arg(long, conflicts_with = "random")]
        before: Option<i64>,

        /// Let the server pick the position
        #[arg(long)]
        random: bool,
    },
    /// Insert randomly generated subtrees at random positions
    Populate {
        /// Levels below each generated root
        #[arg(long)]
        max_depth: usize,

        /// Most children per generated node
        #[arg(long)]
        max_children: usize,

        /// Fewest children per generated node above max depth
        #[arg(long, default_value = "0")]
        min_children: usize,

        /// Number of subtrees to generate and insert
        #[arg(long, default_value = "1")]
        iterations: usize,

        /// Seed for reproducible trees
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Delete a node and its subtree
    Delete {
        /// Node id
        id: i64,
    },
    /// Move a node and its subtree
    Move {
        /// Node id
        id: i64,

        /// Move before this node (omit to move to the end)
        #[arg(long)]
        before: Option<i64>,
    },
    /// Print the effective configuration
    Config,
}
