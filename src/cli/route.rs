//! CLI route: single route table and run context. Dispatches to the tree core,
//! the backend, and presentation.

use crate::cli::help::command_name;
use crate::cli::parse::Commands;
use crate::cli::presentation::{format_page_json, format_page_text, format_tree_frame};
use crate::config::{ConfigLoader, UnitreeConfig};
use crate::error::{TransportError, TreeError};
use crate::populate::{PopulateParams, TreeGenerator};
use crate::state::{ToggleOutcome, TreeState};
use crate::transport::{HttpTransport, TreeBackend};
use crate::types::{Cursor, InsertPosition, NodeId, NodeIn, PageRequest, ParentId};
use crate::viewport::Viewport;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Runtime;
use tracing::{debug, info, info_span, warn};

/// Runtime context for CLI execution: effective configuration, the backend
/// client, and the async runtime commands run on.
pub struct RunContext {
    config: UnitreeConfig,
    backend: Arc<HttpTransport>,
    runtime: Runtime,
}

impl RunContext {
    /// Load configuration for `workspace_root` (plus `config_path` if given)
    /// and connect a backend client.
    pub fn new(
        workspace_root: PathBuf,
        config_path: Option<PathBuf>,
        base_url: Option<String>,
    ) -> Result<Self, TreeError> {
        let mut loader = ConfigLoader::new(workspace_root);
        if let Some(path) = config_path {
            loader = loader.file(path);
        }
        let mut config = loader.build_validated()?;
        if let Some(url) = base_url {
            config.transport.base_url = url;
            config
                .transport
                .validate()
                .map_err(TreeError::ConfigError)?;
        }
        Self::with_config(config)
    }

    pub fn with_config(config: UnitreeConfig) -> Result<Self, TreeError> {
        let backend = Arc::new(HttpTransport::new(&config.transport)?);
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;
        Ok(Self {
            config,
            backend,
            runtime,
        })
    }

    pub fn config(&self) -> &UnitreeConfig {
        &self.config
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, TreeError> {
        let span = info_span!("command", name = command_name(command));
        let _guard = span.enter();
        let started = Instant::now();

        let result = self.runtime.block_on(self.execute_inner(command));
        match &result {
            Ok(_) => info!(elapsed_ms = started.elapsed().as_millis() as u64, "Command finished"),
            Err(e) => warn!(error = %e, "Command failed"),
        }
        result
    }

    async fn execute_inner(&self, command: &Commands) -> Result<String, TreeError> {
        match command {
            Commands::Tree {
                open,
                scroll,
                height,
                all,
                plain,
            } => self.handle_tree(open, *scroll, *height, *all, !*plain).await,
            Commands::Page {
                limit,
                before,
                after,
                min_depth,
                max_depth,
                format,
            } => {
                let mut request =
                    PageRequest::first(limit.unwrap_or(self.config.transport.page_size))
                        .with_depth_range(*min_depth, *max_depth);
                if let Some(token) = before {
                    request = request.with_cursor(Cursor::Before(token.clone()));
                } else if let Some(token) = after {
                    request = request.with_cursor(Cursor::After(token.clone()));
                }
                request.validate()?;

                let page = self.backend.fetch_page(&request).await?;
                if format == "json" {
                    format_page_json(&page)
                } else {
                    Ok(format_page_text(&page))
                }
            }
            Commands::Count => {
                let count = self.backend.count().await?;
                Ok(format!("{} node(s)", count))
            }
            Commands::Insert {
                title,
                children,
                before,
                random,
            } => {
                let tree = NodeIn {
                    title: title.clone(),
                    children: children.iter().map(NodeIn::leaf).collect(),
                };
                let position = match (before, random) {
                    (Some(id), _) => InsertPosition::Before(NodeId(*id)),
                    (None, true) => InsertPosition::Random,
                    (None, false) => InsertPosition::End,
                };
                self.backend.insert_tree(&tree, position).await?;
                Ok(format!("Inserted {} node(s)", tree.node_count()))
            }
            Commands::Populate {
                max_depth,
                max_children,
                min_children,
                iterations,
                seed,
            } => {
                let params = PopulateParams {
                    max_depth: *max_depth,
                    min_children: *min_children,
                    max_children: *max_children,
                };
                let mut generator = TreeGenerator::new(params, *seed)?;
                let mut inserted = 0;
                for iteration in 0..*iterations {
                    let tree = generator.generate();
                    self.backend
                        .insert_tree(&tree, InsertPosition::Random)
                        .await?;
                    inserted += tree.node_count();
                    debug!(iteration, nodes = tree.node_count(), "Inserted generated subtree");
                }
                Ok(format!(
                    "Inserted {} node(s) in {} subtree(s)",
                    inserted, iterations
                ))
            }
            Commands::Delete { id } => {
                self.backend.delete_node(NodeId(*id)).await?;
                Ok(format!("Deleted node {} and its subtree", id))
            }
            Commands::Move { id, before } => {
                self.backend.move_node(NodeId(*id), before.map(NodeId)).await?;
                Ok(match before {
                    Some(target) => format!("Moved node {} before node {}", id, target),
                    None => format!("Moved node {} to the end", id),
                })
            }
            Commands::Config => self.config.to_toml(),
        }
    }

    async fn handle_tree(
        &self,
        open: &[i64],
        scroll: u32,
        height: Option<u32>,
        all: bool,
        color: bool,
    ) -> Result<String, TreeError> {
        let mut state = TreeState::new(self.backend.clone());
        state.load_root();
        state.wait_idle().await;
        root_error(&state)?;

        for id in open.iter().copied().map(NodeId) {
            match state.open(id)? {
                ToggleOutcome::NotExpandable => {
                    warn!(node = %id, "Node has no children; not opening")
                }
                _ => state.wait_idle().await,
            }
            if let Some(err) = state
                .store()
                .get(ParentId::Node(id))
                .and_then(|entry| entry.error())
            {
                warn!(node = %id, error = %err, "Children failed to load");
            }
        }

        let mut viewport = Viewport::from(&self.config.viewport);
        if let Some(height) = height {
            viewport.height = height;
        }
        if all {
            viewport.height = u32::MAX;
            viewport.overscan = 0;
        }

        let frame = viewport.frame(&state, scroll);
        Ok(format_tree_frame(&frame, color))
    }
}

/// A root list that failed to load is the command's failure
fn root_error(state: &TreeState) -> Result<(), TransportError> {
    match state.store().get(ParentId::Root).and_then(|e| e.error()) {
        Some(err) => Err(err.clone()),
        None => Ok(()),
    }
}
