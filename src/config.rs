//! Configuration System
//!
//! Layered configuration: merge-policy defaults, then the global file, then
//! workspace files, then an explicit file, then `UNITREE__SECTION__KEY`
//! environment variables. Validation reports every problem at once.

use crate::error::TreeError;
use crate::logging::LoggingConfig;
use crate::transport::TransportConfig;
use crate::viewport::ViewportConfig;
use config::Environment;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

mod merge;
mod sources;

pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UnitreeConfig {
    #[serde(default)]
    pub transport: TransportConfig,

    #[serde(default)]
    pub viewport: ViewportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigValidationError {
    Transport(String),
    Viewport(String),
    Logging(String),
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigValidationError::Transport(msg) => write!(f, "transport: {}", msg),
            ConfigValidationError::Viewport(msg) => write!(f, "viewport: {}", msg),
            ConfigValidationError::Logging(msg) => write!(f, "logging: {}", msg),
        }
    }
}

impl std::error::Error for ConfigValidationError {}

impl UnitreeConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ConfigValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.transport.validate() {
            errors.push(ConfigValidationError::Transport(e));
        }
        if let Err(e) = self.viewport.validate() {
            errors.push(ConfigValidationError::Viewport(e));
        }
        if let Err(e) = self.logging.validate() {
            errors.push(ConfigValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, TreeError> {
        toml::to_string_pretty(self)
            .map_err(|e| TreeError::ConfigError(format!("Failed to serialize config: {}", e)))
    }
}

/// Builds a [`UnitreeConfig`] from the configured layers
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    workspace_root: PathBuf,
    global_file: Option<PathBuf>,
    explicit_file: Option<PathBuf>,
    env_name: String,
    use_env: bool,
}

impl ConfigLoader {
    pub fn new(workspace_root: impl Into<PathBuf>) -> Self {
        Self {
            workspace_root: workspace_root.into(),
            global_file: global_config_path(),
            explicit_file: None,
            env_name: sources::workspace_file::environment_name(),
            use_env: true,
        }
    }

    /// Load with every layer for `workspace_root`
    pub fn load(workspace_root: &Path) -> Result<UnitreeConfig, TreeError> {
        Self::new(workspace_root).build()
    }

    /// Load defaults plus a single file
    pub fn load_from_file(path: &Path) -> Result<UnitreeConfig, TreeError> {
        let builder = merge::merge_policy::builder_with_defaults()?
            .add_source(config::File::from(path).required(true));
        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Override (or disable) the global file location
    pub fn global_file(mut self, path: Option<PathBuf>) -> Self {
        self.global_file = path;
        self
    }

    /// Extra file applied above the workspace files; must exist
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_file = Some(path.into());
        self
    }

    /// Name selecting `config/{env}.toml`
    pub fn env_name(mut self, name: impl Into<String>) -> Self {
        self.env_name = name.into();
        self
    }

    /// Skip `UNITREE__*` environment overrides
    pub fn without_env(mut self) -> Self {
        self.use_env = false;
        self
    }

    pub fn build(&self) -> Result<UnitreeConfig, TreeError> {
        let mut builder = merge::merge_policy::builder_with_defaults()?;
        builder = sources::global_file::add_to_builder(builder, self.global_file.as_deref());
        builder = sources::workspace_file::add_to_builder(
            builder,
            &self.workspace_root,
            &self.env_name,
        );
        if let Some(path) = &self.explicit_file {
            builder = builder.add_source(config::File::from(path.as_path()).required(true));
        }
        if self.use_env {
            builder = builder.add_source(
                Environment::with_prefix("UNITREE")
                    .separator("__")
                    .try_parsing(true),
            );
        }

        let config: UnitreeConfig = builder.build()?.try_deserialize()?;
        debug!(
            workspace = %self.workspace_root.display(),
            base_url = %config.transport.base_url,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Load and validate, joining all validation errors into one
    pub fn build_validated(&self) -> Result<UnitreeConfig, TreeError> {
        let config = self.build()?;
        config.validate().map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            TreeError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                messages.join("\n")
            ))
        })?;
        Ok(config)
    }
}
