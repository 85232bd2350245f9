//! Merge rules: defaults, override order.

use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
pub fn builder_with_defaults() -> Result<ConfigBuilder<config::builder::DefaultState>, ConfigError>
{
    Config::builder()
        .set_default("transport.base_url", "http://localhost:8000")?
        .set_default("transport.connect_timeout_secs", 10)?
        .set_default("transport.request_timeout_secs", 30)?
        .set_default("transport.page_size", 100)?
        .set_default("viewport.row_height", 30)?
        .set_default("viewport.height", 600)?
        .set_default("viewport.overscan", 5)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")
}
