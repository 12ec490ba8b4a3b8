pub mod config;
pub mod gateway;
pub mod migrate;
pub mod serve;

use std::path::Path;

use anyhow::Context;
use loaddev_config::LoadDevConfig;

/// Resolve configuration from files, `.env`, and `LOADDEV_*` variables.
pub fn load_config(extra: Option<&Path>) -> anyhow::Result<LoadDevConfig> {
    match extra {
        Some(path) => LoadDevConfig::load_from(path)
            .with_context(|| format!("failed to load config with {}", path.display())),
        None => LoadDevConfig::load_with_dotenv().context("failed to load config"),
    }
}
