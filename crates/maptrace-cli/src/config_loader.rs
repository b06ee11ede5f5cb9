//! Layered config assembly for CLI commands.

use anyhow::{Context, Result};
use maptrace_core::config::LayeredConfig;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILE: &str = "maptrace.toml";

/// Defaults, then an explicit or discovered `maptrace.toml`, then
/// `MAPTRACE_*` environment variables. CLI overrides are applied by the
/// individual commands.
pub fn load_config(explicit: Option<&Path>) -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if let Some(path) = explicit {
        config = config
            .load_from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?;
    } else {
        let discovered = PathBuf::from(DEFAULT_CONFIG_FILE);
        if discovered.exists() {
            tracing::debug!(path = %discovered.display(), "using discovered config file");
            config = config
                .load_from_file(&discovered)
                .with_context(|| format!("failed to load config from {}", discovered.display()))?;
        }
    }

    Ok(config.load_from_env())
}
