//! Configuration sources: defaults, global file, explicit file, environment.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Builder with the defaults every layer overrides.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("hub.root_id", crate::types::ROOT_CONTEXT_ID)?
        .set_default("hub.delimiter", crate::types::CONTEXT_ID_DELIMITER)
}

/// `$XDG_CONFIG_HOME/ctxtree/config.toml`, falling back to `~/.config/ctxtree/config.toml`.
pub fn global_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg.is_empty() {
            return Some(PathBuf::from(xdg).join("ctxtree").join("config.toml"));
        }
    }
    std::env::var("HOME").ok().map(|home| {
        PathBuf::from(home)
            .join(".config")
            .join("ctxtree")
            .join("config.toml")
    })
}

/// Add the global config file to the builder if it exists.
pub fn add_global_file(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    match global_config_path() {
        Some(path) if path.exists() => builder.add_source(File::from(path).required(false)),
        Some(path) => {
            debug!(config_path = %path.display(), "no global configuration file");
            builder
        }
        None => builder,
    }
}

/// Add an explicitly requested config file. It must exist.
pub fn add_file(builder: ConfigBuilder<DefaultState>, path: &Path) -> ConfigBuilder<DefaultState> {
    builder.add_source(File::from(path).required(true))
}

/// `CTXTREE_HUB__ROOT_ID=top` overrides `hub.root_id`, and so on.
pub fn add_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("CTXTREE")
            .prefix_separator("_")
            .separator("__"),
    )
}
