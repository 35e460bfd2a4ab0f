//! Configuration System
//!
//! Layered configuration: built-in defaults, the global config file, an
//! optional explicit file, then `CTXTREE_*` environment variables.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod sources;

pub use sources::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CtxtreeConfig {
    /// Identity scheme of the hub
    #[serde(default)]
    pub hub: HubConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// How context identities are built.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    /// Parent identity of top-level contexts
    #[serde(default = "default_root_id")]
    pub root_id: String,

    /// Separator between a parent identity and a child key
    #[serde(default = "default_delimiter")]
    pub delimiter: String,
}

fn default_root_id() -> String {
    crate::types::ROOT_CONTEXT_ID.to_string()
}

fn default_delimiter() -> String {
    crate::types::CONTEXT_ID_DELIMITER.to_string()
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            root_id: default_root_id(),
            delimiter: default_delimiter(),
        }
    }
}

impl HubConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.root_id.is_empty() {
            return Err("hub.root_id cannot be empty".to_string());
        }
        if self.delimiter.is_empty() {
            return Err("hub.delimiter cannot be empty".to_string());
        }
        if self.root_id.contains(&self.delimiter) {
            return Err(format!(
                "hub.root_id '{}' must not contain the delimiter '{}'",
                self.root_id, self.delimiter
            ));
        }
        Ok(())
    }
}

impl CtxtreeConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        if let Err(e) = self.hub.validate() {
            errors.push(e);
        }
        if let Err(e) = self.logging.validate() {
            errors.push(e);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Loads [`CtxtreeConfig`] from the layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, global file, environment.
    pub fn load() -> Result<CtxtreeConfig, ApiError> {
        let builder = sources::builder_with_defaults()?;
        let builder = sources::add_global_file(builder);
        Self::finish(sources::add_environment(builder))
    }

    /// Defaults, then `path`, then environment. The global file is skipped.
    pub fn load_from_file(path: &Path) -> Result<CtxtreeConfig, ApiError> {
        if !path.exists() {
            return Err(ApiError::ConfigError(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let builder = sources::builder_with_defaults()?;
        let builder = sources::add_file(builder, path);
        Self::finish(sources::add_environment(builder))
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<CtxtreeConfig, ApiError> {
        let config: CtxtreeConfig = builder.build()?.try_deserialize()?;
        config.validate().map_err(ApiError::InvalidConfig)?;
        Ok(config)
    }
}
