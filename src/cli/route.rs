//! CLI route: single route table and run context. Dispatches to the scenario
//! runner and presentation.

use crate::cli::parse::{Commands, OutputFormat};
use crate::cli::presentation::{
    format_report_json, format_report_text, format_tree_json, format_tree_text, TreeEntry,
};
use crate::config::{ConfigLoader, CtxtreeConfig};
use crate::error::ApiError;
use crate::hub::Hub;
use crate::scenario::{ContextSpec, Scenario, ScenarioRunner, Step};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Runtime context for CLI execution: the loaded configuration.
pub struct RunContext {
    config: CtxtreeConfig,
    config_path: Option<PathBuf>,
}

impl RunContext {
    /// Create run context from an optional config path. Uses ConfigLoader only.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, ApiError> {
        let config = match config_path {
            Some(ref path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        Ok(Self {
            config,
            config_path,
        })
    }

    pub fn from_config(config: CtxtreeConfig) -> Self {
        Self {
            config,
            config_path: None,
        }
    }

    pub fn config(&self) -> &CtxtreeConfig {
        &self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        let started = Instant::now();
        let result = match command {
            Commands::Run { scenario, format } => self.run(scenario, *format),
            Commands::Tree { scenario, format } => self.tree(scenario, *format),
        };
        info!(
            command = command_name(command),
            ok = result.is_ok(),
            duration_ms = started.elapsed().as_millis() as u64,
            "command finished"
        );
        result
    }

    fn hub(&self) -> Hub {
        Hub::from_config(&self.config.hub)
    }

    fn run(&self, path: &Path, format: OutputFormat) -> Result<String, ApiError> {
        let scenario = Scenario::load(path)?;
        let mut runner = ScenarioRunner::new(self.hub());
        let report = runner.run(&scenario)?;
        match format {
            OutputFormat::Text => Ok(format_report_text(&report)),
            OutputFormat::Json => format_report_json(&report),
        }
    }

    /// Creates the listed contexts and those of `create` steps; other steps are skipped.
    fn tree(&self, path: &Path, format: OutputFormat) -> Result<String, ApiError> {
        let scenario = Scenario::load(path)?;
        let created = scenario.steps.iter().filter_map(|step| match step {
            Step::Create(spec) => Some(spec),
            _ => None,
        });
        let specs: Vec<&ContextSpec> = scenario.contexts.iter().chain(created).collect();

        let mut runner = ScenarioRunner::new(self.hub());
        let mut entries = Vec::with_capacity(specs.len());
        for spec in specs {
            let context = runner.create(spec)?;
            entries.push(TreeEntry {
                path: spec.path(),
                id: context.id().to_string(),
                parent_id: context.parent_id().to_string(),
                state_key: context.state_key().to_string(),
                reducer: spec.reducer.clone(),
                state: context.get_state(),
            });
        }
        match format {
            OutputFormat::Text => Ok(format_tree_text(&entries)),
            OutputFormat::Json => format_tree_json(&entries),
        }
    }
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Run { .. } => "run",
        Commands::Tree { .. } => "tree",
    }
}
