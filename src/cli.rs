//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; a single route table dispatches to the scenario runner.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, OutputFormat};
pub use presentation::{
    format_report_json, format_report_text, format_tree_json, format_tree_text, TreeEntry,
};
pub use route::RunContext;
