//! CLI presentation: text and json formatters for run reports and context trees.

use crate::error::ApiError;
use crate::scenario::{ScenarioReport, Snapshot};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use serde::Serialize;

/// One row of `ctxtree tree`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeEntry {
    pub path: String,
    pub id: String,
    pub parent_id: String,
    pub state_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reducer: Option<String>,
    pub state: serde_json::Value,
}

pub fn format_report_text(report: &ScenarioReport) -> String {
    let mut out = String::new();
    for snapshot in &report.snapshots {
        out.push_str(&format_snapshot_text(snapshot));
        out.push('\n');
    }
    out.trim_end().to_string()
}

fn format_snapshot_text(snapshot: &Snapshot) -> String {
    let mut out = format!("Snapshot: {}\n", snapshot.label);
    out.push_str(&format!("  Root: {}\n", snapshot.root));
    if snapshot.contexts.is_empty() {
        out.push_str("  No contexts.\n");
        return out;
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Path", "Identity", "State", "Status"]);
    for context in &snapshot.contexts {
        table.add_row(vec![
            context.path.clone(),
            context.id.clone(),
            context.state.to_string(),
            (if context.destroyed { "destroyed" } else { "live" }).to_string(),
        ]);
    }
    out.push_str(&format!("{}\n", table));
    out
}

pub fn format_report_json(report: &ScenarioReport) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(report)?)
}

pub fn format_tree_text(entries: &[TreeEntry]) -> String {
    if entries.is_empty() {
        return "No contexts.".to_string();
    }
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Path", "Identity", "Parent", "State key", "Reducer", "State"]);
    for entry in entries {
        table.add_row(vec![
            entry.path.clone(),
            entry.id.clone(),
            entry.parent_id.clone(),
            entry.state_key.clone(),
            entry.reducer.clone().unwrap_or_else(|| "-".to_string()),
            entry.state.to_string(),
        ]);
    }
    table.to_string()
}

pub fn format_tree_json(entries: &[TreeEntry]) -> Result<String, ApiError> {
    Ok(serde_json::to_string_pretty(entries)?)
}
