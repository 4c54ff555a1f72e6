use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::feature_flags::{FeatureFlagError, FeatureFlagService, FeatureFlagStore, AISLE_GROUPING_FLAG};
use crate::shopping::{ConsolidatedItem, DisplayGroup, GroupMode, ShoppingListSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the shopping items export (.json or .csv)
    #[arg(short, long)]
    pub items_file: Option<PathBuf>,

    /// Section the list by recipe or by store aisle
    #[arg(short, long, value_enum)]
    pub group_by: Option<GroupMode>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// JSON file with feature flags and per-user overrides
    #[arg(long)]
    pub flags_file: Option<PathBuf>,

    /// User the feature flags are resolved for
    #[arg(long)]
    pub user_id: Option<String>,

    #[arg(short, long)]
    pub verbose: bool,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Explicit choice first, then the aisle-grouping flag, then the configured default.
pub fn resolve_group_mode<S: FeatureFlagStore>(
    explicit: Option<GroupMode>,
    flags: Option<&mut FeatureFlagService<S>>,
    user_id: Option<&str>,
    configured: GroupMode,
) -> Result<GroupMode, FeatureFlagError> {
    if let Some(mode) = explicit {
        return Ok(mode);
    }
    if let Some(service) = flags {
        if service.is_enabled(AISLE_GROUPING_FLAG, user_id)? {
            return Ok(GroupMode::Aisle);
        }
    }
    Ok(configured)
}

fn format_quantity(servings: f64) -> String {
    if servings.fract() == 0.0 {
        format!("{}", servings)
    } else {
        format!("{:.2}", servings)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    }
}

fn render_item(item: &ConsolidatedItem) -> String {
    let mut parts: Vec<String> = vec![if item.item.is_checked { "[x]" } else { "[ ]" }.to_string()];
    if let Some(servings) = item.item.number_of_servings {
        parts.push(format_quantity(servings));
    }
    if let Some(unit) = item
        .item
        .serving
        .as_ref()
        .and_then(|s| s.measurement_description.as_deref())
    {
        parts.push(unit.to_string());
    }
    parts.push(item.display_name().to_string());

    let mut line = parts.join(" ");
    if let Some(notes) = item.item.notes.as_deref().filter(|n| !n.is_empty()) {
        line.push_str(&format!(", {}", notes));
    }
    if item.consolidated_ids.len() > 1 {
        line.push_str(&format!(" ({} merged)", item.consolidated_ids.len()));
    }
    line
}

pub fn render_text(groups: &[DisplayGroup], summary: &ShoppingListSummary) -> String {
    let mut out = String::new();
    for group in groups {
        out.push_str(&format!("== {} ==\n", group.name));
        for item in &group.items {
            out.push_str(&render_item(item));
            out.push('\n');
        }
        out.push('\n');
    }
    out.push_str(&format!(
        "{} items ({} before merging) in {} groups, {} checked\n",
        summary.consolidated_items, summary.raw_items, summary.groups, summary.checked_items
    ));
    out
}
