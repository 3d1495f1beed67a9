//! Output formatting for reports and binder outlines.
//!
//! Supports a human-readable text report, JSON, and a table view of the binder.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};

use crate::domain::{BinderItem, ConversionReport, ItemKind};

/// Report output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable summary with an enumerated failure list.
    #[default]
    Text,
    /// JSON for programmatic use.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {s}. Use: text, json")),
        }
    }
}

/// Formats a report as text: the message, then one numbered line per failure.
pub fn format_report_text(report: &ConversionReport) -> String {
    let mut out = String::new();

    if report.success {
        out.push_str(&format!("{} {}\n", "✓".green().bold(), report.message));
        if report.folders_created > 0 {
            out.push_str(&format!("  Folders created: {}\n", report.folders_created));
        }
    } else {
        out.push_str(&format!("{} {}\n", "✗".red().bold(), report.message));
    }

    if !report.failures.is_empty() {
        out.push_str(&format!("\n{}\n", "Failures".bold()));
        for (i, failure) in report.failures.iter().enumerate() {
            out.push_str(&format!(
                "  {}. {}: {}\n",
                i + 1,
                failure.relative_path.display().to_string().yellow(),
                failure.reason
            ));
        }
    }

    out
}

/// Formats a report as JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn format_report_json(report: &ConversionReport) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}

/// Formats the binder outline as a table, indenting titles by depth.
pub fn format_outline_table(root: &BinderItem) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Title", "Kind", "Label", "Status", "Compile"]);

    for child in &root.children {
        add_rows(&mut table, child, 0);
    }

    table.to_string()
}

fn add_rows(table: &mut Table, item: &BinderItem, depth: usize) {
    let title = format!("{}{}", "  ".repeat(depth), truncate(&item.title, 50));
    let compile = match item.kind {
        ItemKind::Document if item.include_in_compile => "yes",
        ItemKind::Document => "no",
        _ => "",
    };

    table.add_row(vec![
        title,
        item.kind.to_string(),
        item.label.clone().unwrap_or_else(|| "-".to_string()),
        item.status.clone().unwrap_or_else(|| "-".to_string()),
        compile.to_string(),
    ]);

    for child in &item.children {
        add_rows(table, child, depth + 1);
    }
}

/// Truncates a string to max characters with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{head}...")
    }
}
