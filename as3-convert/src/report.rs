use colored::Colorize;
use rest_tree::{format_summary, format_text, ObjectSet};

use crate::intermediate::IntermediateSet;

/// Render target objects for terminal output, one line per object.
pub fn render_text(set: &ObjectSet) -> String {
    format_text(set)
        .lines()
        .map(|line| {
            let path = line.split_once(' ').map_or(line, |(_, path)| path);
            paint(line, path)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render per-namespace counts.
pub fn render_summary(set: &ObjectSet) -> String {
    format_summary(set).cyan().to_string()
}

/// Render parser output: one line per entry under its tenant/application.
pub fn render_intermediate(set: &IntermediateSet) -> String {
    let mut out = Vec::new();
    for (tenant, application, app) in set.applications() {
        out.push(format!("/{tenant}/{application}").bold().to_string());
        if app.is_empty() {
            out.push("  (empty)".to_string());
        }
        for path in app.entries.keys() {
            let line = format!("  {path}");
            out.push(paint(&line, path.kind()));
        }
    }
    if out.is_empty() {
        out.push("no applications".to_string());
    }
    out.join("\n")
}

fn paint(line: &str, path: &str) -> String {
    if path.starts_with("ltm/virtual-address") {
        line.blue().to_string()
    } else if path.starts_with("ltm/virtual") {
        line.green().to_string()
    } else if path.starts_with("ltm/profile") {
        line.cyan().to_string()
    } else if path.starts_with("ltm/pool") || path.starts_with("ltm/monitor") {
        line.yellow().to_string()
    } else if path.starts_with("sys/file") || path.starts_with("shared/") {
        line.magenta().to_string()
    } else {
        line.to_string()
    }
}
