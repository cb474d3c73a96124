//! Orchestration for the `ralph prd` subcommands.
//!
//! Every mutating command loads the whole PRD, validates its input before
//! touching anything, then rewrites the file once.

use std::fmt::Write as _;

use anyhow::Result;
use colored::Colorize;
use tracing::debug;

use crate::core::edit::{CleanSummary, clean, parse_indices, toggle, toggle_all};
use crate::core::summary::{BAR_WIDTH, StatusSummary};
use crate::core::types::PrdEntry;
use crate::io::init::RalphPaths;
use crate::io::prd_store::{load_prd, save_prd};

/// Append `entry` and return its 1-based number.
pub fn add_entry(paths: &RalphPaths, entry: PrdEntry) -> Result<usize> {
    let mut entries = load_prd(&paths.prd_path)?;
    entries.push(entry);
    save_prd(&paths.prd_path, &entries)?;
    debug!(number = entries.len(), "entry added");
    Ok(entries.len())
}

/// Which entries `toggle_entries` should flip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleTarget {
    All,
    /// Raw 1-based numbers as typed by the user.
    Numbers(Vec<String>),
}

/// Flip `passes` and return `(number, entry after the flip)` per toggle.
///
/// Numbers are all validated first; on any bad number nothing is written.
pub fn toggle_entries(paths: &RalphPaths, target: &ToggleTarget) -> Result<Vec<(usize, PrdEntry)>> {
    let mut entries = load_prd(&paths.prd_path)?;
    let indices: Vec<usize> = match target {
        ToggleTarget::All => {
            toggle_all(&mut entries);
            (0..entries.len()).collect()
        }
        ToggleTarget::Numbers(raw) => {
            let indices = parse_indices(raw, entries.len())?;
            toggle(&mut entries, &indices);
            indices
        }
    };
    save_prd(&paths.prd_path, &entries)?;
    Ok(indices
        .into_iter()
        .map(|idx| (idx + 1, entries[idx].clone()))
        .collect())
}

/// Remove passing entries. The file is left untouched when none pass.
pub fn clean_entries(paths: &RalphPaths) -> Result<CleanSummary> {
    let mut entries = load_prd(&paths.prd_path)?;
    let summary = clean(&mut entries);
    if summary.removed > 0 {
        save_prd(&paths.prd_path, &entries)?;
    }
    Ok(summary)
}

pub fn clean_message(summary: &CleanSummary) -> String {
    if summary.removed == 0 {
        return "No passing entries to clean.".to_string();
    }
    format!(
        "Removed {} passing {}. {} {} remaining.",
        summary.removed,
        plural(summary.removed, "entry", "entries"),
        summary.remaining,
        plural(summary.remaining, "entry", "entries"),
    )
}

pub fn toggle_message(number: usize, entry: &PrdEntry) -> String {
    let state = if entry.passes {
        "PASSING".green()
    } else {
        "NOT PASSING".yellow()
    };
    format!("Entry #{number} \"{}\" is now {state}", entry.description)
}

pub fn render_list(entries: &[PrdEntry]) -> String {
    if entries.is_empty() {
        return "No PRD entries found.\n".to_string();
    }
    let mut out = String::from("\nPRD Entries:\n\n");
    for (i, entry) in entries.iter().enumerate() {
        let marker = if entry.passes {
            "[PASS]".green()
        } else {
            "[    ]".yellow()
        };
        let _ = writeln!(
            out,
            "  {}. {marker} [{}] {}",
            i + 1,
            entry.category,
            entry.description
        );
        for (j, step) in entry.steps.iter().enumerate() {
            let _ = writeln!(out, "       {}. {step}", j + 1);
        }
        out.push('\n');
    }
    out
}

pub fn render_status(entries: &[PrdEntry]) -> String {
    if entries.is_empty() {
        return "No PRD entries found.\n".to_string();
    }
    let summary = StatusSummary::from_entries(entries);
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\nPRD Status: {}/{} passing ({}%)\n",
        summary.passing,
        summary.total,
        summary.percent()
    );

    let filled = summary.filled_cells(BAR_WIDTH);
    let bar = format!(
        "{}{}",
        "\u{2588}".repeat(filled).green(),
        "\u{2591}".repeat(BAR_WIDTH - filled)
    );
    let _ = writeln!(out, "  [{bar}]\n");

    out.push_str("  By category:\n");
    for (category, stats) in &summary.by_category {
        let _ = writeln!(out, "    {category}: {}/{}", stats.passing, stats.total);
    }

    if summary.is_complete() {
        let _ = writeln!(out, "\n  {}", "\u{2713} All requirements complete!".green());
    } else {
        let remaining: Vec<&PrdEntry> = entries.iter().filter(|e| !e.passes).collect();
        let _ = writeln!(out, "\n  Remaining ({}):", remaining.len());
        for entry in remaining {
            let _ = writeln!(out, "    - [{}] {}", entry.category, entry.description);
        }
    }
    out
}

fn plural(count: usize, one: &'static str, many: &'static str) -> &'static str {
    if count == 1 { one } else { many }
}
