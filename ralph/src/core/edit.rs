//! In-memory edits behind `prd toggle` and `prd clean`.
//!
//! Callers load the store, apply one of these, then save the whole array.

use anyhow::{Result, anyhow};

use crate::core::types::PrdEntry;

/// Parse 1-based entry numbers and check them against `len`.
///
/// Every value is validated before any is returned, so a single bad index
/// leaves the store untouched. Returned indices are 0-based.
pub fn parse_indices(raw: &[String], len: usize) -> Result<Vec<usize>> {
    if raw.is_empty() {
        return Err(anyhow!("Usage: ralph prd toggle <number> [<number> ...] | --all"));
    }
    raw.iter()
        .map(|value| {
            let n: usize = value
                .trim()
                .parse()
                .map_err(|_| anyhow!("Invalid entry number '{value}'"))?;
            if n < 1 || n > len {
                return Err(anyhow!("Invalid entry number {n}. Must be 1-{len}"));
            }
            Ok(n - 1)
        })
        .collect()
}

/// Flip `passes` for each index, in the order given.
pub fn toggle(entries: &mut [PrdEntry], indices: &[usize]) {
    for &idx in indices {
        entries[idx].passes = !entries[idx].passes;
    }
}

/// Flip `passes` on every entry.
pub fn toggle_all(entries: &mut [PrdEntry]) {
    for entry in entries.iter_mut() {
        entry.passes = !entry.passes;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CleanSummary {
    pub removed: usize,
    pub remaining: usize,
}

/// Drop every passing entry; later entries are renumbered.
pub fn clean(entries: &mut Vec<PrdEntry>) -> CleanSummary {
    let before = entries.len();
    entries.retain(|entry| !entry.passes);
    CleanSummary {
        removed: before - entries.len(),
        remaining: entries.len(),
    }
}
