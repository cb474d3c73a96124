//! Work selection for the iteration driver.
//!
//! The driver reads the PRD after the assistant has rewritten it, so selection
//! works on raw JSON entries rather than the validated [`PrdEntry`] form.
//!
//! [`PrdEntry`]: crate::core::types::PrdEntry

use serde_json::Value;

use crate::core::types::Category;

/// Entries still open, optionally limited to one category.
///
/// An entry is open unless its `passes` is the boolean `true`. With a
/// category, only entries whose `category` string equals it are kept. Store
/// order is preserved; nothing is re-sorted.
pub fn incomplete_entries(entries: &[Value], category: Option<Category>) -> Vec<&Value> {
    entries
        .iter()
        .filter(|entry| entry.get("passes").and_then(Value::as_bool) != Some(true))
        .filter(|entry| {
            category.is_none_or(|c| entry.get("category").and_then(Value::as_str) == Some(c.as_str()))
        })
        .collect()
}
