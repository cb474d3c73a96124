//! Completion statistics for `prd status`.

use crate::core::types::{Category, PrdEntry};

/// Width of the status progress bar, in cells.
pub const BAR_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryStats {
    pub passing: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSummary {
    pub passing: usize,
    pub total: usize,
    /// Per-category counts, in order of first appearance in the store.
    pub by_category: Vec<(Category, CategoryStats)>,
}

impl StatusSummary {
    pub fn from_entries(entries: &[PrdEntry]) -> Self {
        let mut by_category: Vec<(Category, CategoryStats)> = Vec::new();
        for entry in entries {
            let idx = match by_category.iter().position(|(c, _)| *c == entry.category) {
                Some(idx) => idx,
                None => {
                    by_category.push((entry.category, CategoryStats::default()));
                    by_category.len() - 1
                }
            };
            let stats = &mut by_category[idx].1;
            stats.total += 1;
            if entry.passes {
                stats.passing += 1;
            }
        }
        Self {
            passing: entries.iter().filter(|e| e.passes).count(),
            total: entries.len(),
            by_category,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.passing == self.total
    }

    /// Rounded completion percentage (0 for an empty store).
    pub fn percent(&self) -> u32 {
        self.ratio_of(100)
    }

    /// Number of filled cells out of `width`.
    pub fn filled_cells(&self, width: usize) -> usize {
        self.ratio_of(width as u32) as usize
    }

    fn ratio_of(&self, scale: u32) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.passing as f64 / self.total as f64) * f64::from(scale)).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::entry;

    #[test]
    fn summary_counts_by_category_in_first_seen_order() {
        let entries = vec![
            entry(Category::Feature, "a", true),
            entry(Category::Ui, "b", false),
            entry(Category::Feature, "c", false),
        ];
        let summary = StatusSummary::from_entries(&entries);
        assert_eq!(summary.passing, 1);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.percent(), 33);
        assert_eq!(summary.filled_cells(BAR_WIDTH), 10);
        assert_eq!(
            summary.by_category,
            vec![
                (
                    Category::Feature,
                    CategoryStats {
                        passing: 1,
                        total: 2
                    }
                ),
                (
                    Category::Ui,
                    CategoryStats {
                        passing: 0,
                        total: 1
                    }
                ),
            ]
        );
        assert!(!summary.is_complete());
    }

    #[test]
    fn percent_rounds_half_up() {
        let entries = vec![
            entry(Category::Docs, "a", true),
            entry(Category::Docs, "b", false),
            entry(Category::Docs, "c", false),
            entry(Category::Docs, "d", false),
            entry(Category::Docs, "e", false),
            entry(Category::Docs, "f", false),
            entry(Category::Docs, "g", false),
            entry(Category::Docs, "h", false),
        ];
        // 1/8 = 12.5%
        assert_eq!(StatusSummary::from_entries(&entries).percent(), 13);
    }
}
