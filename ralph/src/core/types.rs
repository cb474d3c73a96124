//! Shared types for the requirement store.
//!
//! These mirror the on-disk JSON format of `.ralph/prd.json`. The assistant
//! rewrites that file freely, so keys it adds are carried through untouched.

use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Step substituted when an entry is created without verification steps.
pub const DEFAULT_STEP: &str = "Verify the feature works as expected";

/// Requirement category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Ui,
    Feature,
    Bugfix,
    Setup,
    Development,
    Testing,
    Docs,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Ui,
        Category::Feature,
        Category::Bugfix,
        Category::Setup,
        Category::Development,
        Category::Testing,
        Category::Docs,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Ui => "ui",
            Category::Feature => "feature",
            Category::Bugfix => "bugfix",
            Category::Setup => "setup",
            Category::Development => "development",
            Category::Testing => "testing",
            Category::Docs => "docs",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One requirement in the store. Identity is the 1-based position in the array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrdEntry {
    pub category: Category,
    pub description: String,
    pub steps: Vec<String>,
    pub passes: bool,
    /// Keys other than the four above, kept in place across load/save.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PrdEntry {
    /// Build a new, not-yet-passing entry. Empty `steps` get [`DEFAULT_STEP`].
    pub fn new(category: Category, description: impl Into<String>, steps: Vec<String>) -> Self {
        let mut steps: Vec<String> = steps
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if steps.is_empty() {
            steps.push(DEFAULT_STEP.to_string());
        }
        Self {
            category,
            description: description.into(),
            steps,
            passes: false,
            extra: Map::new(),
        }
    }
}
