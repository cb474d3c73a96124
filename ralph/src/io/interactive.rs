//! Interactive terminal prompts (`inquire`) for `init` and `prd add`.

use anyhow::{Result, bail};
use inquire::{Confirm, Select, Text};

use crate::core::languages::{LANGUAGES, Language};
use crate::core::types::{Category, PrdEntry};
use crate::setup::SetupPrompter;

/// Ask for category, description and verification steps.
///
/// Steps are read until an empty line; none at all yields the default step.
pub fn prompt_new_entry() -> Result<PrdEntry> {
    println!("Add new PRD entry\n");
    let category = Select::new("Select category:", Category::ALL.to_vec()).prompt()?;
    let description = Text::new("Description:").prompt()?;
    if description.trim().is_empty() {
        bail!("Description is required.");
    }

    println!("\nEnter verification steps (empty line to finish):");
    let mut steps = Vec::new();
    loop {
        let step = Text::new(&format!("  Step {}:", steps.len() + 1)).prompt()?;
        if step.trim().is_empty() {
            break;
        }
        steps.push(step);
    }

    Ok(PrdEntry::new(category, description.trim(), steps))
}

pub fn select_language() -> Result<Language> {
    let labels: Vec<String> = LANGUAGES.iter().map(|p| p.label()).collect();
    let choice = Select::new("Select your project language/runtime:", labels).raw_prompt()?;
    Ok(LANGUAGES[choice.index].language)
}

/// Ask for a command, keeping `default` when the answer is blank.
pub fn prompt_command(message: &str, default: &str) -> Result<String> {
    let answer = Text::new(message).with_default(default).prompt()?;
    let answer = answer.trim();
    Ok(if answer.is_empty() {
        default.to_string()
    } else {
        answer.to_string()
    })
}

pub fn confirm(message: &str) -> Result<bool> {
    Ok(Confirm::new(message).with_default(false).prompt()?)
}

/// [`SetupPrompter`] backed by terminal prompts.
pub struct InquirePrompter;

impl SetupPrompter for InquirePrompter {
    fn confirm_overwrite(&self) -> Result<bool> {
        confirm(".ralph/config.json already exists. Overwrite?")
    }

    fn select_language(&self) -> Result<Language> {
        select_language()
    }

    fn custom_command(&self, message: &str, default: &str) -> Result<String> {
        prompt_command(message, default)
    }
}
