//! Prompt template loading and `$variable` resolution.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::{Captures, Regex};

use super::config::RalphConfig;
use super::init::{NotInitializedError, PROMPT_FILE};

/// Template written to `.ralph/prompt.md` by `ralph init`.
pub const DEFAULT_PROMPT_TEMPLATE: &str = include_str!("prompts/ralph.md");

static VARIABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Za-z_][A-Za-z0-9_]*)").expect("variable regex is valid"));

/// Values substituted into the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptVariables {
    pub language: String,
    pub technologies: String,
    pub check_command: String,
    pub test_command: String,
}

impl PromptVariables {
    pub fn from_config(config: &RalphConfig) -> Self {
        let profile = config.language.profile();
        Self {
            language: profile.name.to_string(),
            technologies: profile.technologies.join(", "),
            check_command: config.check_command.clone(),
            test_command: config.test_command.clone(),
        }
    }

    fn lookup(&self, name: &str) -> Option<&str> {
        match name {
            "language" => Some(self.language.as_str()),
            "technologies" => Some(self.technologies.as_str()),
            "checkCommand" => Some(self.check_command.as_str()),
            "testCommand" => Some(self.test_command.as_str()),
            _ => None,
        }
    }
}

/// Read `.ralph/prompt.md` verbatim.
pub fn load_prompt_template(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(NotInitializedError::new(PROMPT_FILE).into());
    }
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

/// Replace known `$name` placeholders; unknown ones are left as written.
pub fn resolve_variables(template: &str, vars: &PromptVariables) -> String {
    VARIABLE_RE
        .replace_all(template, |caps: &Captures<'_>| {
            vars.lookup(&caps[1])
                .map(str::to_string)
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Load the template and resolve it against `config`.
pub fn load_resolved_prompt(path: &Path, config: &RalphConfig) -> Result<String> {
    let template = load_prompt_template(path)?;
    Ok(resolve_variables(&template, &PromptVariables::from_config(config)))
}
