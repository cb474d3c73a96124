//! Orchestration for `ralph init`.

use anyhow::Result;
use tracing::info;

use crate::core::languages::Language;
use crate::io::config::RalphConfig;
use crate::io::init::{InitOptions, InitReport, RalphPaths, default_image_name, init_project};

/// Questions `init` may need answered.
pub trait SetupPrompter {
    /// Existing config found; may it be overwritten?
    fn confirm_overwrite(&self) -> Result<bool>;
    fn select_language(&self) -> Result<Language>;
    /// Ask for a custom command; blank keeps `default`.
    fn custom_command(&self, message: &str, default: &str) -> Result<String>;
}

/// Flags given on the command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetupRequest {
    pub language: Option<Language>,
    /// Overwrite an existing config without asking.
    pub force: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupOutcome {
    Aborted,
    Initialized {
        config: RalphConfig,
        report: InitReport,
    },
}

/// Initialize `.ralph/`, asking only for what the flags left open.
pub fn run_setup<P: SetupPrompter>(
    paths: &RalphPaths,
    request: &SetupRequest,
    prompter: &P,
) -> Result<SetupOutcome> {
    if paths.config_path.exists() && !request.force && !prompter.confirm_overwrite()? {
        return Ok(SetupOutcome::Aborted);
    }

    let language = match request.language {
        Some(language) => language,
        None => prompter.select_language()?,
    };
    let mut config = RalphConfig::for_language(language, default_image_name(&paths.root));
    if language == Language::None && request.language.is_none() {
        config.check_command =
            prompter.custom_command("Enter your type/build check command:", &config.check_command)?;
        config.test_command =
            prompter.custom_command("Enter your test command:", &config.test_command)?;
    }

    let report = init_project(
        paths,
        &InitOptions {
            config: config.clone(),
        },
    )?;
    info!(language = ?config.language, "project initialized");
    Ok(SetupOutcome::Initialized { config, report })
}
