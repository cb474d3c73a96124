//! Project configuration stored under `.ralph/config.json`.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use super::init::{CONFIG_FILE, NotInitializedError};
use crate::core::languages::Language;

/// Project configuration (JSON, camelCase keys).
///
/// Written by `ralph init` and read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RalphConfig {
    pub language: Language,
    /// Type/build check command the assistant must run.
    pub check_command: String,
    pub test_command: String,
    /// Container image used by sandboxed runs.
    #[serde(default)]
    pub image_name: String,
}

impl RalphConfig {
    /// Config with the language table's default commands.
    pub fn for_language(language: Language, image_name: impl Into<String>) -> Self {
        let profile = language.profile();
        Self {
            language,
            check_command: profile.check_command.to_string(),
            test_command: profile.test_command.to_string(),
            image_name: image_name.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.check_command.trim().is_empty() {
            return Err(anyhow!("checkCommand must be non-empty"));
        }
        if self.test_command.trim().is_empty() {
            return Err(anyhow!("testCommand must be non-empty"));
        }
        Ok(())
    }
}

/// Load config from `.ralph/config.json`.
pub fn load_config(path: &Path) -> Result<RalphConfig> {
    if !path.exists() {
        return Err(NotInitializedError::new(CONFIG_FILE).into());
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: RalphConfig =
        serde_json::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &RalphConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = serde_json::to_string_pretty(cfg).context("serialize config json")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}
