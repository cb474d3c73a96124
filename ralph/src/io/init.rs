//! Project layout under `.ralph/` and initialization scaffolding.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use super::config::{RalphConfig, write_config};
use super::prd_store::save_prd;
use super::prompt::DEFAULT_PROMPT_TEMPLATE;
use crate::core::types::{Category, PrdEntry};

pub const RALPH_DIR: &str = ".ralph";
pub const CONFIG_FILE: &str = "config.json";
pub const PROMPT_FILE: &str = "prompt.md";
pub const PRD_FILE: &str = "prd.json";
pub const PROGRESS_FILE: &str = "progress.txt";

/// All canonical paths for a project root.
///
/// Built once from the working directory and passed to every command, so no
/// operation looks up the current directory on its own.
#[derive(Debug, Clone)]
pub struct RalphPaths {
    pub root: PathBuf,
    pub ralph_dir: PathBuf,
    pub config_path: PathBuf,
    pub prompt_path: PathBuf,
    pub prd_path: PathBuf,
    pub progress_path: PathBuf,
    /// Where per-iteration filtered PRD files are written.
    pub transient_dir: PathBuf,
}

impl RalphPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let ralph_dir = root.join(RALPH_DIR);
        Self {
            root: root.clone(),
            ralph_dir: ralph_dir.clone(),
            config_path: ralph_dir.join(CONFIG_FILE),
            prompt_path: ralph_dir.join(PROMPT_FILE),
            prd_path: ralph_dir.join(PRD_FILE),
            progress_path: ralph_dir.join(PROGRESS_FILE),
            transient_dir: std::env::temp_dir(),
        }
    }

    pub fn with_transient_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.transient_dir = dir.into();
        self
    }

    /// Fail with [`NotInitializedError`] for the first missing project file.
    pub fn ensure_initialized(&self) -> Result<()> {
        for (name, path) in [
            (CONFIG_FILE, &self.config_path),
            (PROMPT_FILE, &self.prompt_path),
            (PRD_FILE, &self.prd_path),
            (PROGRESS_FILE, &self.progress_path),
        ] {
            if !path.is_file() {
                return Err(NotInitializedError::new(name).into());
            }
        }
        Ok(())
    }
}

/// A required project file is missing; the user has to run `ralph init`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotInitializedError {
    pub file: &'static str,
}

impl NotInitializedError {
    pub fn new(file: &'static str) -> Self {
        Self { file }
    }
}

impl fmt::Display for NotInitializedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} not found. Run 'ralph init' first.", self.file)
    }
}

impl std::error::Error for NotInitializedError {}

/// Options for `init_project`.
#[derive(Debug, Clone)]
pub struct InitOptions {
    pub config: RalphConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileAction {
    Created,
    Skipped,
}

/// What `init_project` did to each file, in write order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitReport {
    pub files: Vec<(&'static str, FileAction)>,
}

/// Create `.ralph/` scaffolding in `paths.root`.
///
/// Config and prompt are always (re)written; the PRD and progress log are
/// only created when absent so existing work is never lost.
pub fn init_project(paths: &RalphPaths, options: &InitOptions) -> Result<InitReport> {
    debug!(root = %paths.root.display(), "initializing project");
    fs::create_dir_all(&paths.ralph_dir)
        .with_context(|| format!("create directory {}", paths.ralph_dir.display()))?;

    let mut files = Vec::new();

    write_config(&paths.config_path, &options.config)?;
    files.push((CONFIG_FILE, FileAction::Created));

    write_file(&paths.prompt_path, DEFAULT_PROMPT_TEMPLATE)?;
    files.push((PROMPT_FILE, FileAction::Created));

    if paths.prd_path.exists() {
        files.push((PRD_FILE, FileAction::Skipped));
    } else {
        save_prd(&paths.prd_path, &default_prd())?;
        files.push((PRD_FILE, FileAction::Created));
    }

    if paths.progress_path.exists() {
        files.push((PROGRESS_FILE, FileAction::Skipped));
    } else {
        write_file(&paths.progress_path, PROGRESS_PLACEHOLDER)?;
        files.push((PROGRESS_FILE, FileAction::Created));
    }

    Ok(InitReport { files })
}

/// Container image name derived from the project directory name.
pub fn default_image_name(root: &Path) -> String {
    let dir = root
        .file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let mut slug = String::with_capacity(dir.len());
    for ch in dir.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "ralph-project".to_string()
    } else {
        format!("ralph-{slug}")
    }
}

fn default_prd() -> Vec<PrdEntry> {
    vec![PrdEntry::new(
        Category::Setup,
        "Example: Project builds successfully",
        vec![
            "Run the build command".to_string(),
            "Verify no errors occur".to_string(),
        ],
    )]
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).with_context(|| format!("write file {}", path.display()))
}

const PROGRESS_PLACEHOLDER: &str = "# Progress Log\n\n";
