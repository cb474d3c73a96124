//! Test-only helpers: project fixtures, scripted executor, recording notifier.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde_json::{Map, Value};
use tempfile::TempDir;

use crate::core::languages::Language;
use crate::core::types::{Category, PrdEntry};
use crate::io::config::RalphConfig;
use crate::io::executor::{ExecOutput, ExecRequest, Executor};
use crate::io::init::{InitOptions, RalphPaths, init_project};
use crate::io::notify::Notifier;
use crate::io::prd_store::{load_prd, load_prd_values, save_prd};

/// Create a deterministic entry with a single derived step.
pub fn entry(category: Category, description: &str, passes: bool) -> PrdEntry {
    PrdEntry {
        category,
        description: description.to_string(),
        steps: vec![format!("{description} works")],
        passes,
        extra: Map::new(),
    }
}

/// An initialized project in a temp dir; transient files go to `<tmp>/transient`.
pub struct TestProject {
    _temp: TempDir,
    paths: RalphPaths,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        let temp = tempfile::tempdir().context("create tempdir")?;
        let transient_dir = temp.path().join("transient");
        fs::create_dir_all(&transient_dir).context("create transient dir")?;
        let paths = RalphPaths::new(temp.path()).with_transient_dir(transient_dir);
        init_project(
            &paths,
            &InitOptions {
                config: RalphConfig::for_language(Language::Rust, "ralph-test"),
            },
        )?;
        Ok(Self { _temp: temp, paths })
    }

    pub fn root(&self) -> &Path {
        &self.paths.root
    }

    pub fn paths(&self) -> &RalphPaths {
        &self.paths
    }

    pub fn write_prd(&self, entries: &[PrdEntry]) -> Result<()> {
        save_prd(&self.paths.prd_path, entries)
    }

    pub fn read_prd(&self) -> Result<Vec<PrdEntry>> {
        load_prd(&self.paths.prd_path)
    }

    pub fn write_prompt(&self, contents: &str) -> Result<()> {
        fs::write(&self.paths.prompt_path, contents).context("write prompt")
    }

    /// Files currently left in the transient directory.
    pub fn transient_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for item in fs::read_dir(&self.paths.transient_dir).context("read transient dir")? {
            files.push(item.context("read entry")?.path());
        }
        Ok(files)
    }
}

type Effect = Box<dyn Fn() -> Result<()>>;

/// One scripted assistant run.
pub struct ScriptedExec {
    pub exit_code: Option<i32>,
    pub stdout: String,
    /// When set, `exec` fails as if the assistant could not be started.
    pub spawn_error: Option<String>,
    /// Runs during `exec`, e.g. to rewrite the PRD like a real assistant.
    pub effect: Option<Effect>,
}

impl ScriptedExec {
    pub fn stdout(stdout: &str) -> Self {
        Self::exit(0, stdout)
    }

    pub fn exit(code: i32, stdout: &str) -> Self {
        Self {
            exit_code: Some(code),
            stdout: stdout.to_string(),
            spawn_error: None,
            effect: None,
        }
    }

    pub fn spawn_error(message: &str) -> Self {
        Self {
            exit_code: None,
            stdout: String::new(),
            spawn_error: Some(message.to_string()),
            effect: None,
        }
    }

    pub fn with_effect(mut self, effect: impl Fn() -> Result<()> + 'static) -> Self {
        self.effect = Some(Box::new(effect));
        self
    }
}

/// What the executor saw for one call.
#[derive(Debug, Clone)]
pub struct ExecRecord {
    pub request: ExecRequest,
    /// Contents of the transient PRD at the time of the call.
    pub prd: Vec<Value>,
}

impl ExecRecord {
    /// `description` of every entry handed to the assistant.
    pub fn descriptions(&self) -> Vec<String> {
        self.prd
            .iter()
            .filter_map(|e| e.get("description").and_then(Value::as_str))
            .map(str::to_string)
            .collect()
    }
}

/// Executor that replays [`ScriptedExec`] values in order.
pub struct ScriptedExecutor {
    queue: RefCell<VecDeque<ScriptedExec>>,
    calls: RefCell<Vec<ExecRecord>>,
}

impl ScriptedExecutor {
    pub fn new(script: Vec<ScriptedExec>) -> Self {
        Self {
            queue: RefCell::new(script.into()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn calls(&self) -> Vec<ExecRecord> {
        self.calls.borrow().clone()
    }

    pub fn assert_drained(&self) -> Result<()> {
        let left = self.remaining();
        if left > 0 {
            return Err(anyhow!("{left} scripted executor outputs not consumed"));
        }
        Ok(())
    }
}

impl Executor for ScriptedExecutor {
    fn exec(&self, request: &ExecRequest) -> Result<ExecOutput> {
        let next = self
            .queue
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted executor outputs remaining"))?;
        if let Some(message) = next.spawn_error {
            return Err(anyhow!("Failed to start claude: {message}"));
        }
        let prd = load_prd_values(&request.prd_path).context("read transient prd")?;
        self.calls.borrow_mut().push(ExecRecord {
            request: request.clone(),
            prd,
        });
        if let Some(effect) = &next.effect {
            effect()?;
        }
        Ok(ExecOutput {
            exit_code: next.exit_code,
            stdout: next.stdout.into_bytes(),
        })
    }
}

/// Notifier that remembers messages instead of spawning anything.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: RefCell<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
