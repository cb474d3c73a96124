//! Executor abstraction for assistant invocation.
//!
//! The [`Executor`] trait decouples the iteration loop from the actual
//! assistant backend (`claude`). Tests use scripted executors that return
//! predetermined output without spawning processes.

use std::path::PathBuf;
use std::process::Command;

use anyhow::Result;
use tracing::{debug, info, instrument};

use crate::io::process::run_command_tee;

/// Parameters for one assistant invocation.
#[derive(Debug, Clone)]
pub struct ExecRequest {
    /// Working directory for the assistant process (the project root).
    pub workdir: PathBuf,
    /// Transient filtered PRD for this iteration.
    pub prd_path: PathBuf,
    pub progress_path: PathBuf,
    /// Resolved prompt text.
    pub prompt: String,
    /// Grant unsupervised permissions (only inside a detected container).
    pub sandboxed: bool,
}

impl ExecRequest {
    /// The single instruction argument: `@<prd> @<progress> <prompt>`.
    pub fn instruction(&self) -> String {
        format!(
            "@{} @{} {}",
            self.prd_path.display(),
            self.progress_path.display(),
            self.prompt
        )
    }
}

/// What an assistant run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecOutput {
    /// Exit code; `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
    /// Captured stdout.
    pub stdout: Vec<u8>,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Abstraction over assistant backends.
pub trait Executor {
    /// Run the assistant once. Errors mean it could not be started at all;
    /// a non-zero exit is reported through [`ExecOutput::exit_code`].
    fn exec(&self, request: &ExecRequest) -> Result<ExecOutput>;
}

pub const CLAUDE_BIN: &str = "claude";
pub const PERMISSION_MODE: &str = "acceptEdits";
pub const SKIP_PERMISSIONS_FLAG: &str = "--dangerously-skip-permissions";

/// Executor that spawns the `claude` CLI.
pub struct ClaudeExecutor {
    program: String,
}

impl ClaudeExecutor {
    pub fn new() -> Self {
        Self::with_program(CLAUDE_BIN)
    }

    /// Use a different executable with the same argument contract.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Argument list passed to the assistant.
    pub fn args(request: &ExecRequest) -> Vec<String> {
        let mut args = vec!["--permission-mode".to_string(), PERMISSION_MODE.to_string()];
        if request.sandboxed {
            args.push(SKIP_PERMISSIONS_FLAG.to_string());
        }
        args.push("-p".to_string());
        args.push(request.instruction());
        args
    }
}

impl Default for ClaudeExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor for ClaudeExecutor {
    #[instrument(skip_all, fields(program = %self.program, sandboxed = request.sandboxed))]
    fn exec(&self, request: &ExecRequest) -> Result<ExecOutput> {
        info!(workdir = %request.workdir.display(), "starting assistant");

        let mut cmd = Command::new(&self.program);
        cmd.args(Self::args(request)).current_dir(&request.workdir);

        let output = run_command_tee(cmd)?;

        if !output.status.success() {
            debug!(exit_code = ?output.status.code(), "assistant exited with failure");
        } else {
            debug!("assistant completed successfully");
        }

        Ok(ExecOutput {
            exit_code: output.status.code(),
            stdout: output.stdout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(sandboxed: bool) -> ExecRequest {
        ExecRequest {
            workdir: PathBuf::from("/work"),
            prd_path: PathBuf::from("/tmp/ralph-prd-1.json"),
            progress_path: PathBuf::from("/work/.ralph/progress.txt"),
            prompt: "Do the next thing.".to_string(),
            sandboxed,
        }
    }

    #[test]
    fn args_omit_skip_permissions_outside_sandbox() {
        let args = ClaudeExecutor::args(&request(false));
        assert_eq!(
            args,
            vec![
                "--permission-mode",
                "acceptEdits",
                "-p",
                "@/tmp/ralph-prd-1.json @/work/.ralph/progress.txt Do the next thing.",
            ]
        );
    }

    #[test]
    fn args_include_skip_permissions_in_sandbox() {
        let args = ClaudeExecutor::args(&request(true));
        assert_eq!(args[2], SKIP_PERMISSIONS_FLAG);
        assert_eq!(args.len(), 5);
    }

    #[test]
    fn missing_program_is_a_start_failure() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut req = request(false);
        req.workdir = temp.path().to_path_buf();
        let err = ClaudeExecutor::with_program("ralph-no-such-assistant")
            .exec(&req)
            .unwrap_err();
        assert!(err.to_string().contains("Failed to start ralph-no-such-assistant"));
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_reported_not_raised() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut req = request(false);
        req.workdir = temp.path().to_path_buf();
        // `false` ignores its arguments and exits 1.
        let output = ClaudeExecutor::with_program("false").exec(&req).expect("exec");
        assert_eq!(output.exit_code, Some(1));
        assert!(!output.success());
    }

    #[derive(Clone, Default)]
    struct CapturedLog(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0
                .lock()
                .map_err(|_| std::io::Error::other("log buffer poisoned"))?
                .extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_silent_at_default_log_level() {
        let temp = tempfile::tempdir().expect("tempdir");
        let mut req = request(false);
        req.workdir = temp.path().to_path_buf();
        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::new("warn"))
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let output = tracing::subscriber::with_default(subscriber, || {
            ClaudeExecutor::with_program("false").exec(&req)
        })
        .expect("exec");

        assert_eq!(output.exit_code, Some(1));
        let logged = log.0.lock().expect("lock").clone();
        assert!(logged.is_empty(), "{}", String::from_utf8_lossy(&logged));
    }
}
