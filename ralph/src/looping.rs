//! Multi-iteration driver for `ralph run` and `ralph once`.

use anyhow::{Result, bail};
use tracing::{debug, info, instrument};

use crate::core::completion::contains_sentinel;
use crate::core::selector::incomplete_entries;
use crate::core::types::Category;
use crate::io::config::load_config;
use crate::io::context::TransientPrd;
use crate::io::executor::{ExecRequest, Executor};
use crate::io::init::RalphPaths;
use crate::io::notify::{NOTIFY_MESSAGE, Notifier};
use crate::io::prd_store::load_prd_values;
use crate::io::prompt::load_resolved_prompt;

/// Options for one `run_loop` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Upper bound on assistant invocations. Must be positive.
    pub iterations: u32,
    pub category: Option<Category>,
    /// Result of the container probe, taken once per command.
    pub sandboxed: bool,
}

/// Reason why `run_loop` stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopStop {
    /// No open entries matched the filter; no assistant was started for that iteration.
    NothingRemaining,
    /// The assistant printed the completion sentinel.
    Sentinel,
    /// All requested iterations ran.
    IterationsExhausted,
}

/// Summary of a loop invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopOutcome {
    pub invocations: u32,
    pub stop: LoopStop,
}

/// Progress notifications for the caller to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopEvent {
    IterationStarted { iter: u32, total: u32, remaining: usize },
    /// The assistant ran but exited non-zero; the loop continues.
    AssistantFailed { iter: u32, exit_code: Option<i32> },
    NothingRemaining,
    Complete,
}

/// Invoke the assistant up to `options.iterations` times.
///
/// Each iteration re-reads the PRD (the assistant may have rewritten it, so
/// only the top-level array shape is required), hands the open entries to the assistant through a fresh transient file and
/// removes that file once the assistant exits. The PRD and progress log are
/// never written here.
///
/// Stops early when nothing is left to do or the assistant prints the
/// completion sentinel. A non-zero assistant exit is reported and skipped; a
/// failure to start the assistant aborts the loop.
#[instrument(skip_all, fields(iterations = options.iterations, category = ?options.category))]
pub fn run_loop<E: Executor, N: Notifier, F: FnMut(LoopEvent)>(
    paths: &RalphPaths,
    executor: &E,
    notifier: &N,
    options: &RunOptions,
    mut on_event: F,
) -> Result<LoopOutcome> {
    if options.iterations == 0 {
        bail!("iterations must be a positive integer");
    }
    paths.ensure_initialized()?;
    let config = load_config(&paths.config_path)?;
    let prompt = load_resolved_prompt(&paths.prompt_path, &config)?;

    let mut invocations = 0u32;
    for iter in 1..=options.iterations {
        let entries = load_prd_values(&paths.prd_path)?;
        let remaining = incomplete_entries(&entries, options.category);
        if remaining.is_empty() {
            info!(iter, "no open entries left");
            on_event(LoopEvent::NothingRemaining);
            return Ok(LoopOutcome {
                invocations,
                stop: LoopStop::NothingRemaining,
            });
        }

        on_event(LoopEvent::IterationStarted {
            iter,
            total: options.iterations,
            remaining: remaining.len(),
        });

        let transient = TransientPrd::write(&paths.transient_dir, &remaining)?;
        let request = ExecRequest {
            workdir: paths.root.clone(),
            prd_path: transient.path().to_path_buf(),
            progress_path: paths.progress_path.clone(),
            prompt: prompt.clone(),
            sandboxed: options.sandboxed,
        };
        let result = executor.exec(&request);
        transient.cleanup();
        let output = result?;
        invocations += 1;
        debug!(iter, exit_code = ?output.exit_code, bytes = output.stdout.len(), "iteration finished");

        if !output.success() {
            on_event(LoopEvent::AssistantFailed {
                iter,
                exit_code: output.exit_code,
            });
        }

        if contains_sentinel(&output.stdout) {
            info!(iter, "completion sentinel received");
            on_event(LoopEvent::Complete);
            notifier.notify(NOTIFY_MESSAGE);
            return Ok(LoopOutcome {
                invocations,
                stop: LoopStop::Sentinel,
            });
        }
    }

    Ok(LoopOutcome {
        invocations,
        stop: LoopStop::IterationsExhausted,
    })
}
