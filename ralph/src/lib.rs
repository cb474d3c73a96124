//! Iteration driver for running an AI coding assistant against a PRD.
//!
//! A project keeps its requirements in `.ralph/prd.json`. `ralph run` hands the
//! still-open entries to the `claude` CLI, one invocation per iteration, until
//! nothing is left, the assistant reports completion, or the iteration budget
//! runs out. The code is split the same way throughout:
//!
//! - **[`core`]**: Pure, deterministic logic (filtering, edits, summaries).
//!   No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (filesystem, processes, terminal
//!   prompts, container probing). Trait seams allow scripted tests.
//!
//! Orchestration modules ([`looping`], [`prd`], [`setup`]) coordinate core
//! logic with I/O to implement CLI commands.

pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod looping;
pub mod prd;
pub mod setup;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
