//! Stable exit codes for ralph CLI commands.

/// Command succeeded (including a run that stopped early on completion).
pub const OK: i32 = 0;
/// Usage error, missing project files, or any other failure.
pub const FAILURE: i32 = 1;
