//! I/O helpers for ralph commands.

pub mod config;
pub mod context;
pub mod executor;
pub mod init;
pub mod interactive;
pub mod notify;
pub mod prd_store;
pub mod process;
pub mod prompt;
pub mod sandbox;
