//! Deterministic, pure logic shared by the ralph commands.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! data structures and return deterministic outputs suitable for tests.

pub mod completion;
pub mod edit;
pub mod languages;
pub mod selector;
pub mod summary;
pub mod types;
